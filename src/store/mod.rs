use crate::models::{WatchedRecord, WatchedSummary};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// The watched collection, backed by a single JSON file. Every mutation
/// serializes the whole collection straight back to disk, so a crash
/// can lose at most the mutation in progress.
pub struct WatchedStore {
    path: PathBuf,
    records: Vec<WatchedRecord>,
}

impl WatchedStore {
    /// Load the collection. A missing or unreadable file yields an empty
    /// collection rather than an error; the file appears on first save.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(records) => records,
                Err(err) => {
                    warn!(
                        "Watched list at {:?} is unparseable ({}), starting empty",
                        path, err
                    );
                    Vec::new()
                }
            },
            Err(_) => {
                debug!("No watched list at {:?}, starting empty", path);
                Vec::new()
            }
        };
        info!("Loaded {} watched movies from {:?}", records.len(), path);
        Self { path, records }
    }

    pub fn add(&mut self, record: WatchedRecord) -> Result<()> {
        info!("Adding {} to watched list", record.title);
        self.records.push(record);
        self.save()
    }

    pub fn remove(&mut self, imdb_id: &str) -> Result<bool> {
        let before = self.records.len();
        self.records.retain(|r| r.imdb_id != imdb_id);
        let removed = self.records.len() != before;
        if removed {
            info!("Removed {} from watched list", imdb_id);
            self.save()?;
        }
        Ok(removed)
    }

    pub fn all(&self) -> &[WatchedRecord] {
        &self.records
    }

    pub fn is_watched(&self, imdb_id: &str) -> bool {
        self.records.iter().any(|r| r.imdb_id == imdb_id)
    }

    pub fn user_rating_for(&self, imdb_id: &str) -> Option<f32> {
        self.records
            .iter()
            .find(|r| r.imdb_id == imdb_id)
            .map(|r| r.user_rating)
    }

    pub fn summary(&self) -> WatchedSummary {
        WatchedSummary {
            count: self.records.len(),
            avg_imdb_rating: average(self.records.iter().filter_map(|r| r.imdb_rating)),
            avg_user_rating: average(self.records.iter().map(|r| r.user_rating)),
            avg_runtime_minutes: average(
                self.records
                    .iter()
                    .filter_map(|r| r.runtime_minutes.map(|m| m as f32)),
            ),
        }
    }

    // Atomic write: temp file in the same directory, then rename.
    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create data directory {:?}", parent))?;
            }
        }
        let serialized = serde_json::to_string_pretty(&self.records)?;
        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, serialized)
            .with_context(|| format!("Failed to write watched list to {:?}", temp_path))?;
        std::fs::rename(&temp_path, &self.path)
            .with_context(|| format!("Failed to replace watched list at {:?}", self.path))?;
        debug!("Saved {} watched movies", self.records.len());
        Ok(())
    }

    #[cfg(test)]
    fn file_path(&self) -> &PathBuf {
        &self.path
    }
}

fn average(values: impl Iterator<Item = f32>) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in values {
        sum += value as f64;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}
