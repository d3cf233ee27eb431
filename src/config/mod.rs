use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_OMDB_URL: &str = "https://www.omdbapi.com/";
pub const DEFAULT_TRANSLATION_URL: &str = "https://api.mymemory.translated.net/get";
pub const DEFAULT_LANGPAIR: &str = "en|fa";

/// Queries below this length never hit the network.
const DEFAULT_MIN_QUERY_LEN: usize = 3;
/// Plots below this length are assumed to need no translation ("N/A").
const DEFAULT_TRANSLATE_MIN_LEN: usize = 20;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Configuration {
    pub omdb: Option<OmdbConfig>,
    pub translation: Option<TranslationConfig>,
    pub search: Option<SearchConfig>,
    pub storage: Option<StorageConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OmdbConfig {
    #[serde(rename = "baseUrl")]
    pub base_url: Option<String>,
    #[serde(rename = "apikey")]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TranslationConfig {
    #[serde(rename = "baseUrl")]
    pub base_url: Option<String>,
    #[serde(rename = "langpair")]
    pub langpair: Option<String>,
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    #[serde(rename = "minQueryLen")]
    pub min_query_len: Option<usize>,
    #[serde(rename = "translateMinLen")]
    pub translate_min_len: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub path: Option<PathBuf>,
}

impl Configuration {
    /// Load from a YAML file. A missing file is not an error: everything
    /// has a default except the OMDB key, which can come from the
    /// environment instead.
    pub fn from_file(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            info!("No config file at {}, using defaults", path);
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        let config: Configuration = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;
        Ok(config)
    }

    pub fn omdb_base_url(&self) -> String {
        self.omdb
            .as_ref()
            .and_then(|o| o.base_url.clone())
            .unwrap_or_else(|| DEFAULT_OMDB_URL.to_string())
    }

    /// The API key never ships hard-coded: it comes from the config file
    /// or the OMDB_API_KEY environment variable.
    pub fn omdb_api_key(&self) -> Result<String> {
        if let Some(key) = self.omdb.as_ref().and_then(|o| o.api_key.clone()) {
            return Ok(key);
        }
        std::env::var("OMDB_API_KEY")
            .context("No OMDB API key: set omdb.apikey in the config file or OMDB_API_KEY in the environment")
    }

    pub fn translation_base_url(&self) -> String {
        self.translation
            .as_ref()
            .and_then(|t| t.base_url.clone())
            .unwrap_or_else(|| DEFAULT_TRANSLATION_URL.to_string())
    }

    pub fn translation_langpair(&self) -> String {
        self.translation
            .as_ref()
            .and_then(|t| t.langpair.clone())
            .unwrap_or_else(|| DEFAULT_LANGPAIR.to_string())
    }

    pub fn translation_enabled(&self) -> bool {
        self.translation
            .as_ref()
            .and_then(|t| t.enabled)
            .unwrap_or(true)
    }

    pub fn min_query_len(&self) -> usize {
        self.search
            .as_ref()
            .and_then(|s| s.min_query_len)
            .unwrap_or(DEFAULT_MIN_QUERY_LEN)
    }

    pub fn translate_min_len(&self) -> usize {
        self.search
            .as_ref()
            .and_then(|s| s.translate_min_len)
            .unwrap_or(DEFAULT_TRANSLATE_MIN_LEN)
    }

    pub fn storage_path(&self) -> PathBuf {
        if let Some(path) = self.storage.as_ref().and_then(|s| s.path.clone()) {
            return path;
        }
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("popcorn")
            .join("watched.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_everything_but_the_key() {
        let config = Configuration::default();
        assert_eq!(config.omdb_base_url(), DEFAULT_OMDB_URL);
        assert_eq!(config.min_query_len(), 3);
        assert_eq!(config.translate_min_len(), 20);
        assert_eq!(config.translation_langpair(), "en|fa");
        assert!(config.translation_enabled());
    }

    #[test]
    fn yaml_overrides_defaults() {
        let yaml = r#"
omdb:
  apikey: "abc123"
search:
  minQueryLen: 2
  translateMinLen: 50
translation:
  enabled: false
"#;
        let config: Configuration = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.omdb_api_key().unwrap(), "abc123");
        assert_eq!(config.min_query_len(), 2);
        assert_eq!(config.translate_min_len(), 50);
        assert!(!config.translation_enabled());
    }

    #[test]
    fn api_key_falls_back_to_the_environment() {
        std::env::set_var("OMDB_API_KEY", "env-key");
        let config = Configuration::default();
        assert_eq!(config.omdb_api_key().unwrap(), "env-key");
        std::env::remove_var("OMDB_API_KEY");
    }

    #[test]
    fn missing_file_loads_defaults() {
        let config = Configuration::from_file("/definitely/not/there.yaml").unwrap();
        assert_eq!(config.min_query_len(), 3);
    }
}
