use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of an OMDB search response. Field names follow the OMDB
/// payload so these deserialize straight out of the `Search` array.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "Poster")]
    pub poster_url: String,
}

/// Full metadata for a single movie, with the numeric fields already
/// parsed out of OMDB's string representations.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieDetail {
    pub imdb_id: String,
    pub title: String,
    pub year: String,
    pub poster_url: String,
    pub runtime_minutes: Option<u32>,
    pub imdb_rating: Option<f32>,
    pub plot: String,
    pub released: String,
    pub actors: String,
    pub director: String,
    pub genre: String,
}

/// A rated movie in the user's watched collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchedRecord {
    pub imdb_id: String,
    pub title: String,
    pub year: String,
    pub poster_url: String,
    pub imdb_rating: Option<f32>,
    pub runtime_minutes: Option<u32>,
    pub user_rating: f32,
    pub added_at: DateTime<Utc>,
}

impl WatchedRecord {
    pub fn from_detail(detail: &MovieDetail, user_rating: f32) -> Self {
        Self {
            imdb_id: detail.imdb_id.clone(),
            title: detail.title.clone(),
            year: detail.year.clone(),
            poster_url: detail.poster_url.clone(),
            imdb_rating: detail.imdb_rating,
            runtime_minutes: detail.runtime_minutes,
            user_rating,
            added_at: Utc::now(),
        }
    }
}

/// Aggregate numbers shown above the watched list. Averages are taken
/// over the records that actually carry the value.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchedSummary {
    pub count: usize,
    pub avg_imdb_rating: Option<f64>,
    pub avg_user_rating: Option<f64>,
    pub avg_runtime_minutes: Option<f64>,
}

/// Parse an OMDB runtime string such as "148 min". "N/A" and anything
/// else unparsable degrade to None rather than failing the fetch.
pub fn parse_runtime_minutes(raw: &str) -> Option<u32> {
    raw.split_whitespace().next()?.parse().ok()
}

/// Parse an OMDB rating string such as "8.3". "N/A" degrades to None.
pub fn parse_rating(raw: &str) -> Option<f32> {
    raw.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_parses_leading_minutes() {
        assert_eq!(parse_runtime_minutes("148 min"), Some(148));
        assert_eq!(parse_runtime_minutes("90 min"), Some(90));
    }

    #[test]
    fn runtime_degrades_to_none() {
        assert_eq!(parse_runtime_minutes("N/A"), None);
        assert_eq!(parse_runtime_minutes(""), None);
    }

    #[test]
    fn rating_parses_and_degrades() {
        assert_eq!(parse_rating("8.3"), Some(8.3));
        assert_eq!(parse_rating("N/A"), None);
    }

    #[test]
    fn summary_deserializes_from_omdb_field_names() {
        let json = r#"{
            "Title": "Guardians of the Galaxy Vol. 2",
            "Year": "2017",
            "imdbID": "tt3896198",
            "Poster": "https://example.com/poster.jpg"
        }"#;
        let summary: MovieSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.imdb_id, "tt3896198");
        assert_eq!(summary.title, "Guardians of the Galaxy Vol. 2");
        assert_eq!(summary.year, "2017");
    }

    #[test]
    fn watched_record_copies_detail_fields() {
        let detail = MovieDetail {
            imdb_id: "tt0133093".into(),
            title: "The Matrix".into(),
            year: "1999".into(),
            poster_url: "https://example.com/matrix.jpg".into(),
            runtime_minutes: Some(136),
            imdb_rating: Some(8.7),
            plot: "A hacker learns the truth.".into(),
            released: "31 Mar 1999".into(),
            actors: "Keanu Reeves".into(),
            director: "The Wachowskis".into(),
            genre: "Sci-Fi".into(),
        };
        let record = WatchedRecord::from_detail(&detail, 9.0);
        assert_eq!(record.imdb_id, "tt0133093");
        assert_eq!(record.runtime_minutes, Some(136));
        assert_eq!(record.user_rating, 9.0);
    }
}
