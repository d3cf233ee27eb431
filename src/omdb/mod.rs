use crate::error::FetchError;
use crate::http::HttpClient;
use crate::models::{self, MovieDetail, MovieSummary};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Movie metadata source. The interactive session and the search
/// controller only ever see this trait, so tests can swap in fakes.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<MovieSummary>, FetchError>;
    async fn detail(&self, imdb_id: &str) -> Result<MovieDetail, FetchError>;
}

pub struct OmdbClient {
    http: HttpClient,
    base_url: Url,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Search", default)]
    search: Vec<MovieSummary>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailPayload {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "imdbID", default)]
    imdb_id: String,
    #[serde(rename = "Title", default)]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "Poster", default)]
    poster: String,
    #[serde(rename = "Runtime", default)]
    runtime: String,
    #[serde(rename = "imdbRating", default)]
    imdb_rating: String,
    #[serde(rename = "Plot", default)]
    plot: String,
    #[serde(rename = "Released", default)]
    released: String,
    #[serde(rename = "Actors", default)]
    actors: String,
    #[serde(rename = "Director", default)]
    director: String,
    #[serde(rename = "Genre", default)]
    genre: String,
}

impl OmdbClient {
    pub fn new(http: HttpClient, base_url: &str, api_key: String) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid OMDB base URL: {}", base_url))?;
        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    fn endpoint(&self, params: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("apikey", &self.api_key)
            .extend_pairs(params);
        url
    }
}

#[async_trait]
impl MetadataProvider for OmdbClient {
    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<MovieSummary>, FetchError> {
        let url = self.endpoint(&[("s", query)]);
        let envelope: SearchEnvelope = self.http.get_json(&url).await?;

        if envelope.response == "False" {
            warn!(
                "OMDB reported no results for {:?}: {}",
                query,
                envelope.error.as_deref().unwrap_or("no reason given")
            );
            return Err(FetchError::NotFound);
        }

        info!("OMDB returned {} results for {:?}", envelope.search.len(), query);
        Ok(envelope.search)
    }

    #[instrument(skip(self))]
    async fn detail(&self, imdb_id: &str) -> Result<MovieDetail, FetchError> {
        let url = self.endpoint(&[("i", imdb_id)]);
        let payload: DetailPayload = self.http.get_json(&url).await?;

        if payload.response == "False" {
            return Err(FetchError::NotFound);
        }

        debug!("Fetched detail for {}: {}", imdb_id, payload.title);
        Ok(MovieDetail {
            imdb_id: payload.imdb_id,
            title: payload.title,
            year: payload.year,
            poster_url: payload.poster,
            runtime_minutes: models::parse_runtime_minutes(&payload.runtime),
            imdb_rating: models::parse_rating(&payload.imdb_rating),
            plot: payload.plot,
            released: payload.released,
            actors: payload.actors,
            director: payload.director,
            genre: payload.genre,
        })
    }
}
