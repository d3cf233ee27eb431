use crate::error::FetchError;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument};
use url::Url;

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent(concat!("popcorn/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    #[instrument(skip(self), fields(url = %url))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, FetchError> {
        debug!("Making GET request");
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            error!("HTTP request failed with status: {}", status);
            return Err(FetchError::Status(status.as_u16()));
        }

        let json = response.json::<T>().await?;
        Ok(json)
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}
