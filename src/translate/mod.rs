use crate::error::FetchError;
use crate::http::HttpClient;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, instrument, warn};
use url::Url;

#[async_trait]
pub trait TranslationProvider: Send + Sync {
    async fn translate(&self, text: &str) -> Result<String, FetchError>;
}

/// MyMemory machine-translation API.
pub struct MyMemoryClient {
    http: HttpClient,
    base_url: Url,
    langpair: String,
}

#[derive(Debug, Deserialize)]
struct MyMemoryResponse {
    #[serde(rename = "responseStatus", default)]
    response_status: i64,
    #[serde(rename = "responseData")]
    response_data: Option<MyMemoryData>,
}

#[derive(Debug, Deserialize)]
struct MyMemoryData {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
}

impl MyMemoryClient {
    pub fn new(http: HttpClient, base_url: &str, langpair: String) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid translation base URL: {}", base_url))?;
        Ok(Self {
            http,
            base_url,
            langpair,
        })
    }
}

#[async_trait]
impl TranslationProvider for MyMemoryClient {
    #[instrument(skip(self, text), fields(len = text.len()))]
    async fn translate(&self, text: &str) -> Result<String, FetchError> {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("q", text)
            .append_pair("langpair", &self.langpair);

        let payload: MyMemoryResponse = self.http.get_json(&url).await?;

        let translated = payload
            .response_data
            .and_then(|d| d.translated_text)
            .filter(|t| !t.is_empty());
        match (payload.response_status, translated) {
            (200, Some(translated)) => Ok(translated),
            (status, _) => Err(FetchError::Payload(format!(
                "translation response status {}",
                status
            ))),
        }
    }
}

/// Cached plot translation with graceful degradation: any failure, an
/// unrecognized payload, or input too short to bother with all come
/// back as the original text. The caller never sees an error.
pub struct Translator {
    provider: Arc<dyn TranslationProvider>,
    cache: Mutex<HashMap<String, String>>,
    min_len: usize,
    enabled: bool,
}

impl Translator {
    pub fn new(provider: Arc<dyn TranslationProvider>, min_len: usize, enabled: bool) -> Self {
        Self {
            provider,
            cache: Mutex::new(HashMap::new()),
            min_len,
            enabled,
        }
    }

    pub async fn translate(&self, text: &str) -> String {
        if !self.enabled || text.chars().count() < self.min_len {
            return text.to_string();
        }

        if let Some(cached) = self.cache.lock().unwrap().get(text) {
            debug!("Translation cache hit");
            return cached.clone();
        }

        match self.provider.translate(text).await {
            Ok(translated) => {
                self.cache
                    .lock()
                    .unwrap()
                    .insert(text.to_string(), translated.clone());
                translated
            }
            Err(err) => {
                warn!("Translation failed, falling back to original text: {}", err);
                text.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        calls: AtomicUsize,
        reply: Option<String>,
    }

    impl CountingProvider {
        fn replying(reply: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                reply: Some(reply.to_string()),
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                reply: None,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TranslationProvider for CountingProvider {
        async fn translate(&self, _text: &str) -> Result<String, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Some(reply) => Ok(reply.clone()),
                None => Err(FetchError::Network("connection refused".into())),
            }
        }
    }

    const LONG_PLOT: &str = "A thief who steals corporate secrets through dream-sharing.";

    #[tokio::test]
    async fn short_text_returns_unchanged_without_a_call() {
        let provider = Arc::new(CountingProvider::replying("ignored"));
        let translator = Translator::new(provider.clone(), 20, true);

        assert_eq!(translator.translate("N/A").await, "N/A");
        assert_eq!(translator.translate("short").await, "short");
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn repeated_text_hits_the_cache() {
        let provider = Arc::new(CountingProvider::replying("متن ترجمه‌شده"));
        let translator = Translator::new(provider.clone(), 20, true);

        let first = translator.translate(LONG_PLOT).await;
        let second = translator.translate(LONG_PLOT).await;

        assert_eq!(first, "متن ترجمه‌شده");
        assert_eq!(second, first);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn failure_falls_back_to_original_text() {
        let provider = Arc::new(CountingProvider::failing());
        let translator = Translator::new(provider.clone(), 20, true);

        assert_eq!(translator.translate(LONG_PLOT).await, LONG_PLOT);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn disabled_translator_passes_everything_through() {
        let provider = Arc::new(CountingProvider::replying("ignored"));
        let translator = Translator::new(provider.clone(), 20, false);

        assert_eq!(translator.translate(LONG_PLOT).await, LONG_PLOT);
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn success_payload_shape_parses() {
        let json = r#"{
            "responseStatus": 200,
            "responseData": {"translatedText": "سلام دنیا از ترجمه"}
        }"#;
        let payload: MyMemoryResponse = serde_json::from_str(json).unwrap();
        assert_eq!(payload.response_status, 200);
        assert_eq!(
            payload.response_data.unwrap().translated_text.unwrap(),
            "سلام دنیا از ترجمه"
        );
    }
}
