mod config;
mod error;
mod http;
mod models;
mod omdb;
mod search;
mod store;
mod translate;
mod ui;

use anyhow::Result;
use clap::Parser;
use config::Configuration;
use http::HttpClient;
use omdb::{MetadataProvider, OmdbClient};
use search::SearchController;
use std::sync::Arc;
use store::WatchedStore;
use tracing::info;
use translate::{MyMemoryClient, Translator};
use ui::Session;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Log level (kept quiet by default so logs don't fight the UI)
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(&cli.log_level)
        .init();

    info!("Starting popcorn v{}", env!("CARGO_PKG_VERSION"));

    let config = Configuration::from_file(&cli.config)?;

    let http_client = HttpClient::new();

    let provider: Arc<dyn MetadataProvider> = Arc::new(OmdbClient::new(
        http_client.clone(),
        &config.omdb_base_url(),
        config.omdb_api_key()?,
    )?);
    let controller = SearchController::new(Arc::clone(&provider), config.min_query_len());

    let translator = Translator::new(
        Arc::new(MyMemoryClient::new(
            http_client,
            &config.translation_base_url(),
            config.translation_langpair(),
        )?),
        config.translate_min_len(),
        config.translation_enabled(),
    );

    let store = WatchedStore::load(config.storage_path());

    Session::new(controller, provider, translator, store)
        .run()
        .await
}
