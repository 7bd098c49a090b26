use anyhow::Result;
use dotenvy::dotenv;
use movie_catalog::app::App;
use movie_catalog::config::Config;
use movie_catalog::omdb::{MovieLookup, OmdbClient};
use movie_catalog::prompt::Prompter;
use movie_catalog::storage::MovieStore;
use std::io;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let loaded = dotenv();
    init_tracing();
    match loaded {
        Ok(path) => info!("Loaded environment from {:?}", path),
        Err(e) => warn!("No .env file loaded ({}) - relying on environment", e),
    }

    let config = Config::from_env()?;
    let store = MovieStore::open(&config.db_path)?;
    info!("Using database {}", store.path().display());
    let lookup: Arc<dyn MovieLookup> = Arc::new(OmdbClient::new(
        config.omdb_base_url.clone(),
        config.omdb_api_key.clone(),
    )?);

    let prompter = Prompter::new(io::stdin().lock(), io::stdout().lock());
    let mut app = App::new(store, lookup, config.site_options(), prompter);
    app.run().await
}
