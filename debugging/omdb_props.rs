//! Look up a title on OMDb and print the raw response and the parsed movie.
//! Usage:
//!   cargo run --bin omdb_props -- "<title>"
//! Requires OMDB_API_KEY in the environment (.env supported).

use anyhow::{Context, Result};
use dotenvy::dotenv;
use movie_catalog::config::DEFAULT_OMDB_BASE;
use movie_catalog::omdb::{parse_response, OmdbClient};
use serde_json::json;
use std::env;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenv().ok();
    let query = env::args().skip(1).collect::<Vec<_>>().join(" ");
    if query.trim().is_empty() {
        eprintln!("Usage: cargo run --bin omdb_props -- \"<title>\"");
        std::process::exit(1);
    }

    let api_key = env::var("OMDB_API_KEY").context("OMDB_API_KEY not set")?;
    let base_url = env::var("OMDB_BASE_URL").unwrap_or_else(|_| DEFAULT_OMDB_BASE.to_string());
    let client = OmdbClient::new(base_url, api_key)?;

    let raw = client
        .fetch_raw(&query)
        .await
        .context("OMDb lookup failed")?;
    println!("{}", serde_json::to_string_pretty(&raw)?);

    let parsed = match parse_response(&raw.to_string()) {
        Ok(movie) => json!({ "movie": movie }),
        Err(e) => json!({ "error": e.to_string() }),
    };
    println!("{}", serde_json::to_string_pretty(&parsed)?);
    Ok(())
}
