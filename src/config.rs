use anyhow::{anyhow, Result};
use std::env;
use std::path::PathBuf;
use tracing::info;

use crate::website::SiteOptions;

pub const DEFAULT_OMDB_BASE: &str = "http://www.omdbapi.com/";
pub const DEFAULT_DB_PATH: &str = "data/movies.db";
pub const DEFAULT_TEMPLATE_PATH: &str = "static/index_template.html";
pub const DEFAULT_OUTPUT_PATH: &str = "index.html";
pub const DEFAULT_SITE_TITLE: &str = "My Movies Database";

#[derive(Debug, Clone)]
pub struct Config {
    pub omdb_api_key: String,
    pub omdb_base_url: String,
    pub db_path: PathBuf,
    pub template_path: PathBuf,
    pub output_path: PathBuf,
    pub site_title: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let omdb_api_key = env::var("OMDB_API_KEY")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| anyhow!("Missing required environment variable: OMDB_API_KEY"))?;
        info!("OMDB_API_KEY is set");

        Ok(Self {
            omdb_api_key,
            omdb_base_url: var_or("OMDB_BASE_URL", DEFAULT_OMDB_BASE),
            db_path: var_or("MOVIES_DB_PATH", DEFAULT_DB_PATH).into(),
            template_path: var_or("MOVIES_TEMPLATE", DEFAULT_TEMPLATE_PATH).into(),
            output_path: var_or("MOVIES_OUTPUT", DEFAULT_OUTPUT_PATH).into(),
            site_title: var_or("MOVIES_SITE_TITLE", DEFAULT_SITE_TITLE),
        })
    }

    pub fn site_options(&self) -> SiteOptions {
        SiteOptions {
            template_path: self.template_path.clone(),
            output_path: self.output_path.clone(),
            title: self.site_title.clone(),
        }
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
