use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

use crate::common::DatabaseUrl;

/// Job configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub scraped_data_dir: PathBuf,
    pub map_data_output: PathBuf,
    pub hubs_policy_path: Option<PathBuf>,
    pub generate_with_overrides: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").ok(),
            scraped_data_dir: env::var("SCRAPED_DATA_DIR")
                .unwrap_or_else(|_| ".".to_string())
                .into(),
            map_data_output: env::var("MAP_DATA_OUTPUT")
                .unwrap_or_else(|_| "client/src/lib/mockData.ts".to_string())
                .into(),
            hubs_policy_path: env::var("HUBS_POLICY_PATH").ok().map(PathBuf::from),
            generate_with_overrides: env::var("GENERATE_WITH_OVERRIDES")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .context("GENERATE_WITH_OVERRIDES must be true or false")?,
        })
    }

    /// Parsed `DATABASE_URL`; fails before any database work when unset or malformed
    pub fn database(&self) -> Result<DatabaseUrl> {
        let raw = self
            .database_url
            .as_deref()
            .context("DATABASE_URL must be set")?;
        DatabaseUrl::parse(raw).context("Failed to parse DATABASE_URL")
    }
}

/// Initialize tracing for a batch job binary
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,hubs_map_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
