//! Configuration loading from environment.

use std::env;

/// Application configuration.
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub toss_secret_key: String,
    pub toss_base_url: String,
    /// Seconds between retention sweeps.
    pub sweep_interval_secs: u64,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()?;

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let toss_secret_key = env::var("TOSS_SECRET_KEY")
            .map_err(|_| anyhow::anyhow!("TOSS_SECRET_KEY environment variable is required"))?;

        let toss_base_url = env::var("TOSS_BASE_URL")
            .unwrap_or_else(|_| "https://api.tosspayments.com".to_string());

        let sweep_interval_secs = env::var("RETENTION_SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| "86400".to_string())
            .parse()?;

        Ok(Self {
            port,
            database_url,
            toss_secret_key,
            toss_base_url,
            sweep_interval_secs,
        })
    }
}
