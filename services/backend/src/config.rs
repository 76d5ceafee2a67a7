use anyhow::{bail, Context};
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api_port: u16,
    pub metrics_port: Option<u16>,
    pub api_key: String,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// When false the service starts without a pool and storage-backed
    /// routes answer with a configuration error.
    pub enabled: bool,
    pub user: String,
    pub password: String,
    pub name: String,
    pub host: String,
    pub port: u16,
    pub pool_min_size: u32,
    pub pool_max_size: u32,
    pub acquire_timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_vars<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let config = Config {
            api_port: parse_var(&lookup, "API_PORT", 8000)?,
            metrics_port: lookup("METRICS_PORT")
                .map(|raw| {
                    raw.parse()
                        .with_context(|| format!("METRICS_PORT is not a valid port: {raw:?}"))
                })
                .transpose()?,
            api_key: text("API_KEY", "dev-key"),
            database: DatabaseConfig {
                enabled: parse_flag(&lookup, "ENABLE_DB_EVENTS", true)?,
                user: text("POSTGRES_USER", "analyst_user"),
                password: text("POSTGRES_PASSWORD", "analyst_password"),
                name: text("POSTGRES_DB", "analyst_platform"),
                host: text("POSTGRES_HOST", "postgres"),
                port: parse_var(&lookup, "POSTGRES_PORT", 5432)?,
                pool_min_size: parse_var(&lookup, "DB_POOL_MIN_SIZE", 1)?,
                pool_max_size: parse_var(&lookup, "DB_POOL_MAX_SIZE", 10)?,
                acquire_timeout_secs: parse_var(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", 30)?,
            },
        };

        if config.api_key.is_empty() {
            bail!("API_KEY must not be empty");
        }
        if config.database.pool_max_size == 0 {
            bail!("DB_POOL_MAX_SIZE must be at least 1");
        }
        if config.database.pool_min_size > config.database.pool_max_size {
            bail!(
                "DB_POOL_MIN_SIZE ({}) exceeds DB_POOL_MAX_SIZE ({})",
                config.database.pool_min_size,
                config.database.pool_max_size
            );
        }

        Ok(config)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        None => Ok(default),
    }
}

fn parse_flag<F>(lookup: &F, key: &str, default: bool) -> anyhow::Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => bail!("{key} must be a boolean flag, got {raw:?}"),
    }
}
