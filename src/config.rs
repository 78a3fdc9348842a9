use std::{env, fmt::Display, str::FromStr};

use anyhow::{Context, Result};
use tracing::info;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub backend: BackendConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub url: String,
    pub timeout_secs: u64,
}

/// Reads the configuration from the environment (after `.env` is loaded).
pub fn load() -> Result<Config> {
    Ok(Config {
        server: ServerConfig {
            bind_addr: try_load("BIND_ADDR", "0.0.0.0")?,
            port: try_load("PORT", "3000")?,
        },
        backend: BackendConfig {
            url: try_load("BACKEND_URL", "http://localhost:5000/")?,
            timeout_secs: try_load("BACKEND_TIMEOUT_SECS", "10")?,
        },
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("Invalid {key} value: {raw}"))
}
