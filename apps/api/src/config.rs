use std::str::FromStr;

use anyhow::{Context, Result};

use crate::layout::themes::DEFAULT_THEME_ID;

/// Application configuration loaded from environment variables.
/// Every variable is optional; unparsable values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Theme used when a request names none.
    pub default_theme_id: String,
    pub max_concurrent_fits: usize,
    pub request_timeout_secs: u64,
    pub max_experiences_per_request: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            default_theme_id: DEFAULT_THEME_ID.to_string(),
            max_concurrent_fits: 64,
            request_timeout_secs: 10,
            max_experiences_per_request: 50,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        Ok(Config {
            port: parse_env("PORT", defaults.port)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            default_theme_id: std::env::var("DEFAULT_THEME_ID").unwrap_or(defaults.default_theme_id),
            max_concurrent_fits: parse_env("MAX_CONCURRENT_FITS", defaults.max_concurrent_fits)?,
            request_timeout_secs: parse_env("REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs)?,
            max_experiences_per_request: parse_env(
                "MAX_EXPERIENCES_PER_REQUEST",
                defaults.max_experiences_per_request,
            )?,
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
