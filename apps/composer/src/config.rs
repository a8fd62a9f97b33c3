use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or numeric values do not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub tracker_url: String,
    pub generator_url: String,
    pub port: u16,
    /// Quiet window before an edited item is saved to the tracker.
    pub save_debounce: Duration,
    /// Timeout for every outbound tracker and generation request.
    pub http_timeout: Duration,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            tracker_url: require_env("TRACKER_URL")?,
            generator_url: require_env("GENERATOR_URL")?,
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            save_debounce: Duration::from_millis(
                env_or("SAVE_DEBOUNCE_MS", "1000")
                    .parse::<u64>()
                    .context("SAVE_DEBOUNCE_MS must be a whole number of milliseconds")?,
            ),
            http_timeout: Duration::from_secs(
                env_or("HTTP_TIMEOUT_SECS", "120")
                    .parse::<u64>()
                    .context("HTTP_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
