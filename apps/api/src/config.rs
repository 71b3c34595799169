use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::display::{DisplayConfig, Theme};
use crate::generator::SubmissionEncoding;

const DEFAULT_MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub generator_url: String,
    pub submission_encoding: SubmissionEncoding,
    pub generator_timeout: Duration,
    pub max_photo_bytes: usize,
    pub display: DisplayConfig,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            generator_url: require_env("GENERATOR_URL")?,
            submission_encoding: optional_env("SUBMISSION_ENCODING")
                .map(|v| v.parse::<SubmissionEncoding>().map_err(|e| anyhow!(e)))
                .transpose()?
                .unwrap_or(SubmissionEncoding::Multipart),
            generator_timeout: Duration::from_secs(
                optional_env("GENERATOR_TIMEOUT_SECS")
                    .unwrap_or_else(|| "120".to_string())
                    .parse::<u64>()
                    .context("GENERATOR_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            max_photo_bytes: optional_env("MAX_PHOTO_BYTES")
                .map(|v| v.parse::<usize>())
                .transpose()
                .context("MAX_PHOTO_BYTES must be a byte count")?
                .unwrap_or(DEFAULT_MAX_PHOTO_BYTES),
            display: DisplayConfig {
                theme: optional_env("THEME")
                    .map(|v| v.parse::<Theme>().map_err(|e| anyhow!(e)))
                    .transpose()?
                    .unwrap_or_default(),
            },
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Request body limit for submissions: the photo plus room for the text fields.
    pub fn body_limit(&self) -> usize {
        self.max_photo_bytes + 256 * 1024
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
