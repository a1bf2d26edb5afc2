// src/config.rs

use std::env;
use std::time::Duration;

use dotenvy::dotenv;
use url::Url;

use crate::error::AppError;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: Url,
    pub rust_log: String,
    pub log_dir: String,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok();

        let api_base_url = env::var("API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let log_dir = env::var("LOG_DIR")
            .unwrap_or_else(|_| "logs".to_string());

        let timeout_secs = match env::var("REQUEST_TIMEOUT_SECS") {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|_| {
                AppError::Config(format!("REQUEST_TIMEOUT_SECS must be a number, got '{}'", raw))
            })?,
            Err(_) => 10,
        };

        Ok(Self {
            api_base_url: parse_base_url(&api_base_url)?,
            rust_log,
            log_dir,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Configuration pointing at an explicit base URL, everything else default.
    pub fn with_base_url(base: &str) -> Result<Self, AppError> {
        Ok(Self {
            api_base_url: parse_base_url(base)?,
            rust_log: "info".to_string(),
            log_dir: "logs".to_string(),
            request_timeout: Duration::from_secs(10),
        })
    }
}

/// Parses the gateway base URL and normalises it to end with `/`,
/// so relative endpoint joins keep the path prefix (`/api`).
pub fn parse_base_url(raw: &str) -> Result<Url, AppError> {
    let mut url = Url::parse(raw.trim())?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(AppError::Config(format!(
            "API_BASE_URL must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
