use anyhow::{Context, Result};

/// Base URL used when `BACKEND_URL` is not set.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub backend_url: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            backend_url: normalize_base_url(
                &std::env::var("BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string()),
            )?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Validates an absolute base URL and strips trailing slashes so that
/// endpoint paths can be appended verbatim.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    reqwest::Url::parse(trimmed)
        .with_context(|| format!("BACKEND_URL must be an absolute URL, got '{trimmed}'"))?;
    Ok(trimmed.trim_end_matches('/').to_string())
}
