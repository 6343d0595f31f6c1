use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::render::pdf::PageSize;

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Overrides the templates root discovery.
    pub templates_dir: Option<PathBuf>,
    /// Headless-browser `/pdf` endpoint. PDF rendering is disabled when unset.
    pub pdf_renderer_url: Option<String>,
    pub pdf_render_timeout: Duration,
    pub default_page_size: PageSize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            templates_dir: optional_env("TEMPLATES_DIR").map(PathBuf::from),
            pdf_renderer_url: optional_env("PDF_RENDERER_URL"),
            pdf_render_timeout: Duration::from_secs(
                env_or("PDF_RENDER_TIMEOUT_SECS", "30")
                    .parse::<u64>()
                    .context("PDF_RENDER_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            default_page_size: env_or("DEFAULT_PAGE_SIZE", "A4")
                .parse::<PageSize>()
                .context("DEFAULT_PAGE_SIZE must be one of A4, Letter, Legal")?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            templates_dir: None,
            pdf_renderer_url: None,
            pdf_render_timeout: Duration::from_secs(30),
            default_page_size: PageSize::A4,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
