//! PDF rendering: pluggable client for the external headless-browser renderer.
//!
//! The browser session (launch → context → page → render → teardown) is owned by the
//! remote service. This side owns the request contract and the per-request timeout.
//! Failures are surfaced once and never retried within the same request.
//!
//! `AppState` holds an `Arc<dyn PdfRenderer>`, chosen at startup from config.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF renderer is not configured")]
    Unavailable,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Renderer error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Renderer timed out after {0:?}")]
    Timeout(Duration),

    #[error("Unknown page size '{0}'")]
    UnknownPageSize(String),
}

/// Page sizes the renderer accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    Letter,
    Legal,
}

impl PageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageSize::A4 => "A4",
            PageSize::Letter => "Letter",
            PageSize::Legal => "Legal",
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageSize {
    type Err = PdfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a4" => Ok(PageSize::A4),
            "letter" | "us-letter" => Ok(PageSize::Letter),
            "legal" => Ok(PageSize::Legal),
            _ => Err(PdfError::UnknownPageSize(s.to_string())),
        }
    }
}

/// Converts self-contained HTML into a PDF document.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render(&self, html: &str, page_size: PageSize) -> Result<Bytes, PdfError>;
}

/// Used when no renderer endpoint is configured. Always reports `Unavailable`.
pub struct UnconfiguredPdfRenderer;

#[async_trait]
impl PdfRenderer for UnconfiguredPdfRenderer {
    async fn render(&self, _html: &str, _page_size: PageSize) -> Result<Bytes, PdfError> {
        Err(PdfError::Unavailable)
    }
}

/// Client for a browserless-style `/pdf` endpoint.
///
/// The request waits for network idle before printing, honors `@page` rules from the
/// inlined stylesheet, and prints backgrounds.
#[derive(Clone)]
pub struct BrowserlessPdfRenderer {
    client: Client,
    endpoint: String,
}

impl BrowserlessPdfRenderer {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, PdfError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }

    fn request_body(html: &str, page_size: PageSize) -> serde_json::Value {
        json!({
            "html": html,
            "options": {
                "format": page_size.as_str(),
                "printBackground": true,
                "preferCSSPageSize": true,
            },
            "gotoOptions": {
                "waitUntil": "networkidle0",
            },
        })
    }
}

#[async_trait]
impl PdfRenderer for BrowserlessPdfRenderer {
    async fn render(&self, html: &str, page_size: PageSize) -> Result<Bytes, PdfError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&Self::request_body(html, page_size))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!("PDF renderer returned {}: {}", status, message);
            return Err(PdfError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?;
        debug!("PDF renderer produced {} bytes", body.len());
        Ok(body)
    }
}

/// Runs `renderer` under a hard deadline. No retry on timeout or failure.
pub async fn render_pdf_with_timeout(
    renderer: &dyn PdfRenderer,
    html: &str,
    page_size: PageSize,
    timeout: Duration,
) -> Result<Bytes, PdfError> {
    match tokio::time::timeout(timeout, renderer.render(html, page_size)).await {
        Ok(result) => result,
        Err(_) => Err(PdfError::Timeout(timeout)),
    }
}
