mod cleaning;
mod config;
mod errors;
mod models;
mod render;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::cleaning::CompactionLimits;
use crate::config::Config;
use crate::render::pdf::{BrowserlessPdfRenderer, PdfRenderer, UnconfiguredPdfRenderer};
use crate::render::TemplateRegistry;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tailor API v{}", env!("CARGO_PKG_VERSION"));

    // Template bundles are re-scanned per request; this only fixes the root
    let registry = TemplateRegistry::discover(config.templates_dir.as_deref());
    info!(
        "Template root: {} ({} bundles)",
        registry.root().display(),
        registry.list_ids().len()
    );

    // PDF renderer (disabled unless PDF_RENDERER_URL is set)
    let pdf: Arc<dyn PdfRenderer> = match &config.pdf_renderer_url {
        Some(url) => {
            info!(
                "PDF renderer: {url} (timeout {:?})",
                config.pdf_render_timeout
            );
            Arc::new(BrowserlessPdfRenderer::new(
                url.clone(),
                config.pdf_render_timeout,
            )?)
        }
        None => {
            info!("PDF renderer not configured; /api/v1/render/pdf will return 503");
            Arc::new(UnconfiguredPdfRenderer)
        }
    };

    // Build app state
    let state = AppState {
        registry,
        pdf,
        limits: CompactionLimits::default(),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
