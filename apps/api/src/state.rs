use std::sync::Arc;

use crate::cleaning::CompactionLimits;
use crate::config::Config;
use crate::render::pdf::PdfRenderer;
use crate::render::TemplateRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Re-scans the filesystem on every lookup; cloning it is just a path copy.
    pub registry: TemplateRegistry,
    /// Pluggable PDF backend. Unconfigured deployments get `UnconfiguredPdfRenderer`.
    pub pdf: Arc<dyn PdfRenderer>,
    pub limits: CompactionLimits,
}
