//! Axum route handlers for the Templates, Compaction, and Render APIs.

use axum::{
    extract::{Path, State},
    http::header,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::cleaning::compact_resume;
use crate::errors::AppError;
use crate::models::resume::CompactedResume;
use crate::render::pdf::{render_pdf_with_timeout, PageSize};
use crate::render::registry::TemplateMeta;
use crate::render::{render_html, RenderedHtml, TemplateRegistry};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    pub templates: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TemplateDetailResponse {
    pub id: String,
    pub meta: TemplateMeta,
}

#[derive(Debug, Deserialize)]
pub struct CompactRequest {
    #[serde(default)]
    pub resume: Value,
}

#[derive(Debug, Serialize)]
pub struct CompactResponse {
    pub resume: CompactedResume,
}

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub template_id: String,
    #[serde(default)]
    pub resume: Value,
    /// Extracted upload text, shown instead of the structured resume when that is too sparse.
    pub raw_text: Option<String>,
    /// PDF only. Falls back to the bundle metadata, then the configured default.
    pub page_size: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/templates
pub async fn handle_list_templates(
    State(state): State<AppState>,
) -> Result<Json<TemplateListResponse>, AppError> {
    let registry = state.registry.clone();
    let templates = run_blocking(move || Ok(registry.list_ids())).await?;
    Ok(Json(TemplateListResponse { templates }))
}

/// GET /api/v1/templates/:id
///
/// Validates the bundle before returning its metadata so incomplete bundles report the
/// missing file.
pub async fn handle_get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TemplateDetailResponse>, AppError> {
    let registry = state.registry.clone();
    run_blocking(move || {
        registry.validate(&id)?;
        let meta = registry.get_meta(&id)?;
        Ok(Json(TemplateDetailResponse { id, meta }))
    })
    .await
}

/// POST /api/v1/resumes/compact
pub async fn handle_compact(
    State(state): State<AppState>,
    Json(request): Json<CompactRequest>,
) -> Json<CompactResponse> {
    Json(CompactResponse {
        resume: compact_resume(&request.resume, &state.limits),
    })
}

/// POST /api/v1/render/html
pub async fn handle_render_html(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Result<Response, AppError> {
    let job = RenderJob::new(&state, &request);
    let rendered = run_blocking(move || job.render()).await?;
    Ok((
        [(header::CACHE_CONTROL, "no-store")],
        Html(rendered.html),
    )
        .into_response())
}

/// POST /api/v1/render/pdf
///
/// Renders HTML, then hands it to the PDF renderer under the configured timeout.
pub async fn handle_render_pdf(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Result<Response, AppError> {
    let requested = request
        .page_size
        .as_deref()
        .map(str::parse::<PageSize>)
        .transpose()?;
    let default_page_size = state.config.default_page_size;

    let job = RenderJob::new(&state, &request);
    let (rendered, page_size) = run_blocking(move || {
        let rendered = job.render()?;
        let page_size = requested
            .or_else(|| bundle_page_size(&job.registry, &job.template_id))
            .unwrap_or(default_page_size);
        Ok((rendered, page_size))
    })
    .await?;

    let pdf = render_pdf_with_timeout(
        state.pdf.as_ref(),
        &rendered.html,
        page_size,
        state.config.pdf_render_timeout,
    )
    .await?;

    info!(
        "Rendered PDF for template '{}' ({}, {} bytes)",
        request.template_id,
        page_size,
        pdf.len()
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        pdf,
    )
        .into_response())
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Everything a render needs, owned so it can move onto the blocking pool.
struct RenderJob {
    registry: TemplateRegistry,
    template_id: String,
    raw_text: Option<String>,
    compacted: CompactedResume,
}

impl RenderJob {
    fn new(state: &AppState, request: &RenderRequest) -> Self {
        Self {
            registry: state.registry.clone(),
            template_id: request.template_id.clone(),
            raw_text: request.raw_text.clone(),
            compacted: compact_resume(&request.resume, &state.limits),
        }
    }

    /// Filesystem-bound; call from `run_blocking`.
    fn render(&self) -> Result<RenderedHtml, AppError> {
        let rendered = render_html(
            &self.registry,
            &self.template_id,
            &self.compacted,
            self.raw_text.as_deref(),
        )?;
        info!(
            "Rendered template '{}': score={} use_fallback={}",
            self.template_id, rendered.assessment.score, rendered.assessment.use_fallback
        );
        Ok(rendered)
    }
}

/// Registry lookups and rendering touch the filesystem, so they run on the blocking pool.
async fn run_blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed: {e}")))?
}

/// The bundle's declared page size, if its metadata loads and names a known size.
fn bundle_page_size(registry: &TemplateRegistry, template_id: &str) -> Option<PageSize> {
    registry
        .get_meta(template_id)
        .ok()
        .and_then(|meta| meta.page_size.parse::<PageSize>().ok())
}
