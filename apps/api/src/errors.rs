use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::render::pdf::PdfError;
use crate::render::{RegistryError, RenderError};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("PDF renderer unavailable")]
    RendererUnavailable,

    #[error("PDF renderer error: {0}")]
    Renderer(String),

    #[error("PDF renderer timed out")]
    RendererTimeout,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<RegistryError> for AppError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::BundleNotFound { .. } | RegistryError::MissingArtifact { .. } => {
                AppError::NotFound(err.to_string())
            }
            RegistryError::InvalidMeta { .. } => AppError::Template(err.to_string()),
            RegistryError::Io { .. } => AppError::Internal(err.into()),
        }
    }
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Registry(e) => e.into(),
            RenderError::Template(e) => AppError::Template(e.to_string()),
        }
    }
}

impl From<PdfError> for AppError {
    fn from(err: PdfError) -> Self {
        match err {
            PdfError::Unavailable => AppError::RendererUnavailable,
            PdfError::Timeout(_) => AppError::RendererTimeout,
            PdfError::UnknownPageSize(_) => AppError::Validation(err.to_string()),
            PdfError::Http(_) | PdfError::Api { .. } => AppError::Renderer(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Template(msg) => {
                tracing::error!("Template error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "TEMPLATE_ERROR",
                    msg.clone(),
                )
            }
            AppError::RendererUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "RENDERER_UNAVAILABLE",
                "PDF rendering is not configured".to_string(),
            ),
            AppError::Renderer(msg) => {
                tracing::error!("PDF renderer error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "RENDERER_ERROR",
                    "The PDF renderer failed".to_string(),
                )
            }
            AppError::RendererTimeout => {
                tracing::warn!("PDF renderer timed out");
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    "RENDERER_TIMEOUT",
                    "The PDF renderer did not respond in time".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_missing_artifact_maps_to_not_found_naming_file() {
        let err: AppError = RegistryError::MissingArtifact {
            id: "classic".to_string(),
            artifact: "style.css",
        }
        .into();
        match err {
            AppError::NotFound(msg) => assert!(msg.contains("style.css")),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_pdf_errors_map_to_statuses() {
        let status = |e: PdfError| AppError::from(e).into_response().status();
        assert_eq!(status(PdfError::Unavailable), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            status(PdfError::Timeout(Duration::from_secs(1))),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            status(PdfError::UnknownPageSize("A9".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(PdfError::Api {
                status: 500,
                message: "boom".into()
            }),
            StatusCode::BAD_GATEWAY
        );
    }
}
