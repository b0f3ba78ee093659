//! The download endpoint: fetch a source URL and publish a link.

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

use grabdock_core::PipelineError;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    /// Absent and null are treated the same as an empty URL.
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Serialize)]
pub struct DownloadResponse {
    pub download_url: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub async fn start_download(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DownloadRequest>,
) -> Result<Json<DownloadResponse>, (StatusCode, Json<ErrorResponse>)> {
    let url = request.url.unwrap_or_default();

    match state.pipeline().run(&url).await {
        Ok(published) => Ok(Json(DownloadResponse {
            download_url: published.url,
            title: published.title,
            expires_at: published.expires_at,
        })),
        Err(e) => {
            if !e.is_client_error() {
                error!(error = %e, "download request failed");
            }
            Err(error_response(e))
        }
    }
}

/// Map a pipeline failure to its HTTP status and user-facing message.
///
/// Diagnostics never leak to clients; server-side failures all read
/// the same from the outside.
fn error_response(e: PipelineError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, message) = match e {
        PipelineError::MissingInput => (StatusCode::BAD_REQUEST, "No URL provided".to_string()),
        PipelineError::SourceUnavailable(_) => (
            StatusCode::BAD_REQUEST,
            "The file wasn't available on the site.".to_string(),
        ),
        PipelineError::TooLarge { limit_bytes } => (
            StatusCode::PAYLOAD_TOO_LARGE,
            format!(
                "File is too large. Maximum size is {}MB.",
                limit_bytes / 1_000_000
            ),
        ),
        PipelineError::StoreUnavailable(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "Storage is unavailable. Try again later.".to_string(),
        ),
        PipelineError::StagedFileMissing
        | PipelineError::UploadFailed(_)
        | PipelineError::LinkFailed(_)
        | PipelineError::Unexpected(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "An unexpected error occurred.".to_string(),
        ),
    };
    (status, Json(ErrorResponse { error: message }))
}
