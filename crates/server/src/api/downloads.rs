//! Download API handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tunefetch_core::{OrchestratorStatus, RequestId, SubmitError};

use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for starting a download
#[derive(Debug, Deserialize)]
pub struct SubmitDownloadBody {
    /// Catalog link to resolve
    pub url: String,
    /// Target directory; the configured default (or the working directory) when absent
    #[serde(default)]
    pub destination: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct SubmitDownloadResponse {
    pub request_id: RequestId,
}

#[derive(Debug, Serialize)]
pub struct DownloadErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Start a download. Progress is reported over the WebSocket feed.
pub async fn submit_download(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SubmitDownloadBody>,
) -> Result<(StatusCode, Json<SubmitDownloadResponse>), impl IntoResponse> {
    match state
        .orchestrator()
        .submit(&body.url, body.destination)
        .await
    {
        Ok(request_id) => Ok((
            StatusCode::ACCEPTED,
            Json(SubmitDownloadResponse { request_id }),
        )),
        Err(e) => {
            let status = match &e {
                SubmitError::Busy => StatusCode::CONFLICT,
                SubmitError::Invalid(_) => StatusCode::BAD_REQUEST,
            };
            Err((
                status,
                Json(DownloadErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
    }
}

/// Whether a download is running, plus the last progress event.
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<OrchestratorStatus> {
    Json(state.orchestrator().status().await)
}
