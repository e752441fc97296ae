//! Video API handlers: list, combine-and-create, delete.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use reelstitch_core::{DeleteOutcome, RemoteAsset, VideoUpload};

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

/// Success envelope: `{"message":"Success","result":...}`
#[derive(Debug, Serialize)]
pub struct ApiSuccess<T> {
    pub message: String,
    pub result: T,
}

impl<T> ApiSuccess<T> {
    fn new(result: T) -> Json<Self> {
        Json(Self {
            message: "Success".to_string(),
            result,
        })
    }
}

/// Failure envelope: `{"message":"Error","error":"..."}`
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub message: String,
    pub error: String,
}

/// Every failure, whether bad input or an upstream rejection, maps to 400
/// with the error text in the envelope.
fn bad_request(error: impl ToString) -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiError {
            message: "Error".to_string(),
            error: error.to_string(),
        }),
    )
}

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VideoListResult {
    pub resources: Vec<RemoteAsset>,
    pub count: usize,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/videos
///
/// List all assets stored at the remote media service.
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiSuccess<VideoListResult>>, (StatusCode, Json<ApiError>)> {
    match state.media_client().list_assets().await {
        Ok(resources) => {
            let count = resources.len();
            Ok(ApiSuccess::new(VideoListResult { resources, count }))
        }
        Err(e) => Err(bad_request(e)),
    }
}

/// POST /api/videos
///
/// Multipart form with an ordered, repeated `videos` field. The files are
/// combined into one video in submission order; the combined asset comes
/// back in the envelope.
pub async fn create_video(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ApiSuccess<RemoteAsset>>, (StatusCode, Json<ApiError>)> {
    let mut files: Vec<VideoUpload> = Vec::new();

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() != Some("videos") {
                    continue;
                }
                let filename = field.file_name().map(|s| s.to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| bad_request(format!("Failed to read upload: {}", e)))?;
                files.push(VideoUpload::new(filename, data.to_vec()));
            }
            Ok(None) => break,
            Err(e) => return Err(bad_request(format!("Malformed multipart body: {}", e))),
        }
    }

    tracing::info!(file_count = files.len(), "Combining uploaded videos");

    match state.orchestrator().combine(&files).await {
        Ok(asset) => Ok(ApiSuccess::new(asset)),
        Err(e) => Err(bad_request(e)),
    }
}

/// DELETE /api/videos?id=<publicId>
///
/// Delete one remote asset by public ID. 400 if `id` is absent, before any
/// remote call is made.
pub async fn delete_video(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DeleteParams>,
) -> Result<Json<ApiSuccess<DeleteOutcome>>, (StatusCode, Json<ApiError>)> {
    let id = match params.id {
        Some(id) if !id.is_empty() => id,
        _ => return Err(bad_request("id param is required")),
    };

    match state.media_client().delete_assets(&[id]).await {
        Ok(outcome) => Ok(ApiSuccess::new(outcome)),
        Err(e) => Err(bad_request(e)),
    }
}

/// Any other verb on /api/videos.
pub async fn method_not_allowed() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(serde_json::json!({ "message": "Method not allowed" })),
    )
}
