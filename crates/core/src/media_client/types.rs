//! Types for media service client operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur during media service operations.
#[derive(Debug, Error)]
pub enum MediaClientError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Upload rejected: {0}")]
    UploadRejected(String),

    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// One client-submitted video, held only for the duration of a request.
///
/// Submission order is carried by position in the surrounding collection,
/// not by anything on the value itself.
#[derive(Debug, Clone)]
pub struct VideoUpload {
    /// Original filename as sent by the client (for logging and upload metadata).
    pub filename: Option<String>,
    /// Raw file bytes.
    pub data: Vec<u8>,
}

impl VideoUpload {
    pub fn new(filename: Option<String>, data: Vec<u8>) -> Self {
        Self { filename, data }
    }

    /// Filename for logging, falling back to a placeholder.
    pub fn display_name(&self) -> &str {
        self.filename.as_deref().unwrap_or("<unnamed>")
    }
}

/// A stored video at the remote media service.
///
/// Combined assets are structurally identical to plain stored assets;
/// the remote service owns identity and all durable state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteAsset {
    /// Opaque identifier assigned by the remote service.
    pub public_id: String,
    /// Retrieval URL.
    pub url: String,
    /// Container format (e.g. "mp4").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Stored size in bytes.
    pub bytes: u64,
    /// Duration in seconds, when the service reports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// When the asset was created remotely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Confirmation of a delete call, keyed by public ID.
///
/// The remote service reports a per-asset status string ("deleted",
/// "not_found", ...); we pass it through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteOutcome {
    pub deleted: BTreeMap<String, String>,
}

/// Trait for media service backends.
#[async_trait]
pub trait MediaClient: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Store one video as a standalone asset.
    async fn store_asset(&self, upload: &VideoUpload) -> Result<RemoteAsset, MediaClientError>;

    /// Store one video and splice the given already-stored assets after it,
    /// in order, producing a single combined asset in one remote call.
    ///
    /// An empty `join_targets` list is a plain store; the remote service
    /// defines the combine as a no-op in that case.
    async fn store_and_combine(
        &self,
        upload: &VideoUpload,
        join_targets: &[String],
    ) -> Result<RemoteAsset, MediaClientError>;

    /// List all assets this service has stored remotely.
    async fn list_assets(&self) -> Result<Vec<RemoteAsset>, MediaClientError>;

    /// Delete assets by public ID.
    async fn delete_assets(&self, ids: &[String]) -> Result<DeleteOutcome, MediaClientError>;
}
