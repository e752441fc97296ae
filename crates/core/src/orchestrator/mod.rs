//! Sequencing of remote calls that turns an ordered list of uploads into
//! one combined video.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::media_client::{MediaClient, MediaClientError, RemoteAsset, VideoUpload};

/// Errors that can occur while combining uploads.
#[derive(Debug, Error)]
pub enum CombineError {
    #[error("at least one video file is required")]
    NoFiles,

    #[error("failed to store video '{filename}': {source}")]
    Upload {
        filename: String,
        #[source]
        source: MediaClientError,
    },

    #[error("failed to combine videos: {0}")]
    Combine(#[source] MediaClientError),
}

/// Orchestrates the store/combine call sequence against the media service.
///
/// The remote combine operation splices already-stored assets *after* a
/// newly uploaded base video, so the pipeline is built back to front: every
/// file except the logically first is stored standalone, last file first,
/// and the accumulated identifiers ride along on the final upload of the
/// first file. The combined asset comes back from that single last call.
pub struct StitchOrchestrator {
    media_client: Arc<dyn MediaClient>,
}

impl StitchOrchestrator {
    pub fn new(media_client: Arc<dyn MediaClient>) -> Self {
        Self { media_client }
    }

    /// Combine `files` into one video, preserving submission order as
    /// playback order.
    ///
    /// Issues exactly `files.len() - 1` standalone store calls followed by
    /// one store-and-combine call. A single file is stored-and-combined
    /// with an empty target list, which the remote service treats as a
    /// plain store. Fails fast on empty input without touching the remote
    /// service, and stops at the first failed remote call.
    ///
    /// Standalone intermediate assets are left behind at the remote
    /// service on both success and failure; their identifiers are logged
    /// so they can be cleaned up out of band.
    pub async fn combine(&self, files: &[VideoUpload]) -> Result<RemoteAsset, CombineError> {
        let (first, rest) = files.split_first().ok_or(CombineError::NoFiles)?;

        // Store back to front, prepending each identifier so the
        // accumulator stays in playback order.
        let mut join_targets: Vec<String> = Vec::with_capacity(rest.len());
        for file in rest.iter().rev() {
            let asset =
                self.media_client
                    .store_asset(file)
                    .await
                    .map_err(|source| CombineError::Upload {
                        filename: file.display_name().to_string(),
                        source,
                    })?;
            debug!(public_id = %asset.public_id, file = %file.display_name(), "Stored intermediate asset");
            join_targets.insert(0, asset.public_id);
        }

        // The logically first file carries the whole join-target list in a
        // single store-and-combine call.
        let combined = self
            .media_client
            .store_and_combine(first, &join_targets)
            .await
            .map_err(CombineError::Combine)?;

        info!(
            public_id = %combined.public_id,
            source_count = files.len(),
            "Combined videos into one asset"
        );

        Ok(combined)
    }
}
