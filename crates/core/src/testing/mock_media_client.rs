//! Mock media client for testing.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::media_client::{
    DeleteOutcome, MediaClient, MediaClientError, RemoteAsset, VideoUpload,
};

/// A recorded remote call, in the order it was made.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Store {
        filename: Option<String>,
        /// The public ID the mock assigned to the stored asset.
        public_id: String,
    },
    StoreAndCombine {
        filename: Option<String>,
        join_targets: Vec<String>,
    },
    List,
    Delete {
        ids: Vec<String>,
    },
}

/// Mock implementation of the MediaClient trait.
///
/// Provides controllable behavior for testing:
/// - Records every call in order for sequencing assertions
/// - Pre-populate assets for list/delete tests
/// - Simulate failures, either on the next call or after N successes
///
/// # Example
///
/// ```rust,ignore
/// let client = MockMediaClient::new();
///
/// client.store_asset(&upload).await?;
///
/// let calls = client.recorded_calls().await;
/// assert!(matches!(calls[0], RecordedCall::Store { .. }));
/// ```
#[derive(Debug)]
pub struct MockMediaClient {
    /// Every call made, in order.
    calls: Arc<RwLock<Vec<RecordedCall>>>,
    /// Remotely "stored" assets by public ID.
    assets: Arc<RwLock<BTreeMap<String, RemoteAsset>>>,
    /// If set, the next operation fails with this error.
    next_error: Arc<RwLock<Option<MediaClientError>>>,
    /// If set, the operation after N more successes fails with this error.
    fail_after: Arc<RwLock<Option<(usize, MediaClientError)>>>,
    /// Counter for generating unique public IDs.
    id_counter: Arc<RwLock<u32>>,
    /// Folder prefix for generated public IDs.
    folder: String,
}

impl Default for MockMediaClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMediaClient {
    /// Create a new mock media client.
    pub fn new() -> Self {
        Self {
            calls: Arc::new(RwLock::new(Vec::new())),
            assets: Arc::new(RwLock::new(BTreeMap::new())),
            next_error: Arc::new(RwLock::new(None)),
            fail_after: Arc::new(RwLock::new(None)),
            id_counter: Arc::new(RwLock::new(0)),
            folder: "videos".to_string(),
        }
    }

    /// Get all recorded calls in the order they were made.
    pub async fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.calls.read().await.clone()
    }

    /// Clear recorded calls.
    pub async fn clear_recorded(&self) {
        self.calls.write().await.clear();
    }

    /// Number of standalone store calls recorded.
    pub async fn store_count(&self) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|c| matches!(c, RecordedCall::Store { .. }))
            .count()
    }

    /// Number of store-and-combine calls recorded.
    pub async fn combine_count(&self) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|c| matches!(c, RecordedCall::StoreAndCombine { .. }))
            .count()
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: MediaClientError) {
        *self.next_error.write().await = Some(error);
    }

    /// Configure a failure after the next `successes` operations succeed.
    pub async fn fail_after_calls(&self, successes: usize, error: MediaClientError) {
        *self.fail_after.write().await = Some((successes, error));
    }

    /// Pre-populate an asset (for list/delete tests).
    pub async fn add_mock_asset(&self, asset: RemoteAsset) {
        self.assets
            .write()
            .await
            .insert(asset.public_id.clone(), asset);
    }

    /// Check if an asset exists remotely.
    pub async fn has_asset(&self, public_id: &str) -> bool {
        self.assets.read().await.contains_key(public_id)
    }

    /// Number of assets currently "stored".
    pub async fn asset_count(&self) -> usize {
        self.assets.read().await.len()
    }

    /// Take the pending error, if one is due.
    async fn take_error(&self) -> Option<MediaClientError> {
        if let Some(err) = self.next_error.write().await.take() {
            return Some(err);
        }

        let mut fail_after = self.fail_after.write().await;
        match fail_after.take() {
            Some((0, err)) => Some(err),
            Some((n, err)) => {
                *fail_after = Some((n - 1, err));
                None
            }
            None => None,
        }
    }

    /// Generate a unique mock public ID.
    async fn generate_public_id(&self) -> String {
        let mut counter = self.id_counter.write().await;
        *counter += 1;
        format!("{}/mock{:04}", self.folder, *counter)
    }

    fn make_asset(&self, public_id: String, bytes: u64) -> RemoteAsset {
        RemoteAsset {
            url: format!("https://mock.media/{}.mp4", public_id),
            public_id,
            format: Some("mp4".to_string()),
            bytes,
            duration: Some(10.0),
            created_at: Some(Utc::now()),
        }
    }
}

#[async_trait]
impl MediaClient for MockMediaClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn store_asset(&self, upload: &VideoUpload) -> Result<RemoteAsset, MediaClientError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        let public_id = self.generate_public_id().await;
        let asset = self.make_asset(public_id.clone(), upload.data.len() as u64);

        self.calls.write().await.push(RecordedCall::Store {
            filename: upload.filename.clone(),
            public_id: public_id.clone(),
        });
        self.assets.write().await.insert(public_id, asset.clone());

        Ok(asset)
    }

    async fn store_and_combine(
        &self,
        upload: &VideoUpload,
        join_targets: &[String],
    ) -> Result<RemoteAsset, MediaClientError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        let public_id = self.generate_public_id().await;

        // Combined size: the base upload plus every spliced target
        let mut bytes = upload.data.len() as u64;
        {
            let assets = self.assets.read().await;
            for id in join_targets {
                if let Some(target) = assets.get(id) {
                    bytes += target.bytes;
                }
            }
        }
        let asset = self.make_asset(public_id.clone(), bytes);

        self.calls.write().await.push(RecordedCall::StoreAndCombine {
            filename: upload.filename.clone(),
            join_targets: join_targets.to_vec(),
        });
        self.assets.write().await.insert(public_id, asset.clone());

        Ok(asset)
    }

    async fn list_assets(&self) -> Result<Vec<RemoteAsset>, MediaClientError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.calls.write().await.push(RecordedCall::List);

        Ok(self.assets.read().await.values().cloned().collect())
    }

    async fn delete_assets(&self, ids: &[String]) -> Result<DeleteOutcome, MediaClientError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.calls.write().await.push(RecordedCall::Delete {
            ids: ids.to_vec(),
        });

        let mut assets = self.assets.write().await;
        let mut deleted = BTreeMap::new();
        for id in ids {
            let status = if assets.remove(id).is_some() {
                "deleted"
            } else {
                "not_found"
            };
            deleted.insert(id.clone(), status.to_string());
        }

        Ok(DeleteOutcome { deleted })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str) -> VideoUpload {
        VideoUpload::new(Some(name.to_string()), vec![0u8; 16])
    }

    #[tokio::test]
    async fn test_store_records_and_keeps_asset() {
        let client = MockMediaClient::new();

        let asset = client.store_asset(&upload("a.mp4")).await.unwrap();

        assert!(client.has_asset(&asset.public_id).await);
        let calls = client.recorded_calls().await;
        assert_eq!(calls.len(), 1);
        assert!(matches!(&calls[0], RecordedCall::Store { filename, .. }
            if filename.as_deref() == Some("a.mp4")));
    }

    #[tokio::test]
    async fn test_combine_sums_target_sizes() {
        let client = MockMediaClient::new();

        let stored = client.store_asset(&upload("b.mp4")).await.unwrap();
        let combined = client
            .store_and_combine(&upload("a.mp4"), &[stored.public_id.clone()])
            .await
            .unwrap();

        assert_eq!(combined.bytes, 32);
    }

    #[tokio::test]
    async fn test_next_error_is_consumed() {
        let client = MockMediaClient::new();
        client
            .set_next_error(MediaClientError::ConnectionFailed("test".into()))
            .await;

        assert!(client.list_assets().await.is_err());
        assert!(client.list_assets().await.is_ok());
    }

    #[tokio::test]
    async fn test_fail_after_calls() {
        let client = MockMediaClient::new();
        client
            .fail_after_calls(2, MediaClientError::Timeout)
            .await;

        assert!(client.store_asset(&upload("1.mp4")).await.is_ok());
        assert!(client.store_asset(&upload("2.mp4")).await.is_ok());
        assert!(client.store_asset(&upload("3.mp4")).await.is_err());
        assert!(client.store_asset(&upload("4.mp4")).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_reports_missing_assets() {
        let client = MockMediaClient::new();
        let asset = client.store_asset(&upload("a.mp4")).await.unwrap();

        let outcome = client
            .delete_assets(&[asset.public_id.clone(), "videos/nope".to_string()])
            .await
            .unwrap();

        assert_eq!(outcome.deleted[&asset.public_id], "deleted");
        assert_eq!(outcome.deleted["videos/nope"], "not_found");
        assert_eq!(client.asset_count().await, 0);
    }
}
