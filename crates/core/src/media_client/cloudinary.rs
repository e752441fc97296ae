//! Cloudinary media service implementation.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{multipart, Client, StatusCode};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::config::CloudinaryConfig;

use super::{DeleteOutcome, MediaClient, MediaClientError, RemoteAsset, VideoUpload};

const API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Cloudinary client implementation.
///
/// Uploads use the signed upload API with SHA-256 request signatures;
/// list and delete go through the Admin API with basic auth.
pub struct CloudinaryClient {
    client: Client,
    config: CloudinaryConfig,
}

impl CloudinaryClient {
    /// Create a new Cloudinary client.
    pub fn new(config: CloudinaryConfig) -> Result<Self, MediaClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| MediaClientError::Internal(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn upload_url(&self) -> String {
        format!("{}/{}/video/upload", API_BASE, self.config.cloud_name)
    }

    fn resources_url(&self) -> String {
        format!(
            "{}/{}/resources/video/upload",
            API_BASE, self.config.cloud_name
        )
    }

    /// Sign upload parameters.
    ///
    /// Cloudinary signatures are the SHA-256 hex digest of the
    /// alphabetically sorted `key=value` pairs joined with `&`, with the
    /// API secret appended. `file` and `api_key` are never signed.
    fn sign(&self, params: &[(&str, &str)]) -> String {
        let mut sorted: Vec<&(&str, &str)> = params.iter().collect();
        sorted.sort_by_key(|(k, _)| *k);

        let joined = sorted
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha256::new();
        hasher.update(joined.as_bytes());
        hasher.update(self.config.api_secret.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn unix_timestamp() -> String {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
            .to_string()
    }

    /// Perform a signed video upload, optionally with a transformation.
    async fn upload(
        &self,
        upload: &VideoUpload,
        transformation: Option<String>,
    ) -> Result<RemoteAsset, MediaClientError> {
        let timestamp = Self::unix_timestamp();

        let mut signed_params: Vec<(&str, &str)> = vec![
            ("folder", self.config.folder.as_str()),
            ("timestamp", timestamp.as_str()),
        ];
        if let Some(t) = transformation.as_deref() {
            signed_params.push(("transformation", t));
        }
        let signature = self.sign(&signed_params);

        let file_part = multipart::Part::bytes(upload.data.clone())
            .file_name(
                upload
                    .filename
                    .clone()
                    .unwrap_or_else(|| "video.mp4".to_string()),
            )
            .mime_str("video/mp4")
            .map_err(|e| MediaClientError::Internal(e.to_string()))?;

        let mut form = multipart::Form::new()
            .part("file", file_part)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("signature", signature)
            .text("signature_algorithm", "sha256")
            .text("folder", self.config.folder.clone());
        if let Some(t) = transformation {
            form = form.text("transformation", t);
        }

        debug!(file = %upload.display_name(), "Uploading video to Cloudinary");

        let response = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MediaClientError::ApiError(e.to_string()))?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(MediaClientError::AuthenticationFailed(error_message(&body)));
        }
        if !status.is_success() {
            return Err(MediaClientError::UploadRejected(error_message(&body)));
        }

        let resource: CloudinaryResource = serde_json::from_str(&body)
            .map_err(|e| MediaClientError::ApiError(format!("Failed to parse response: {}", e)))?;

        Ok(resource.into_remote_asset())
    }
}

/// A resource object as Cloudinary returns it.
#[derive(Debug, Deserialize)]
struct CloudinaryResource {
    public_id: String,
    secure_url: Option<String>,
    url: Option<String>,
    format: Option<String>,
    #[serde(default)]
    bytes: u64,
    duration: Option<f64>,
    created_at: Option<DateTime<Utc>>,
}

impl CloudinaryResource {
    fn into_remote_asset(self) -> RemoteAsset {
        RemoteAsset {
            url: self.secure_url.or(self.url).unwrap_or_default(),
            public_id: self.public_id,
            format: self.format,
            bytes: self.bytes,
            duration: self.duration,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ResourceListResponse {
    #[serde(default)]
    resources: Vec<CloudinaryResource>,
}

#[derive(Debug, Deserialize)]
struct DeleteResponse {
    #[serde(default)]
    deleted: std::collections::BTreeMap<String, String>,
}

/// Build the splice transformation that appends `join_targets` after the
/// uploaded base video, in order.
///
/// Each target becomes an `fl_splice` video overlay followed by
/// `fl_layer_apply`. Slashes in public IDs must become colons inside
/// overlay references.
fn splice_transformation(join_targets: &[String]) -> String {
    join_targets
        .iter()
        .map(|id| format!("fl_splice,l_video:{}/fl_layer_apply", id.replace('/', ":")))
        .collect::<Vec<_>>()
        .join("/")
}

/// Pull a human-readable message out of a Cloudinary error body.
fn error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: ErrorDetail,
    }
    #[derive(Deserialize)]
    struct ErrorDetail {
        message: String,
    }

    serde_json::from_str::<ErrorBody>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.chars().take(200).collect())
}

fn map_transport_error(e: reqwest::Error) -> MediaClientError {
    if e.is_timeout() {
        MediaClientError::Timeout
    } else if e.is_connect() {
        MediaClientError::ConnectionFailed(e.to_string())
    } else {
        MediaClientError::ApiError(e.to_string())
    }
}

#[async_trait]
impl MediaClient for CloudinaryClient {
    fn name(&self) -> &str {
        "cloudinary"
    }

    async fn store_asset(&self, upload: &VideoUpload) -> Result<RemoteAsset, MediaClientError> {
        self.upload(upload, None).await
    }

    async fn store_and_combine(
        &self,
        upload: &VideoUpload,
        join_targets: &[String],
    ) -> Result<RemoteAsset, MediaClientError> {
        let transformation = if join_targets.is_empty() {
            None
        } else {
            Some(splice_transformation(join_targets))
        };
        self.upload(upload, transformation).await
    }

    async fn list_assets(&self) -> Result<Vec<RemoteAsset>, MediaClientError> {
        let url = format!(
            "{}?prefix={}/&max_results=500",
            self.resources_url(),
            urlencoding::encode(&self.config.folder)
        );

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.config.api_key, Some(&self.config.api_secret))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MediaClientError::ApiError(e.to_string()))?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(MediaClientError::AuthenticationFailed(error_message(&body)));
        }
        if !status.is_success() {
            return Err(MediaClientError::ApiError(error_message(&body)));
        }

        let list: ResourceListResponse = serde_json::from_str(&body)
            .map_err(|e| MediaClientError::ApiError(format!("Failed to parse response: {}", e)))?;

        Ok(list
            .resources
            .into_iter()
            .map(|r| r.into_remote_asset())
            .collect())
    }

    async fn delete_assets(&self, ids: &[String]) -> Result<DeleteOutcome, MediaClientError> {
        let query = ids
            .iter()
            .map(|id| format!("public_ids[]={}", urlencoding::encode(id)))
            .collect::<Vec<_>>()
            .join("&");
        let url = format!("{}?{}", self.resources_url(), query);

        let response = self
            .client
            .delete(&url)
            .basic_auth(&self.config.api_key, Some(&self.config.api_secret))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MediaClientError::ApiError(e.to_string()))?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(MediaClientError::AuthenticationFailed(error_message(&body)));
        }
        if status == StatusCode::NOT_FOUND {
            return Err(MediaClientError::AssetNotFound(ids.join(", ")));
        }
        if !status.is_success() {
            return Err(MediaClientError::ApiError(error_message(&body)));
        }

        let parsed: DeleteResponse = serde_json::from_str(&body)
            .map_err(|e| MediaClientError::ApiError(format!("Failed to parse response: {}", e)))?;

        Ok(DeleteOutcome {
            deleted: parsed.deleted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CloudinaryConfig;

    fn test_client() -> CloudinaryClient {
        CloudinaryClient::new(CloudinaryConfig {
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            folder: "videos".to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_urls() {
        let client = test_client();
        assert_eq!(
            client.upload_url(),
            "https://api.cloudinary.com/v1_1/demo/video/upload"
        );
        assert_eq!(
            client.resources_url(),
            "https://api.cloudinary.com/v1_1/demo/resources/video/upload"
        );
    }

    #[test]
    fn test_sign_sorts_params() {
        let client = test_client();
        // Same params in different orders must produce the same signature
        let a = client.sign(&[("timestamp", "123"), ("folder", "videos")]);
        let b = client.sign(&[("folder", "videos"), ("timestamp", "123")]);
        assert_eq!(a, b);

        // Known digest of "folder=videos&timestamp=123" + "secret"
        let mut hasher = Sha256::new();
        hasher.update(b"folder=videos&timestamp=123secret");
        assert_eq!(a, format!("{:x}", hasher.finalize()));
    }

    #[test]
    fn test_splice_transformation_single_target() {
        let t = splice_transformation(&["videos/abc".to_string()]);
        assert_eq!(t, "fl_splice,l_video:videos:abc/fl_layer_apply");
    }

    #[test]
    fn test_splice_transformation_preserves_order() {
        let t = splice_transformation(&["videos/b".to_string(), "videos/c".to_string()]);
        assert_eq!(
            t,
            "fl_splice,l_video:videos:b/fl_layer_apply/fl_splice,l_video:videos:c/fl_layer_apply"
        );
    }

    #[test]
    fn test_splice_transformation_empty() {
        assert_eq!(splice_transformation(&[]), "");
    }

    #[test]
    fn test_error_message_structured() {
        let body = r#"{"error":{"message":"Invalid signature"}}"#;
        assert_eq!(error_message(body), "Invalid signature");
    }

    #[test]
    fn test_error_message_unstructured_truncates() {
        let body = "x".repeat(500);
        assert_eq!(error_message(&body).len(), 200);
    }

    #[test]
    fn test_resource_conversion_prefers_secure_url() {
        let resource = CloudinaryResource {
            public_id: "videos/abc".to_string(),
            secure_url: Some("https://res.cloudinary.com/demo/videos/abc.mp4".to_string()),
            url: Some("http://res.cloudinary.com/demo/videos/abc.mp4".to_string()),
            format: Some("mp4".to_string()),
            bytes: 42,
            duration: Some(3.0),
            created_at: None,
        };

        let asset = resource.into_remote_asset();
        assert!(asset.url.starts_with("https://"));
        assert_eq!(asset.public_id, "videos/abc");
        assert_eq!(asset.bytes, 42);
    }
}
