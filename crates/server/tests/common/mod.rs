//! Common test utilities for end-to-end testing with a mock media client.
//!
//! Provides a fixture that builds the full router in-process with the
//! remote media service mocked out, so the whole HTTP surface can be
//! exercised without network access.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use reelstitch_core::{
    testing::MockMediaClient, CloudinaryConfig, Config, MediaBackend, MediaClient, MediaConfig,
    ServerConfig,
};
use reelstitch_server::{api::create_router, state::AppState};

const MULTIPART_BOUNDARY: &str = "reelstitch-test-boundary";

/// Test fixture wrapping the router and the mock media client.
pub struct TestFixture {
    pub router: Router,
    pub media_client: Arc<MockMediaClient>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with a fresh mock media client.
    pub fn new() -> Self {
        let media_client = Arc::new(MockMediaClient::new());

        let config = Config {
            server: ServerConfig::default(),
            media: MediaConfig {
                backend: MediaBackend::Cloudinary,
                cloudinary: Some(CloudinaryConfig {
                    cloud_name: "test-cloud".to_string(),
                    api_key: "test-key".to_string(),
                    api_secret: "test-secret".to_string(),
                    folder: "videos".to_string(),
                    timeout_secs: 5,
                }),
            },
        };

        let state = Arc::new(AppState::new(
            config,
            Arc::clone(&media_client) as Arc<dyn MediaClient>,
        ));
        let router = create_router(state);

        Self {
            router,
            media_client,
        }
    }

    /// Send a GET request.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("DELETE")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Send a request with an arbitrary method and empty body.
    pub async fn request(&self, method: &str, path: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// POST a multipart form of `videos` fields, one per (filename, bytes)
    /// pair, in the given order.
    pub async fn post_videos(&self, files: &[(&str, &[u8])]) -> TestResponse {
        let mut body = Vec::new();
        for (filename, data) in files {
            body.extend_from_slice(
                format!(
                    "--{}\r\nContent-Disposition: form-data; name=\"videos\"; filename=\"{}\"\r\nContent-Type: video/mp4\r\n\r\n",
                    MULTIPART_BOUNDARY, filename
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", MULTIPART_BOUNDARY).as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri("/api/videos")
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// POST a raw body to `/api/videos` with the given Content-Type,
    /// without any of the multipart framing `post_videos` takes care of.
    pub async fn post_videos_raw(&self, content_type: &str, body: Vec<u8>) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri("/api/videos")
            .header("Content-Type", content_type)
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}
