//! Common test utilities for E2E testing with mocks.
//!
//! Builds the full router in-process with a mock catalog and a mock locator
//! behind a real orchestrator, so requests run end to end without Spotify or
//! yt-dlp.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tokio::sync::broadcast;
use tower::ServiceExt;

use tunefetch_core::{
    load_config_from_str,
    testing::{MockCatalog, MockLocator},
    DownloadOrchestrator, ProgressEvent,
};

/// Re-export fixtures for test convenience
pub use tunefetch_core::testing::fixtures;

const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Test fixture for E2E testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_submit() {
///     let fixture = TestFixture::new().await;
///
///     let response = fixture.post("/api/v1/downloads", json!({
///         "url": fixtures::TRACK_URL
///     })).await;
///
///     assert_eq!(response.status, 202);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Orchestrator behind the router, for subscribing to events
    pub orchestrator: Arc<DownloadOrchestrator>,
    /// Mock catalog - configure tracks and episodes
    pub catalog: Arc<MockCatalog>,
    /// Mock locator - configure search results and gate fetches
    pub locator: Arc<MockLocator>,
    /// Default download destination
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub text: String,
}

impl TestFixture {
    /// Create a fixture with one known track and one matching search result.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let catalog = Arc::new(MockCatalog::new());
        let locator = Arc::new(MockLocator::new());
        catalog
            .add_track(fixtures::track(fixtures::TRACK_ID, "Song", &["Artist"]))
            .await;
        locator
            .set_results(vec![fixtures::candidate("Song", "Artist")])
            .await;

        let config = load_config_from_str(&format!(
            r#"
[spotify]
client_id = "test-client"
client_secret = "test-secret"

[pipeline]
default_destination = "{}"
pacing_ms = 0
retry_attempts = 2
retry_base_delay_ms = 1
"#,
            temp_dir.path().display()
        ))
        .expect("Failed to parse test config");

        let orchestrator = Arc::new(DownloadOrchestrator::new(
            catalog.clone(),
            locator.clone(),
            &config.pipeline,
        ));

        let state = Arc::new(tunefetch_server::state::AppState::new(
            config,
            Arc::clone(&orchestrator),
        ));
        let router = tunefetch_server::api::create_router(state);

        Self {
            router,
            orchestrator,
            catalog,
            locator,
            temp_dir,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        self.send(request_builder.body(body).unwrap()).await
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

        let text = String::from_utf8_lossy(&body_bytes).into_owned();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body, text }
    }

    /// Wait for the next terminal event on `rx`.
    pub async fn wait_for_terminal(
        rx: &mut broadcast::Receiver<ProgressEvent>,
    ) -> ProgressEvent {
        tokio::time::timeout(EVENT_TIMEOUT, async {
            loop {
                let event = rx.recv().await.expect("Event channel closed");
                if event.is_terminal() {
                    return event;
                }
            }
        })
        .await
        .expect("Timed out waiting for terminal event")
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
