//! End-to-end tests with mocked external dependencies.
//!
//! These tests run the full server stack in-process with mock implementations
//! of the metadata catalog and the audio locator.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use tunefetch_core::Phase;

use common::{fixtures, TestFixture};

// =============================================================================
// Basic API Tests
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/api/v1/health").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_config_endpoint_hides_secret() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/api/v1/config").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["spotify"]["client_id"], "test-client");
    assert_eq!(response.body["spotify"]["client_secret_configured"], true);
    assert_eq!(response.body["downloader"]["format"], "mp3");
    assert!(!response.text.contains("test-secret"));
}

#[tokio::test]
async fn test_status_starts_idle() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/api/v1/downloads/status").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["busy"], false);
    assert!(response.body["last_event"].is_null());
}

// =============================================================================
// Download Tests
// =============================================================================

#[tokio::test]
async fn test_submit_track_downloads_to_default_destination() {
    let fixture = TestFixture::new().await;
    let mut rx = fixture.orchestrator.subscribe();

    let response = fixture
        .post("/api/v1/downloads", json!({ "url": fixtures::TRACK_URL }))
        .await;

    assert_status!(response, StatusCode::ACCEPTED);
    let request_id = response.body["request_id"].as_str().unwrap().to_string();

    let event = TestFixture::wait_for_terminal(&mut rx).await;
    assert_eq!(event.request_id.to_string(), request_id);
    assert_eq!(event.phase, Phase::Succeeded);

    assert!(fixture.temp_dir.path().join("Song.mp3").exists());

    let status = fixture.get("/api/v1/downloads/status").await;
    assert_eq!(status.body["busy"], false);
    assert_eq!(status.body["last_event"]["phase"], "succeeded");
    assert_eq!(status.body["last_event"]["status"], "Download completed!");
    assert_eq!(
        status.body["last_event"]["outcome"]["message"],
        "Successfully downloaded: Artist - Song"
    );
}

#[tokio::test]
async fn test_submit_with_explicit_destination() {
    let fixture = TestFixture::new().await;
    let mut rx = fixture.orchestrator.subscribe();
    let target = fixture.temp_dir.path().join("nested").join("dir");

    let response = fixture
        .post(
            "/api/v1/downloads",
            json!({ "url": fixtures::TRACK_URL, "destination": target }),
        )
        .await;
    assert_status!(response, StatusCode::ACCEPTED);

    let event = TestFixture::wait_for_terminal(&mut rx).await;
    assert_eq!(event.phase, Phase::Succeeded);
    assert!(target.join("Song.mp3").exists());
}

#[tokio::test]
async fn test_submit_invalid_url_is_bad_request() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .post(
            "/api/v1/downloads",
            json!({ "url": "https://example.com/track/abc" }),
        )
        .await;

    assert_status!(response, StatusCode::BAD_REQUEST);
    assert!(response.body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid Spotify URL"));

    // Rejected input still shows up as the last event
    let status = fixture.get("/api/v1/downloads/status").await;
    assert_eq!(status.body["busy"], false);
    assert_eq!(status.body["last_event"]["phase"], "failed");
}

#[tokio::test]
async fn test_submit_empty_url_is_bad_request() {
    let fixture = TestFixture::new().await;
    let response = fixture
        .post("/api/v1/downloads", json!({ "url": "  " }))
        .await;

    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Please enter a Spotify URL");
}

#[tokio::test]
async fn test_submit_malformed_body_is_rejected() {
    let fixture = TestFixture::new().await;
    let response = fixture.post_raw("/api/v1/downloads", "{not json").await;
    assert!(response.status.is_client_error());
}

#[tokio::test]
async fn test_submit_while_busy_is_conflict() {
    let fixture = TestFixture::new().await;
    let gate = fixture.locator.hold_fetches().await;
    let mut rx = fixture.orchestrator.subscribe();

    let first = fixture
        .post("/api/v1/downloads", json!({ "url": fixtures::TRACK_URL }))
        .await;
    assert_status!(first, StatusCode::ACCEPTED);

    // Wait until the first request is parked in fetch
    loop {
        let event = tokio::time::timeout(std::time::Duration::from_secs(5), rx.recv())
            .await
            .expect("Timed out waiting for event")
            .unwrap();
        if event.phase == Phase::Downloading {
            break;
        }
    }

    let status = fixture.get("/api/v1/downloads/status").await;
    assert_eq!(status.body["busy"], true);

    let second = fixture
        .post("/api/v1/downloads", json!({ "url": fixtures::TRACK_URL }))
        .await;
    assert_status!(second, StatusCode::CONFLICT);
    assert_eq!(second.body["error"], "A download is already in progress");

    gate.notify_one();
    let event = TestFixture::wait_for_terminal(&mut rx).await;
    assert_eq!(event.phase, Phase::Succeeded);

    // Slot is free again
    let third = fixture
        .post("/api/v1/downloads", json!({ "url": fixtures::TRACK_URL }))
        .await;
    assert_status!(third, StatusCode::ACCEPTED);
    gate.notify_one();
    TestFixture::wait_for_terminal(&mut rx).await;
}

#[tokio::test]
async fn test_unknown_track_fails_with_not_found() {
    let fixture = TestFixture::new().await;
    let mut rx = fixture.orchestrator.subscribe();

    let response = fixture
        .post(
            "/api/v1/downloads",
            json!({ "url": "https://open.spotify.com/track/doesnotexist" }),
        )
        .await;
    assert_status!(response, StatusCode::ACCEPTED);

    let event = TestFixture::wait_for_terminal(&mut rx).await;
    assert_eq!(event.phase, Phase::Failed);

    let status = fixture.get("/api/v1/downloads/status").await;
    assert_eq!(
        status.body["last_event"]["outcome"]["message"],
        "Could not find track with ID: doesnotexist"
    );
}

#[tokio::test]
async fn test_empty_search_fails_with_no_results() {
    let fixture = TestFixture::new().await;
    fixture.locator.set_results(vec![]).await;
    let mut rx = fixture.orchestrator.subscribe();

    let response = fixture
        .post("/api/v1/downloads", json!({ "url": fixtures::TRACK_URL }))
        .await;
    assert_status!(response, StatusCode::ACCEPTED);

    let event = TestFixture::wait_for_terminal(&mut rx).await;
    assert_eq!(event.phase, Phase::Failed);
    assert_eq!(event.status, "Download failed!");

    let status = fixture.get("/api/v1/downloads/status").await;
    assert_eq!(
        status.body["last_event"]["outcome"]["message"],
        "No content found for this URL"
    );
}

// =============================================================================
// Metrics
// =============================================================================

#[tokio::test]
async fn test_metrics_endpoint() {
    let fixture = TestFixture::new().await;

    // Generate at least one labelled sample
    fixture.get("/api/v1/health").await;

    let response = fixture.get("/metrics").await;
    assert_status!(response, StatusCode::OK);
    assert!(response.text.contains("# TYPE"));
    assert!(response.text.contains("tunefetch_http_requests_total"));
    assert!(response.text.contains("tunefetch_request_active"));
}
