//! End-to-end tests against running services
//!
//! These tests require:
//! 1. PostgreSQL database running (with migrations applied)
//! 2. S3-compatible storage reachable by the processor
//! 3. Processor service running on its configured port
//! 4. Analytics service running on its configured port
//!
//! Run with: cargo test --test e2e_test -- --ignored --nocapture
//!
//! Set PROCESSOR_BASE_URL / ANALYTICS_BASE_URL to override the defaults
//! (http://localhost:8082 and http://localhost:8083).

use std::time::{Duration, Instant};

fn processor_base_url() -> String {
    std::env::var("PROCESSOR_BASE_URL").unwrap_or_else(|_| "http://localhost:8082".to_string())
}

fn analytics_base_url() -> String {
    std::env::var("ANALYTICS_BASE_URL").unwrap_or_else(|_| "http://localhost:8083".to_string())
}

#[tokio::test]
#[ignore] // Requires running services
async fn test_e2e_health_checks() {
    let client = reqwest::Client::new();

    for (base_url, service) in [
        (processor_base_url(), "processor"),
        (analytics_base_url(), "analytics-api"),
    ] {
        let body: serde_json::Value = client
            .get(format!("{}/health", base_url))
            .send()
            .await
            .expect("Health check failed")
            .json()
            .await
            .expect("Health body was not JSON");

        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], service);
    }
}

#[tokio::test]
#[ignore] // Requires running services
async fn test_e2e_process_rejects_missing_fields() {
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/process", processor_base_url()))
        .json(&serde_json::json!({ "jobId": "v1", "bucket": "videos" }))
        .send()
        .await
        .expect("Request failed");

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.expect("Error body was not JSON");
    assert_eq!(body["error"], "Missing required fields");
}

#[tokio::test]
#[ignore] // Requires running services
async fn test_e2e_process_acknowledges_before_pipeline_finishes() {
    let client = reqwest::Client::new();

    // A source key that does not exist: the pipeline will fail in the
    // background, but the acknowledgement must not wait for it.
    let start = Instant::now();
    let response = client
        .post(format!("{}/process", processor_base_url()))
        .json(&serde_json::json!({
            "jobId": format!("e2e-{}", std::process::id()),
            "sourceKey": "raw/no-such-object.mp4",
            "bucket": "videos",
        }))
        .send()
        .await
        .expect("Request failed");
    let elapsed = start.elapsed();

    assert_eq!(response.status(), 202);
    let body: serde_json::Value = response.json().await.expect("Accept body was not JSON");
    assert_eq!(body["message"], "Processing started");
    assert!(
        elapsed < Duration::from_secs(2),
        "acceptance took {:?}, suggesting it waited on the pipeline",
        elapsed
    );
}

#[tokio::test]
#[ignore] // Requires running services
async fn test_e2e_analytics_unknown_video() {
    let client = reqwest::Client::new();
    let base_url = analytics_base_url();

    let response = client
        .post(format!("{}/api/analytics/view", base_url))
        .json(&serde_json::json!({ "videoId": "no-such-video" }))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(response.status(), 404);

    let response = client
        .get(format!("{}/api/analytics/no-such-video", base_url))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore] // Requires running services
async fn test_e2e_analytics_rejects_missing_video_id() {
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/analytics/like", analytics_base_url()))
        .json(&serde_json::json!({}))
        .send()
        .await
        .expect("Request failed");

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.expect("Error body was not JSON");
    assert_eq!(body["error"], "Missing videoId");
}
