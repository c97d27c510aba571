//! HTTP interface.
//!
//! | Method | Path                              | Handler                     |
//! |--------|-----------------------------------|-----------------------------|
//! | POST   | `/onboarding-video/generate`      | [`handlers::generate`]      |
//! | GET    | `/onboarding-video`               | [`handlers::list_videos`]   |
//! | GET    | `/onboarding-video/:tier`         | [`handlers::get_video`]     |
//! | POST   | `/onboarding-video/:tier/version` | [`handlers::bump_version`]  |
//! | GET    | `/analytics/pixels`               | [`handlers::get_pixels`]    |
//! | POST   | `/analytics/track`                | [`handlers::track`]         |
//! | GET    | `/media/*path`                    | [`handlers::media`]         |
//! | GET    | `/health`                         | [`handlers::health`]        |

pub mod error;
pub mod handlers;

use std::path::PathBuf;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::analytics::{PixelCache, PixelConfigSource};
use crate::pipeline::PipelineOrchestrator;
use crate::store::{ConfigVersionSource, VideoStore};

pub use error::{ApiError, ErrorBody};

/// Everything the handlers share.
pub struct AppState {
    pub orchestrator: Arc<PipelineOrchestrator>,
    pub store: Arc<dyn VideoStore>,
    pub versions: Arc<dyn ConfigVersionSource>,
    pub pixel_cache: &'static PixelCache,
    pub pixel_source: Arc<dyn PixelConfigSource>,
    /// Directory served under `/media` when assets are stored locally.
    pub media_root: Option<PathBuf>,
}

pub type SharedState = Arc<AppState>;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/onboarding-video/generate", post(handlers::generate))
        .route("/onboarding-video", get(handlers::list_videos))
        .route("/onboarding-video/:tier", get(handlers::get_video))
        .route("/onboarding-video/:tier/version", post(handlers::bump_version))
        .route("/analytics/pixels", get(handlers::get_pixels))
        .route("/analytics/track", post(handlers::track))
        .route("/media/*path", get(handlers::media))
        .route("/health", get(handlers::health))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{PixelConfig, PixelEntry, PixelLoadError, PixelVendor, StaticPixelSource};
    use crate::pipeline::mocks::{MockSpeech, MockStorage, MockWriter};
    use crate::store::LocalVideoStore;
    use crate::tier::Tier;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    struct CountingSource {
        inner: StaticPixelSource,
        loads: AtomicUsize,
    }

    #[async_trait]
    impl PixelConfigSource for CountingSource {
        async fn load(&self) -> Result<PixelConfig, PixelLoadError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            self.inner.load().await
        }
    }

    struct FailingSource;

    #[async_trait]
    impl PixelConfigSource for FailingSource {
        async fn load(&self) -> Result<PixelConfig, PixelLoadError> {
            Err(PixelLoadError("settings unavailable".into()))
        }
    }

    fn pixels() -> PixelConfig {
        PixelConfig {
            pixels: vec![
                PixelEntry {
                    vendor: PixelVendor::Meta,
                    pixel_id: "123".into(),
                    enabled: true,
                },
                PixelEntry {
                    vendor: PixelVendor::Tiktok,
                    pixel_id: "abc".into(),
                    enabled: true,
                },
            ],
        }
    }

    struct TestApp {
        app: Router,
        writer: Arc<MockWriter>,
        source: Arc<CountingSource>,
    }

    fn test_app_with(writer: MockWriter, speech: MockSpeech) -> TestApp {
        let store = Arc::new(LocalVideoStore::in_memory());
        let writer = Arc::new(writer);
        let orchestrator = Arc::new(
            PipelineOrchestrator::new(
                store.clone(),
                store.clone(),
                writer.clone(),
                Arc::new(speech),
                Arc::new(MockStorage::ok()),
            )
            .with_thumbnail(Tier::Membership, "https://cdn/membership.jpg"),
        );
        let source = Arc::new(CountingSource {
            inner: StaticPixelSource::new(pixels()),
            loads: AtomicUsize::new(0),
        });
        let state = Arc::new(AppState {
            orchestrator,
            store: store.clone(),
            versions: store,
            pixel_cache: Box::leak(Box::new(PixelCache::new())),
            pixel_source: source.clone(),
            media_root: None,
        });
        TestApp {
            app: router(state),
            writer,
            source,
        }
    }

    fn test_app() -> TestApp {
        test_app_with(MockWriter::ok(), MockSpeech::ok(vec![1, 2]))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(b) => builder
                .header("content-type", "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn generate_returns_ready_video() {
        let t = test_app();
        let (status, body) = send(
            &t.app,
            "POST",
            "/onboarding-video/generate",
            Some(json!({ "tier_key": "membership" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Onboarding video generated successfully");
        assert_eq!(body["video"]["status"], "ready");
        assert_eq!(body["video"]["tier"], "membership");
        assert_eq!(body["video"]["config_version"], 1);
        assert_eq!(body["video"]["thumbnail_url"], "https://cdn/membership.jpg");
        assert_eq!(body["video"]["captions_url"], "mock://membership/captions-v1.srt");
    }

    #[tokio::test]
    async fn repeated_generate_is_cached() {
        let t = test_app();
        let req = json!({ "tier_key": "elite" });
        send(&t.app, "POST", "/onboarding-video/generate", Some(req.clone())).await;
        let (status, body) = send(&t.app, "POST", "/onboarding-video/generate", Some(req)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Onboarding video already generated");
        assert_eq!(t.writer.calls(), 1);
    }

    #[tokio::test]
    async fn force_regenerate_runs_again() {
        let t = test_app();
        send(
            &t.app,
            "POST",
            "/onboarding-video/generate",
            Some(json!({ "tier_key": "coaching" })),
        )
        .await;
        let (status, body) = send(
            &t.app,
            "POST",
            "/onboarding-video/generate",
            Some(json!({ "tier_key": "coaching", "force_regenerate": true })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["video"]["attempt"], 2);
        assert_eq!(t.writer.calls(), 2);
    }

    #[tokio::test]
    async fn unknown_tier_is_bad_request() {
        let t = test_app();
        let (status, body) = send(
            &t.app,
            "POST",
            "/onboarding-video/generate",
            Some(json!({ "tier_key": "gold" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("gold"));
        assert_eq!(t.writer.calls(), 0);
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let t = test_app();
        let (status, body) = send(
            &t.app,
            "POST",
            "/onboarding-video/generate",
            Some(json!({ "force_regenerate": true })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn vendor_failure_is_bad_gateway_and_record_is_failed() {
        let t = test_app_with(MockWriter::ok(), MockSpeech::failing());
        let (status, body) = send(
            &t.app,
            "POST",
            "/onboarding-video/generate",
            Some(json!({ "tier_key": "elite" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "Failed to generate onboarding video");
        assert!(body["details"].as_str().unwrap().starts_with("audio step failed"));

        let (status, record) = send(&t.app, "GET", "/onboarding-video/elite", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(record["status"], "failed");
        assert!(record["script_text"].is_string());
        assert!(record["audio_url"].is_null());
    }

    #[tokio::test]
    async fn missing_credentials_are_internal_error() {
        let t = test_app_with(MockWriter::not_configured(), MockSpeech::ok(vec![1]));
        let (status, _) = send(
            &t.app,
            "POST",
            "/onboarding-video/generate",
            Some(json!({ "tier_key": "elite" })),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn get_video_is_not_found_before_generation() {
        let t = test_app();
        let (status, _) = send(&t.app, "GET", "/onboarding-video/coaching", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&t.app, "GET", "/onboarding-video/nope", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn version_bump_invalidates_current_video() {
        let t = test_app();
        send(
            &t.app,
            "POST",
            "/onboarding-video/generate",
            Some(json!({ "tier_key": "membership" })),
        )
        .await;

        let (status, body) = send(&t.app, "POST", "/onboarding-video/membership/version", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "tier": "membership", "config_version": 2 }));

        let (status, _) = send(&t.app, "GET", "/onboarding-video/membership", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = send(
            &t.app,
            "POST",
            "/onboarding-video/generate",
            Some(json!({ "tier_key": "membership" })),
        )
        .await;
        assert_eq!(body["video"]["config_version"], 2);

        let (_, list) = send(&t.app, "GET", "/onboarding-video", None).await;
        assert_eq!(list.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn pixels_are_loaded_once() {
        let t = test_app();
        let (status, body) = send(&t.app, "GET", "/analytics/pixels", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pixels"].as_array().unwrap().len(), 2);

        send(&t.app, "GET", "/analytics/pixels", None).await;
        assert_eq!(t.source.loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn track_fans_out_to_enabled_pixels() {
        let t = test_app();
        let (status, body) = send(
            &t.app,
            "POST",
            "/analytics/track",
            Some(json!({ "event": "purchase", "params": { "value": 49 } })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let dispatches = body["dispatches"].as_array().unwrap();
        assert_eq!(dispatches.len(), 2);
        assert_eq!(dispatches[0]["vendor"], "meta");
        assert_eq!(dispatches[0]["pixel_id"], "123");
        assert_eq!(dispatches[0]["event_name"], "Purchase");
        assert_eq!(dispatches[1]["event_name"], "CompletePayment");
        assert_eq!(dispatches[0]["params"]["value"], 49);
    }

    #[tokio::test]
    async fn track_rejects_empty_event() {
        let t = test_app();
        let (status, _) = send(&t.app, "POST", "/analytics/track", Some(json!({ "event": " " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn pixel_load_failure_is_internal_error() {
        let store = Arc::new(LocalVideoStore::in_memory());
        let orchestrator = Arc::new(PipelineOrchestrator::new(
            store.clone(),
            store.clone(),
            Arc::new(MockWriter::ok()),
            Arc::new(MockSpeech::ok(vec![1])),
            Arc::new(MockStorage::ok()),
        ));
        let app = router(Arc::new(AppState {
            orchestrator,
            store: store.clone(),
            versions: store,
            pixel_cache: Box::leak(Box::new(PixelCache::new())),
            pixel_source: Arc::new(FailingSource),
            media_root: None,
        }));

        let (status, body) = send(&app, "GET", "/analytics/pixels", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["details"].as_str().unwrap().contains("settings unavailable"));
    }

    #[tokio::test]
    async fn media_is_not_served_without_local_root() {
        let t = test_app();
        let (status, _) = send(&t.app, "GET", "/media/elite/audio-v1.mp3", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn media_serves_local_files_with_content_type() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("elite")).unwrap();
        std::fs::write(dir.path().join("elite/captions-v1.srt"), "1\n").unwrap();

        let store = Arc::new(LocalVideoStore::in_memory());
        let orchestrator = Arc::new(PipelineOrchestrator::new(
            store.clone(),
            store.clone(),
            Arc::new(MockWriter::ok()),
            Arc::new(MockSpeech::ok(vec![1])),
            Arc::new(MockStorage::ok()),
        ));
        let app = router(Arc::new(AppState {
            orchestrator,
            store: store.clone(),
            versions: store,
            pixel_cache: Box::leak(Box::new(PixelCache::new())),
            pixel_source: Arc::new(StaticPixelSource::new(PixelConfig::default())),
            media_root: Some(dir.path().to_path_buf()),
        }));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/media/elite/captions-v1.srt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"],
            "application/x-subrip"
        );
    }

    #[tokio::test]
    async fn media_rejects_parent_segments() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("secret.txt"), "x").unwrap();
        let media = dir.path().join("media");
        std::fs::create_dir_all(&media).unwrap();

        let store = Arc::new(LocalVideoStore::in_memory());
        let orchestrator = Arc::new(PipelineOrchestrator::new(
            store.clone(),
            store.clone(),
            Arc::new(MockWriter::ok()),
            Arc::new(MockSpeech::ok(vec![1])),
            Arc::new(MockStorage::ok()),
        ));
        let app = router(Arc::new(AppState {
            orchestrator,
            store: store.clone(),
            versions: store,
            pixel_cache: Box::leak(Box::new(PixelCache::new())),
            pixel_source: Arc::new(StaticPixelSource::new(PixelConfig::default())),
            media_root: Some(media),
        }));

        let (status, body) = send(&app, "GET", "/media/elite/%2E%2E/%2E%2E/secret.txt", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("invalid object path"));
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let t = test_app();
        let (status, body) = send(&t.app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
