//! Common test utilities for E2E testing with mocks.
//!
//! Provides an in-process server with a mock extraction engine and an
//! in-memory object store, so the full HTTP surface can be exercised
//! without yt-dlp or a bucket.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use grabdock_core::config::{
    AuthConfig, Config, ExtractorConfig, PipelineConfig, ServerConfig, StorageConfig,
};
use grabdock_core::testing::{MemoryStore, MockExtractor};
use grabdock_core::{DownloadPipeline, JsonUserStore, SessionSigner, StoreHandle};
use grabdock_server::api::create_router;
use grabdock_server::state::AppState;

pub const TEST_SECRET: &str = "test-session-secret";

/// Test fixture for E2E testing with mock dependencies.
pub struct TestFixture {
    pub router: Router,
    /// Mock extraction engine - configure probe results and failures
    pub extractor: Arc<MockExtractor>,
    /// In-memory object store - inspect uploads, inject failures
    pub store: Arc<MemoryStore>,
    pub state: Arc<AppState>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestFixture {
    /// Fixture with auth disabled; download is open.
    pub async fn new() -> Self {
        Self::build(false, true).await
    }

    /// Fixture with session auth enabled.
    pub async fn with_auth() -> Self {
        Self::build(true, true).await
    }

    /// Fixture whose object store was unreachable at startup.
    pub async fn with_disabled_store() -> Self {
        Self::build(false, false).await
    }

    async fn build(auth_enabled: bool, store_ready: bool) -> Self {
        let extractor = Arc::new(MockExtractor::new());
        let store = Arc::new(MemoryStore::new());

        let handle = if store_ready {
            StoreHandle::ready(store.clone())
        } else {
            StoreHandle::disabled("bucket not found")
        };

        let config = Config {
            auth: AuthConfig {
                enabled: auth_enabled,
                session_secret: if auth_enabled {
                    TEST_SECRET.to_string()
                } else {
                    String::new()
                },
                token_ttl_secs: 3600,
            },
            server: ServerConfig::default(),
            storage: StorageConfig {
                bucket: "test-bucket".to_string(),
                region: "us-east-1".to_string(),
                endpoint_url: None,
                public_links: false,
            },
            extractor: ExtractorConfig::default(),
            pipeline: PipelineConfig::default(),
        };

        let pipeline = DownloadPipeline::new(
            extractor.clone() as Arc<dyn grabdock_core::Extractor>,
            handle.clone(),
            config.pipeline.clone(),
        );
        let users = JsonUserStore::new(handle);
        let signer = SessionSigner::new(&config.auth.session_secret, config.auth.token_ttl_secs);

        let state = Arc::new(AppState::new(config, pipeline, users, signer));
        let router = create_router(state.clone());

        Self {
            router,
            extractor,
            store,
            state,
        }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        self.request(
            Request::builder()
                .uri(path)
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request(
            Request::builder()
                .method("POST")
                .uri(path)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn post_with_token(&self, path: &str, body: Value, token: &str) -> TestResponse {
        self.request(
            Request::builder()
                .method("POST")
                .uri(path)
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    /// Register and log in a user, returning a valid session token.
    pub async fn session_token(&self, username: &str, password: &str) -> String {
        let response = self
            .post(
                "/api/v1/auth/register",
                serde_json::json!({ "username": username, "password": password }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);

        let response = self
            .post(
                "/api/v1/auth/login",
                serde_json::json!({ "username": username, "password": password }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
        response.body["token"].as_str().unwrap().to_string()
    }

    async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("failed to read body")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or(Value::String(String::from_utf8_lossy(&bytes).to_string()))
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }
}
