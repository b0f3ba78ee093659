//! Authentication, metrics and security-header middleware for API routes.

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{header::HeaderValue, request::Parts, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use grabdock_core::Identity;

use crate::metrics::{
    AUTH_FAILURES_TOTAL, HTTP_REQUESTS_IN_FLIGHT, HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION,
};
use crate::state::AppState;

/// Metrics middleware that tracks HTTP request duration and counts.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    HTTP_REQUESTS_IN_FLIGHT.inc();

    let response = next.run(request).await;

    HTTP_REQUESTS_IN_FLIGHT.dec();

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    HTTP_REQUEST_DURATION
        .with_label_values(&[&method, &path, &status])
        .observe(duration);
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[&method, &path, &status])
        .inc();

    response
}

/// Attach browser hardening headers to every response, errors included.
pub async fn security_headers_middleware(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    headers.insert(
        "X-XSS-Protection",
        HeaderValue::from_static("1; mode=block"),
    );
    headers.insert(
        "Strict-Transport-Security",
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );

    response
}

/// Authentication middleware validating bearer session tokens.
///
/// When auth is disabled in config, requests pass through under an
/// anonymous identity. Otherwise the `Authorization: Bearer` token is
/// verified and the caller identity inserted into request extensions.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    if !state.auth_enabled() {
        let mut request = request;
        request.extensions_mut().insert(Identity::anonymous());
        return Ok(next.run(request).await);
    }

    let token = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let Some(token) = token else {
        AUTH_FAILURES_TOTAL
            .with_label_values(&["not_authenticated"])
            .inc();
        return Err(StatusCode::UNAUTHORIZED);
    };

    match state.signer().verify(token) {
        Ok(identity) => {
            let mut request = request;
            request.extensions_mut().insert(identity);
            Ok(next.run(request).await)
        }
        Err(_) => {
            AUTH_FAILURES_TOTAL
                .with_label_values(&["invalid_credentials"])
                .inc();
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

/// Extractor for the authenticated caller identity.
///
/// Falls back to anonymous if no identity is present, which only
/// happens on routes not behind the auth middleware.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let identity = parts
            .extensions
            .get::<Identity>()
            .cloned()
            .unwrap_or_else(Identity::anonymous);
        std::future::ready(Ok(AuthUser(identity)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request},
        middleware,
        routing::get,
        Router,
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    use grabdock_core::config::{
        AuthConfig, Config, ExtractorConfig, PipelineConfig, ServerConfig, StorageConfig,
    };
    use grabdock_core::testing::{MemoryStore, MockExtractor};
    use grabdock_core::{DownloadPipeline, JsonUserStore, SessionSigner, StoreHandle};

    async fn dummy_handler() -> &'static str {
        "OK"
    }

    fn test_config(auth: AuthConfig) -> Config {
        Config {
            auth,
            server: ServerConfig::default(),
            storage: StorageConfig {
                bucket: "test-bucket".to_string(),
                region: "us-east-1".to_string(),
                endpoint_url: None,
                public_links: false,
            },
            extractor: ExtractorConfig::default(),
            pipeline: PipelineConfig::default(),
        }
    }

    fn test_state(auth: AuthConfig) -> Arc<AppState> {
        let store = StoreHandle::ready(Arc::new(MemoryStore::new()));
        let config = test_config(auth.clone());
        let pipeline = DownloadPipeline::new(
            Arc::new(MockExtractor::new()),
            store.clone(),
            config.pipeline.clone(),
        );
        let users = JsonUserStore::new(store);
        let signer = SessionSigner::new(&auth.session_secret, auth.token_ttl_secs);
        Arc::new(AppState::new(config, pipeline, users, signer))
    }

    fn enabled_auth() -> AuthConfig {
        AuthConfig {
            enabled: true,
            session_secret: "test-secret".to_string(),
            token_ttl_secs: 3600,
        }
    }

    fn app(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/test", get(dummy_handler))
            .layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            ))
            .with_state(state)
    }

    #[tokio::test]
    async fn test_disabled_auth_allows_all() {
        let state = test_state(AuthConfig {
            enabled: false,
            session_secret: String::new(),
            token_ttl_secs: 3600,
        });

        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();
        let response = app(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_valid_token_accepted() {
        let state = test_state(enabled_auth());
        let user = state.users().create("alice", "pw").await.unwrap();
        let token = state.signer().issue(&user).unwrap();

        let request = Request::builder()
            .uri("/test")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();

        let response = app(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_token_rejected() {
        let state = test_state(enabled_auth());

        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();
        let response = app(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_garbage_token_rejected() {
        let state = test_state(enabled_auth());

        let request = Request::builder()
            .uri("/test")
            .header(header::AUTHORIZATION, "Bearer not-a-token")
            .body(Body::empty())
            .unwrap();

        let response = app(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_auth_user_extractor_with_disabled_auth() {
        use http_body_util::BodyExt;

        async fn user_handler(AuthUser(identity): AuthUser) -> String {
            identity.username
        }

        let state = test_state(AuthConfig {
            enabled: false,
            session_secret: String::new(),
            token_ttl_secs: 3600,
        });

        let app = Router::new()
            .route("/test", get(user_handler))
            .layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            ))
            .with_state(state);

        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(String::from_utf8(body.to_vec()).unwrap(), "anonymous");
    }

    #[tokio::test]
    async fn test_security_headers_on_every_response() {
        async fn handler() -> &'static str {
            "OK"
        }

        let app = Router::new()
            .route("/test", get(handler))
            .layer(middleware::from_fn(security_headers_middleware));

        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        let headers = response.headers();
        assert_eq!(headers["X-Content-Type-Options"], "nosniff");
        assert_eq!(headers["X-Frame-Options"], "DENY");
        assert_eq!(headers["X-XSS-Protection"], "1; mode=block");
        assert_eq!(
            headers["Strict-Transport-Security"],
            "max-age=31536000; includeSubDomains"
        );
    }
}
