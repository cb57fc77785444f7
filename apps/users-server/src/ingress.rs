//! HTTP ingress: health endpoint plus the request-id and tracing middleware
//! stack wrapped around the module routes.

use std::time::Duration;

use axum::http::{HeaderName, Request};
use axum::{body::Body, middleware::from_fn, middleware::Next, response::Json, response::Response};
use axum::{routing::get, Router};
use serde_json::{json, Value};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::timeout::TimeoutLayer;
use tracing::field::Empty;

#[derive(Clone, Debug)]
pub struct XRequestId(pub String);

pub fn request_id_header() -> HeaderName {
    HeaderName::from_static("x-request-id")
}

#[derive(Clone, Default)]
pub struct MakeReqId;

impl MakeRequestId for MakeReqId {
    fn make_request_id<B>(&mut self, _req: &Request<B>) -> Option<RequestId> {
        let id = nanoid::nanoid!();
        Some(RequestId::new(id.parse().ok()?))
    }
}

fn header_request_id<B>(req: &Request<B>) -> &str {
    req.headers()
        .get(request_id_header())
        .and_then(|v| v.to_str().ok())
        .unwrap_or("n/a")
}

/// Expose the request id to handlers and record it on the current span.
async fn push_req_id_to_extensions(mut req: Request<Body>, next: Next) -> Response {
    let rid = header_request_id(&req).to_owned();
    tracing::Span::current().record("request_id", tracing::field::display(&rid));
    req.extensions_mut().insert(XRequestId(rid));
    next.run(req).await
}

#[allow(clippy::type_complexity)]
fn trace_layer() -> tower_http::trace::TraceLayer<
    tower_http::classify::SharedClassifier<tower_http::classify::ServerErrorsAsFailures>,
    impl Fn(&Request<Body>) -> tracing::Span + Clone,
> {
    tower_http::trace::TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
        tracing::info_span!(
            "http_request",
            method = %req.method(),
            path = %req.uri().path(),
            version = ?req.version(),
            request_id = %header_request_id(req),
            status = Empty,
            latency_ms = Empty
        )
    })
}

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Wrap `routes` with `/health` and the ingress middleware.
///
/// Layer order, outermost first: propagate id, set id, trace, record id,
/// then the optional handler timeout (`timeout_sec == 0` disables it).
pub fn build_router(routes: Router, timeout_sec: u64) -> Router {
    let x_request_id = request_id_header();

    let mut router = routes.route("/health", get(health_check));
    if timeout_sec > 0 {
        router = router.layer(TimeoutLayer::new(Duration::from_secs(timeout_sec)));
    }

    router
        .layer(from_fn(push_req_id_to_extensions))
        .layer(trace_layer())
        .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeReqId))
        .layer(PropagateRequestIdLayer::new(x_request_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Extension, http::StatusCode};
    use tower::ServiceExt;

    async fn echo_id(Extension(XRequestId(id)): Extension<XRequestId>) -> String {
        id
    }

    fn app() -> Router {
        build_router(Router::new().route("/echo", get(echo_id)), 5)
    }

    #[tokio::test]
    async fn generates_request_id_when_missing() {
        let resp = app()
            .oneshot(Request::builder().uri("/echo").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let header = resp
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
            .unwrap();
        assert!(!header.is_empty());

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body, header.as_bytes());
    }

    #[tokio::test]
    async fn preserves_incoming_request_id() {
        let resp = app()
            .oneshot(
                Request::builder()
                    .uri("/echo")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            resp.headers().get("x-request-id").and_then(|v| v.to_str().ok()),
            Some("abc-123")
        );
    }

    #[tokio::test]
    async fn health_reports_healthy() {
        let resp = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert!(json["timestamp"].is_string());
    }
}
