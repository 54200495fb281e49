//! Request ID middleware for correlating logs with requests.
//!
//! `SetRequestIdLayer` assigns a UUID v4 to each request that does not already
//! carry an `x-request-id` header, and `PropagateRequestIdLayer` echoes it on
//! the response. `request_span_layer` wraps the rest of the request lifecycle
//! in a tracing span keyed by that ID, so every log emitted while handling the
//! request can be correlated.

use std::time::Instant;

use axum::{extract::Request, middleware, middleware::Next, response::Response, Router};
use http::header::HeaderName;
use tower_http::request_id::{
    MakeRequestUuid, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tracing::Instrument;

use crate::config::REQUEST_ID_HEADER;

/// Logged when a client-supplied ID is not printable ASCII
const UNPRINTABLE_REQUEST_ID: &str = "<invalid>";

/// Wrap a router with request ID assignment, propagation and the request span.
///
/// Must be applied last so the span covers all other middleware and handlers.
pub fn with_request_id(router: Router) -> Router {
    let header = HeaderName::from_static(REQUEST_ID_HEADER);

    router
        .layer(middleware::from_fn(request_span_layer))
        .layer(PropagateRequestIdLayer::new(header.clone()))
        .layer(SetRequestIdLayer::new(header, MakeRequestUuid))
}

/// Middleware that creates the request span and logs completion.
pub async fn request_span_layer(request: Request, next: Next) -> Response {
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|id| {
            id.header_value()
                .to_str()
                .unwrap_or(UNPRINTABLE_REQUEST_ID)
                .to_owned()
        })
        .unwrap_or_default();

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
        duration_ms = tracing::field::Empty,
    );

    let start = Instant::now();

    async move {
        let response = next.run(request).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        tracing::Span::current().record("duration_ms", duration_ms);
        tracing::info!(
            status = response.status().as_u16(),
            duration_ms,
            "Request completed"
        );

        response
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, routing::get, Extension};
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use uuid::Uuid;

    async fn echo_request_id(Extension(id): Extension<RequestId>) -> String {
        id.header_value().to_str().unwrap().to_owned()
    }

    fn app() -> Router {
        with_request_id(Router::new().route("/id", get(echo_request_id)))
    }

    fn request(id: Option<&str>) -> http::Request<Body> {
        let mut builder = http::Request::builder().uri("/id");
        if let Some(id) = id {
            builder = builder.header(REQUEST_ID_HEADER, id);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_request_id_matches_header() {
        let response = app().oneshot(request(None)).await.unwrap();

        let header = response.headers()[REQUEST_ID_HEADER]
            .to_str()
            .unwrap()
            .to_owned();
        let body = response.into_body().collect().await.unwrap().to_bytes();

        assert_eq!(header.as_bytes(), &body[..]);
        assert!(Uuid::parse_str(&header).is_ok());
    }

    #[tokio::test]
    async fn test_request_ids_are_unique() {
        let app = app();
        let mut ids = Vec::new();
        for _ in 0..2 {
            let response = app.clone().oneshot(request(None)).await.unwrap();
            ids.push(response.headers()[REQUEST_ID_HEADER].clone());
        }
        assert_ne!(ids[0], ids[1]);
    }

    #[tokio::test]
    async fn test_client_request_id_is_kept() {
        let response = app().oneshot(request(Some("trace-abc-123"))).await.unwrap();
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "trace-abc-123");

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"trace-abc-123");
    }
}
