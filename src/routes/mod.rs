//! HTTP route handlers.
//!
//! Every endpoint answers with JSON, including the 404 and 405 fallbacks, and
//! every response carries `Cache-Control: no-store`.
//!
//! Request tracing is enabled via middleware that generates a unique request ID
//! for each incoming request, allowing correlation of all logs within a request.

pub mod add;
pub mod openapi;
pub mod ping;

use axum::{
    routing::{get, post},
    Router,
};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::CACHE_CONTROL_API;
use crate::error::AppError;
use crate::middleware::with_request_id;

async fn not_found() -> AppError {
    AppError::NotFound
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Creates the Axum router with all routes and response headers.
pub fn create_router() -> Router {
    let router = Router::new()
        .route("/ping", get(ping::ping))
        .route("/add", post(add::add))
        .route("/openapi.json", get(openapi::openapi))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_API),
        ));

    // Request ID middleware - creates root span with request_id for correlation
    with_request_id(router)
}
