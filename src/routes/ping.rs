//! Liveness probe.
//!
//! Returns 200 as long as the process can answer HTTP. It checks nothing else,
//! so it is safe to poll from load balancers and container orchestrators.

use axum::Json;
use serde::Serialize;

/// Status reported by the liveness probe
pub const PING_STATUS_OK: &str = "ok";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PingResponse {
    pub status: String,
}

impl PingResponse {
    pub fn ok() -> Self {
        Self {
            status: PING_STATUS_OK.to_string(),
        }
    }
}

/// `GET /ping`
pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse::ok())
}
