//! Adder: a minimal JSON HTTP service.
//!
//! Exposes a liveness probe (`GET /ping`) and integer addition (`POST /add`),
//! plus an OpenAPI description of both at `GET /openapi.json`.

pub mod config;
pub mod error;
pub mod extract;
pub mod http;
pub mod middleware;
pub mod routes;

pub use error::*;
pub use routes::create_router;
