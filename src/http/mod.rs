//! HTTP server lifecycle.
//!
//! The server includes:
//! - Listen address resolution from configuration
//! - Graceful shutdown on SIGTERM/SIGINT

mod server;
mod shutdown;

pub use server::{listen_addr, start_server, ServerError};
