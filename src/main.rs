//! Adder: a minimal JSON HTTP service.
//!
//! This is the application entry point. It loads configuration from an optional
//! TOML file, applies command line overrides, initializes tracing, sets up the
//! Axum router and starts the HTTP server.

use clap::Parser;
use const_format::formatcp;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use adder::config::{log_filter, AppConfig, DEFAULT_CONFIG_PATH, DEFAULT_HTTP_ADDR};
use adder::create_router;
use adder::http::start_server;

const AFTER_HELP: &str = formatcp!("Listens on {} unless configured otherwise.", DEFAULT_HTTP_ADDR);

/// Adder: a minimal JSON HTTP service
#[derive(Parser, Debug)]
#[command(name = "adder", version, about, after_help = AFTER_HELP)]
struct Args {
    /// Path to configuration file (optional; defaults apply if it does not exist)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Log level filter (e.g., "adder=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,

    /// Override http.host from the configuration file
    #[arg(long)]
    host: Option<String>,

    /// Override http.port from the configuration file
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration, then apply CLI overrides
    let mut config = AppConfig::load_or_default(&args.config)?;
    config.apply_overrides(args.host, args.port);

    // Initialize tracing with priority: CLI > env > default
    let filter = log_filter(args.log_level, std::env::var("RUST_LOG").ok());

    let json = config.logging.is_json();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&filter))
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();

    tracing::info!(
        config = %args.config,
        host = %config.http.host,
        port = config.http.port,
        log_format = %config.logging.format,
        "Loaded configuration"
    );

    let app = create_router();
    start_server(app, &config.http).await?;

    Ok(())
}
