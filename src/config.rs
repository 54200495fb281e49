//! Configuration loading and constants.
//!
//! Loads application configuration from an optional TOML file and defines the
//! defaults for the listen address, logging and response headers. `AppConfig`
//! is the root configuration struct containing all settings.

use const_format::formatcp;
use serde::Deserialize;
use std::path::Path;

// =============================================================================
// HTTP Server Defaults
// =============================================================================

/// Default listen host
pub const DEFAULT_HTTP_HOST: &str = "127.0.0.1";

/// Default listen port
pub const DEFAULT_HTTP_PORT: u16 = 8000;

/// Default listen address, used in CLI help text
pub const DEFAULT_HTTP_ADDR: &str = formatcp!("{}:{}", DEFAULT_HTTP_HOST, DEFAULT_HTTP_PORT);

/// Seconds to wait for in-flight connections after a shutdown signal
pub const SHUTDOWN_GRACE_PERIOD_SECS: u64 = 30;

// =============================================================================
// HTTP Response Headers
// =============================================================================

/// Every response is computed per request and must never be served from a cache
pub const CACHE_CONTROL_API: &str = "no-store";

/// Response header carrying the per-request correlation ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

// =============================================================================
// Default Paths and Strings
// =============================================================================

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = formatcp!("{}=debug,tower_http=info", env!("CARGO_CRATE_NAME"));

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

/// Accepted values for `logging.format`
pub const LOG_FORMATS: [&str; 2] = ["text", "json"];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HTTP_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_HTTP_PORT
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }

    /// Whether the structured JSON formatter is selected
    pub fn is_json(&self) -> bool {
        self.format == "json"
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Load the file if it exists, otherwise fall back to built-in defaults.
    ///
    /// The service has no required settings, so a missing file is not an error.
    /// A file that exists but cannot be read or parsed still is.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply command line overrides on top of the file configuration.
    pub fn apply_overrides(&mut self, host: Option<String>, port: Option<u16>) {
        if let Some(host) = host {
            self.http.host = host;
        }
        if let Some(port) = port {
            self.http.port = port;
        }
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;

        if !LOG_FORMATS.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::Validation(format!(
                "Unknown logging.format '{}', expected one of: {}",
                config.logging.format,
                LOG_FORMATS.join(", ")
            )));
        }

        Ok(config)
    }
}

/// Choose the tracing filter with priority: CLI > `RUST_LOG` > default.
pub fn log_filter(cli: Option<String>, env: Option<String>) -> String {
    cli.or(env).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config.http.host, DEFAULT_HTTP_HOST);
        assert_eq!(config.http.port, DEFAULT_HTTP_PORT);
        assert_eq!(config.logging.format, "text");
        assert!(!config.logging.is_json());
    }

    #[test]
    fn test_partial_http_section() {
        let config = AppConfig::parse("[http]\nport = 9090\n").unwrap();
        assert_eq!(config.http.host, DEFAULT_HTTP_HOST);
        assert_eq!(config.http.port, 9090);
    }

    #[test]
    fn test_json_logging() {
        let config = AppConfig::parse("[logging]\nformat = \"json\"\n").unwrap();
        assert!(config.logging.is_json());
    }

    #[test]
    fn test_unknown_log_format_rejected() {
        let err = AppConfig::parse("[logging]\nformat = \"xml\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("xml"));
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let err = AppConfig::parse("[http\nport = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_port_out_of_range_rejected() {
        let err = AppConfig::parse("[http]\nport = 70000\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[http]\nhost = \"0.0.0.0\"\nport = 8080").unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.http.port, 8080);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.http.port, DEFAULT_HTTP_PORT);
    }

    #[test]
    fn test_cli_overrides_file_values() {
        let mut config = AppConfig::parse("[http]\nhost = \"0.0.0.0\"\nport = 8080\n").unwrap();
        config.apply_overrides(Some("::1".to_string()), Some(9000));
        assert_eq!(config.http.host, "::1");
        assert_eq!(config.http.port, 9000);
    }

    #[test]
    fn test_absent_overrides_keep_file_values() {
        let mut config = AppConfig::parse("[http]\nhost = \"0.0.0.0\"\nport = 8080\n").unwrap();
        config.apply_overrides(None, None);
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.http.port, 8080);

        config.apply_overrides(None, Some(1234));
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.http.port, 1234);
    }

    #[test]
    fn test_log_filter_priority() {
        let cli = || Some("adder=trace".to_string());
        let env = || Some("warn".to_string());

        assert_eq!(log_filter(cli(), env()), "adder=trace");
        assert_eq!(log_filter(None, env()), "warn");
        assert_eq!(log_filter(None, None), DEFAULT_LOG_FILTER);
        assert_eq!(DEFAULT_LOG_FILTER, "adder=debug,tower_http=info");
    }

    #[test]
    fn test_default_http_addr() {
        assert_eq!(DEFAULT_HTTP_ADDR, "127.0.0.1:8000");
    }
}
