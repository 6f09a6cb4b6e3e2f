//! Structured logging setup for fnpack
//!
//! Initializes a `tracing` subscriber writing to stderr so that recipe and
//! Dockerfile output on stdout stays machine-readable.
//!
//! # Example
//!
//! ```no_run
//! use fnpack::util::logging;
//! use tracing::{debug, info};
//!
//! logging::init_logging(logging::LoggingConfig::from_env());
//!
//! info!("Resolving FDK version");
//! debug!(runtime = "java", "Selected helper");
//! ```

use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum log level to display
    pub level: Level,

    /// Use JSON output format
    pub use_json: bool,

    /// Include the module target (e.g., fnpack::fdk) in logs
    pub include_target: bool,

    /// Include file and line number information
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: true,
            include_location: false,
        }
    }
}

impl LoggingConfig {
    /// Reads `FNPACK_LOG_LEVEL` (default info) and `FNPACK_LOG_JSON`
    pub fn from_env() -> Self {
        let level_str = env::var("FNPACK_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let use_json = env::var("FNPACK_LOG_JSON")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        Self {
            level: parse_level(&level_str),
            use_json,
            ..Default::default()
        }
    }
}

/// Parses a log level, falling back to INFO for unknown values
///
/// ```
/// use fnpack::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("debug"), Level::DEBUG);
/// assert_eq!(parse_level("INFO"), Level::INFO);
/// assert_eq!(parse_level("invalid"), Level::INFO);
/// ```
pub fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

fn directive(raw: &str) -> Option<Directive> {
    raw.parse().ok()
}

/// `RUST_LOG` plus our crate at the configured level, which always wins.
fn env_filter(config: &LoggingConfig) -> EnvFilter {
    let mut filter = EnvFilter::from_default_env();
    if let Some(d) = directive(&format!("fnpack={}", config.level)) {
        filter = filter.add_directive(d);
    }

    // Without RUST_LOG, keep the HTTP stack quiet.
    if env::var("RUST_LOG").is_err() {
        for default in ["hyper=warn", "reqwest=warn"] {
            if let Some(d) = directive(default) {
                filter = filter.add_directive(d);
            }
        }
    }
    filter
}

/// Installs the global subscriber. Only the first call has any effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = env_filter(&config);

        if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location),
                )
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location),
                )
                .init();
        }
    });
}
