//! Configuration management for fnpack
//!
//! Settings are loaded from environment variables with sensible defaults.
//!
//! # Environment Variables
//!
//! - `FNPACK_LOG_LEVEL`: Logging level - default: "info"
//! - `FNPACK_REQUEST_TIMEOUT`: Timeout in seconds for version lookups - default: "30"
//! - `FNPACK_JAVA_VERSION`: Java version used for the plain `java` runtime - default: "11"
//! - `FNPACK_JAVA_METADATA_URL`: Primary Java FDK version registry (Maven metadata XML)
//! - `FNPACK_JAVA_SEARCH_URL`: Secondary Java FDK version registry (JSON package search)
//!
//! The FDK version itself can be pinned with `FN_JAVA_FDK_VERSION`, which bypasses
//! both registries. That variable is read by the resolver, not by this module.
//!
//! # Example
//!
//! ```no_run
//! use fnpack::FnpackConfig;
//!
//! let config = FnpackConfig::default();
//! config.validate().expect("Invalid configuration");
//! println!("timeout: {:?}", config.request_timeout());
//! ```

use crate::langs::{MAVEN_METADATA_URL, PACKAGE_SEARCH_URL, SUPPORTED_JAVA_VERSIONS};
use reqwest::Url;
use std::env;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_JAVA_VERSION: &str = "11";

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

#[derive(Debug, Clone)]
pub struct FnpackConfig {
    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Timeout applied to each version registry request
    pub request_timeout_secs: u64,

    /// Java version selected by the plain `java` runtime string
    pub java_version: String,

    pub java_metadata_url: String,

    pub java_search_url: String,
}

impl Default for FnpackConfig {
    fn default() -> Self {
        let log_level = env::var("FNPACK_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        let request_timeout_secs = env::var("FNPACK_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        let java_version = env::var("FNPACK_JAVA_VERSION")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_JAVA_VERSION.to_string());

        let java_metadata_url = env::var("FNPACK_JAVA_METADATA_URL")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| MAVEN_METADATA_URL.to_string());

        let java_search_url = env::var("FNPACK_JAVA_SEARCH_URL")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| PACKAGE_SEARCH_URL.to_string());

        Self {
            log_level,
            request_timeout_secs,
            java_version,
            java_metadata_url,
            java_search_url,
        }
    }
}

impl FnpackConfig {
    /// Checks that:
    /// - the timeout is non-zero
    /// - the log level is known
    /// - the Java version is one the Java helper supports
    /// - registry endpoints are http(s) URLs
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        if !VALID_LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid log level '{}'. Valid options: {}",
                self.log_level,
                VALID_LOG_LEVELS.join(", ")
            )));
        }

        if !SUPPORTED_JAVA_VERSIONS.contains(&self.java_version.as_str()) {
            return Err(ConfigError::ValidationFailed(format!(
                "Unsupported Java version '{}'. Valid options: {}",
                self.java_version,
                SUPPORTED_JAVA_VERSIONS.join(", ")
            )));
        }

        validate_endpoint("FNPACK_JAVA_METADATA_URL", &self.java_metadata_url)?;
        validate_endpoint("FNPACK_JAVA_SEARCH_URL", &self.java_search_url)?;

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn validate_endpoint(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value).map_err(|e| ConfigError::ParseError {
        field: field.to_string(),
        error: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::ValidationFailed(format!(
            "{} must be an http(s) URL, got scheme '{}'",
            field, other
        ))),
    }
}

impl fmt::Display for FnpackConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "FnpackConfig {{")?;
        writeln!(f, "  log_level: {}", self.log_level)?;
        writeln!(f, "  request_timeout_secs: {}", self.request_timeout_secs)?;
        writeln!(f, "  java_version: {}", self.java_version)?;
        writeln!(f, "  java_metadata_url: {}", self.java_metadata_url)?;
        writeln!(f, "  java_search_url: {}", self.java_search_url)?;
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> FnpackConfig {
        FnpackConfig {
            log_level: "info".to_string(),
            request_timeout_secs: 30,
            java_version: "11".to_string(),
            java_metadata_url: MAVEN_METADATA_URL.to_string(),
            java_search_url: PACKAGE_SEARCH_URL.to_string(),
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut cfg = config();
        cfg.request_timeout_secs = 0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut cfg = config();
        cfg.log_level = "verbose".to_string();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_unsupported_java_version_rejected() {
        let mut cfg = config();
        cfg.java_version = "17".to_string();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("17"));
    }

    #[test]
    fn test_non_http_endpoint_rejected() {
        let mut cfg = config();
        cfg.java_search_url = "ftp://example.com/search".to_string();
        assert!(cfg.validate().is_err());

        cfg.java_search_url = "not a url".to_string();
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_request_timeout_duration() {
        assert_eq!(config().request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_display() {
        let rendered = config().to_string();
        assert!(rendered.contains("java_version: 11"));
    }
}
