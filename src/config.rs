//! Configuration loading and constants.
//!
//! Loads application configuration from TOML files and defines constants for
//! HTTP cache headers, health sampling defaults, logging format and default
//! paths. `AppConfig` is the root configuration struct containing all settings.

use const_format::formatcp;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

// =============================================================================
// HTTP Response Cache Control
// =============================================================================
// Greeting pages are static and may be cached briefly by the reverse proxy.
// Health responses must never be cached: a stale "healthy" hides an outage.

/// Greeting pages - static text
pub const HTTP_CACHE_PAGE_MAX_AGE: u32 = 60;
pub const HTTP_CACHE_PAGE_SWR: u32 = 30;

pub const CACHE_CONTROL_PAGE: &str = formatcp!(
    "public, max-age={}, stale-while-revalidate={}",
    HTTP_CACHE_PAGE_MAX_AGE,
    HTTP_CACHE_PAGE_SWR
);

pub const CACHE_CONTROL_HEALTH: &str = "no-store";

// =============================================================================
// Health Sampling Defaults
// =============================================================================

/// Window over which CPU utilization is averaged
pub const DEFAULT_CPU_SAMPLE_INTERVAL_MS: u64 = 1000;

/// Upper bound on a single metrics sample before it is reported as a failure
pub const DEFAULT_SAMPLE_TIMEOUT_MS: u64 = 30_000;

/// Filesystem whose utilization is reported
pub const DEFAULT_DISK_MOUNT_POINT: &str = "/";

// =============================================================================
// HTTP Server Defaults
// =============================================================================

pub const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
pub const DEFAULT_HTTP_PORT: u16 = 5000;

/// Time allowed for in-flight requests to drain on shutdown
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Default Paths and Strings
// =============================================================================

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "bigbrother=info,tower_http=info";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Health endpoint sampling settings
    #[serde(default)]
    pub health: HealthConfig,
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
    #[serde(default = "HttpServerConfig::default_shutdown_timeout")]
    pub shutdown_timeout_seconds: u64,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            shutdown_timeout_seconds: Self::default_shutdown_timeout(),
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

    fn default_shutdown_timeout() -> u64 {
        DEFAULT_SHUTDOWN_TIMEOUT_SECS
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_seconds)
    }
}

/// Health endpoint sampling configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HealthConfig {
    /// CPU sampling window in milliseconds (default: 1000)
    #[serde(default = "HealthConfig::default_cpu_interval")]
    pub cpu_sample_interval_ms: u64,
    /// Mount point whose disk utilization is reported (default: "/")
    #[serde(default = "HealthConfig::default_mount_point")]
    pub disk_mount_point: String,
    /// Maximum time a sample may take before the report is unhealthy (default: 30000)
    #[serde(default = "HealthConfig::default_sample_timeout")]
    pub sample_timeout_ms: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            cpu_sample_interval_ms: Self::default_cpu_interval(),
            disk_mount_point: Self::default_mount_point(),
            sample_timeout_ms: Self::default_sample_timeout(),
        }
    }
}

impl HealthConfig {
    fn default_cpu_interval() -> u64 {
        DEFAULT_CPU_SAMPLE_INTERVAL_MS
    }

    fn default_mount_point() -> String {
        DEFAULT_DISK_MOUNT_POINT.to_string()
    }

    fn default_sample_timeout() -> u64 {
        DEFAULT_SAMPLE_TIMEOUT_MS
    }

    pub fn cpu_sample_interval(&self) -> Duration {
        Duration::from_millis(self.cpu_sample_interval_ms)
    }

    pub fn sample_timeout(&self) -> Duration {
        Duration::from_millis(self.sample_timeout_ms)
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

    pub fn is_json(&self) -> bool {
        self.format == "json"
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Load from `path`, or fall back to built-in defaults when the file is absent.
    ///
    /// Only a missing file is tolerated; unreadable or malformed files are errors.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.health.cpu_sample_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "health.cpu_sample_interval_ms must be greater than zero".to_string(),
            ));
        }
        // The CPU sample alone takes the full interval, so a shorter timeout always fires
        if self.health.sample_timeout_ms <= self.health.cpu_sample_interval_ms {
            return Err(ConfigError::Validation(format!(
                "health.sample_timeout_ms ({}) must exceed health.cpu_sample_interval_ms ({})",
                self.health.sample_timeout_ms, self.health.cpu_sample_interval_ms
            )));
        }
        if !Path::new(&self.health.disk_mount_point).is_absolute() {
            return Err(ConfigError::Validation(format!(
                "health.disk_mount_point must be an absolute path, got '{}'",
                self.health.disk_mount_point
            )));
        }
        if !matches!(self.logging.format.as_str(), "text" | "json") {
            return Err(ConfigError::Validation(format!(
                "logging.format must be \"text\" or \"json\", got '{}'",
                self.logging.format
            )));
        }
        Ok(())
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.http.host, self.http.port)
    }
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
    fn test_defaults_match_original_deployment() {
        let config = AppConfig::default();
        assert_eq!(config.http.host, "127.0.0.1");
        assert_eq!(config.http.port, 5000);
        assert_eq!(config.http.shutdown_timeout(), Duration::from_secs(30));
        assert_eq!(config.health.cpu_sample_interval(), Duration::from_secs(1));
        assert_eq!(config.health.sample_timeout(), Duration::from_secs(30));
        assert_eq!(config.health.disk_mount_point, "/");
        assert!(!config.logging.is_json());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.addr(), "127.0.0.1:5000");
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [http]
            port = 8080

            [health]
            cpu_sample_interval_ms = 250
            "#,
        )
        .unwrap();
        assert_eq!(config.addr(), "127.0.0.1:8080");
        assert_eq!(config.health.cpu_sample_interval_ms, 250);
        assert_eq!(config.health.sample_timeout_ms, DEFAULT_SAMPLE_TIMEOUT_MS);
    }

    #[test]
    fn test_rejects_zero_interval() {
        let err = AppConfig::from_toml("[health]\ncpu_sample_interval_ms = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let err = AppConfig::from_toml("[health]\nsample_timeout_ms = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_rejects_timeout_not_longer_than_cpu_interval() {
        let err = AppConfig::from_toml(
            "[health]\ncpu_sample_interval_ms = 1000\nsample_timeout_ms = 1000\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("must exceed"));

        let err = AppConfig::from_toml("[health]\nsample_timeout_ms = 500\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_accepts_timeout_longer_than_cpu_interval() {
        let config = AppConfig::from_toml(
            "[health]\ncpu_sample_interval_ms = 1000\nsample_timeout_ms = 1001\n",
        )
        .unwrap();
        assert_eq!(config.health.sample_timeout_ms, 1001);
    }

    #[test]
    fn test_rejects_relative_mount_point() {
        let err = AppConfig::from_toml("[health]\ndisk_mount_point = \"data\"\n").unwrap_err();
        assert!(err.to_string().contains("absolute"));
    }

    #[test]
    fn test_rejects_unknown_log_format() {
        let err = AppConfig::from_toml("[logging]\nformat = \"xml\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = AppConfig::from_toml("[http\nport = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nformat = \"json\"").unwrap();
        let config = AppConfig::load(file.path()).unwrap();
        assert!(config.logging.is_json());
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_or_default(dir.path().join("missing.toml")).unwrap();
        assert_eq!(config.http.port, DEFAULT_HTTP_PORT);
    }

    #[test]
    fn test_cache_control_page_value() {
        assert_eq!(
            CACHE_CONTROL_PAGE,
            "public, max-age=60, stale-while-revalidate=30"
        );
    }
}
