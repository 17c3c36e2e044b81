//! Configuration management for the orgdesk admin console

use serde::{Deserialize, Serialize};
use std::{fmt, path::Path, str::FromStr, time::Duration};
use url::Url;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base address of the REST backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Total request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or `EnvFilter` directive
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format
    #[serde(default)]
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Structured JSON lines
    Json,
    /// Human-readable output
    #[default]
    Pretty,
}

impl FromStr for LogFormat {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" | "text" => Ok(Self::Pretty),
            other => Err(crate::Error::validation(
                "logging.format",
                format!("unknown log format '{other}' (expected json or pretty)"),
            )),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Pretty => f.write_str("pretty"),
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

const fn default_request_timeout() -> u64 {
    30
}

const fn default_connect_timeout() -> u64 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout: default_request_timeout(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl ApiConfig {
    /// Parse and check the configured backend address
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidUrl`] if the address does not parse, is not
    /// `http`/`https`, or has no host.
    pub fn parsed_base_url(&self) -> crate::Result<Url> {
        let invalid = |reason: String| crate::Error::InvalidUrl {
            url: self.base_url.clone(),
            reason,
        };

        let url = Url::parse(self.base_url.trim()).map_err(|e| invalid(e.to_string()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        if url.host_str().is_none() {
            return Err(invalid("missing host".to_string()));
        }

        Ok(url)
    }

    /// Total request timeout
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Connection timeout
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }
}

impl Config {
    /// Load configuration from `orgdesk.toml` (if present) and the environment
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded, parsed or validated.
    pub fn load() -> crate::Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration from an explicit file (required) or the default
    /// optional `orgdesk.toml`, then apply `ORGDESK_` environment overrides
    ///
    /// Nested keys use a double underscore, e.g. `ORGDESK_API__BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded, parsed or validated.
    pub fn load_from(path: Option<&Path>) -> crate::Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("orgdesk").required(false),
        };

        let config: Self = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("ORGDESK")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot
    ///
    /// # Errors
    ///
    /// Returns an error for an unusable backend address or zero timeouts.
    pub fn validate(&self) -> crate::Result<()> {
        self.api.parsed_base_url()?;

        if self.api.request_timeout == 0 {
            return Err(crate::Error::validation(
                "api.request_timeout",
                "must be greater than zero",
            ));
        }
        if self.api.connect_timeout == 0 {
            return Err(crate::Error::validation(
                "api.connect_timeout",
                "must be greater than zero",
            ));
        }

        Ok(())
    }
}
