//! Configuration validation rules.
//!
//! This module provides validation logic for `PurgeConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::PurgeConfig;
use thiserror::Error;
use url::Url;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl PurgeConfig {
    /// Validate configuration values after loading.
    ///
    /// Credentials are deliberately not checked here; their absence disables
    /// purging instead of failing startup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 60 seconds
    /// - `admin_url` is not an absolute http(s) URL
    /// - `service_name` contains a slash or whitespace
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 60_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 60 seconds (60000ms)".into(),
            });
        }

        let admin_url = Url::parse(&self.admin_url)
            .map_err(|e| ConfigError::Invalid { field: "admin_url".into(), reason: e.to_string() })?;
        if !matches!(admin_url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid { field: "admin_url".into(), reason: "scheme must be http or https".into() });
        }

        if let Some(service_name) = &self.service_name
            && service_name.chars().any(|c| c == '/' || c.is_whitespace())
        {
            return Err(ConfigError::Invalid {
                field: "service_name".into(),
                reason: "must not contain slashes or whitespace".into(),
            });
        }

        if self.debug && !self.enabled {
            tracing::warn!("debug is set but purging is disabled; no purge requests will be logged");
        }

        Ok(())
    }
}
