//! Purge configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (STELLATE_*)
//! 2. TOML config file (if STELLATE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Default admin API base URL.
pub const DEFAULT_ADMIN_URL: &str = "https://admin.stellate.co";

/// Header carrying the purge token on every admin API request.
pub const TOKEN_HEADER: &str = "stellate-token";

/// Purge configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (STELLATE_*)
/// 2. TOML config file (if STELLATE_CONFIG_FILE set)
/// 3. Built-in defaults
///
/// Missing credentials are not a load error: a config without `service_name`
/// or `purge_token` loads fine and leaves purging disabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurgeConfig {
    /// Stellate service the purge mutations target.
    ///
    /// Set via STELLATE_SERVICE_NAME environment variable.
    #[serde(default)]
    pub service_name: Option<String>,

    /// Purge token sent in the `stellate-token` header.
    ///
    /// Set via STELLATE_PURGE_TOKEN environment variable.
    #[serde(default)]
    pub purge_token: Option<String>,

    /// Base URL of the admin API; the service name is appended as a path segment.
    ///
    /// Set via STELLATE_ADMIN_URL environment variable.
    #[serde(default = "default_admin_url")]
    pub admin_url: String,

    /// Admin API request timeout in milliseconds.
    ///
    /// Set via STELLATE_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Verbose diagnostic logging of dispatch decisions and mutations.
    ///
    /// Set via STELLATE_DEBUG environment variable.
    #[serde(default)]
    pub debug: bool,

    /// Master switch; when false no purge request is ever sent.
    ///
    /// Set via STELLATE_ENABLED environment variable.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log an info line after every successful purge.
    ///
    /// Set via STELLATE_LOG_SUCCESS environment variable.
    #[serde(default = "default_true")]
    pub log_success: bool,
}

/// Resolved service name and purge token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub service_name: String,
    pub purge_token: String,
}

fn default_admin_url() -> String {
    DEFAULT_ADMIN_URL.into()
}

fn default_timeout_ms() -> u64 {
    3_000
}

fn default_true() -> bool {
    true
}

impl Default for PurgeConfig {
    fn default() -> Self {
        Self {
            service_name: None,
            purge_token: None,
            admin_url: default_admin_url(),
            timeout_ms: default_timeout_ms(),
            debug: false,
            enabled: true,
            log_success: true,
        }
    }
}

impl PurgeConfig {
    /// Convenience constructor for a config carrying both credentials.
    pub fn with_credentials(service_name: impl Into<String>, purge_token: impl Into<String>) -> Self {
        Self { service_name: Some(service_name.into()), purge_token: Some(purge_token.into()), ..Default::default() }
    }

    /// Timeout as Duration for use with reqwest.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `STELLATE_`
    /// 2. TOML file from `STELLATE_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("STELLATE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("STELLATE_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Resolve both credentials, treating empty strings as missing.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` naming every absent field.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        let service_name = non_empty(&self.service_name);
        let purge_token = non_empty(&self.purge_token);

        match (service_name, purge_token) {
            (Some(service_name), Some(purge_token)) => {
                Ok(Credentials { service_name: service_name.to_string(), purge_token: purge_token.to_string() })
            }
            (service_name, purge_token) => {
                let mut missing = Vec::new();
                if service_name.is_none() {
                    missing.push("service_name");
                }
                if purge_token.is_none() {
                    missing.push("purge_token");
                }
                Err(ConfigError::Missing {
                    field: missing.join(", "),
                    hint: "Set STELLATE_SERVICE_NAME and STELLATE_PURGE_TOKEN environment variables".into(),
                })
            }
        }
    }

    /// Admin API endpoint for the given service.
    pub fn endpoint(&self, service_name: &str) -> String {
        format!("{}/{}", self.admin_url.trim_end_matches('/'), service_name)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PurgeConfig::default();
        assert!(config.service_name.is_none());
        assert!(config.purge_token.is_none());
        assert_eq!(config.admin_url, "https://admin.stellate.co");
        assert_eq!(config.timeout_ms, 3_000);
        assert!(!config.debug);
        assert!(config.enabled);
        assert!(config.log_success);
    }

    #[test]
    fn test_timeout_duration() {
        let config = PurgeConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_credentials_missing_both() {
        let config = PurgeConfig::default();
        let result = config.credentials();
        assert!(
            matches!(result, Err(ConfigError::Missing { field, .. }) if field == "service_name, purge_token")
        );
    }

    #[test]
    fn test_credentials_empty_token_counts_as_missing() {
        let config = PurgeConfig::with_credentials("my-service", "");
        let result = config.credentials();
        assert!(matches!(result, Err(ConfigError::Missing { field, .. }) if field == "purge_token"));
    }

    #[test]
    fn test_credentials_present() {
        let config = PurgeConfig::with_credentials("my-service", "secret");
        let creds = config.credentials().unwrap();
        assert_eq!(creds.service_name, "my-service");
        assert_eq!(creds.purge_token, "secret");
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let config = PurgeConfig { admin_url: "https://admin.stellate.io/".into(), ..Default::default() };
        assert_eq!(config.endpoint("blog"), "https://admin.stellate.io/blog");
        assert_eq!(PurgeConfig::default().endpoint("blog"), "https://admin.stellate.co/blog");
    }

    #[test]
    fn test_load_from_env() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("STELLATE_SERVICE_NAME", "my-service");
            jail.set_env("STELLATE_PURGE_TOKEN", "secret");
            jail.set_env("STELLATE_DEBUG", "true");

            let config = PurgeConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.service_name.as_deref(), Some("my-service"));
            assert_eq!(config.purge_token.as_deref(), Some("secret"));
            assert!(config.debug);
            assert_eq!(config.timeout_ms, 3_000);
            Ok(())
        });
    }

    #[test]
    fn test_load_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "stellate.toml",
                r#"
                service_name = "from-file"
                purge_token = "file-token"
                admin_url = "https://admin.stellate.io"
                log_success = false
                "#,
            )?;
            jail.set_env("STELLATE_CONFIG_FILE", "stellate.toml");
            jail.set_env("STELLATE_SERVICE_NAME", "from-env");

            let config = PurgeConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.service_name.as_deref(), Some("from-env"));
            assert_eq!(config.purge_token.as_deref(), Some("file-token"));
            assert_eq!(config.admin_url, "https://admin.stellate.io");
            assert!(!config.log_success);
            Ok(())
        });
    }

    #[test]
    fn test_load_without_credentials_succeeds() {
        figment::Jail::expect_with(|_jail| {
            let config = PurgeConfig::load().map_err(|e| e.to_string())?;
            assert!(config.credentials().is_err());
            Ok(())
        });
    }
}
