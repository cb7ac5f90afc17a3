//! Stellate purge API client.
//!
//! Translates purge intents into GraphQL mutations and POSTs them to the
//! Stellate admin API.
//!
//! ### Protocol
//!
//! - **Endpoint**: `https://admin.stellate.co/<service_name>` (base URL configurable)
//! - **Authentication**: Uses `stellate-token` header.
//! - **Body**: `{"query": "<mutation>"}` as JSON.
//! - **Failure**: transport errors, non-2xx statuses and a top-level `errors`
//!   field all fail the attempt. There are no retries.
//! - **Gate**: without `service_name` and `purge_token` the client is disabled
//!   and never touches the network.

pub mod error;
pub mod mutation;
pub mod response;

pub use error::PurgeError;
pub use mutation::{purge_mutation_name, purge_queries_mutation, purge_type_mutation};
pub use response::{PurgeApiResponse, PurgeRequest};

use async_trait::async_trait;
use serde_json::Value;
use stellate_core::config::TOKEN_HEADER;
use stellate_core::{PurgeConfig, resolve_id};

/// Result of one purge attempt. Errors are values for the caller to log.
pub type PurgeOutcome = Result<(), PurgeError>;

/// Purge operations the response interceptor dispatches to.
#[async_trait]
pub trait Purger: Send + Sync {
    /// False when credentials are missing or purging is switched off.
    fn is_enabled(&self) -> bool;

    /// Purge the named cached queries in a single request.
    async fn purge_queries(&self, queries: &[String]) -> PurgeOutcome;

    /// Purge an entity type, scoped to `payload[id_reference]` when a reference is given.
    async fn purge_type(&self, type_name: &str, id_reference: Option<&str>, payload: &Value) -> PurgeOutcome;
}

/// Where and how to authenticate purge requests.
#[derive(Debug, Clone)]
struct Target {
    endpoint: String,
    purge_token: String,
}

/// Stellate purge API client.
#[derive(Debug, Clone)]
pub struct PurgeClient {
    http: reqwest::Client,
    config: PurgeConfig,
    target: Result<Target, PurgeError>,
}

impl PurgeClient {
    /// Create a new purge client with the given configuration.
    ///
    /// Invalid settings (admin URL, timeout, service name) fail construction.
    /// Missing credentials do not: the client comes up disabled and logs the
    /// missing fields once.
    pub fn new(config: &PurgeConfig) -> Result<Self, PurgeError> {
        config.validate().map_err(|e| PurgeError::InvalidConfig(e.to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| PurgeError::InvalidConfig(e.to_string()))?;

        let target = if !config.enabled {
            tracing::info!("Stellate purging disabled by configuration");
            Err(PurgeError::Disabled)
        } else {
            match config.credentials() {
                Ok(creds) => {
                    Ok(Target { endpoint: config.endpoint(&creds.service_name), purge_token: creds.purge_token })
                }
                Err(err) => {
                    tracing::error!("Stellate purge is disabled: {}", err);
                    Err(PurgeError::MissingCredentials(missing_fields(&err)))
                }
            }
        };

        Ok(Self { http, config: config.clone(), target })
    }

    /// Create a new purge client from environment and config file.
    pub fn from_env() -> Result<Self, PurgeError> {
        let config = PurgeConfig::load().map_err(|e| PurgeError::InvalidConfig(e.to_string()))?;
        Self::new(&config)
    }

    pub fn is_enabled(&self) -> bool {
        self.target.is_ok()
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &PurgeConfig {
        &self.config
    }

    /// Purge a list of cached queries.
    pub async fn purge_queries<S: AsRef<str> + Sync>(&self, queries: &[S]) -> PurgeOutcome {
        if queries.is_empty() {
            return Err(PurgeError::EmptyQueries);
        }

        let names: Vec<&str> = queries.iter().map(AsRef::as_ref).collect();
        let mutation = purge_queries_mutation(names.as_slice());

        if self.config.debug {
            tracing::debug!("generated purge query mutation: {}", mutation);
        }

        self.send_purge_request(&mutation).await?;

        if self.config.log_success {
            tracing::info!("cache was successfully cleared for the queries: {}", names.join(","));
        }

        Ok(())
    }

    /// Purge a type, optionally scoped to the id found under `id_reference` in `payload`.
    ///
    /// A declared reference that resolves to nothing aborts before any request
    /// so that a misconfigured handler never purges the whole type.
    pub async fn purge_type(&self, type_name: &str, id_reference: Option<&str>, payload: &Value) -> PurgeOutcome {
        if self.config.debug {
            tracing::debug!(type_name, ?id_reference, "type from metadata");
        }

        let id = match id_reference {
            Some(reference) => match resolve_id(payload, reference) {
                Some(id) => Some(id),
                None => {
                    let err = PurgeError::MissingIdReference(reference.to_string());
                    tracing::error!("Stellate purge error: {}", err);
                    return Err(err);
                }
            },
            None => None,
        };

        self.purge_type_id(type_name, id.as_deref()).await
    }

    /// Purge a type by explicit id, or every instance when `id` is `None`.
    pub async fn purge_type_id(&self, type_name: &str, id: Option<&str>) -> PurgeOutcome {
        if type_name.is_empty() {
            tracing::error!("Stellate purge error: {}", PurgeError::EmptyTypeName);
            return Err(PurgeError::EmptyTypeName);
        }

        let mutation = purge_type_mutation(type_name, id);

        if self.config.debug {
            tracing::debug!("generated purge type mutation: {}", mutation);
        }

        self.send_purge_request(&mutation).await?;

        if self.config.log_success {
            match id {
                Some(id) => tracing::info!("cache was successfully cleared for the type: {} | ID: {}", type_name, id),
                None => tracing::info!("cache was successfully cleared for the type: {}", type_name),
            }
        }

        Ok(())
    }

    /// Send one mutation to the admin API. Every failure is logged here.
    async fn send_purge_request(&self, mutation: &str) -> PurgeOutcome {
        let target = match &self.target {
            Ok(target) => target,
            Err(err) => {
                tracing::error!("Stellate purge skipped: {}", err);
                return Err(err.clone());
            }
        };

        let result = self.execute(target, mutation).await;
        if let Err(err) = &result {
            tracing::error!("Stellate purge API error: {}", err);
        }
        result
    }

    async fn execute(&self, target: &Target, mutation: &str) -> PurgeOutcome {
        if self.config.debug {
            tracing::debug!("sending request to Stellate: {}", target.endpoint);
            tracing::debug!("request payload: {}", mutation);
        }

        let http_response = self
            .http
            .post(&target.endpoint)
            .header(TOKEN_HEADER, &target.purge_token)
            .json(&PurgeRequest { query: mutation })
            .send()
            .await?;

        let status = http_response.status();
        if !status.is_success() {
            return Err(PurgeError::HttpError { status: status.as_u16() });
        }

        let bytes = http_response.bytes().await?;
        let api_response: PurgeApiResponse = match serde_json::from_slice(&bytes) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!("non-JSON response from Stellate ({}), treating as success", e);
                return Ok(());
            }
        };

        let data = api_response.into_result()?.unwrap_or(Value::Null);

        if self.config.debug {
            tracing::debug!("response from Stellate: {}", data);
        }

        Ok(())
    }
}

#[async_trait]
impl Purger for PurgeClient {
    fn is_enabled(&self) -> bool {
        PurgeClient::is_enabled(self)
    }

    async fn purge_queries(&self, queries: &[String]) -> PurgeOutcome {
        PurgeClient::purge_queries(self, queries).await
    }

    async fn purge_type(&self, type_name: &str, id_reference: Option<&str>, payload: &Value) -> PurgeOutcome {
        PurgeClient::purge_type(self, type_name, id_reference, payload).await
    }
}

fn missing_fields(err: &stellate_core::ConfigError) -> String {
    match err {
        stellate_core::ConfigError::Missing { field, .. } => field.clone(),
        other => other.to_string(),
    }
}
