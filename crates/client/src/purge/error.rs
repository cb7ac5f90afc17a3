//! Purge client error types.

use std::sync::Arc;

/// Errors from a single purge attempt.
///
/// Every variant is terminal for that attempt only; callers log it and move on.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PurgeError {
    /// Purging switched off via configuration.
    #[error("purging is disabled by configuration")]
    Disabled,

    /// service_name and/or purge_token not configured.
    #[error("missing configuration: {0}; purging is disabled")]
    MissingCredentials(String),

    /// Declared id reference absent or falsy in the response payload.
    #[error("id reference \"{0}\" not found in response object")]
    MissingIdReference(String),

    /// Response payload could not be serialized to JSON.
    #[error("invalid response payload: {0}")]
    Payload(String),

    /// Query purge requested with no query names.
    #[error("no queries to purge")]
    EmptyQueries,

    /// Type purge requested with an empty type name.
    #[error("empty type name")]
    EmptyTypeName,

    /// Configuration rejected or HTTP client could not be constructed.
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),

    /// Non-2xx response from the admin API.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Admin API answered with an `errors` array.
    #[error("remote errors: {0}")]
    Remote(String),
}

impl From<reqwest::Error> for PurgeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { PurgeError::Timeout } else { PurgeError::Network(Arc::new(err)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PurgeError::MissingIdReference("id".to_string());
        assert_eq!(err.to_string(), "id reference \"id\" not found in response object");

        let err = PurgeError::MissingCredentials("purge_token".to_string());
        assert!(err.to_string().contains("purge_token"));

        let err = PurgeError::HttpError { status: 401 };
        assert!(err.to_string().contains("401"));
    }
}
