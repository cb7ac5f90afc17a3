//! Admin API request and response bodies.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::purge::PurgeError;

/// JSON body POSTed to the admin API.
#[derive(Debug, Serialize)]
pub struct PurgeRequest<'a> {
    pub query: &'a str,
}

/// Raw response from the admin API.
#[derive(Debug, Default, Deserialize)]
pub struct PurgeApiResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Option<Value>,
}

impl PurgeApiResponse {
    /// Any non-null top-level `errors` field fails the purge, even an empty array.
    pub fn into_result(self) -> Result<Option<Value>, PurgeError> {
        match self.errors {
            Some(errors) => Err(PurgeError::Remote(errors.to_string())),
            None => Ok(self.data),
        }
    }
}
