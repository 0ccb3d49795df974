//! Delivery API request and response types.

use serde::{Deserialize, Serialize};

use crate::content::ContentEntry;

/// Query parameter carrying the stack API key.
pub const API_KEY_PARAM: &str = "api_key";

/// Query parameter carrying the delivery token.
pub const ACCESS_TOKEN_PARAM: &str = "access_token";

/// Query parameter selecting the publishing environment.
pub const ENVIRONMENT_PARAM: &str = "environment";

/// Response from `GET /content_types/{uid}/entries`.
///
/// `entries` is optional so that a well-formed response without the field
/// is reported as "no content" rather than a decoding failure.
#[derive(Debug, Deserialize, Serialize)]
pub struct EntriesResponse {
    #[serde(default)]
    pub entries: Option<Vec<ContentEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

/// Response from `GET /content_types/{uid}/entries/{entry_uid}`.
#[derive(Debug, Deserialize, Serialize)]
pub struct EntryResponse {
    #[serde(default)]
    pub entry: Option<ContentEntry>,
}

/// Delivery API error body.
#[derive(Debug, Deserialize)]
pub struct DeliveryErrorResponse {
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub error_code: Option<i64>,
}
