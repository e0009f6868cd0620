//! Inventory API response DTOs.
//!
//! The availability payload's shape wobbles across endpoint revisions:
//! `messages` may be a list or a single string, `data` may be an object or a
//! bare marker string, and `status` is sometimes omitted entirely. These
//! types decay unexpected shapes to defaults instead of failing the whole
//! parse, because a half-usable response still beats a retry.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};

/// Top-level availability response.
#[derive(Debug, Clone, Deserialize)]
pub struct LeftTicketResponse {
    /// Explicit business status; missing means success.
    #[serde(default = "default_true")]
    pub status: bool,

    /// Server messages accompanying a failed status.
    #[serde(default)]
    pub messages: serde_json::Value,

    /// Redirect hint naming the replacement query path.
    #[serde(default)]
    pub c_url: Option<String>,

    /// Result payload; tolerated absent or malformed.
    #[serde(default, deserialize_with = "lenient_data")]
    pub data: Option<QueryData>,
}

/// The `data` member of a successful response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryData {
    /// `|`-joined availability records.
    #[serde(default)]
    pub result: Vec<String>,

    /// Telecode → display name map for the stations in `result`.
    #[serde(default)]
    pub map: HashMap<String, String>,
}

fn default_true() -> bool {
    true
}

/// Accept a malformed `data` member as absent rather than failing the
/// response (older endpoints answer `"data": "noData"`).
fn lenient_data<'de, D>(deserializer: D) -> Result<Option<QueryData>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(QueryData::deserialize(value).ok())
}
