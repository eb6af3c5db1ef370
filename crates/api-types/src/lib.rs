//! Shared API type definitions
//!
//! This crate contains the wire types of the upstream conferencing API that
//! the probe polls: the response envelope and the per-session records carried
//! in its `data` array.

use serde::Deserialize;
use serde::Serialize;

/// Response envelope returned by the sessions endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionsEnvelope {
    /// Upstream status code echoed in the body
    #[serde(default)]
    pub status_code: Option<i64>,
    /// Free-form message, any JSON value
    #[serde(default)]
    pub message: serde_json::Value,
    /// Session records (absent or null decodes as empty)
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Vec<SessionRecord>,
}

/// One meeting session as reported upstream
///
/// Only `total` and `total_active` feed the metrics. The remaining fields are
/// decoded when present so that logs can identify a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub channel_id: Option<i64>,
    #[serde(default)]
    pub sfu_sid: Option<String>,
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub meeting_type: Option<String>,
    /// Participant capacity of the session
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: i64,
    /// Participants currently active
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_active: i64,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    null_as_default(deserializer)
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
