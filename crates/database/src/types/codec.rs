//! Column encodings shared by the repositories.
//!
//! Identifiers are stored as hyphenated UUID text and timestamps as RFC 3339
//! UTC text with fixed microsecond precision, so that ordering the raw column
//! text orders rows chronologically.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use uuid::Uuid;

use super::{StoreError, StoreResult};

/// Current time at the precision timestamps are stored with.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn parse_timestamp(value: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|e| StoreError::decode(format!("timestamp {value:?}: {e}")))
}

pub fn parse_uuid(value: &str) -> StoreResult<Uuid> {
    Uuid::parse_str(value).map_err(|e| StoreError::decode(format!("uuid {value:?}: {e}")))
}

pub fn encode_tags(tags: &[String]) -> StoreResult<String> {
    Ok(serde_json::to_string(tags)?)
}

pub fn decode_tags(value: &str) -> StoreResult<Vec<String>> {
    Ok(serde_json::from_str(value)?)
}
