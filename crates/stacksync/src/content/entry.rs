//! Content entry snapshot type.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry of a content type, as returned by the Delivery API.
///
/// The payload is schema-agnostic: a mapping of field name to JSON value
/// (strings, nested groups, asset references). System fields such as `uid`,
/// `updated_at`, `_version` and `publish_details` get typed accessors.
///
/// Entries are immutable snapshots. The core only derives views from them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentEntry(Map<String, Value>);

impl ContentEntry {
    /// Wrap a JSON object as an entry.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Build an entry from any JSON value; non-objects yield `None`.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    /// Get a raw field value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Get a string field, if present and a string.
    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// Get a string field, treating empty strings as absent.
    pub fn non_empty(&self, field: &str) -> Option<&str> {
        self.str_field(field).filter(|s| !s.is_empty())
    }

    /// Get a field as a scalar string: strings verbatim, numbers and
    /// booleans in their JSON form. Objects, arrays and null yield `None`.
    pub fn scalar(&self, field: &str) -> Option<String> {
        match self.0.get(field)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// The entry UID.
    pub fn uid(&self) -> Option<&str> {
        self.non_empty("uid")
    }

    /// The `updated_at` system timestamp, verbatim.
    pub fn updated_at(&self) -> Option<&str> {
        self.non_empty("updated_at")
    }

    /// The `_version` token, rendered as a string.
    pub fn version(&self) -> Option<String> {
        self.scalar("_version")
    }

    /// The `publish_details.time` timestamp, verbatim.
    pub fn publish_time(&self) -> Option<&str> {
        self.0
            .get("publish_details")
            .and_then(|details| details.get("time"))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// The integer `order` field. Missing or non-numeric values count as 0.
    pub fn order(&self) -> i64 {
        match self.0.get("order") {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .unwrap_or(0),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }

    /// Parse a date field. Accepts RFC 3339 timestamps, naive
    /// `YYYY-MM-DDTHH:MM:SS` timestamps (taken as UTC) and plain dates.
    pub fn date_field(&self, field: &str) -> Option<DateTime<Utc>> {
        parse_date(self.non_empty(field)?)
    }

    /// Returns the underlying field map.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume and return the underlying field map.
    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for ContentEntry {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
