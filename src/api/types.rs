//! Wire types for the dashboard backend.
//!
//! These match the JSON served by `/api/stations` and `/api/readings/{id}`.
//! Field names are camelCase on the wire.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// River name used when the backend omits one.
pub const UNKNOWN_RIVER: &str = "Unknown River";

/// A monitored river-level measurement site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    /// Unique station reference, used as the readings path segment.
    pub station_reference: String,

    /// Display name of the station.
    pub label: String,

    /// River the station sits on.
    #[serde(default = "unknown_river", deserialize_with = "river_name_or_unknown")]
    pub river_name: String,

    /// Latitude, when the backend provides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,

    /// Longitude, when the backend provides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long: Option<f64>,
}

impl Station {
    /// Text shown for this station in the selector: `"<label> (<riverName>)"`.
    pub fn option_text(&self) -> String {
        format!("{} ({})", self.label, self.river_name)
    }
}

/// A timestamped water-level observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    /// Observation time, normalized to UTC.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub date_time: DateTime<Utc>,

    /// Measured level.
    pub value: f64,

    /// Unit of measure (e.g. "m", "mASD"). May be empty.
    #[serde(default, deserialize_with = "string_or_empty")]
    pub unit: String,
}

fn unknown_river() -> String {
    UNKNOWN_RIVER.to_string()
}

fn river_name_or_unknown<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(unknown_river))
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognized timestamp: {raw}")))
}

/// Naive layouts accepted in addition to RFC 3339. These are read as UTC.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse an ISO-8601 style timestamp.
///
/// Accepts RFC 3339 with any offset, or a naive date-time which is taken
/// to be UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}
