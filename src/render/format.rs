//! Value and timestamp formatting.

use chrono::format::{Item, StrftimeItems};

use crate::api::Reading;

/// Unit shown when the first reading carries none.
pub const UNKNOWN_UNIT: &str = "Unknown";

/// Format a value to a fixed number of decimal places.
pub fn format_value(value: f64, precision: usize) -> String {
    // -0.0 prints as "-0.00"
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{:.*}", precision, value)
}

/// Display unit for a dataset: the first reading's unit, or [`UNKNOWN_UNIT`].
pub fn display_unit(readings: &[Reading]) -> String {
    readings
        .first()
        .map(|r| r.unit.trim())
        .filter(|unit| !unit.is_empty())
        .unwrap_or(UNKNOWN_UNIT)
        .to_string()
}

/// Check that a strftime pattern is well formed.
///
/// chrono panics when a malformed pattern is rendered, so patterns from
/// configuration are validated up front.
pub fn validate_pattern(pattern: &str) -> bool {
    !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
}
