//! Display knobs shared by the chart and table renderers.

use std::time::Duration;

use chrono::{DateTime, Local, Offset, TimeZone, Utc};
use serde::Deserialize;

/// Timezone used for displayed timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DisplayZone {
    /// The machine's local timezone.
    #[default]
    Local,
    /// Coordinated Universal Time.
    Utc,
}

impl DisplayZone {
    /// Seconds east of UTC at the given instant.
    pub fn offset_seconds(self, at: DateTime<Utc>) -> i64 {
        match self {
            DisplayZone::Utc => 0,
            DisplayZone::Local => {
                i64::from(Local.offset_from_utc_datetime(&at.naive_utc()).fix().local_minus_utc())
            }
        }
    }

    /// Format an instant in this zone with a strftime pattern.
    pub fn format(self, at: DateTime<Utc>, pattern: &str) -> String {
        match self {
            DisplayZone::Utc => at.format(pattern).to_string(),
            DisplayZone::Local => at.with_timezone(&Local).format(pattern).to_string(),
        }
    }
}

/// Column layout for the readings table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TableLayout {
    /// Two columns; the unit appears once, in the value header.
    #[default]
    HeaderUnit,
    /// Three columns; the unit is repeated on every row.
    UnitColumn,
}

/// How errors are surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeStyle {
    /// Transient notice that disappears after `duration`.
    Toast { duration: Duration },
    /// Modal notice that stays until dismissed.
    Blocking,
}

impl NoticeStyle {
    /// Default toast lifetime.
    pub const TOAST_DURATION: Duration = Duration::from_secs(5);
}

impl Default for NoticeStyle {
    fn default() -> Self {
        NoticeStyle::Toast {
            duration: Self::TOAST_DURATION,
        }
    }
}

/// Everything the renderers and pipelines need to know about presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayOptions {
    /// Decimal places for values in the table and tooltip.
    pub precision: usize,
    pub table_layout: TableLayout,
    pub notice: NoticeStyle,
    pub zone: DisplayZone,
    /// strftime pattern for full timestamps (table cells, tooltip titles).
    pub timestamp_format: String,
    /// Upper bound on x-axis labels; hourly ticks are skipped to fit.
    /// Clamped to `2..=MAX_X_LABELS`.
    pub max_x_labels: usize,
}

impl DisplayOptions {
    pub const DEFAULT_TIMESTAMP_FORMAT: &'static str = "%d/%m/%Y, %H:%M:%S";
    pub const DEFAULT_MAX_X_LABELS: usize = 8;
    pub const MAX_X_LABELS: usize = 48;
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            precision: 4,
            table_layout: TableLayout::HeaderUnit,
            notice: NoticeStyle::default(),
            zone: DisplayZone::Local,
            timestamp_format: Self::DEFAULT_TIMESTAMP_FORMAT.to_string(),
            max_x_labels: Self::DEFAULT_MAX_X_LABELS,
        }
    }
}
