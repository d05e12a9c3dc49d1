//! Line chart model for a readings dataset.
//!
//! The model is plain data: points, axis bounds, axis labels and tooltip
//! text. The terminal UI draws it with ratatui's `Chart` widget, and the
//! exporter serializes it.

use chrono::{DateTime, Utc};

use super::format::format_value;
use super::options::{DisplayOptions, DisplayZone};
use crate::api::Reading;

const HOUR: i64 = 3_600;

/// Axis label pattern for hourly ticks.
pub const HOUR_LABEL_FORMAT: &str = "%H:%M";

/// A single plotted reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    pub at: DateTime<Utc>,
    pub value: f64,
}

/// Time axis with hour-aligned bounds and evenly spaced tick labels.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeAxis {
    /// Lower and upper bound, in Unix seconds.
    pub bounds: [f64; 2],
    /// Hours between consecutive labels (1 unless labels were skipped).
    pub step_hours: i64,
    /// One label per tick, `HH:mm` in the display zone.
    pub labels: Vec<String>,
}

/// Text shown when hovering a point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tooltip {
    /// Localized timestamp.
    pub title: String,
    /// `"Level: <value> <unit>"`.
    pub label: String,
}

/// Everything needed to draw a readings line chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartModel {
    /// `"Water Level (<unit>)"`; also the y-axis title.
    pub dataset_label: String,
    pub unit: String,
    pub points: Vec<ChartPoint>,
    pub x_axis: TimeAxis,
    /// Value range with padding; does not start at zero.
    pub y_bounds: [f64; 2],
    precision: usize,
    zone: DisplayZone,
    timestamp_format: String,
}

impl ChartModel {
    /// X-axis title.
    pub const X_TITLE: &'static str = "Time";

    /// Build a chart model from a non-empty readings list.
    pub fn build(readings: &[Reading], unit: &str, options: &DisplayOptions) -> Self {
        let points: Vec<ChartPoint> = readings
            .iter()
            .map(|r| ChartPoint {
                at: r.date_time,
                value: r.value,
            })
            .collect();

        let first = points.iter().map(|p| p.at).min().unwrap_or_else(Utc::now);
        let last = points.iter().map(|p| p.at).max().unwrap_or(first);

        Self {
            dataset_label: format!("Water Level ({})", unit),
            unit: unit.to_string(),
            x_axis: hourly_axis(first, last, options.zone, options.max_x_labels),
            y_bounds: value_bounds(&points),
            points,
            precision: options.precision,
            zone: options.zone,
            timestamp_format: options.timestamp_format.clone(),
        }
    }

    /// Points as `(unix seconds, value)` pairs for plotting.
    pub fn data(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.at.timestamp() as f64, p.value)).collect()
    }

    /// Labels for the y-axis: bottom, middle and top of the value range.
    pub fn y_labels(&self) -> Vec<String> {
        let [lo, hi] = self.y_bounds;
        [lo, (lo + hi) / 2.0, hi]
            .iter()
            .map(|v| format_value(*v, self.precision.min(2)))
            .collect()
    }

    /// Tooltip for the point at `index`.
    pub fn tooltip(&self, index: usize) -> Option<Tooltip> {
        let point = self.points.get(index)?;
        Some(Tooltip {
            title: self.zone.format(point.at, &self.timestamp_format),
            label: format!("Level: {} {}", format_value(point.value, self.precision), self.unit),
        })
    }
}

/// Build an hour-aligned time axis.
///
/// Bounds are widened to whole hours in the display zone. When there are
/// more hourly ticks than `max_labels`, ticks are skipped at a fixed stride
/// and the upper bound is extended so labels stay evenly spaced.
pub fn hourly_axis(
    first: DateTime<Utc>,
    last: DateTime<Utc>,
    zone: DisplayZone,
    max_labels: usize,
) -> TimeAxis {
    let offset = zone.offset_seconds(first);

    let lo = (first.timestamp() + offset).div_euclid(HOUR) * HOUR - offset;
    let mut hi = -(-(last.timestamp() + offset)).div_euclid(HOUR) * HOUR - offset;
    if hi <= lo {
        hi = lo + HOUR;
    }

    let span_hours = (hi - lo) / HOUR;
    let max_labels = max_labels.clamp(2, DisplayOptions::MAX_X_LABELS) as i64;
    let step_hours = ((span_hours + max_labels - 2) / (max_labels - 1)).max(1);
    let intervals = (span_hours + step_hours - 1) / step_hours;
    let hi = lo + intervals * step_hours * HOUR;

    let labels = (0..=intervals)
        .map(|i| {
            DateTime::from_timestamp(lo + i * step_hours * HOUR, 0)
                .map(|tick| zone.format(tick, HOUR_LABEL_FORMAT))
                .unwrap_or_default()
        })
        .collect();

    TimeAxis {
        bounds: [lo as f64, hi as f64],
        step_hours,
        labels,
    }
}

/// Value range padded by 5% on each side; flat series get a fixed margin.
fn value_bounds(points: &[ChartPoint]) -> [f64; 2] {
    let min = points.iter().map(|p| p.value).fold(f64::INFINITY, f64::min);
    let max = points.iter().map(|p| p.value).fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }

    let range = max - min;
    let pad = if range > 0.0 {
        range * 0.05
    } else {
        (min.abs() * 0.05).max(0.1)
    };
    [min - pad, max + pad]
}
