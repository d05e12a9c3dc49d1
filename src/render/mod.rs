//! Display models built from a readings dataset.
//!
//! Both renderers consume the same `&[Reading]` and produce plain data that
//! any surface can draw:
//!
//! ```text
//! Vec<Reading>
//!      │
//!      ├──▶ ChartModel::build()  (points, hourly time axis, tooltips)
//!      │
//!      └──▶ TableModel::build()  (formatted header and rows)
//! ```
//!
//! - [`options`]: presentation knobs ([`DisplayOptions`], [`TableLayout`], [`NoticeStyle`])
//! - [`format`]: fixed-decimal values, display unit, pattern validation

pub mod chart;
pub mod format;
pub mod options;
pub mod table;

pub use chart::{ChartModel, ChartPoint, TimeAxis, Tooltip};
pub use format::{display_unit, format_value, UNKNOWN_UNIT};
pub use options::{DisplayOptions, DisplayZone, NoticeStyle, TableLayout};
pub use table::TableModel;
