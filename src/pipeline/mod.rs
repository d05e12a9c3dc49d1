//! Data-loading pipelines that drive a dashboard surface.
//!
//! The pipelines never touch a terminal directly. They talk to a
//! [`Dashboard`], which the TUI implements and tests can record:
//!
//! ```text
//!              ┌──────────────┐   fetch_stations()    ┌───────────┐
//!   startup ──▶│StationLoader │──────────────────────▶│           │
//!              └──────┬───────┘                       │ FloodApi  │
//!                     │ populate_stations()           │           │
//!                     ▼                               │           │
//!              ┌──────────────┐   fetch_readings(id)  │           │
//!   select ───▶│ReadingPipeline│─────────────────────▶│           │
//!              └──────┬───────┘                       └───────────┘
//!                     │ create_chart() / render_table()
//!                     ▼
//!              ┌──────────────┐
//!              │  Dashboard   │  (TUI state, or a recording fake)
//!              └──────────────┘
//! ```
//!
//! Both pipelines split each invocation into `begin` (synchronous UI
//! effects, returns a ticket) and `complete` (applies a fetch result).
//! Tickets carry sequence numbers; results for anything but the latest
//! ticket are discarded.

pub mod collate;
mod readings;
mod stations;

pub use readings::{ReadingOutcome, ReadingPipeline, Ticket};
pub use stations::{station_options, LoadTicket, StationLoader, StationOutcome};

use crate::render::{ChartModel, TableModel};

/// Handle to a live chart instance on a dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChartId(pub u64);

/// One entry in the station selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationOption {
    /// Station reference, passed to the readings fetch.
    pub value: String,
    /// `"<label> (<riverName>)"`.
    pub text: String,
}

/// UI-state surface the pipelines render onto.
pub trait Dashboard {
    /// Show the indicator for the station catalog request.
    fn show_station_loading(&mut self);
    /// Hide the indicator for the station catalog request.
    fn hide_station_loading(&mut self);
    /// Replace the selector's options. An empty list clears it.
    fn populate_stations(&mut self, options: Vec<StationOption>);
    /// Display text of the selector option with this value, if present.
    fn station_text(&self, station_id: &str) -> Option<String>;

    /// Show the indicator for a readings request.
    fn show_loading(&mut self);
    /// Hide the indicator for a readings request.
    fn hide_loading(&mut self);

    fn set_chart_title(&mut self, title: String);
    /// Construct a chart instance and return its handle.
    fn create_chart(&mut self, chart: ChartModel) -> ChartId;
    /// Release a chart instance created by [`Dashboard::create_chart`].
    fn dispose_chart(&mut self, id: ChartId);

    fn render_table(&mut self, table: TableModel);
    fn show_table(&mut self);
    fn hide_table(&mut self);

    /// Report an error to the user.
    fn show_error(&mut self, message: &str);
}

/// Owner of the single live chart instance.
///
/// Creation always disposes the previous instance first, so at most one
/// chart exists on the dashboard at a time.
#[derive(Debug, Default)]
pub struct ChartSlot {
    current: Option<ChartId>,
}

impl ChartSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// The live chart, if any.
    pub fn current(&self) -> Option<ChartId> {
        self.current
    }

    /// Dispose of the live chart. Does nothing when there is none.
    pub fn release<D: Dashboard + ?Sized>(&mut self, view: &mut D) {
        if let Some(id) = self.current.take() {
            view.dispose_chart(id);
        }
    }

    /// Dispose of the live chart, then create a new one from `chart`.
    pub fn replace<D: Dashboard + ?Sized>(&mut self, view: &mut D, chart: ChartModel) -> ChartId {
        self.release(view);
        let id = view.create_chart(chart);
        self.current = Some(id);
        id
    }
}
