//! Per-selection readings pipeline: fetch, then drive the chart and table.

use tracing::{debug, info, warn};

use super::{ChartId, ChartSlot, Dashboard};
use crate::api::{FetchError, FloodApi, Reading};
use crate::render::{display_unit, ChartModel, DisplayOptions, NoticeStyle, TableModel};

/// Token for one readings request.
///
/// Only the most recently issued ticket may render; see
/// [`ReadingPipeline::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    seq: u64,
    station_id: String,
}

impl Ticket {
    /// Station this request is for.
    pub fn station_id(&self) -> &str {
        &self.station_id
    }

    /// Sequence number; strictly increasing per pipeline.
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Result of a pipeline step.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadingOutcome {
    /// Chart and table were rendered.
    Rendered { rows: usize, chart: ChartId },
    /// The fetch failed or returned nothing; an error was shown.
    Failed(FetchError),
    /// A newer selection superseded this request; nothing changed.
    Discarded,
    /// The selection carried no station id.
    Ignored,
}

/// Drives the chart and table from one station's readings.
///
/// Owns the dashboard's single chart instance through a [`ChartSlot`].
#[derive(Debug)]
pub struct ReadingPipeline {
    options: DisplayOptions,
    latest: u64,
    chart: ChartSlot,
}

impl ReadingPipeline {
    pub fn new(options: DisplayOptions) -> Self {
        Self {
            options,
            latest: 0,
            chart: ChartSlot::new(),
        }
    }

    pub fn options(&self) -> &DisplayOptions {
        &self.options
    }

    /// The chart instance this pipeline currently owns.
    pub fn current_chart(&self) -> Option<ChartId> {
        self.chart.current()
    }

    /// Handle a selection change.
    ///
    /// Returns `None` (and touches nothing) for a missing or empty station
    /// id. Otherwise shows the loading indicator, hides the table, and
    /// returns the ticket the fetch result must be completed with.
    pub fn begin<D: Dashboard + ?Sized>(
        &mut self,
        station_id: Option<&str>,
        view: &mut D,
    ) -> Option<Ticket> {
        let station_id = station_id.map(str::trim).filter(|id| !id.is_empty())?;

        self.latest += 1;
        debug!(seq = self.latest, station = station_id, "Loading readings");

        view.show_loading();
        view.hide_table();

        Some(Ticket {
            seq: self.latest,
            station_id: station_id.to_string(),
        })
    }

    /// Whether `ticket` is still the latest request.
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        ticket.seq == self.latest
    }

    /// Apply a fetch result.
    ///
    /// Stale tickets are discarded without touching the view. For the latest
    /// ticket the loading indicator is hidden on both success and failure.
    pub fn complete<D: Dashboard + ?Sized>(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<Reading>, FetchError>,
        view: &mut D,
    ) -> ReadingOutcome {
        if !self.is_current(&ticket) {
            debug!(
                seq = ticket.seq,
                latest = self.latest,
                station = %ticket.station_id,
                "Discarding stale readings"
            );
            return ReadingOutcome::Discarded;
        }

        let outcome = self.render(&ticket, result, view);
        view.hide_loading();
        outcome
    }

    /// Run a selection change end to end against `api`.
    pub async fn run<A, D>(&mut self, station_id: Option<&str>, api: &A, view: &mut D) -> ReadingOutcome
    where
        A: FloodApi + ?Sized,
        D: Dashboard + ?Sized,
    {
        let Some(ticket) = self.begin(station_id, view) else {
            return ReadingOutcome::Ignored;
        };
        let result = api.fetch_readings(ticket.station_id()).await;
        self.complete(ticket, result, view)
    }

    /// Dispose of the live chart, if any.
    pub fn teardown<D: Dashboard + ?Sized>(&mut self, view: &mut D) {
        self.chart.release(view);
    }

    fn render<D: Dashboard + ?Sized>(
        &mut self,
        ticket: &Ticket,
        result: Result<Vec<Reading>, FetchError>,
        view: &mut D,
    ) -> ReadingOutcome {
        let station_text =
            view.station_text(&ticket.station_id).unwrap_or_else(|| ticket.station_id.clone());
        view.set_chart_title(format!("Water Level Readings - {}", station_text));

        let readings = match result.and_then(non_empty) {
            Ok(readings) => readings,
            Err(e) => {
                warn!(station = %ticket.station_id, error = %e, "Error loading station data");
                // A failed attempt leaves no chart behind
                self.chart.release(view);
                view.show_error(&self.error_message(&e));
                return ReadingOutcome::Failed(e);
            }
        };

        let unit = display_unit(&readings);

        let chart = self.chart.replace(view, ChartModel::build(&readings, &unit, &self.options));

        let table = TableModel::build(&readings, &unit, &self.options);
        let rows = table.len();
        view.render_table(table);
        view.show_table();

        info!(station = %ticket.station_id, rows, unit = %unit, "Rendered readings");
        ReadingOutcome::Rendered { rows, chart }
    }

    fn error_message(&self, err: &FetchError) -> String {
        match self.options.notice {
            NoticeStyle::Toast { .. } => err.to_string(),
            NoticeStyle::Blocking => format!("Error: {}", err),
        }
    }
}

fn non_empty(readings: Vec<Reading>) -> Result<Vec<Reading>, FetchError> {
    if readings.is_empty() {
        Err(FetchError::EmptyData)
    } else {
        Ok(readings)
    }
}
