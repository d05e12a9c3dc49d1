//! Non-interactive export of one station's chart and table.
//!
//! Runs the same pipelines as the dashboard against an in-memory view, then
//! serializes what the view received. Errors shown while loading the station
//! catalog are not fatal and land in the document's `warnings`.

use std::io::Write;
use std::path::Path;

use anyhow::{bail, Result};
use serde_json::{json, Value};
use tracing::warn;

use crate::api::FloodApi;
use crate::pipeline::{
    ChartId, Dashboard, ReadingOutcome, ReadingPipeline, StationLoader, StationOption,
};
use crate::render::{ChartModel, DisplayOptions, TableModel};

/// Dashboard that keeps the last thing each call delivered.
#[derive(Debug, Default)]
struct Capture {
    stations: Vec<StationOption>,
    title: Option<String>,
    chart: Option<ChartModel>,
    table: Option<TableModel>,
    errors: Vec<String>,
    next_chart: u64,
}

impl Dashboard for Capture {
    fn show_station_loading(&mut self) {}
    fn hide_station_loading(&mut self) {}

    fn populate_stations(&mut self, options: Vec<StationOption>) {
        self.stations = options;
    }

    fn station_text(&self, station_id: &str) -> Option<String> {
        self.stations.iter().find(|o| o.value == station_id).map(|o| o.text.clone())
    }

    fn show_loading(&mut self) {}
    fn hide_loading(&mut self) {}

    fn set_chart_title(&mut self, title: String) {
        self.title = Some(title);
    }

    fn create_chart(&mut self, chart: ChartModel) -> ChartId {
        self.next_chart += 1;
        self.chart = Some(chart);
        ChartId(self.next_chart)
    }

    fn dispose_chart(&mut self, _id: ChartId) {
        self.chart = None;
    }

    fn render_table(&mut self, table: TableModel) {
        self.table = Some(table);
    }

    fn show_table(&mut self) {}
    fn hide_table(&mut self) {}

    fn show_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}

/// Fetch a station's readings and build the export document.
///
/// The station catalog is consulted for the chart title only; if it cannot
/// be loaded the station reference is used instead.
pub async fn export_station<A>(api: &A, station_id: &str, options: DisplayOptions) -> Result<Value>
where
    A: FloodApi + ?Sized,
{
    let mut view = Capture::default();

    let mut loader = StationLoader::new(options.notice);
    loader.load(api, &mut view).await;
    let warnings = std::mem::take(&mut view.errors);
    for message in &warnings {
        warn!(station = station_id, message = %message, "Exporting without station catalog");
    }

    let mut pipeline = ReadingPipeline::new(options);
    match pipeline.run(Some(station_id), api, &mut view).await {
        ReadingOutcome::Rendered { .. } => {}
        ReadingOutcome::Failed(e) => bail!("{}", e),
        ReadingOutcome::Ignored => bail!("No station given"),
        ReadingOutcome::Discarded => bail!("Readings request was superseded"),
    }

    let chart = view.chart.take();
    pipeline.teardown(&mut view);

    let (Some(title), Some(chart), Some(table)) = (view.title, chart, view.table) else {
        bail!("Nothing was rendered for station {}", station_id);
    };

    Ok(document(station_id, &title, &chart, &table, &warnings))
}

fn document(
    station_id: &str,
    title: &str,
    chart: &ChartModel,
    table: &TableModel,
    warnings: &[String],
) -> Value {
    let points: Vec<Value> = chart
        .points
        .iter()
        .map(|p| json!({ "at": p.at.to_rfc3339(), "value": p.value }))
        .collect();

    json!({
        "station": station_id,
        "title": title,
        "unit": chart.unit,
        "table": {
            "header": table.header,
            "rows": table.rows,
        },
        "chart": {
            "points": points,
            "x_labels": chart.x_axis.labels,
            "y_bounds": chart.y_bounds,
        },
        "warnings": warnings,
    })
}

/// Write an export document as pretty JSON.
pub fn write_export(path: &Path, document: &Value) -> Result<()> {
    let json = serde_json::to_string_pretty(document)?;
    let mut file = std::fs::File::create(path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}
