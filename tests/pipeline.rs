//! End-to-end pipeline behavior against a scripted backend and a recording
//! dashboard.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use floodwatch::api::Resource;
use floodwatch::pipeline::{ChartId, Dashboard, StationOption};
use floodwatch::{
    ChartModel, DisplayOptions, DisplayZone, FetchError, FloodApi, NoticeStyle, Reading,
    ReadingOutcome, ReadingPipeline, Station, StationLoader, StationOutcome, TableLayout,
    TableModel,
};

/// Backend answering from canned responses.
#[derive(Debug, Default)]
struct ScriptedApi {
    stations: Option<Result<Vec<Station>, FetchError>>,
    readings: HashMap<String, Result<Vec<Reading>, FetchError>>,
}

impl ScriptedApi {
    fn with_stations(mut self, stations: Result<Vec<Station>, FetchError>) -> Self {
        self.stations = Some(stations);
        self
    }

    fn with_readings(mut self, id: &str, readings: Result<Vec<Reading>, FetchError>) -> Self {
        self.readings.insert(id.to_string(), readings);
        self
    }
}

#[async_trait]
impl FloodApi for ScriptedApi {
    async fn fetch_stations(&self) -> Result<Vec<Station>, FetchError> {
        self.stations.clone().unwrap_or(Ok(Vec::new()))
    }

    async fn fetch_readings(&self, station_id: &str) -> Result<Vec<Reading>, FetchError> {
        self.readings.get(station_id).cloned().unwrap_or(Err(FetchError::HttpStatus {
            resource: Resource::Readings,
            status: 404,
        }))
    }

    fn description(&self) -> &str {
        "scripted"
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Call {
    ShowStationLoading,
    HideStationLoading,
    Populate(usize),
    ShowLoading,
    HideLoading,
    Title(String),
    Create(ChartId),
    Dispose(ChartId),
    RenderTable(usize),
    ShowTable,
    HideTable,
    Error(String),
}

/// Dashboard that records every call in order.
#[derive(Debug, Default)]
struct Recorder {
    calls: Vec<Call>,
    stations: Vec<StationOption>,
    charts: Vec<ChartModel>,
    live_chart: Option<ChartId>,
    table: Option<TableModel>,
    table_visible: bool,
    loading: bool,
    station_loading: bool,
    next_chart: u64,
}

impl Recorder {
    fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    fn errors(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Error(m) => Some(m.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Dashboard for Recorder {
    fn show_station_loading(&mut self) {
        self.station_loading = true;
        self.calls.push(Call::ShowStationLoading);
    }

    fn hide_station_loading(&mut self) {
        self.station_loading = false;
        self.calls.push(Call::HideStationLoading);
    }

    fn populate_stations(&mut self, options: Vec<StationOption>) {
        self.calls.push(Call::Populate(options.len()));
        self.stations = options;
    }

    fn station_text(&self, station_id: &str) -> Option<String> {
        self.stations.iter().find(|o| o.value == station_id).map(|o| o.text.clone())
    }

    fn show_loading(&mut self) {
        self.loading = true;
        self.calls.push(Call::ShowLoading);
    }

    fn hide_loading(&mut self) {
        self.loading = false;
        self.calls.push(Call::HideLoading);
    }

    fn set_chart_title(&mut self, title: String) {
        self.calls.push(Call::Title(title));
    }

    fn create_chart(&mut self, chart: ChartModel) -> ChartId {
        assert!(self.live_chart.is_none(), "chart created while another is live");
        self.next_chart += 1;
        let id = ChartId(self.next_chart);
        self.charts.push(chart);
        self.live_chart = Some(id);
        self.calls.push(Call::Create(id));
        id
    }

    fn dispose_chart(&mut self, id: ChartId) {
        assert_eq!(self.live_chart, Some(id), "disposed a chart that is not live");
        self.live_chart = None;
        self.calls.push(Call::Dispose(id));
    }

    fn render_table(&mut self, table: TableModel) {
        self.calls.push(Call::RenderTable(table.len()));
        self.table = Some(table);
    }

    fn show_table(&mut self) {
        self.table_visible = true;
        self.calls.push(Call::ShowTable);
    }

    fn hide_table(&mut self) {
        self.table_visible = false;
        self.calls.push(Call::HideTable);
    }

    fn show_error(&mut self, message: &str) {
        self.calls.push(Call::Error(message.to_string()));
    }
}

fn station(reference: &str, label: &str, river: &str) -> Station {
    Station {
        station_reference: reference.to_string(),
        label: label.to_string(),
        river_name: river.to_string(),
        lat: None,
        long: None,
    }
}

fn reading(minute: u32, value: f64, unit: &str) -> Reading {
    Reading {
        date_time: Utc.with_ymd_and_hms(2024, 1, 1, 0, minute, 0).unwrap(),
        value,
        unit: unit.to_string(),
    }
}

fn standard() -> DisplayOptions {
    DisplayOptions {
        zone: DisplayZone::Utc,
        ..DisplayOptions::default()
    }
}

fn classic() -> DisplayOptions {
    DisplayOptions {
        precision: 2,
        table_layout: TableLayout::UnitColumn,
        notice: NoticeStyle::Blocking,
        zone: DisplayZone::Utc,
        ..DisplayOptions::default()
    }
}

#[tokio::test]
async fn test_stations_sorted_with_references() {
    let api = ScriptedApi::default().with_stations(Ok(vec![
        station("S3", "Zeals", "Stour"),
        station("S1", "Ćwmbran", "Afon Lwyd"),
        station("S2", "abbey Mills", "Lea"),
        station("S4", "Bewdley", "Severn"),
    ]));
    let mut view = Recorder::default();
    let mut loader = StationLoader::new(NoticeStyle::default());

    let outcome = loader.load(&api, &mut view).await;
    assert_eq!(outcome, StationOutcome::Loaded(4));

    let texts: Vec<&str> = view.stations.iter().map(|o| o.text.as_str()).collect();
    assert_eq!(texts, vec![
        "abbey Mills (Lea)",
        "Bewdley (Severn)",
        "Ćwmbran (Afon Lwyd)",
        "Zeals (Stour)"
    ]);
    let values: Vec<&str> = view.stations.iter().map(|o| o.value.as_str()).collect();
    assert_eq!(values, vec!["S2", "S4", "S1", "S3"]);

    assert_eq!(view.calls.first(), Some(&Call::ShowStationLoading));
    assert_eq!(view.calls.last(), Some(&Call::HideStationLoading));
}

#[tokio::test]
async fn test_station_failure_clears_selector() {
    let api = ScriptedApi::default().with_stations(Err(FetchError::HttpStatus {
        resource: Resource::Stations,
        status: 500,
    }));
    let mut view = Recorder::default();
    view.stations = vec![StationOption {
        value: "OLD".to_string(),
        text: "Old (River)".to_string(),
    }];

    let mut loader = StationLoader::new(NoticeStyle::default());
    let outcome = loader.load(&api, &mut view).await;

    assert!(matches!(outcome, StationOutcome::Failed(_)));
    assert!(view.stations.is_empty());
    assert!(!view.station_loading);
    assert_eq!(view.errors(), vec!["Failed to load stations. Please try again later."]);

    let mut view = Recorder::default();
    let mut loader = StationLoader::new(NoticeStyle::Blocking);
    loader.load(&api, &mut view).await;
    assert_eq!(view.errors(), vec!["Failed to load stations: 500"]);
}

#[tokio::test]
async fn test_rows_match_readings() {
    let readings = vec![reading(0, 1.2345, "m"), reading(15, 1.3, "m"), reading(30, 0.98765, "m")];
    let api = ScriptedApi::default()
        .with_stations(Ok(vec![station("E2043", "Surbiton", "Thames")]))
        .with_readings("E2043", Ok(readings.clone()));
    let mut view = Recorder::default();
    StationLoader::new(NoticeStyle::default()).load(&api, &mut view).await;

    let mut pipeline = ReadingPipeline::new(standard());
    let outcome = pipeline.run(Some("E2043"), &api, &mut view).await;
    assert!(matches!(outcome, ReadingOutcome::Rendered { rows: 3, .. }));

    let table = view.table.as_ref().unwrap();
    assert_eq!(table.header, vec!["Date & Time", "Water Level (m)"]);
    assert_eq!(table.len(), readings.len());
    let values: Vec<&str> = table.rows.iter().map(|r| r[1].as_str()).collect();
    assert_eq!(values, vec!["1.2345", "1.3000", "0.9877"]);
    assert_eq!(table.rows[0][0], "01/01/2024, 00:00:00");

    assert!(view.table_visible);
    assert!(!view.loading);
    assert!(view.calls.contains(&Call::Title(
        "Water Level Readings - Surbiton (Thames)".to_string()
    )));

    let chart = &view.charts[0];
    assert_eq!(chart.dataset_label, "Water Level (m)");
    assert_eq!(chart.points.len(), 3);
}

#[tokio::test]
async fn test_classic_layout() {
    let api = ScriptedApi::default().with_readings("E2043", Ok(vec![reading(0, 1.2345, "m")]));
    let mut view = Recorder::default();

    let mut pipeline = ReadingPipeline::new(classic());
    pipeline.run(Some("E2043"), &api, &mut view).await;

    let table = view.table.as_ref().unwrap();
    assert_eq!(table.header, vec!["Date & Time", "Water Level", "Unit"]);
    assert_eq!(table.rows[0][1..], ["1.23".to_string(), "m".to_string()]);
    // No catalog entry: the title falls back to the reference
    assert!(view.calls.contains(&Call::Title("Water Level Readings - E2043".to_string())));
}

#[tokio::test]
async fn test_empty_readings_show_nothing() {
    let api = ScriptedApi::default().with_readings("E2043", Ok(Vec::new()));
    let mut view = Recorder::default();

    let mut pipeline = ReadingPipeline::new(standard());
    let outcome = pipeline.run(Some("E2043"), &api, &mut view).await;

    assert_eq!(outcome, ReadingOutcome::Failed(FetchError::EmptyData));
    assert_eq!(view.count(|c| matches!(c, Call::Create(_))), 0);
    assert_eq!(view.count(|c| matches!(c, Call::ShowTable)), 0);
    assert!(!view.table_visible);
    assert!(!view.loading);
    assert_eq!(view.errors(), vec!["No readings available for this station"]);
}

#[tokio::test]
async fn test_reselect_disposes_once_before_create() {
    let api = ScriptedApi::default()
        .with_readings("A", Ok(vec![reading(0, 1.0, "m")]))
        .with_readings("B", Ok(vec![reading(0, 2.0, "mASD")]));
    let mut view = Recorder::default();
    let mut pipeline = ReadingPipeline::new(standard());

    pipeline.run(Some("A"), &api, &mut view).await;
    view.calls.clear();
    pipeline.run(Some("B"), &api, &mut view).await;

    let lifecycle: Vec<&Call> = view
        .calls
        .iter()
        .filter(|c| matches!(c, Call::Create(_) | Call::Dispose(_)))
        .collect();
    assert_eq!(lifecycle, vec![&Call::Dispose(ChartId(1)), &Call::Create(ChartId(2))]);
    assert_eq!(pipeline.current_chart(), Some(ChartId(2)));
}

#[tokio::test]
async fn test_failure_after_success_releases_chart() {
    let api = ScriptedApi::default()
        .with_readings("A", Ok(vec![reading(0, 1.0, "m")]))
        .with_readings(
            "B",
            Err(FetchError::HttpStatus {
                resource: Resource::Readings,
                status: 500,
            }),
        );
    let mut view = Recorder::default();
    let mut pipeline = ReadingPipeline::new(classic());

    pipeline.run(Some("A"), &api, &mut view).await;
    let outcome = pipeline.run(Some("B"), &api, &mut view).await;

    assert!(matches!(outcome, ReadingOutcome::Failed(_)));
    assert!(view.live_chart.is_none());
    assert!(pipeline.current_chart().is_none());
    assert!(!view.table_visible);
    assert_eq!(view.errors(), vec!["Error: Failed to load readings: 500"]);
    // The pane names the station that failed, not the one before it
    let last_title = view.calls.iter().rev().find_map(|c| match c {
        Call::Title(title) => Some(title.as_str()),
        _ => None,
    });
    assert_eq!(last_title, Some("Water Level Readings - B"));
}

#[tokio::test]
async fn test_stale_result_has_no_effect() {
    let mut view = Recorder::default();
    let mut pipeline = ReadingPipeline::new(standard());

    let first = pipeline.begin(Some("A"), &mut view).unwrap();
    let second = pipeline.begin(Some("B"), &mut view).unwrap();

    let outcome = pipeline.complete(second, Ok(vec![reading(0, 2.0, "m")]), &mut view);
    assert!(matches!(outcome, ReadingOutcome::Rendered { .. }));
    let calls_after_latest = view.calls.len();

    let outcome = pipeline.complete(first, Ok(vec![reading(0, 1.0, "m")]), &mut view);
    assert_eq!(outcome, ReadingOutcome::Discarded);
    assert_eq!(view.calls.len(), calls_after_latest);
    assert_eq!(view.charts.len(), 1);
    assert_eq!(view.charts[0].points[0].value, 2.0);
}

#[tokio::test]
async fn test_stale_failure_keeps_loading_for_latest() {
    let mut view = Recorder::default();
    let mut pipeline = ReadingPipeline::new(standard());

    let first = pipeline.begin(Some("A"), &mut view).unwrap();
    let _second = pipeline.begin(Some("B"), &mut view).unwrap();

    pipeline.complete(first, Err(FetchError::EmptyData), &mut view);
    assert!(view.loading);
    assert!(view.errors().is_empty());
}

#[tokio::test]
async fn test_missing_selection_is_ignored() {
    let api = ScriptedApi::default();
    let mut view = Recorder::default();
    let mut pipeline = ReadingPipeline::new(standard());

    assert_eq!(pipeline.run(None, &api, &mut view).await, ReadingOutcome::Ignored);
    assert_eq!(pipeline.run(Some(""), &api, &mut view).await, ReadingOutcome::Ignored);
    assert!(view.calls.is_empty());
}

#[tokio::test]
async fn test_teardown_disposes_live_chart() {
    let api = ScriptedApi::default().with_readings("A", Ok(vec![reading(0, 1.0, "m")]));
    let mut view = Recorder::default();
    let mut pipeline = ReadingPipeline::new(standard());

    pipeline.run(Some("A"), &api, &mut view).await;
    pipeline.teardown(&mut view);
    pipeline.teardown(&mut view);

    assert_eq!(view.count(|c| matches!(c, Call::Dispose(_))), 1);
    assert!(view.live_chart.is_none());
}
