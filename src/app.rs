//! Application state and interaction logic.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::api::{FetchError, FloodApi, Reading, Station};
use crate::duration::format_duration;
use crate::pipeline::{
    ChartId, Dashboard, LoadTicket, ReadingOutcome, ReadingPipeline, StationLoader,
    StationOption, StationOutcome, Ticket,
};
use crate::render::{ChartModel, DisplayOptions, DisplayZone, NoticeStyle, TableModel};
use crate::ui::Theme;

/// Which pane receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// The station selector.
    Stations,
    /// The chart cursor and readings table.
    Readings,
}

impl Focus {
    pub fn toggle(self) -> Self {
        match self {
            Focus::Stations => Focus::Readings,
            Focus::Readings => Focus::Stations,
        }
    }
}

/// A completed fetch, sent from a background task to the UI thread.
#[derive(Debug)]
pub enum PipelineEvent {
    Stations(LoadTicket, Result<Vec<Station>, FetchError>),
    Readings(Ticket, Result<Vec<Reading>, FetchError>, Duration),
}

/// An error notice on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    /// `None` for blocking notices, which stay until dismissed.
    pub expires: Option<Instant>,
}

impl Notice {
    pub fn is_blocking(&self) -> bool {
        self.expires.is_none()
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires.is_some_and(|at| now >= at)
    }
}

/// Everything the pipelines render onto, as the UI draws it.
#[derive(Debug)]
pub struct DashboardState {
    pub stations: Vec<StationOption>,
    pub stations_loading: bool,
    pub readings_loading: bool,
    pub chart_title: Option<String>,
    /// The live chart instance.
    pub chart: Option<(ChartId, ChartModel)>,
    pub table: Option<TableModel>,
    pub table_visible: bool,
    /// Most recent error; a new one replaces the old.
    pub notice: Option<Notice>,
    notice_style: NoticeStyle,
    next_chart: u64,
}

impl DashboardState {
    pub fn new(notice_style: NoticeStyle) -> Self {
        Self {
            stations: Vec::new(),
            stations_loading: false,
            readings_loading: false,
            chart_title: None,
            chart: None,
            table: None,
            table_visible: false,
            notice: None,
            notice_style,
            next_chart: 0,
        }
    }

    pub fn chart_model(&self) -> Option<&ChartModel> {
        self.chart.as_ref().map(|(_, model)| model)
    }

    /// Drop an expired toast.
    pub fn expire_notice(&mut self, now: Instant) {
        if self.notice.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.notice = None;
        }
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}

impl Dashboard for DashboardState {
    fn show_station_loading(&mut self) {
        self.stations_loading = true;
    }

    fn hide_station_loading(&mut self) {
        self.stations_loading = false;
    }

    fn populate_stations(&mut self, options: Vec<StationOption>) {
        self.stations = options;
    }

    fn station_text(&self, station_id: &str) -> Option<String> {
        self.stations.iter().find(|o| o.value == station_id).map(|o| o.text.clone())
    }

    fn show_loading(&mut self) {
        self.readings_loading = true;
    }

    fn hide_loading(&mut self) {
        self.readings_loading = false;
    }

    fn set_chart_title(&mut self, title: String) {
        self.chart_title = Some(title);
    }

    fn create_chart(&mut self, chart: ChartModel) -> ChartId {
        self.next_chart += 1;
        let id = ChartId(self.next_chart);
        self.chart = Some((id, chart));
        id
    }

    fn dispose_chart(&mut self, id: ChartId) {
        if self.chart.as_ref().is_some_and(|(live, _)| *live == id) {
            self.chart = None;
        }
    }

    fn render_table(&mut self, table: TableModel) {
        self.table = Some(table);
    }

    fn show_table(&mut self) {
        self.table_visible = true;
    }

    fn hide_table(&mut self) {
        self.table_visible = false;
    }

    fn show_error(&mut self, message: &str) {
        let expires = match self.notice_style {
            NoticeStyle::Toast { duration } => Some(Instant::now() + duration),
            NoticeStyle::Blocking => None,
        };
        self.notice = Some(Notice {
            message: message.to_string(),
            expires,
        });
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,
    pub focus: Focus,

    // Data
    api: Arc<dyn FloodApi>,
    runtime: Handle,
    events_tx: UnboundedSender<PipelineEvent>,
    events_rx: UnboundedReceiver<PipelineEvent>,
    loader: StationLoader,
    pipeline: ReadingPipeline,
    pub view: DashboardState,

    // Navigation state
    pub selected_station_index: usize,
    /// Station whose readings were last requested.
    pub active_station: Option<String>,
    preselect: Option<String>,
    pub chart_cursor: usize,
    pub table_offset: usize,

    // Search/filter
    pub filter_text: String,
    pub filter_active: bool,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App fetching from `api` on the given runtime.
    pub fn new(api: Arc<dyn FloodApi>, runtime: Handle, options: DisplayOptions) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            running: true,
            show_help: false,
            focus: Focus::Stations,
            api,
            runtime,
            events_tx,
            events_rx,
            loader: StationLoader::new(options.notice),
            view: DashboardState::new(options.notice),
            pipeline: ReadingPipeline::new(options),
            selected_station_index: 0,
            active_station: None,
            preselect: None,
            chart_cursor: 0,
            table_offset: 0,
            filter_text: String::new(),
            filter_active: false,
            theme: Theme::dark(),
            status_message: None,
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Select this station as soon as the catalog contains it.
    pub fn with_preselect(mut self, station_id: Option<String>) -> Self {
        self.preselect = station_id;
        self
    }

    /// Returns a description of the backend.
    pub fn source_description(&self) -> &str {
        self.api.description()
    }

    pub fn options(&self) -> &DisplayOptions {
        self.pipeline.options()
    }

    /// Short description of the active display settings, for the header.
    pub fn display_summary(&self) -> String {
        let options = self.options();
        let zone = match options.zone {
            DisplayZone::Local => "local time",
            DisplayZone::Utc => "UTC",
        };
        format!("{} dp, {}", options.precision, zone)
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Start loading the station catalog in the background.
    pub fn load_stations(&mut self) {
        let ticket = self.loader.begin(&mut self.view);
        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        self.runtime.spawn(async move {
            let result = api.fetch_stations().await;
            let _ = tx.send(PipelineEvent::Stations(ticket, result));
        });
    }

    /// Fire a selection change for the highlighted station.
    ///
    /// Selecting the station that is already shown fetches it again.
    pub fn select_station(&mut self) {
        let station_id = self.selected_station().map(|o| o.value.clone());
        self.request_readings(station_id);
    }

    fn request_readings(&mut self, station_id: Option<String>) {
        let Some(ticket) = self.pipeline.begin(station_id.as_deref(), &mut self.view) else {
            return;
        };
        self.active_station = Some(ticket.station_id().to_string());

        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        self.runtime.spawn(async move {
            let started = Instant::now();
            let result = api.fetch_readings(ticket.station_id()).await;
            let _ = tx.send(PipelineEvent::Readings(ticket, result, started.elapsed()));
        });
    }

    /// Apply every fetch result that has arrived. Returns how many were applied.
    pub fn poll_pipeline(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Apply one fetch result to the dashboard.
    pub fn apply(&mut self, event: PipelineEvent) {
        match event {
            PipelineEvent::Stations(ticket, result) => {
                if let StationOutcome::Loaded(count) =
                    self.loader.complete(ticket, result, &mut self.view)
                {
                    self.set_status_message(format!("Loaded {} stations", count));
                }
                self.clamp_station_selection();
                self.apply_preselect();
            }
            PipelineEvent::Readings(ticket, result, elapsed) => {
                match self.pipeline.complete(ticket, result, &mut self.view) {
                    ReadingOutcome::Rendered { rows, .. } => {
                        self.chart_cursor = rows.saturating_sub(1);
                        self.table_offset = 0;
                        self.set_status_message(format!(
                            "Loaded {} readings in {}",
                            rows,
                            format_duration(elapsed)
                        ));
                    }
                    ReadingOutcome::Failed(_) => {
                        self.chart_cursor = 0;
                        self.table_offset = 0;
                    }
                    ReadingOutcome::Discarded | ReadingOutcome::Ignored => {}
                }
            }
        }
    }

    fn apply_preselect(&mut self) {
        let Some(station_id) = self.preselect.take() else {
            return;
        };
        match self.filtered_stations().iter().position(|o| o.value == station_id) {
            Some(index) => {
                self.selected_station_index = index;
                self.select_station();
            }
            None => debug!(station = %station_id, "Preselected station not in catalog"),
        }
    }

    /// Per-frame housekeeping: expire toast notices.
    pub fn tick(&mut self) {
        self.view.expire_notice(Instant::now());
    }

    /// Whether a blocking notice is waiting to be dismissed.
    pub fn has_blocking_notice(&self) -> bool {
        self.view.notice.as_ref().is_some_and(Notice::is_blocking)
    }

    pub fn dismiss_notice(&mut self) {
        self.view.dismiss_notice();
    }

    /// Stations visible under the current filter, in display order.
    pub fn filtered_stations(&self) -> Vec<&StationOption> {
        self.view.stations.iter().filter(|o| self.matches_filter(&o.text)).collect()
    }

    /// The highlighted station, if any.
    pub fn selected_station(&self) -> Option<&StationOption> {
        self.filtered_stations().get(self.selected_station_index).copied()
    }

    fn clamp_station_selection(&mut self) {
        let count = self.filtered_stations().len();
        if self.selected_station_index >= count {
            self.selected_station_index = count.saturating_sub(1);
        }
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one item.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move the focused pane's selection down by n items.
    pub fn select_next_n(&mut self, n: usize) {
        match self.focus {
            Focus::Stations => {
                let max = self.filtered_stations().len().saturating_sub(1);
                self.selected_station_index = (self.selected_station_index + n).min(max);
            }
            Focus::Readings => {
                let max = self.table_rows().saturating_sub(1);
                self.table_offset = (self.table_offset + n).min(max);
            }
        }
    }

    /// Move the focused pane's selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        match self.focus {
            Focus::Stations => {
                self.selected_station_index = self.selected_station_index.saturating_sub(n);
            }
            Focus::Readings => self.table_offset = self.table_offset.saturating_sub(n),
        }
    }

    /// Jump to the first item in the focused pane.
    pub fn select_first(&mut self) {
        match self.focus {
            Focus::Stations => self.selected_station_index = 0,
            Focus::Readings => self.table_offset = 0,
        }
    }

    /// Jump to the last item in the focused pane.
    pub fn select_last(&mut self) {
        match self.focus {
            Focus::Stations => {
                self.selected_station_index = self.filtered_stations().len().saturating_sub(1);
            }
            Focus::Readings => self.table_offset = self.table_rows().saturating_sub(1),
        }
    }

    fn table_rows(&self) -> usize {
        match (&self.view.table, self.view.table_visible) {
            (Some(table), true) => table.len(),
            _ => 0,
        }
    }

    /// Move the chart cursor one point left.
    pub fn cursor_prev(&mut self) {
        self.chart_cursor = self.chart_cursor.saturating_sub(1);
    }

    /// Move the chart cursor one point right.
    pub fn cursor_next(&mut self) {
        let points = self.view.chart_model().map_or(0, |c| c.points.len());
        self.chart_cursor = (self.chart_cursor + 1).min(points.saturating_sub(1));
    }

    pub fn toggle_focus(&mut self) {
        self.focus = self.focus.toggle();
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Enter filter input mode (starts capturing keystrokes for search).
    pub fn start_filter(&mut self) {
        self.filter_active = true;
        self.focus = Focus::Stations;
    }

    /// Exit filter input mode without clearing the filter text.
    pub fn cancel_filter(&mut self) {
        self.filter_active = false;
    }

    /// Clear the filter text and exit filter mode.
    pub fn clear_filter(&mut self) {
        self.filter_text.clear();
        self.filter_active = false;
        self.clamp_station_selection();
    }

    /// Append a character to the filter text.
    pub fn filter_push(&mut self, c: char) {
        self.filter_text.push(c);
        self.selected_station_index = 0;
    }

    /// Remove the last character from the filter text.
    pub fn filter_pop(&mut self) {
        self.filter_text.pop();
        self.clamp_station_selection();
    }

    /// Check if a station's option text matches the current filter.
    pub fn matches_filter(&self, text: &str) -> bool {
        if self.filter_text.is_empty() {
            return true;
        }
        text.to_lowercase().contains(&self.filter_text.to_lowercase())
    }

    /// Signal the application to quit, releasing the chart.
    pub fn quit(&mut self) {
        self.pipeline.teardown(&mut self.view);
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FixtureApi;
    use std::fs;

    fn fixtures() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("stations.json"),
            r#"[
                {"stationReference":"B1","label":"Walton","riverName":"Thames"},
                {"stationReference":"A1","label":"Banbury","riverName":"Cherwell"},
                {"stationReference":"C1","label":"abingdon","riverName":null}
            ]"#,
        )
        .unwrap();
        fs::create_dir(dir.path().join("readings")).unwrap();
        fs::write(
            dir.path().join("readings").join("A1.json"),
            r#"[
                {"dateTime":"2024-01-01T00:00:00Z","value":0.5,"unit":"mASD"},
                {"dateTime":"2024-01-01T00:15:00Z","value":0.75,"unit":"mASD"},
                {"dateTime":"2024-01-01T00:30:00Z","value":1.0,"unit":"mASD"}
            ]"#,
        )
        .unwrap();
        fs::write(dir.path().join("readings").join("B1.json"), "[]").unwrap();
        dir
    }

    fn app(dir: &tempfile::TempDir) -> App {
        let options = DisplayOptions {
            zone: DisplayZone::Utc,
            ..DisplayOptions::default()
        };
        App::new(Arc::new(FixtureApi::new(dir.path())), Handle::current(), options)
    }

    /// Wait until `want` fetch results have been applied.
    async fn settle(app: &mut App, want: usize) {
        let mut applied = 0;
        for _ in 0..200 {
            applied += app.poll_pipeline();
            if applied >= want {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("only {} of {} results arrived", applied, want);
    }

    #[tokio::test]
    async fn test_display_summary() {
        let dir = fixtures();
        assert_eq!(app(&dir).display_summary(), "4 dp, UTC");

        let classic = App::new(
            Arc::new(FixtureApi::new(dir.path())),
            Handle::current(),
            DisplayOptions {
                precision: 2,
                ..DisplayOptions::default()
            },
        );
        assert_eq!(classic.display_summary(), "2 dp, local time");
    }

    #[tokio::test]
    async fn test_load_and_select() {
        let dir = fixtures();
        let mut app = app(&dir);

        app.load_stations();
        assert!(app.view.stations_loading);
        settle(&mut app, 1).await;
        assert!(!app.view.stations_loading);

        let texts: Vec<&str> = app.view.stations.iter().map(|o| o.text.as_str()).collect();
        assert_eq!(texts, vec![
            "abingdon (Unknown River)",
            "Banbury (Cherwell)",
            "Walton (Thames)"
        ]);

        app.select_next();
        app.select_station();
        assert!(app.view.readings_loading);
        assert!(!app.view.table_visible);
        settle(&mut app, 1).await;

        assert!(!app.view.readings_loading);
        assert!(app.view.table_visible);
        assert_eq!(
            app.view.chart_title.as_deref(),
            Some("Water Level Readings - Banbury (Cherwell)")
        );
        assert_eq!(app.view.table.as_ref().unwrap().len(), 3);
        assert_eq!(app.chart_cursor, 2);
        assert_eq!(app.get_status_message().map(|m| m.starts_with("Loaded 3 readings")), Some(true));
    }

    #[tokio::test]
    async fn test_empty_readings_show_notice() {
        let dir = fixtures();
        let mut app = app(&dir).with_preselect(Some("B1".to_string()));

        app.load_stations();
        settle(&mut app, 2).await;

        assert_eq!(app.active_station.as_deref(), Some("B1"));
        assert!(app.view.chart.is_none());
        assert!(!app.view.table_visible);
        let notice = app.view.notice.as_ref().unwrap();
        assert_eq!(notice.message, "No readings available for this station");
        assert!(!notice.is_blocking());
    }

    #[tokio::test]
    async fn test_quit_disposes_chart() {
        let dir = fixtures();
        let mut app = app(&dir).with_preselect(Some("A1".to_string()));

        app.load_stations();
        settle(&mut app, 2).await;
        assert!(app.view.chart.is_some());

        app.quit();
        assert!(!app.running);
        assert!(app.view.chart.is_none());
    }

    #[tokio::test]
    async fn test_filter_narrows_selection() {
        let dir = fixtures();
        let mut app = app(&dir);
        app.load_stations();
        settle(&mut app, 1).await;

        app.select_last();
        app.start_filter();
        for c in "THAM".chars() {
            app.filter_push(c);
        }
        assert_eq!(app.filtered_stations().len(), 1);
        assert_eq!(app.selected_station().map(|o| o.value.as_str()), Some("B1"));

        app.clear_filter();
        assert_eq!(app.filtered_stations().len(), 3);
    }

    #[test]
    fn test_notice_expiry() {
        let mut view = DashboardState::new(NoticeStyle::Toast {
            duration: Duration::from_secs(5),
        });
        view.show_error("boom");
        let now = Instant::now();
        view.expire_notice(now);
        assert!(view.notice.is_some());
        view.expire_notice(now + Duration::from_secs(6));
        assert!(view.notice.is_none());

        let mut blocking = DashboardState::new(NoticeStyle::Blocking);
        blocking.show_error("boom");
        blocking.expire_notice(now + Duration::from_secs(3600));
        assert!(blocking.notice.as_ref().unwrap().is_blocking());
    }

    #[test]
    fn test_dispose_ignores_unknown_chart() {
        let mut view = DashboardState::new(NoticeStyle::Blocking);
        let readings = vec![Reading {
            date_time: chrono::Utc::now(),
            value: 1.0,
            unit: "m".to_string(),
        }];
        let id = view.create_chart(ChartModel::build(&readings, "m", &DisplayOptions::default()));
        view.dispose_chart(ChartId(id.0 + 1));
        assert!(view.chart.is_some());
        view.dispose_chart(id);
        assert!(view.chart.is_none());
    }
}
