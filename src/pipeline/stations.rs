//! Station catalog loading.

use tracing::{debug, info, warn};

use super::{collate, Dashboard, StationOption};
use crate::api::{FetchError, FloodApi, Station};
use crate::render::NoticeStyle;

/// Token for one in-flight catalog request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Result of applying a catalog response.
#[derive(Debug, Clone, PartialEq)]
pub enum StationOutcome {
    /// The selector was populated with this many stations.
    Loaded(usize),
    /// The fetch failed; the selector was cleared.
    Failed(FetchError),
    /// A newer catalog request superseded this one.
    Discarded,
}

/// Sort stations by label and turn them into selector options.
pub fn station_options(mut stations: Vec<Station>) -> Vec<StationOption> {
    stations.sort_by(|a, b| collate::compare(&a.label, &b.label));
    stations
        .into_iter()
        .map(|s| StationOption {
            text: s.option_text(),
            value: s.station_reference,
        })
        .collect()
}

/// Loads the station catalog into a dashboard's selector.
#[derive(Debug)]
pub struct StationLoader {
    notice: NoticeStyle,
    latest: u64,
}

impl StationLoader {
    pub fn new(notice: NoticeStyle) -> Self {
        Self { notice, latest: 0 }
    }

    /// Start a catalog request: shows the station loading indicator.
    pub fn begin<D: Dashboard + ?Sized>(&mut self, view: &mut D) -> LoadTicket {
        self.latest += 1;
        debug!(seq = self.latest, "Loading stations");
        view.show_station_loading();
        LoadTicket(self.latest)
    }

    /// Apply a catalog response.
    ///
    /// The loading indicator is hidden whatever the outcome, unless the
    /// ticket is stale, in which case the view is left untouched.
    pub fn complete<D: Dashboard + ?Sized>(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Station>, FetchError>,
        view: &mut D,
    ) -> StationOutcome {
        if ticket.0 != self.latest {
            debug!(seq = ticket.0, latest = self.latest, "Discarding stale station list");
            return StationOutcome::Discarded;
        }

        let outcome = match result {
            Ok(stations) => {
                let options = station_options(stations);
                let count = options.len();
                info!(count, "Loaded stations");
                view.populate_stations(options);
                StationOutcome::Loaded(count)
            }
            Err(e) => {
                warn!(error = %e, "Error loading stations");
                view.populate_stations(Vec::new());
                view.show_error(&self.error_message(&e));
                StationOutcome::Failed(e)
            }
        };

        view.hide_station_loading();
        outcome
    }

    /// Run a complete catalog load against `api`.
    pub async fn load<A, D>(&mut self, api: &A, view: &mut D) -> StationOutcome
    where
        A: FloodApi + ?Sized,
        D: Dashboard + ?Sized,
    {
        let ticket = self.begin(view);
        let result = api.fetch_stations().await;
        self.complete(ticket, result, view)
    }

    fn error_message(&self, err: &FetchError) -> String {
        match (self.notice, err) {
            (NoticeStyle::Toast { .. }, _) => {
                "Failed to load stations. Please try again later.".to_string()
            }
            // Status errors already read "Failed to load stations: <status>"
            (NoticeStyle::Blocking, FetchError::HttpStatus { .. }) => err.to_string(),
            (NoticeStyle::Blocking, _) => format!("Failed to load stations: {}", err),
        }
    }
}
