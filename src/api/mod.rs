//! Backend API abstraction for fetching stations and readings.
//!
//! The dashboard talks to its backend through the [`FloodApi`] trait so the
//! pipelines can run against the real HTTP service, a fixture directory, or
//! an in-memory fake in tests.

mod error;
mod file;
mod http;
mod types;

pub use error::{FetchError, Resource};
pub use file::FixtureApi;
pub use http::{HttpApi, HttpApiBuilder, DEFAULT_ENDPOINT};
pub use types::{parse_timestamp, Reading, Station, UNKNOWN_RIVER};

use std::fmt::Debug;

use async_trait::async_trait;

/// Trait for fetching dashboard data from a backend.
///
/// # Example
///
/// ```no_run
/// use floodwatch::{FloodApi, HttpApi};
///
/// # tokio_test::block_on(async {
/// let api = HttpApi::builder().endpoint("http://127.0.0.1:8000").build().unwrap();
/// let stations = api.fetch_stations().await.unwrap();
/// println!("Got {} stations", stations.len());
/// # });
/// ```
#[async_trait]
pub trait FloodApi: Send + Sync + Debug {
    /// Fetch the station catalog.
    async fn fetch_stations(&self) -> Result<Vec<Station>, FetchError>;

    /// Fetch the time-ordered readings for one station.
    ///
    /// An empty list is a successful response here. The reading pipeline
    /// decides that it is an error.
    async fn fetch_readings(&self, station_id: &str) -> Result<Vec<Reading>, FetchError>;

    /// Returns a human-readable description of the backend.
    ///
    /// Used for display in the TUI header.
    fn description(&self) -> &str;
}
