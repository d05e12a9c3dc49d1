//! Fixture-directory backend.
//!
//! Serves stations and readings from JSON files on disk instead of HTTP.
//! The directory layout mirrors the API paths:
//!
//! ```text
//! fixtures/
//! ├── stations.json          # GET /api/stations
//! └── readings/
//!     ├── E2043.json         # GET /api/readings/E2043
//!     └── 1029TH.json
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::{FetchError, FloodApi, Reading, Resource, Station};

/// A backend that reads stations and readings from a fixture directory.
///
/// A missing file answers like the backend would: a 404 status. A station
/// id that is not a single plain path component is rejected with a 400.
#[derive(Debug, Clone)]
pub struct FixtureApi {
    root: PathBuf,
    description: String,
}

impl FixtureApi {
    /// Create a new fixture backend rooted at the given directory.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref().to_path_buf();
        let description = format!("fixtures: {}", root.display());
        Self { root, description }
    }

    /// Returns the fixture directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read and parse one fixture file.
    async fn read_file<T: DeserializeOwned>(
        &self,
        path: &Path,
        resource: Resource,
    ) -> Result<T, FetchError> {
        let content = match tokio::fs::read(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(FetchError::HttpStatus {
                    resource,
                    status: 404,
                });
            }
            Err(e) => return Err(FetchError::Transport(format!("Read error: {}", e))),
        };

        serde_json::from_slice(&content).map_err(|e| FetchError::Decode(format!("Parse error: {}", e)))
    }
}

/// Station ids become file names, so only plain names are accepted.
fn is_plain_id(station_id: &str) -> bool {
    !station_id.is_empty()
        && station_id != "."
        && station_id != ".."
        && !station_id.contains(['/', '\\', '\0'])
}

#[async_trait]
impl FloodApi for FixtureApi {
    async fn fetch_stations(&self) -> Result<Vec<Station>, FetchError> {
        self.read_file(&self.root.join("stations.json"), Resource::Stations).await
    }

    async fn fetch_readings(&self, station_id: &str) -> Result<Vec<Reading>, FetchError> {
        if !is_plain_id(station_id) {
            return Err(FetchError::HttpStatus {
                resource: Resource::Readings,
                status: 400,
            });
        }

        let path = self.root.join("readings").join(format!("{station_id}.json"));
        self.read_file(&path, Resource::Readings).await
    }

    fn description(&self) -> &str {
        &self.description
    }
}
