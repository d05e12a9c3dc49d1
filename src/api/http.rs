//! HTTP client for the dashboard backend.
//!
//! Issues `GET {base}/api/stations` and `GET {base}/api/readings/{id}` and
//! decodes the JSON arrays they return.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use floodwatch::{FloodApi, HttpApi};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let api = HttpApi::builder()
//!         .endpoint("http://localhost:8000")
//!         .timeout(Duration::from_secs(10))
//!         .build()?;
//!
//!     for station in api.fetch_stations().await? {
//!         println!("{}", station.option_text());
//!     }
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{FetchError, FloodApi, Reading, Resource, Station};

/// Default backend address, matching the development server.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000";

/// Backend client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: Url,
    description: String,
}

impl HttpApi {
    /// Create a new builder for configuring the client.
    pub fn builder() -> HttpApiBuilder {
        HttpApiBuilder::default()
    }

    /// The base URL requests are made against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL from path segments.
    ///
    /// Each segment is percent-encoded, so a station id containing `/` or
    /// `?` stays a single path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::Transport(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        resource: Resource,
    ) -> Result<T, FetchError> {
        debug!(%url, "GET {}", resource);

        let response = self.client.get(url).header(ACCEPT, "application/json").send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                resource,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[async_trait]
impl FloodApi for HttpApi {
    async fn fetch_stations(&self) -> Result<Vec<Station>, FetchError> {
        let url = self.endpoint(&["api", "stations"])?;
        self.get_json(url, Resource::Stations).await
    }

    async fn fetch_readings(&self, station_id: &str) -> Result<Vec<Reading>, FetchError> {
        let url = self.endpoint(&["api", "readings", station_id])?;
        self.get_json(url, Resource::Readings).await
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Builder for [`HttpApi`].
#[derive(Debug, Default)]
pub struct HttpApiBuilder {
    endpoint: Option<String>,
    timeout: Option<Duration>,
}

impl HttpApiBuilder {
    /// Set the backend base URL. Defaults to [`DEFAULT_ENDPOINT`].
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set a per-request timeout. No timeout is applied by default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> anyhow::Result<HttpApi> {
        let endpoint = self.endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let base_url =
            Url::parse(&endpoint).with_context(|| format!("Invalid API endpoint: {endpoint}"))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Invalid API endpoint: {endpoint}");
        }

        let mut client = Client::builder();
        if let Some(timeout) = self.timeout {
            client = client.timeout(timeout);
        }
        let client = client.build().context("Failed to build HTTP client")?;

        Ok(HttpApi {
            client,
            description: format!("api: {}", base_url.as_str().trim_end_matches('/')),
            base_url,
        })
    }
}
