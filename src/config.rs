//! Layered configuration: defaults, optional TOML file, environment.
//!
//! ```toml
//! variant = "standard"          # or "classic"
//!
//! [api]
//! base_url = "http://127.0.0.1:8000"
//! timeout = "10s"
//!
//! [display]
//! precision = 4                 # overrides the variant default
//! table_layout = "header-unit"  # or "unit-column"
//! notice = "toast"              # or "blocking"
//! notice_duration = "5s"
//! timezone = "local"            # or "utc"
//! timestamp_format = "%d/%m/%Y, %H:%M:%S"
//! max_x_labels = 8
//!
//! [logging]
//! file = "floodwatch.log"
//! level = "info"
//! ```
//!
//! Environment variables use the `FLOODWATCH_` prefix with `__` between
//! nested keys, e.g. `FLOODWATCH_API__BASE_URL=http://10.0.0.5:8000`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::api::DEFAULT_ENDPOINT;
use crate::duration::parse_duration;
use crate::render::format::validate_pattern;
use crate::render::{DisplayOptions, DisplayZone, NoticeStyle, TableLayout};

/// Preset bundles of display knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Four decimals, unit in the column header, transient error notices.
    #[default]
    Standard,
    /// Two decimals, a unit column on every row, blocking error notices.
    Classic,
}

impl Variant {
    pub fn precision(self) -> usize {
        match self {
            Variant::Standard => 4,
            Variant::Classic => 2,
        }
    }

    pub fn table_layout(self) -> TableLayout {
        match self {
            Variant::Standard => TableLayout::HeaderUnit,
            Variant::Classic => TableLayout::UnitColumn,
        }
    }

    pub fn notice(self) -> NoticeKind {
        match self {
            Variant::Standard => NoticeKind::Toast,
            Variant::Classic => NoticeKind::Blocking,
        }
    }
}

/// Error display mechanism, as named in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Toast,
    Blocking,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    /// Per-request timeout, e.g. "10s".
    pub timeout: String,
    /// Serve data from this fixture directory instead of HTTP.
    pub fixtures: Option<PathBuf>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ENDPOINT.to_string(),
            timeout: "10s".to_string(),
            fixtures: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub precision: Option<usize>,
    pub table_layout: Option<TableLayout>,
    pub notice: Option<NoticeKind>,
    pub notice_duration: String,
    pub timezone: DisplayZone,
    pub timestamp_format: String,
    pub max_x_labels: usize,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            precision: None,
            table_layout: None,
            notice: None,
            notice_duration: "5s".to_string(),
            timezone: DisplayZone::Local,
            timestamp_format: DisplayOptions::DEFAULT_TIMESTAMP_FORMAT.to_string(),
            max_x_labels: DisplayOptions::DEFAULT_MAX_X_LABELS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log file; logging is off when unset.
    pub file: Option<PathBuf>,
    /// `tracing_subscriber::EnvFilter` directive.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: None,
            level: "info".to_string(),
        }
    }
}

/// Complete application settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub variant: Variant,
    pub api: ApiSettings,
    pub display: DisplaySettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Environment variable prefix.
    pub const ENV_PREFIX: &'static str = "FLOODWATCH";

    /// Load settings from an optional file plus the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let config = builder
            .add_source(
                Environment::with_prefix(Self::ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration")?;

        let settings: Settings =
            config.try_deserialize().context("Invalid configuration")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check values serde cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        self.request_timeout()?;
        self.notice_style()?;
        if !validate_pattern(&self.display.timestamp_format) {
            bail!("Invalid timestamp_format: {}", self.display.timestamp_format);
        }
        let max = DisplayOptions::MAX_X_LABELS;
        if !(2..=max).contains(&self.display.max_x_labels) {
            bail!("max_x_labels must be between 2 and {}", max);
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Result<Duration> {
        parse_duration(&self.api.timeout)
            .with_context(|| format!("Invalid api.timeout: {}", self.api.timeout))
    }

    /// Resolve the notice kind (explicit or from the variant) into a style.
    pub fn notice_style(&self) -> Result<NoticeStyle> {
        Ok(match self.display.notice.unwrap_or_else(|| self.variant.notice()) {
            NoticeKind::Blocking => NoticeStyle::Blocking,
            NoticeKind::Toast => {
                let duration = parse_duration(&self.display.notice_duration).with_context(|| {
                    format!("Invalid display.notice_duration: {}", self.display.notice_duration)
                })?;
                NoticeStyle::Toast { duration }
            }
        })
    }

    /// Resolve display settings against the variant preset.
    pub fn display_options(&self) -> Result<DisplayOptions> {
        Ok(DisplayOptions {
            precision: self.display.precision.unwrap_or_else(|| self.variant.precision()),
            table_layout: self.display.table_layout.unwrap_or_else(|| self.variant.table_layout()),
            notice: self.notice_style()?,
            zone: self.display.timezone,
            timestamp_format: self.display.timestamp_format.clone(),
            max_x_labels: self.display.max_x_labels,
        })
    }
}
