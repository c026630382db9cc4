//! Runtime settings.
//!
//! Defaults point at the public production endpoints. An optional YAML file
//! (see `--config`) can override any of them; CLI flags are applied on top
//! in `main`.
//!
//! ```yaml
//! timeout_secs: 20
//! page_size: 100
//! youtube:
//!   max_results: 5
//!   query_suffix: "Senado Federal Congresso Brasil"
//! ```

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, instrument};
use url::Url;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Per-call network deadline.
    pub timeout_secs: u64,
    /// Result page size requested from the Câmara and STF sources.
    pub page_size: u32,
    pub senado_base: String,
    pub camara_base: String,
    pub stf: StfSettings,
    pub youtube: YoutubeSettings,
    pub render: RenderSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StfSettings {
    pub bigquery_base: String,
    /// Fully qualified `project.dataset.table` holding the decisions.
    pub table: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct YoutubeSettings {
    pub base: String,
    pub max_results: u32,
    /// Appended to the topic to keep results on legislative coverage.
    pub query_suffix: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Rows of the text bar chart.
    pub chart_height: usize,
    /// Characters of summary shown per table row.
    pub summary_width: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            page_size: 100,
            senado_base: "https://legis.senado.leg.br/dadosabertos".to_string(),
            camara_base: "https://dadosabertos.camara.leg.br/api/v2".to_string(),
            stf: StfSettings::default(),
            youtube: YoutubeSettings::default(),
            render: RenderSettings::default(),
        }
    }
}

impl Default for StfSettings {
    fn default() -> Self {
        Self {
            bigquery_base: "https://bigquery.googleapis.com/bigquery/v2".to_string(),
            table: "basedosdados.br_stf_corte_aberta.decisoes".to_string(),
        }
    }
}

impl Default for YoutubeSettings {
    fn default() -> Self {
        Self {
            base: "https://www.googleapis.com/youtube/v3".to_string(),
            max_results: 5,
            query_suffix: "Senado Federal Congresso Brasil".to_string(),
        }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            chart_height: 10,
            summary_width: 60,
        }
    }
}

/// Upper bound the YouTube search endpoint accepts for `maxResults`.
pub const MAX_VIDEO_RESULTS: u32 = 50;

impl Settings {
    /// Load settings from `path`, or defaults when `path` is `None`.
    #[instrument(level = "info")]
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let settings = match path {
            None => {
                debug!("No settings file given; using defaults");
                Settings::default()
            }
            Some(p) => {
                let raw = std::fs::read_to_string(Path::new(p)).map_err(|source| {
                    ConfigError::Read {
                        path: p.to_string(),
                        source,
                    }
                })?;
                let s = Self::from_yaml(&raw).map_err(|source| ConfigError::Parse {
                    path: p.to_string(),
                    source,
                })?;
                info!(path = p, "Loaded settings file");
                s
            }
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(raw)
    }

    /// Reject values no request could succeed with, before any request is made.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::BaseUrl`] when a base URL does not parse
    /// - [`ConfigError::OutOfRange`] when `timeout_secs` is zero or
    ///   `youtube.max_results` is outside `1..=50`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::OutOfRange {
                field: "timeout_secs",
                value: 0,
                allowed: "at least 1",
            });
        }
        if !(1..=MAX_VIDEO_RESULTS).contains(&self.youtube.max_results) {
            return Err(ConfigError::OutOfRange {
                field: "youtube.max_results",
                value: u64::from(self.youtube.max_results),
                allowed: "1..=50",
            });
        }
        let bases = [
            ("senado_base", &self.senado_base),
            ("camara_base", &self.camara_base),
            ("stf.bigquery_base", &self.stf.bigquery_base),
            ("youtube.base", &self.youtube.base),
        ];
        for (field, base) in bases {
            Url::parse(base).map_err(|source| ConfigError::BaseUrl { field, source })?;
        }
        Ok(())
    }
}

/// Join a base URL and a path without doubling or dropping slashes.
pub fn endpoint(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
