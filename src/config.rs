use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::loader::DataSource;
use crate::data::model::SeriesId;

// ---------------------------------------------------------------------------
// Dashboard configuration (RON)
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid RON: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// One tracked water body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesConfig {
    pub id: String,
    /// Display name, defaults to the id.
    #[serde(default)]
    pub label: Option<String>,
    /// Local path or http(s) URL of the tabular data.
    pub source: String,
    /// Directory holding `<year>.<ext>` composites.
    #[serde(default)]
    pub gallery_dir: Option<PathBuf>,
}

impl SeriesConfig {
    pub fn series_id(&self) -> SeriesId {
        SeriesId::new(self.id.clone())
    }

    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }

    pub fn data_source(&self) -> DataSource {
        DataSource::parse(&self.source)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
    /// Ids of the two series shown in the comparison chart. Defaults to the
    /// first two configured series.
    #[serde(default)]
    pub comparison: Option<(String, String)>,
    pub series: Vec<SeriesConfig>,
}

fn default_fetch_timeout_secs() -> u64 {
    15
}

fn default_probe_timeout_secs() -> u64 {
    3
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let series = (1..=2)
            .map(|i| SeriesConfig {
                id: format!("waterBody{i}"),
                label: None,
                source: format!("data/waterBody{i}.csv"),
                gallery_dir: Some(PathBuf::from(format!("images/waterBody{i}"))),
            })
            .collect();

        DashboardConfig {
            fetch_timeout_secs: default_fetch_timeout_secs(),
            probe_timeout_secs: default_probe_timeout_secs(),
            comparison: None,
            series,
        }
    }
}

impl DashboardConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&text)
    }

    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: DashboardConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.series.is_empty() {
            return Err(ConfigError::Invalid("no series configured".to_string()));
        }
        if self.fetch_timeout_secs == 0 || self.probe_timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeouts must be positive".to_string()));
        }

        let mut ids = BTreeSet::new();
        for s in &self.series {
            if !ids.insert(s.id.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate series id '{}'", s.id)));
            }
        }

        if let Some((a, b)) = &self.comparison {
            for id in [a, b] {
                if !ids.contains(id.as_str()) {
                    return Err(ConfigError::Invalid(format!("unknown comparison series '{id}'")));
                }
            }
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn series(&self, id: &SeriesId) -> Option<&SeriesConfig> {
        self.series.iter().find(|s| s.id == id.as_str())
    }

    /// The two series of the comparison chart, if there are two.
    pub fn comparison_pair(&self) -> Option<(SeriesId, SeriesId)> {
        match &self.comparison {
            Some((a, b)) => Some((SeriesId::new(a.clone()), SeriesId::new(b.clone()))),
            None => match self.series.as_slice() {
                [a, b, ..] => Some((a.series_id(), b.series_id())),
                _ => None,
            },
        }
    }
}
