//! City → CSV source mapping, optionally overridden by a JSON config file.
//!
//! ```json
//! { "data_dir": "/data/bikeshare", "sources": { "chicago": "chi_2017.csv" } }
//! ```
//!
//! Relative source paths resolve against the data directory.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BikeshareError, DataSourceError, Result};
use crate::models::City;

// ── SourceMap ─────────────────────────────────────────────────────────────────

/// Where each city's trip CSV lives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceMap {
    sources: HashMap<City, PathBuf>,
}

impl SourceMap {
    /// Every city mapped to its conventional file name inside `data_dir`.
    pub fn new(data_dir: &Path) -> Self {
        let sources = City::ALL
            .into_iter()
            .map(|c| (c, data_dir.join(c.default_file_name())))
            .collect();
        Self { sources }
    }

    /// Map `city` to `path`, replacing any previous mapping.
    pub fn with_source(mut self, city: City, path: impl Into<PathBuf>) -> Self {
        self.sources.insert(city, path.into());
        self
    }

    /// Source path for `city`.
    ///
    /// # Errors
    ///
    /// [`DataSourceError::UnmappedCity`] when no path is configured.
    pub fn path_for(&self, city: City) -> std::result::Result<&Path, DataSourceError> {
        self.sources
            .get(&city)
            .map(PathBuf::as_path)
            .ok_or(DataSourceError::UnmappedCity(city))
    }
}

// ── ConfigFile ────────────────────────────────────────────────────────────────

/// On-disk configuration, `~/.bikeshare/config.json` by default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// City name (`"chicago"`, `"new york city"` or `"new_york_city"`) → path.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sources: BTreeMap<String, PathBuf>,
}

impl ConfigFile {
    /// Default config location.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".bikeshare").join("config.json"))
    }

    /// Read the config at an explicit path.
    ///
    /// # Errors
    ///
    /// [`BikeshareError::Config`] when the file is unreadable or not valid JSON.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BikeshareError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            BikeshareError::Config(format!("invalid config {}: {}", path.display(), e))
        })
    }

    /// Resolve the config to use.
    ///
    /// An explicit path must exist. Without one, the default location is read
    /// when present; otherwise an empty config is returned.
    ///
    /// # Errors
    ///
    /// Propagates [`ConfigFile::load_from`] failures.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => {
                debug!("using config {}", path.display());
                Self::load_from(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Build the source map, falling back to `default_data_dir` when the file
    /// names no data directory.
    ///
    /// # Errors
    ///
    /// [`BikeshareError::Config`] when a `sources` key is not a known city.
    pub fn source_map(&self, default_data_dir: &Path) -> Result<SourceMap> {
        let data_dir = self.data_dir.as_deref().unwrap_or(default_data_dir);
        let mut map = SourceMap::new(data_dir);
        for (name, path) in &self.sources {
            let city: City = name
                .replace('_', " ")
                .parse()
                .map_err(|_| BikeshareError::Config(format!("unknown city in sources: {name}")))?;
            map = map.with_source(city, data_dir.join(path));
        }
        Ok(map)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
