use crate::storage::LoadOptions;
use crate::style::ColorMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Column positions combined when no pairs are requested.
pub const ORIGINAL_DEFAULT_INDICES: [usize; 3] = [4, 3, 1];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(
        "default indices accept only non-negative integers, got {0:?}; new default pairs were not set"
    )]
    InvalidDefaultIndices(Vec<i64>),
    #[error("invalid taxonomic family keys {0:?}; see the data file for valid family names")]
    UnknownFamily(Vec<String>),
    #[error("'{0}' is not a hex code or a known color name")]
    InvalidColor(String),
}

/// Run configuration: default measurement set, colors, and data clean-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Measurement file read at startup.
    pub data_path: PathBuf,
    /// Column positions combined when no pairs are requested.
    pub default_indices: Vec<usize>,
    /// Family -> color overrides applied on top of the original map.
    pub colors: BTreeMap<String, String>,
    /// Header renames applied while loading.
    pub renames: BTreeMap<String, String>,
    /// Columns dropped while loading.
    pub drop_columns: Vec<String>,
    /// Directory holding the `Saved ... Plots` folders.
    pub save_root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let load = LoadOptions::default();
        Self {
            data_path: PathBuf::from("all_species_values.csv"),
            default_indices: ORIGINAL_DEFAULT_INDICES.to_vec(),
            colors: BTreeMap::new(),
            renames: load.renames,
            drop_columns: load.drop_columns,
            save_root: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Read a JSON config; absent fields take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            renames: self.renames.clone(),
            drop_columns: self.drop_columns.clone(),
        }
    }

    /// Original colors with this config's overrides applied.
    pub fn color_map(&self) -> Result<ColorMap, ConfigError> {
        let overrides: Vec<(&String, &String)> = self.colors.iter().collect();
        ColorMap::original().with_overrides(&overrides)
    }

    /// Replace the default measurement set. Leaves the current value untouched on error.
    pub fn set_default_indices(&mut self, indices: &[i64]) -> Result<(), ConfigError> {
        let converted: Option<Vec<usize>> =
            indices.iter().map(|&i| usize::try_from(i).ok()).collect();
        match converted {
            Some(v) => {
                self.default_indices = v;
                log::info!(
                    "default column indices are now {:?}",
                    self.default_indices
                );
                Ok(())
            }
            None => Err(ConfigError::InvalidDefaultIndices(indices.to_vec())),
        }
    }

    /// Restore the original default indices and color map.
    pub fn reset_defaults(&mut self) {
        self.default_indices = ORIGINAL_DEFAULT_INDICES.to_vec();
        self.colors.clear();
        log::info!("defaults restored to {:?}", self.default_indices);
    }
}
