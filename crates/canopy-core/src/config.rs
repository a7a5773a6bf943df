//! Configuration for the cleaning and screening stages
//!
//! Every field has a default, so an empty `canopy.toml` (or none at all) is a
//! valid configuration:
//!
//! ```toml
//! [cleaning]
//! numeric_ratio = 0.4
//!
//! [screening]
//! iqr_factor = 3.0
//! min_rows_for_outliers = 5
//! min_rows = 3
//!
//! [library]
//! "Meu Modelo" = "ln(Y) = b0 + b1*ln(DAP)"
//! ```

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{CanopyError, Result};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanopyConfig {
    pub cleaning: CleaningConfig,
    pub screening: ScreeningConfig,
    /// Extra named equation presets, merged over the built-in library
    pub library: IndexMap<String, String>,
}

/// Knobs for [`crate::data::clean_with`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Minimum share of non-missing text cells that must parse for a text
    /// column to be committed to numeric
    pub numeric_ratio: f64,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self { numeric_ratio: 0.4 }
    }
}

/// Knobs for [`crate::screen::screen_with`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreeningConfig {
    /// Multiplier applied to the IQR when building outlier bounds
    pub iqr_factor: f64,
    /// Outlier removal is skipped below this many rows
    pub min_rows_for_outliers: usize,
    /// Fewer surviving rows than this is an error
    pub min_rows: usize,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            iqr_factor: 3.0,
            min_rows_for_outliers: 5,
            min_rows: 3,
        }
    }
}

impl CanopyConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| CanopyError::Format(format!("invalid configuration: {e}")))
    }

    /// Read a configuration file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(crate::data::DataError::from)?;
        log::debug!("loaded configuration from {}", path.display());
        Self::from_toml_str(&text)
    }
}
