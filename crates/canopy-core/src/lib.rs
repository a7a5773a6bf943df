//! Core building blocks for Canopy
//!
//! This crate turns a raw spreadsheet into a numeric dataset, parses
//! allometric equations written over short aliases, screens the data for
//! physically and statistically invalid rows, and assembles the design
//! matrix consumed by the fitting crate.

pub mod alias;
pub mod config;
pub mod data;
pub mod design;
pub mod error;
pub mod formula;
pub mod screen;

pub use alias::AliasMap;
pub use config::{CanopyConfig, CleaningConfig, ScreeningConfig};
pub use data::{DataFrame, Series};
pub use design::{DesignMatrix, build_design_matrix};
pub use error::{CanopyError, ErrorKind, Result};
pub use formula::Formula;
pub use screen::screen;
