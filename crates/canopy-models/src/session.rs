//! Pipeline state for one analyst session
//!
//! A [`Session`] owns the working dataset, its alias map, the current
//! result, the saved results and the equation library. Every operation is
//! an explicit call on it; loading a new dataset or running a new fit
//! replaces the derived state wholesale.

use indexmap::IndexMap;

use canopy_core::config::CanopyConfig;
use canopy_core::data::{AuditReport, DataFrame, RawTable, audit, clean_with};
use canopy_core::formula::EquationLibrary;
use canopy_core::AliasMap;

use crate::base::{ModelError, Result};
use crate::lm::{FitResult, LinearConfig, fit_formula_with};
use crate::manual::evaluate_manual;

#[derive(Debug, Clone, Default)]
pub struct Session {
    config: CanopyConfig,
    linear: LinearConfig,
    dataset: Option<DataFrame>,
    aliases: AliasMap,
    current: Option<FitResult>,
    saved: Vec<FitResult>,
    library: EquationLibrary,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session whose library holds the built-in presets plus the ones in
    /// `config`
    pub fn with_config(config: CanopyConfig) -> Self {
        let mut library = EquationLibrary::builtin();
        library.merge(config.library.clone());
        Self {
            config,
            library,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &CanopyConfig {
        &self.config
    }

    /// Replace the working dataset. The current result is dropped; saved
    /// results are kept. Returns the advisory audit of the new dataset.
    pub fn load(&mut self, dataset: DataFrame) -> AuditReport {
        let report = audit(&dataset);
        if !report.is_clean() {
            log::warn!(
                "dataset audit: {} critical finding(s), {} warning(s)",
                report.critical.len(),
                report.warning.len()
            );
        }
        self.dataset = Some(dataset);
        self.current = None;
        report
    }

    /// Clean a raw table with the session's cleaning settings and load it
    pub fn load_raw(&mut self, raw: &RawTable) -> AuditReport {
        let dataset = clean_with(raw, &self.config.cleaning);
        self.load(dataset)
    }

    pub fn dataset(&self) -> Option<&DataFrame> {
        self.dataset.as_ref()
    }

    pub fn set_aliases(&mut self, aliases: AliasMap) {
        self.aliases = aliases;
    }

    pub fn aliases(&self) -> &AliasMap {
        &self.aliases
    }

    /// Fit `formula` by OLS and make the result current. A failed fit
    /// leaves no current result.
    pub fn fit(&mut self, formula: &str, name: Option<&str>) -> Result<&FitResult> {
        self.current = None;
        let dataset = self.dataset.as_ref().ok_or(ModelError::NoDataset)?;
        let mut result = fit_formula_with(
            dataset,
            formula,
            &self.aliases,
            &self.config.screening,
            &self.linear,
        )?;
        if let Some(name) = name.filter(|n| !n.trim().is_empty()) {
            result = result.with_name(name.trim());
        }
        Ok(self.current.insert(result))
    }

    /// Evaluate `formula` with fixed coefficients and make the result
    /// current
    pub fn evaluate_manual(
        &mut self,
        formula: &str,
        coefficients: &IndexMap<String, f64>,
        name: Option<&str>,
    ) -> Result<&FitResult> {
        self.current = None;
        let dataset = self.dataset.as_ref().ok_or(ModelError::NoDataset)?;
        let mut result = evaluate_manual(dataset, formula, &self.aliases, coefficients)?;
        if let Some(name) = name.filter(|n| !n.trim().is_empty()) {
            result = result.with_name(name.trim());
        }
        Ok(self.current.insert(result))
    }

    pub fn current(&self) -> Option<&FitResult> {
        self.current.as_ref()
    }

    /// Append the current result to the saved list. Saving the same result
    /// twice stores it twice.
    pub fn save_current(&mut self) -> Result<()> {
        let result = self.current.clone().ok_or(ModelError::NoResult)?;
        log::debug!("saved model '{}'", result.name);
        self.saved.push(result);
        Ok(())
    }

    pub fn saved_models(&self) -> &[FitResult] {
        &self.saved
    }

    pub fn library(&self) -> &EquationLibrary {
        &self.library
    }

    /// Add or overwrite a named preset
    pub fn save_preset(&mut self, name: impl Into<String>, formula: impl Into<String>) {
        self.library.insert(name, formula);
    }
}
