//! Alias map: short formula symbols bound to dataset column names

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::data::DataFrame;
use crate::error::{CanopyError, Result};

/// Alias used for the dependent variable when none is given
pub const DEFAULT_DEPENDENT_ALIAS: &str = "Y";

/// Ordered mapping from alias to column name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasMap {
    entries: IndexMap<String, String>,
}

impl AliasMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `alias` to `column`, replacing any previous binding
    pub fn insert(&mut self, alias: impl Into<String>, column: impl Into<String>) -> Option<String> {
        self.entries.insert(alias.into(), column.into())
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, alias: impl Into<String>, column: impl Into<String>) -> Self {
        self.insert(alias, column);
        self
    }

    pub fn get(&self, alias: &str) -> Option<&str> {
        self.entries.get(alias).map(String::as_str)
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.entries.contains_key(alias)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(a, c)| (a.as_str(), c.as_str()))
    }

    /// Column names in alias order, without repeats
    pub fn columns(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for column in self.entries.values() {
            if !seen.contains(&column.as_str()) {
                seen.push(column.as_str());
            }
        }
        seen
    }

    /// Suggested alias for a predictor column, from its name and position
    pub fn default_alias(column: &str, position: usize) -> String {
        let lower = column.to_lowercase();
        if lower.contains("dap") {
            "DAP".to_string()
        } else if lower.contains('h') {
            "HT".to_string()
        } else {
            format!("X{}", position + 1)
        }
    }

    /// Bind user-typed alias text to a predictor column. Blank input falls
    /// back to [`default_alias`](Self::default_alias).
    pub fn bind(&mut self, alias_input: &str, column: &str, position: usize) -> String {
        let alias = match alias_input.trim() {
            "" => Self::default_alias(column, position),
            typed => typed.to_string(),
        };
        self.insert(alias.clone(), column);
        alias
    }

    /// Bind the dependent column; blank input falls back to `Y`
    pub fn bind_dependent(&mut self, alias_input: &str, column: &str) -> String {
        let alias = match alias_input.trim() {
            "" => DEFAULT_DEPENDENT_ALIAS.to_string(),
            typed => typed.to_string(),
        };
        self.insert(alias.clone(), column);
        alias
    }

    /// Column bound to `alias`, checked against the dataset
    pub fn resolve<'a>(&'a self, alias: &str, frame: &DataFrame) -> Result<&'a str> {
        let column = self
            .get(alias)
            .ok_or_else(|| CanopyError::alias(alias, "no column is bound to this alias"))?;
        if !frame.has_column(column) {
            return Err(CanopyError::alias(
                alias,
                format!("column '{column}' is not in the dataset"),
            ));
        }
        Ok(column)
    }
}

impl<A: Into<String>, C: Into<String>> FromIterator<(A, C)> for AliasMap {
    fn from_iter<T: IntoIterator<Item = (A, C)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().map(|(a, c)| (a.into(), c.into())).collect(),
        }
    }
}
