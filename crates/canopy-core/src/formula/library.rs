//! Named equation presets

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::term::is_coefficient;

/// Classical forestry equation forms shipped with the library
pub const BUILTIN_PRESETS: &[(&str, &str)] = &[
    ("Linear Simples", "Y = b0 + b1*DAP"),
    ("Linear Múltiplo", "Y = b0 + b1*DAP + b2*HT"),
    ("Schumacher-Hall (Log)", "ln(Y) = b0 + b1*ln(DAP) + b2*ln(HT)"),
    ("Spurr (Potência)", "Y = b0 + b1 * (DAP**2 * HT)"),
    ("Hipsométrica (Log-Lin)", "ln(HT) = b0 + b1 * (1/DAP)"),
    ("Polinomial Quadrática", "Y = b0 + b1*DAP + b2*(DAP**2)"),
];

/// Ordered collection of named formulas
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EquationLibrary {
    presets: IndexMap<String, String>,
}

impl Default for EquationLibrary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl EquationLibrary {
    /// The built-in presets only
    pub fn builtin() -> Self {
        Self {
            presets: BUILTIN_PRESETS
                .iter()
                .map(|(name, formula)| (name.to_string(), formula.to_string()))
                .collect(),
        }
    }

    /// An empty library
    pub fn empty() -> Self {
        Self {
            presets: IndexMap::new(),
        }
    }

    /// Add or overwrite a preset
    pub fn insert(&mut self, name: impl Into<String>, formula: impl Into<String>) {
        self.presets.insert(name.into(), formula.into());
    }

    /// Add every preset of `extra`, overwriting on name clashes
    pub fn merge<I, N, F>(&mut self, extra: I)
    where
        I: IntoIterator<Item = (N, F)>,
        N: Into<String>,
        F: Into<String>,
    {
        for (name, formula) in extra {
            self.insert(name, formula);
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.presets.get(name).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.presets.iter().map(|(n, f)| (n.as_str(), f.as_str()))
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

/// Coefficient placeholders (`b0`, `b1`, ...) named in a formula, sorted and
/// without repeats
pub fn coefficient_placeholders(formula: &str) -> Vec<String> {
    let mut found: Vec<String> = identifier_tokens(formula)
        .filter(|token| is_coefficient(token))
        .map(str::to_string)
        .collect();
    found.sort_by_key(|name| (name[1..].parse::<u64>().unwrap_or(u64::MAX), name.clone()));
    found.dedup();
    found
}

/// Identifier-like tokens of free text. Tokens starting with a digit are
/// numbers (`2e5`, `10`) and are skipped whole.
pub(crate) fn identifier_tokens(text: &str) -> impl Iterator<Item = &str> {
    let mut tokens = Vec::new();
    let mut start: Option<(usize, bool)> = None;

    for (i, c) in text.char_indices() {
        let word_char = c.is_alphanumeric() || c == '_';
        match (start, word_char) {
            (None, true) => start = Some((i, c.is_ascii_digit())),
            (Some((s, numeric)), false) => {
                if !numeric {
                    tokens.push(&text[s..i]);
                }
                start = None;
            }
            _ => {}
        }
    }
    if let Some((s, false)) = start {
        tokens.push(&text[s..]);
    }

    tokens.into_iter()
}
