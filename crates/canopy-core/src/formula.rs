//! Allometric equation parsing
//!
//! An equation has the shape `[ln(]Y[)] = EXPR`. The left side names the
//! dependent alias, optionally wrapped in `ln( )`. The right side is an
//! arithmetic expression over aliases, numeric literals, coefficient
//! placeholders (`b0`, `b1`, ...) and the functions `ln`, `log`, `exp` and
//! `sqrt`.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexSet;

use crate::error::{CanopyError, Result};

pub mod error;
pub mod expr;
pub mod library;
mod parser;
pub mod term;


pub use error::{FormulaError, FormulaResult};
pub use expr::{Environment, Expr, Function, Value};
pub use library::{EquationLibrary, coefficient_placeholders};
pub use parser::ExprParser;
pub use term::{INTERCEPT_LABEL, Term, TermKind, additive_terms, is_coefficient, terms_of};

/// Identifiers never treated as aliases on the right-hand side
pub const RESERVED_NAMES: &[&str] = &[
    "ln", "log", "exp", "sqrt", "pow", "pi", "e", "sin", "cos", "tan",
];

/// A parsed equation
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    /// Equation text as given
    pub original: String,
    /// Alias of the dependent variable
    pub dependent: String,
    /// Whether the dependent variable is wrapped in `ln( )`
    pub is_log: bool,
    /// Right-hand side text, trimmed
    pub rhs_text: String,
    /// Parsed right-hand side
    pub rhs: Expr,
    /// Aliases referenced on the right-hand side, in order of appearance
    pub independent: IndexSet<String>,
}

impl Formula {
    /// Parse an equation
    pub fn parse(text: &str) -> Result<Self> {
        let mut sides = text.split('=');
        let (lhs, rhs_text) = match (sides.next(), sides.next(), sides.next()) {
            (Some(lhs), Some(rhs), None) => (lhs.trim(), rhs.trim()),
            (_, None, _) => {
                return Err(CanopyError::Format(
                    "the equation must contain an '=' sign".to_string(),
                ));
            }
            _ => {
                return Err(CanopyError::Format(
                    "the equation must contain exactly one '=' sign".to_string(),
                ));
            }
        };

        let (dependent, is_log) = parse_dependent(lhs)?;

        let rhs = ExprParser::parse(rhs_text).map_err(|e| e.in_term(rhs_text))?;
        let independent = independent_symbols(rhs_text);

        Ok(Self {
            original: text.to_string(),
            dependent,
            is_log,
            rhs_text: rhs_text.to_string(),
            rhs,
            independent,
        })
    }

    /// Additive terms of the right-hand side, deduplicated by label
    pub fn terms(&self) -> Vec<Term> {
        terms_of(&self.rhs)
    }

    /// Coefficient placeholders named on the right-hand side
    pub fn coefficients(&self) -> Vec<String> {
        coefficient_placeholders(&self.rhs_text)
    }

    /// Every alias the equation needs, dependent first
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.dependent.as_str()).chain(
            self.independent
                .iter()
                .map(String::as_str)
                .filter(move |s| *s != self.dependent),
        )
    }

    /// Left-hand side as written in fitted equations, `ln(Y)` or `Y`
    pub fn lhs_display(&self) -> String {
        if self.is_log {
            format!("ln({})", self.dependent)
        } else {
            self.dependent.clone()
        }
    }
}

fn parse_dependent(lhs: &str) -> Result<(String, bool)> {
    let (symbol, is_log) = if lhs.to_lowercase().starts_with("ln(") && lhs.ends_with(')') {
        (lhs[3..lhs.len() - 1].trim(), true)
    } else {
        (lhs, false)
    };

    let valid = symbol
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && symbol.chars().all(|c| c.is_alphanumeric() || c == '_');

    if !valid {
        return Err(CanopyError::Format(format!(
            "unrecognised left-hand side '{lhs}', expected an alias or ln(alias)"
        )));
    }

    Ok((symbol.to_string(), is_log))
}

/// Identifier tokens of the right-hand side that name aliases. Intercept
/// spellings (`const`, `intercept`) are not aliases either.
fn independent_symbols(rhs: &str) -> IndexSet<String> {
    library::identifier_tokens(rhs)
        .filter(|token| !RESERVED_NAMES.contains(token) && !is_coefficient(token))
        .filter(|token| !term::is_intercept_name(token))
        .map(str::to_string)
        .collect()
}

impl FromStr for Formula {
    type Err = CanopyError;

    fn from_str(s: &str) -> Result<Self> {
        Formula::parse(s)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.lhs_display(), self.rhs)
    }
}
