//! Additive terms of a right-hand side
//!
//! A right-hand side such as `b0 + b1*ln(DAP) - b2*(1/HT)` is split into
//! its top-level additive terms, and each term has its coefficient stripped
//! to obtain the expression that becomes a design-matrix column.

use std::fmt;

use indexmap::IndexSet;

use crate::formula::expr::{BinaryOp, Expr};

/// Label of the intercept column
pub const INTERCEPT_LABEL: &str = "const";

/// Whether a symbol is a coefficient placeholder (`b0`, `b1`, ...)
pub fn is_coefficient(name: &str) -> bool {
    name.strip_prefix('b')
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
}

pub(crate) fn is_intercept_name(name: &str) -> bool {
    is_coefficient(name) || ["b0", "const", "intercept"].contains(&name.to_lowercase().as_str())
}

/// What a term contributes to the design matrix
#[derive(Debug, Clone, PartialEq)]
pub enum TermKind {
    /// A constant column of ones
    Intercept,
    /// A column computed from the expression
    Column(Expr),
}

/// One additive term of a right-hand side
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    /// The term as written, coefficient included
    pub source: Expr,
    pub kind: TermKind,
}

impl Term {
    /// Classify a single additive term
    pub fn from_expr(source: Expr) -> Self {
        let kind = strip_coefficient(&source);
        Self { source, kind }
    }

    /// Column label: `const` for the intercept, otherwise the stripped
    /// expression
    pub fn label(&self) -> String {
        match &self.kind {
            TermKind::Intercept => INTERCEPT_LABEL.to_string(),
            TermKind::Column(expr) => expr.to_string(),
        }
    }

    pub fn is_intercept(&self) -> bool {
        matches!(self.kind, TermKind::Intercept)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// Additive terms of a right-hand side, classified and deduplicated by
/// label (first occurrence wins)
pub fn terms_of(expr: &Expr) -> Vec<Term> {
    let mut labels = IndexSet::new();
    additive_terms(expr)
        .into_iter()
        .map(Term::from_expr)
        .filter(|term| labels.insert(term.label()))
        .collect()
}

/// Split an expression into its top-level additive terms. Subtraction
/// negates the right operand; negation distributes over sums.
pub fn additive_terms(expr: &Expr) -> Vec<Expr> {
    let mut out = Vec::new();
    collect_terms(expr, false, &mut out);
    out
}

fn collect_terms(expr: &Expr, negate: bool, out: &mut Vec<Expr>) {
    match expr {
        Expr::Binary {
            op: BinaryOp::Add,
            lhs,
            rhs,
        } => {
            collect_terms(lhs, negate, out);
            collect_terms(rhs, negate, out);
        }
        Expr::Binary {
            op: BinaryOp::Sub,
            lhs,
            rhs,
        } => {
            collect_terms(lhs, negate, out);
            collect_terms(rhs, !negate, out);
        }
        Expr::Neg(inner) => collect_terms(inner, !negate, out),
        other if negate => out.push(Expr::neg(other.clone())),
        other => out.push(other.clone()),
    }
}

/// Remove the coefficient from a term.
///
/// Leading numeric literals are dropped from the product chain, as is every
/// coefficient placeholder in it. A quotient keeps its denominator and has
/// its numerator stripped the same way, so `b1*DAP/HT` becomes `DAP/HT` and
/// `b1*1/DAP` becomes `1/DAP`. A sign is dropped too, since it is absorbed
/// by the fitted coefficient. Nothing left, or a lone `b0`/`const`/
/// `intercept`, means the intercept.
pub fn strip_coefficient(term: &Expr) -> TermKind {
    let term = match term {
        Expr::Neg(inner) => inner.as_ref(),
        other => other,
    };

    let mut remaining = stripped_factors(term);
    match remaining.as_slice() {
        [] => TermKind::Intercept,
        [Expr::Symbol(name)] if is_intercept_name(name) => TermKind::Intercept,
        _ => {
            let first = remaining.remove(0);
            TermKind::Column(product(first, remaining))
        }
    }
}

fn stripped_factors(expr: &Expr) -> Vec<Expr> {
    let mut factors = Vec::new();
    flatten_product(expr, &mut factors);
    factors
        .into_iter()
        .skip_while(|f| matches!(f, Expr::Number(_)))
        .filter(|f| !matches!(f, Expr::Symbol(name) if is_coefficient(name)))
        .collect()
}

fn product(first: Expr, rest: Vec<Expr>) -> Expr {
    rest.into_iter()
        .fold(first, |acc, f| Expr::binary(BinaryOp::Mul, acc, f))
}

fn flatten_product(expr: &Expr, out: &mut Vec<Expr>) {
    match expr {
        Expr::Binary {
            op: BinaryOp::Mul,
            lhs,
            rhs,
        } => {
            flatten_product(lhs, out);
            flatten_product(rhs, out);
        }
        Expr::Binary {
            op: BinaryOp::Div,
            lhs,
            rhs,
        } => {
            let mut numerator = stripped_factors(lhs);
            let numerator = if numerator.is_empty() {
                Expr::Number(1.0)
            } else {
                let first = numerator.remove(0);
                product(first, numerator)
            };
            out.push(Expr::binary(BinaryOp::Div, numerator, rhs.as_ref().clone()));
        }
        other => out.push(other.clone()),
    }
}
