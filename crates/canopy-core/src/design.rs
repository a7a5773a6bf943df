//! Design-matrix construction from a right-hand side
//!
//! Every additive term becomes one column: the intercept is a column of
//! ones, any other term is its coefficient-free expression evaluated over
//! the alias-bound data columns. Rows where any column is non-finite are
//! dropped, and the surviving rows are later intersected with the rows where
//! the response is finite.

use ndarray::{Array1, Array2, Axis};

use crate::alias::AliasMap;
use crate::data::{DataFrame, Matrix};
use crate::error::{CanopyError, Result};
use crate::formula::{
    Environment, Expr, ExprParser, RESERVED_NAMES, Term, TermKind, is_coefficient, terms_of,
};

/// Fewest rows a regression can be fitted on
pub const MIN_FIT_ROWS: usize = 3;

/// A design matrix together with the dataset rows it was built from
#[derive(Debug, Clone, PartialEq)]
pub struct DesignMatrix {
    /// One row per observation, one column per term
    pub matrix: Matrix,
    /// Column labels, `const` for the intercept
    pub labels: Vec<String>,
    pub has_intercept: bool,
    /// Positions of the used rows within the source dataset
    pub positions: Vec<usize>,
    /// Row labels of the used rows
    pub rows: Vec<usize>,
}

impl DesignMatrix {
    pub fn nrows(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.matrix.ncols()
    }

    /// Keep only the rows where `response` (indexed like the source dataset)
    /// is finite, returning the aligned matrix and response vector.
    pub fn align(&self, response: &Array1<f64>) -> Result<(DesignMatrix, Array1<f64>)> {
        let keep: Vec<usize> = (0..self.nrows())
            .filter(|&i| {
                response
                    .get(self.positions[i])
                    .is_some_and(|v| v.is_finite())
            })
            .collect();

        if keep.len() < MIN_FIT_ROWS {
            return Err(CanopyError::InsufficientData {
                stage: "after aligning the response",
                remaining: keep.len(),
                required: MIN_FIT_ROWS,
            });
        }

        let y: Array1<f64> = keep.iter().map(|&i| response[self.positions[i]]).collect();
        let aligned = DesignMatrix {
            matrix: self.matrix.select(Axis(0), &keep),
            labels: self.labels.clone(),
            has_intercept: self.has_intercept,
            positions: keep.iter().map(|&i| self.positions[i]).collect(),
            rows: keep.iter().map(|&i| self.rows[i]).collect(),
        };

        if aligned.nrows() < self.nrows() {
            log::debug!(
                "{} row(s) dropped for a non-finite response",
                self.nrows() - aligned.nrows()
            );
        }
        Ok((aligned, y))
    }
}

/// Build the design matrix of a right-hand side over a (screened) dataset
pub fn build_design_matrix(rhs: &str, aliases: &AliasMap, frame: &DataFrame) -> Result<DesignMatrix> {
    let expr = ExprParser::parse(rhs).map_err(|e| e.in_term(rhs))?;
    build_from_terms(&terms_of(&expr), aliases, frame)
}

/// Build the design matrix of already classified terms
pub fn build_from_terms(terms: &[Term], aliases: &AliasMap, frame: &DataFrame) -> Result<DesignMatrix> {
    let env = bind_symbols(terms.iter().filter_map(|t| match &t.kind {
        TermKind::Column(expr) => Some(expr),
        TermKind::Intercept => None,
    }), aliases, frame)?;

    let n = frame.nrows();
    let mut matrix = Array2::<f64>::zeros((n, terms.len()));
    let mut labels = Vec::with_capacity(terms.len());

    for (j, term) in terms.iter().enumerate() {
        let label = term.label();
        let column = match &term.kind {
            TermKind::Intercept => Array1::ones(n),
            TermKind::Column(expr) => {
                let column = expr.eval(&env).map_err(|e| e.in_term(&label))?.into_vector(n);
                if n > 0 && !column.iter().any(|v| v.is_finite()) {
                    return Err(CanopyError::term(&label, "no row produced a finite value"));
                }
                column
            }
        };
        matrix.column_mut(j).assign(&column);
        labels.push(label);
    }

    let keep: Vec<usize> = (0..n)
        .filter(|&i| matrix.row(i).iter().all(|v| v.is_finite()))
        .collect();
    if keep.len() < n {
        log::debug!("{} row(s) dropped for non-finite term values", n - keep.len());
    }

    if keep.len() < MIN_FIT_ROWS {
        return Err(CanopyError::InsufficientData {
            stage: "after evaluating the terms",
            remaining: keep.len(),
            required: MIN_FIT_ROWS,
        });
    }

    Ok(DesignMatrix {
        matrix: matrix.select(Axis(0), &keep),
        has_intercept: terms.iter().any(Term::is_intercept),
        labels,
        rows: keep.iter().map(|&i| frame.index()[i]).collect(),
        positions: keep,
    })
}

/// Bind every alias referenced by `exprs` to its numeric column. Reserved
/// names and coefficient placeholders are left for the caller (unbound, they
/// fail at evaluation).
pub fn bind_symbols<'a>(
    exprs: impl IntoIterator<Item = &'a Expr>,
    aliases: &AliasMap,
    frame: &DataFrame,
) -> Result<Environment> {
    let mut env = Environment::new();
    for expr in exprs {
        for symbol in expr.symbols() {
            if RESERVED_NAMES.contains(&symbol) || is_coefficient(symbol) || env.get(symbol).is_some() {
                continue;
            }
            let column = aliases.resolve(symbol, frame)?;
            env.bind_vector(symbol, frame.float_column(column)?);
        }
    }
    Ok(env)
}
