//! Arithmetic expression trees and their vectorised evaluation
//!
//! Expressions are built by [`super::parser::ExprParser`] and evaluated
//! against an [`Environment`] that binds symbols to data columns or scalars.
//! Evaluation follows IEEE semantics: `ln` of a non-positive value or a
//! division by zero yields `NaN`/`inf` rather than an error, and the caller
//! decides what to do with non-finite results.

use std::collections::HashMap;
use std::fmt;

use ndarray::{Array1, Zip};

use super::error::{FormulaError, FormulaResult};

/// Binary operators, lowest precedence first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div => a / b,
            BinaryOp::Pow => a.powf(b),
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => " + ",
            BinaryOp::Sub => " - ",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "**",
        }
    }

    fn precedence(self) -> u8 {
        match self {
            BinaryOp::Add | BinaryOp::Sub => 1,
            BinaryOp::Mul | BinaryOp::Div => 2,
            BinaryOp::Pow => 4,
        }
    }
}

/// The supported function vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Ln,
    /// Natural logarithm, spelled `log`
    Log,
    Exp,
    Sqrt,
}

impl Function {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ln" => Some(Function::Ln),
            "log" => Some(Function::Log),
            "exp" => Some(Function::Exp),
            "sqrt" => Some(Function::Sqrt),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Function::Ln => "ln",
            Function::Log => "log",
            Function::Exp => "exp",
            Function::Sqrt => "sqrt",
        }
    }

    fn apply(self, x: f64) -> f64 {
        match self {
            Function::Ln | Function::Log => x.ln(),
            Function::Exp => x.exp(),
            Function::Sqrt => x.sqrt(),
        }
    }
}

/// An arithmetic expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Symbol(String),
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call { func: Function, arg: Box<Expr> },
}

const NEG_PRECEDENCE: u8 = 3;
const ATOM_PRECEDENCE: u8 = 5;

impl Expr {
    pub fn symbol(name: impl Into<String>) -> Self {
        Expr::Symbol(name.into())
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn call(func: Function, arg: Expr) -> Self {
        Expr::Call {
            func,
            arg: Box::new(arg),
        }
    }

    pub fn neg(inner: Expr) -> Self {
        Expr::Neg(Box::new(inner))
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Binary { op, .. } => op.precedence(),
            Expr::Neg(_) => NEG_PRECEDENCE,
            Expr::Number(v) if *v < 0.0 => NEG_PRECEDENCE,
            _ => ATOM_PRECEDENCE,
        }
    }

    /// Evaluate over an environment
    pub fn eval(&self, env: &Environment) -> FormulaResult<Value> {
        match self {
            Expr::Number(v) => Ok(Value::Scalar(*v)),
            Expr::Symbol(name) => env
                .get(name)
                .cloned()
                .ok_or_else(|| FormulaError::UnknownSymbol { name: name.clone() }),
            Expr::Neg(inner) => Ok(inner.eval(env)?.map(|x| -x)),
            Expr::Call { func, arg } => Ok(arg.eval(env)?.map(|x| func.apply(x))),
            Expr::Binary { op, lhs, rhs } => Value::combine(*op, lhs.eval(env)?, rhs.eval(env)?),
        }
    }

    /// Every symbol referenced, in first-appearance order
    pub fn symbols(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::Number(_) => {}
            Expr::Symbol(name) => {
                if !out.contains(&name.as_str()) {
                    out.push(name);
                }
            }
            Expr::Neg(inner) | Expr::Call { arg: inner, .. } => inner.collect_symbols(out),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.collect_symbols(out);
                rhs.collect_symbols(out);
            }
        }
    }

    fn fmt_child(&self, f: &mut fmt::Formatter<'_>, min_precedence: u8) -> fmt::Result {
        if self.precedence() < min_precedence {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(v) => write!(f, "{}", v),
            Expr::Symbol(name) => write!(f, "{}", name),
            Expr::Neg(inner) => {
                write!(f, "-")?;
                inner.fmt_child(f, NEG_PRECEDENCE)
            }
            Expr::Call { func, arg } => write!(f, "{}({})", func.name(), arg),
            Expr::Binary { op, lhs, rhs } => {
                let p = op.precedence();
                match op {
                    // right-associative, exponent may be signed
                    BinaryOp::Pow => {
                        lhs.fmt_child(f, p + 1)?;
                        write!(f, "{}", op.symbol())?;
                        rhs.fmt_child(f, NEG_PRECEDENCE)
                    }
                    _ => {
                        lhs.fmt_child(f, p)?;
                        write!(f, "{}", op.symbol())?;
                        rhs.fmt_child(f, p + 1)
                    }
                }
            }
        }
    }
}

/// Result of evaluating an expression
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(f64),
    Vector(Array1<f64>),
}

impl Value {
    fn map(self, f: impl Fn(f64) -> f64) -> Self {
        match self {
            Value::Scalar(x) => Value::Scalar(f(x)),
            Value::Vector(v) => Value::Vector(v.mapv_into(f)),
        }
    }

    fn combine(op: BinaryOp, lhs: Value, rhs: Value) -> FormulaResult<Value> {
        let value = match (lhs, rhs) {
            (Value::Scalar(a), Value::Scalar(b)) => Value::Scalar(op.apply(a, b)),
            (Value::Vector(a), Value::Scalar(b)) => Value::Vector(a.mapv_into(|x| op.apply(x, b))),
            (Value::Scalar(a), Value::Vector(b)) => Value::Vector(b.mapv_into(|x| op.apply(a, x))),
            (Value::Vector(a), Value::Vector(b)) => {
                if a.len() != b.len() {
                    return Err(FormulaError::LengthMismatch {
                        left: a.len(),
                        right: b.len(),
                    });
                }
                Value::Vector(Zip::from(&a).and(&b).map_collect(|&x, &y| op.apply(x, y)))
            }
        };
        Ok(value)
    }

    /// Broadcast to a column of `len` rows
    pub fn into_vector(self, len: usize) -> Array1<f64> {
        match self {
            Value::Scalar(x) => Array1::from_elem(len, x),
            Value::Vector(v) => v,
        }
    }
}

/// Symbol bindings used during evaluation
#[derive(Debug, Clone, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind_vector(&mut self, name: impl Into<String>, values: Array1<f64>) {
        self.values.insert(name.into(), Value::Vector(values));
    }

    pub fn bind_scalar(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), Value::Scalar(value));
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }
}
