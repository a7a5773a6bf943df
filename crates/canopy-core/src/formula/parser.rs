//! Recursive-descent parser for right-hand-side expressions
//!
//! Grammar:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | power
//! power   := primary ('**' unary)?
//! primary := number | ident | ident '(' expr ')' | '(' expr ')'
//! ```
//!
//! `**` binds tighter than unary minus on its left (`-x**2` is `-(x**2)`)
//! and is right-associative. Only `ln`, `log`, `exp` and `sqrt` may be
//! called.

use std::iter::Peekable;
use std::str::Chars;

use crate::formula::error::{FormulaError, FormulaResult};
use crate::formula::expr::{BinaryOp, Expr, Function};

/// Expression parser
pub struct ExprParser<'a> {
    chars: Peekable<Chars<'a>>,
    position: usize,
}

impl<'a> ExprParser<'a> {
    /// Create a new parser
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    /// Parse a complete expression
    pub fn parse(input: &str) -> FormulaResult<Expr> {
        let mut parser = ExprParser::new(input);

        parser.skip_whitespace();
        if parser.chars.peek().is_none() {
            return Err(FormulaError::syntax(0, "Empty expression"));
        }

        let expr = parser.parse_expr()?;

        parser.skip_whitespace();
        if parser.chars.peek().is_some() {
            let remaining: String = parser.chars.clone().collect();
            return Err(FormulaError::syntax_with_context(
                parser.position,
                "Trailing characters after expression",
                format!("Unexpected: '{}'", remaining),
            ));
        }

        Ok(expr)
    }

    fn parse_expr(&mut self) -> FormulaResult<Expr> {
        let mut lhs = self.parse_term()?;

        loop {
            self.skip_whitespace();
            let op = match self.peek_char() {
                Some('+') => BinaryOp::Add,
                Some('-') => BinaryOp::Sub,
                _ => break,
            };
            self.bump();
            let rhs = self.parse_term()?;
            lhs = Expr::binary(op, lhs, rhs);
        }

        Ok(lhs)
    }

    fn parse_term(&mut self) -> FormulaResult<Expr> {
        let mut lhs = self.parse_unary()?;

        loop {
            self.skip_whitespace();
            let op = match self.peek_char() {
                Some('*') if !self.at_power() => BinaryOp::Mul,
                Some('/') => BinaryOp::Div,
                _ => break,
            };
            self.bump();
            let rhs = self.parse_unary()?;
            lhs = Expr::binary(op, lhs, rhs);
        }

        Ok(lhs)
    }

    fn parse_unary(&mut self) -> FormulaResult<Expr> {
        self.skip_whitespace();

        match self.peek_char() {
            Some('-') => {
                self.bump();
                Ok(Expr::neg(self.parse_unary()?))
            }
            Some('+') => {
                self.bump();
                self.parse_unary()
            }
            _ => self.parse_power(),
        }
    }

    fn parse_power(&mut self) -> FormulaResult<Expr> {
        let base = self.parse_primary()?;

        self.skip_whitespace();
        if self.at_power() {
            self.bump();
            self.bump();
            let exponent = self.parse_unary()?;
            return Ok(Expr::binary(BinaryOp::Pow, base, exponent));
        }

        if self.peek_char() == Some('^') {
            return Err(FormulaError::syntax(
                self.position,
                "Unsupported operator '^', use '**' for powers",
            ));
        }

        Ok(base)
    }

    fn parse_primary(&mut self) -> FormulaResult<Expr> {
        self.skip_whitespace();

        match self.peek_char() {
            Some('(') => {
                self.bump();
                let inner = self.parse_expr()?;
                self.expect_close()?;
                Ok(inner)
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.parse_number(),
            Some(c) if c.is_alphabetic() || c == '_' => self.parse_identifier_or_call(),
            Some(c) => Err(FormulaError::syntax(
                self.position,
                format!("Unexpected character '{}'", c),
            )),
            None => Err(FormulaError::syntax(
                self.position,
                "Unexpected end of input, expected a value",
            )),
        }
    }

    fn parse_identifier_or_call(&mut self) -> FormulaResult<Expr> {
        let start = self.position;
        let ident = self.parse_identifier();

        self.skip_whitespace();
        if self.peek_char() != Some('(') {
            return Ok(Expr::Symbol(ident));
        }

        let func = Function::from_name(&ident).ok_or(FormulaError::UnknownFunction {
            name: ident.clone(),
            position: start,
        })?;

        self.bump();
        self.skip_whitespace();
        if self.peek_char() == Some(')') {
            return Err(FormulaError::syntax(
                self.position,
                format!("Function '{}' requires an argument", ident),
            ));
        }
        let arg = self.parse_expr()?;
        self.expect_close()?;

        Ok(Expr::call(func, arg))
    }

    /// Parse a numeric literal: digits, optional fraction, optional exponent
    fn parse_number(&mut self) -> FormulaResult<Expr> {
        let start = self.position;
        let mut literal = String::new();

        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() || c == '.' {
                literal.push(c);
                self.bump();
            } else {
                break;
            }
        }

        if matches!(self.peek_char(), Some('e' | 'E')) && self.exponent_follows() {
            literal.push('e');
            self.bump();
            if let Some(sign @ ('+' | '-')) = self.peek_char() {
                literal.push(sign);
                self.bump();
            }
            while let Some(c) = self.peek_char().filter(char::is_ascii_digit) {
                literal.push(c);
                self.bump();
            }
        }

        literal
            .parse::<f64>()
            .map(Expr::Number)
            .map_err(|_| FormulaError::syntax(start, format!("Invalid number '{}'", literal)))
    }

    fn parse_identifier(&mut self) -> String {
        let mut ident = String::new();
        while let Some(c) = self.peek_char() {
            if c.is_alphanumeric() || c == '_' {
                ident.push(c);
                self.bump();
            } else {
                break;
            }
        }
        ident
    }

    fn expect_close(&mut self) -> FormulaResult<()> {
        self.skip_whitespace();
        match self.peek_char() {
            Some(')') => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(FormulaError::syntax(
                self.position,
                format!("Expected ')', found '{}'", c),
            )),
            None => Err(FormulaError::syntax(
                self.position,
                "Unexpected end of input, expected ')'",
            )),
        }
    }

    /// Whether the next two characters are `**`
    fn at_power(&self) -> bool {
        let mut ahead = self.chars.clone();
        ahead.next() == Some('*') && ahead.next() == Some('*')
    }

    /// Whether an `e`/`E` at the cursor starts an exponent (`e5`, `e-3`)
    fn exponent_follows(&self) -> bool {
        let mut ahead = self.chars.clone();
        ahead.next();
        match ahead.next() {
            Some(c) if c.is_ascii_digit() => true,
            Some('+' | '-') => ahead.next().is_some_and(|c| c.is_ascii_digit()),
            _ => false,
        }
    }

    fn bump(&mut self) {
        if self.chars.next().is_some() {
            self.position += 1;
        }
    }

    /// Skip whitespace
    fn skip_whitespace(&mut self) {
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() {
                self.chars.next();
                self.position += 1;
            } else {
                break;
            }
        }
    }

    /// Peek at next character
    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }
}
