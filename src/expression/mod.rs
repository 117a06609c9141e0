//! Expression compiler for the restricted algebraic grammar.
//!
//! An expression string is checked against a strict character allow-list,
//! tokenized, parsed into a small tree and evaluated by walking that tree.
//! Nothing is ever handed to a host evaluator, so the allow-list is a second
//! line of defence rather than the only one.
//!
//! ```rust
//! use mathplot::expression::{Arity, compile};
//!
//! let f = compile("x^2 + 1", Arity::One).unwrap();
//! assert_eq!(f.evaluate(3.0, 0.0), Some(10.0));
//!
//! let g = compile("1 / x", Arity::One).unwrap();
//! assert_eq!(g.evaluate(0.0, 0.0), None);
//! ```
//!
//! Supported functions (case-insensitive): `sin cos tan asin acos atan sinh
//! cosh tanh exp log sqrt abs floor ceil round pow min max`. Constants: `pi`
//! (any case) and `e`.

mod ast;
mod lexer;
mod parser;

use crate::error::{CompileError, CompileResult};
use ast::Expr;
use parser::Parser;

/// Longest accepted expression, in bytes.
pub const MAX_EXPRESSION_LEN: usize = 4096;

/// Deepest accepted nesting of parentheses, calls, signs and exponents.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Number of free variables a compiled function binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// `f(x)`
    One,
    /// `f(x, y)`
    Two,
}

impl Arity {
    /// Variable names bound under this arity.
    pub const fn variables(self) -> &'static [&'static str] {
        match self {
            Arity::One => &["x"],
            Arity::Two => &["x", "y"],
        }
    }
}

/// A pure, reusable evaluator produced by [`compile`].
///
/// Evaluation never panics. Out-of-domain inputs, division by zero and
/// overflow all surface as `None` from [`evaluate`](Self::evaluate).
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFunction {
    source: String,
    arity: Arity,
    root: Expr,
}

impl CompiledFunction {
    /// The expression text this function was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The declared arity.
    pub const fn arity(&self) -> Arity {
        self.arity
    }

    /// Evaluates at `(x, y)` and returns the raw result, which may be NaN or infinite.
    ///
    /// `y` is ignored for single-variable functions.
    pub fn evaluate_raw(&self, x: f64, y: f64) -> f64 {
        self.root.eval(x, y)
    }

    /// Evaluates at `(x, y)`, mapping non-finite results to `None`.
    pub fn evaluate(&self, x: f64, y: f64) -> Option<f64> {
        finite(self.evaluate_raw(x, y))
    }

    /// Evaluates a single-variable function over `xs`.
    pub fn sample(&self, xs: &[f64]) -> Vec<Option<f64>> {
        xs.iter().map(|&x| self.evaluate(x, 0.0)).collect()
    }
}

/// Compiles `expr` into a function of the given arity.
///
/// Checks run in order: empty input ([`CompileError::Invalid`]), the character
/// allow-list ([`CompileError::IllegalCharacter`]), size limits, then syntax
/// and name resolution.
pub fn compile(expr: &str, arity: Arity) -> CompileResult<CompiledFunction> {
    if expr.trim().is_empty() {
        return Err(CompileError::Invalid);
    }
    lexer::check_allowed(expr)?;
    if expr.len() > MAX_EXPRESSION_LEN {
        return Err(CompileError::TooComplex(format!(
            "expression longer than {MAX_EXPRESSION_LEN} bytes"
        )));
    }

    let tokens = lexer::tokenize(expr)?;
    let root = Parser::new(&tokens, arity, expr.len()).parse()?;

    Ok(CompiledFunction {
        source: expr.to_string(),
        arity,
        root,
    })
}

/// Whether `expr` contains `name` as a whole word, ignoring ASCII case.
///
/// Word characters are ASCII alphanumerics and `_`, so `z` matches in `x + z`
/// and `Z*2` but not in `zeta` or `2z`.
pub fn mentions_identifier(expr: &str, name: &str) -> bool {
    expr.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .any(|word| word.eq_ignore_ascii_case(name))
}

/// `Some(v)` when `v` is finite.
pub fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}
