//! Error types and result utilities for expression compilation and plot interpretation.

use thiserror::Error;

/// Convenience type alias for results that may contain a [`CompileError`].
pub type CompileResult<T> = Result<T, CompileError>;

/// Convenience type alias for results that may contain an [`InterpretError`].
pub type PlotResult<T> = Result<T, InterpretError>;

/// Errors raised while turning an expression string into a [`CompiledFunction`].
///
/// [`CompiledFunction`]: crate::expression::CompiledFunction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// The expression is empty or contains only whitespace.
    #[error("Invalid expression: expression is empty")]
    Invalid,

    /// The expression contains a character outside the allow-list.
    ///
    /// Carries the first offending character and its byte offset.
    #[error("Illegal character {character:?} at position {position}")]
    IllegalCharacter {
        /// The rejected character.
        character: char,
        /// Byte offset of the character in the input.
        position: usize,
    },

    /// The expression is made of legal characters but is not well formed.
    #[error("Syntax error at position {position}: {message}")]
    Syntax {
        /// What the parser expected or found.
        message: String,
        /// Byte offset where the problem was detected.
        position: usize,
    },

    /// An identifier that is neither a bound variable, a constant, nor a known function.
    #[error("Unknown identifier '{name}' at position {position}")]
    UnknownIdentifier {
        /// The identifier as written.
        name: String,
        /// Byte offset of the identifier.
        position: usize,
    },

    /// A known function was called with the wrong number of arguments.
    #[error("Function '{function}' expects {expected} argument(s), found {found}")]
    ArgumentCount {
        /// Canonical (lowercase) function name.
        function: String,
        /// Number of arguments the function accepts.
        expected: usize,
        /// Number of arguments supplied.
        found: usize,
    },

    /// The expression exceeds the length or nesting limits.
    #[error("Expression too complex: {0}")]
    TooComplex(String),
}

/// Errors raised while interpreting a plot specification.
///
/// These are structural failures: each one aborts interpretation of the whole
/// specification. Failures of a single function inside a multi-function plot
/// are not reported here; that function's trace is dropped instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InterpretError {
    /// Required coordinate data is absent, too short, or contains non-finite values.
    #[error("Missing geometry: {0}")]
    MissingGeometry(String),

    /// A function plot carries no usable expression. Holds the plot kind.
    #[error("No functions supplied for {0} plot")]
    NoFunctions(String),

    /// A surface or contour expression references `z`. Holds the expression.
    #[error("Unsupported implicit surface: '{0}' must have the form z = f(x, y) without using z")]
    UnsupportedImplicitSurface(String),

    /// The plot kind is not recognised. Holds the offending value.
    #[error("Unsupported plot kind: \"{0}\"")]
    UnsupportedKind(String),

    /// A range is malformed or has non-finite bounds.
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// The payload could not be decoded as a specification object.
    #[error("Could not decode plot specification: {0}")]
    Decode(String),

    /// A scene could not be serialized into a renderer's figure format.
    #[error("Could not export figure: {0}")]
    Export(String),
}

impl InterpretError {
    /// Message suitable for a "could not plot" fallback next to the textual answer.
    pub fn fallback_message(&self) -> String {
        format!("could not plot: {self}")
    }
}
