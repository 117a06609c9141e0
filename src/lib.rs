// Correctness and logic
#![warn(clippy::unit_cmp)] // Detects comparing unit types
#![warn(clippy::match_same_arms)]
// Duplicate match arms

// Performance-focused
#![warn(clippy::inefficient_to_string)] // `format!("{}", x)` vs `x.to_string()`
#![warn(clippy::map_clone)] // Cloning inside `map()` unnecessarily
#![warn(clippy::unnecessary_to_owned)] // Detects redundant `.to_owned()` or `.clone()`
#![warn(clippy::needless_collect)] // Avoids `.collect().iter()` chains

// Style and idiomatic Rust
#![warn(clippy::redundant_clone)] // Detects unnecessary `.clone()`
#![warn(clippy::identity_op)] // e.g., `x + 0`, `x * 1`
#![warn(clippy::needless_return)] // Avoids `return` at the end of functions
#![warn(clippy::manual_map)] // Use `.map()` instead of manual `match`
#![warn(clippy::unwrap_used)] // Avoids using `unwrap()`

// Maintainability
#![warn(clippy::missing_panics_doc)] // Docs for functions that might panic
#![warn(clippy::missing_const_for_fn)] // Suggests making eligible functions `const`
#![deny(missing_docs)] // Documentation is a must for release

//! # mathplot
//!
//! Safe evaluation of user-supplied algebraic expressions and a plot
//! specification interpreter that turns loosely structured JSON chart
//! descriptions into a renderer-agnostic [`Scene`].
//!
//! ## Installation
//!
//! ```toml
//! [dependencies]
//! mathplot = "0.1.0"
//! ```
//!
//! ## Features
//!
//! - `plotly-export` (default): the [`render`] module, which converts a
//!   [`Scene`] into a `plotly::Plot` and its JSON figure object.
//!
//! ## Expressions
//!
//! Expressions use `+ - * / ^`, parentheses, the constants `pi` and `e`, the
//! variables `x` (and `y` for two-variable functions) and a fixed set of
//! functions (`sin`, `sqrt`, `log`, `min`, `pow`, ...). Anything else is
//! rejected before evaluation.
//!
//! ```rust
//! use mathplot::{Arity, CompileError, compile};
//!
//! let f = compile("x^2 + 1", Arity::One).unwrap();
//! assert_eq!(f.evaluate(3.0, 0.0), Some(10.0));
//!
//! // Division by zero is "no value", not an error.
//! let g = compile("1/x", Arity::One).unwrap();
//! assert_eq!(g.evaluate(0.0, 0.0), None);
//!
//! assert!(matches!(
//!     compile("x; drop", Arity::One),
//!     Err(CompileError::IllegalCharacter { character: ';', .. })
//! ));
//! ```
//!
//! ## Plot specifications
//!
//! ```rust
//! use mathplot::{Interpreter, Projection, TraceKind};
//!
//! let scene = Interpreter::default()
//!     .interpret_json(r#"{
//!         "plotType": "surface",
//!         "xRange": [-2, 2],
//!         "yRange": [-2, 2],
//!         "grid": { "nx": 20, "ny": 20 },
//!         "function": "x^2 - y^2"
//!     }"#)
//!     .unwrap();
//!
//! assert_eq!(scene.trace_kinds(), vec![TraceKind::HeightField]);
//! assert_eq!(scene.layout.projection, Projection::Volumetric);
//! ```
//!
//! ## Error Handling
//!
//! Expression problems are [`CompileError`]s. Specification problems are
//! [`InterpretError`]s; a function that fails to compile inside an otherwise
//! valid specification is logged through `tracing` and only loses its own
//! trace.
//!
//! ```rust
//! use mathplot::{InterpretError, Interpreter};
//!
//! let err = Interpreter::default()
//!     .interpret_json(r#"{ "plotType": "polygon", "polygon": [{ "x": 0, "y": 0 }] }"#)
//!     .unwrap_err();
//! assert!(matches!(err, InterpretError::MissingGeometry(_)));
//! println!("{}", err.fallback_message());
//! ```

pub mod error;
pub mod expression;
pub mod interpreter;
#[cfg(feature = "plotly-export")]
pub mod render;
pub mod sampling;
pub mod scene;
pub mod spec;

pub use error::{CompileError, CompileResult, InterpretError, PlotResult};
pub use expression::{Arity, CompiledFunction, compile};
pub use interpreter::{Interpreter, InterpreterConfig, TraceNames, interpret};
pub use sampling::AxisRange;
pub use scene::{Layout, Projection, Scene, Trace, TraceKind};
pub use spec::{
    Coord, CurveSpec, FieldSpec, FunctionEntry, Geometry, OverlayPoint, PlotKind,
    PlotSpecification, RawPlotSpec, SolverResponse,
};
