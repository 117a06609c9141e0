//! Plot specification interpreter.
//!
//! Turns a validated [`PlotSpecification`] into a [`Scene`]. Literal
//! geometry (points, lines, rectangles, polygons) is copied into traces;
//! function plots are compiled and sampled over uniform grids.
//!
//! ```rust
//! use mathplot::{Interpreter, TraceKind};
//! use serde_json::json;
//!
//! let scene = Interpreter::default()
//!     .interpret_value(&json!({
//!         "kind": "curve2d",
//!         "xRange": [-1, 1],
//!         "functions": [{ "expression": "x^2", "label": "parabola" }]
//!     }))
//!     .unwrap();
//!
//! assert_eq!(scene.trace_kinds(), vec![TraceKind::Polyline]);
//! assert_eq!(scene.layout.x_range.unwrap().to_array(), [-1.0, 1.0]);
//! ```
//!
//! The interpreter holds only its configuration; every call allocates its own
//! working state, so one instance can serve any number of threads.

mod config;
mod functions;
mod geometry;

use serde_json::Value;
use tracing::debug;

use crate::error::PlotResult;
use crate::sampling::AxisRange;
use crate::scene::{Layout, MarkerSet, Projection, Scene, Trace};
use crate::spec::{Geometry, OverlayPoint, PlotSpecification, SolverResponse};

pub use config::{DEFAULT_CURVE_SAMPLES, DEFAULT_FIELD_SAMPLES, InterpreterConfig, TraceNames};

/// Traces and axis metadata produced by one geometry variant.
struct Draft {
    traces: Vec<Trace>,
    x_range: Option<AxisRange>,
    y_range: Option<AxisRange>,
    projection: Projection,
}

impl Draft {
    const fn planar(traces: Vec<Trace>, x_range: AxisRange, y_range: AxisRange) -> Self {
        Self {
            traces,
            x_range: Some(x_range),
            y_range: Some(y_range),
            projection: Projection::Planar,
        }
    }
}

/// Converts plot specifications into scenes.
#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    config: InterpreterConfig,
}

impl Interpreter {
    /// Creates an interpreter with the given configuration.
    pub const fn new(config: InterpreterConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub const fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Builds the scene for `spec`.
    ///
    /// Structural problems return an error for the whole specification. A
    /// function that fails to compile only loses its own trace.
    pub fn interpret(&self, spec: &PlotSpecification) -> PlotResult<Scene> {
        spec.validate()?;

        let overlays: Vec<&OverlayPoint> = spec.overlay_points().collect();
        debug!(kind = %spec.kind(), overlays = overlays.len(), "interpreting plot specification");

        let draft = match &spec.geometry {
            Geometry::Point { fallback } => self.point(*fallback, &overlays),
            Geometry::Points => self.points(&overlays),
            Geometry::Line { vertices } => self.line(vertices, &overlays),
            Geometry::Rect { x, y } => self.rect(*x, *y, &overlays),
            Geometry::Polygon { vertices } => self.polygon(vertices, &overlays),
            Geometry::Curve(curve) => self.curve(curve, &overlays),
            Geometry::Surface(field) => self.surface(field, &overlays),
            Geometry::Contour(field) => self.contour(field, &overlays),
        };

        let title = spec
            .title
            .clone()
            .unwrap_or_else(|| self.config.names.default_title.clone());

        Ok(Scene {
            traces: draft.traces,
            layout: Layout {
                title,
                x_range: draft.x_range,
                y_range: draft.y_range,
                projection: draft.projection,
            },
        })
    }

    /// Decodes a JSON specification object and builds its scene.
    pub fn interpret_value(&self, value: &Value) -> PlotResult<Scene> {
        self.interpret(&PlotSpecification::from_value(value)?)
    }

    /// Parses a JSON specification document and builds its scene.
    pub fn interpret_json(&self, json: &str) -> PlotResult<Scene> {
        self.interpret(&PlotSpecification::from_json(json)?)
    }

    /// Builds the scene for a solver response, or `None` when it carries no specification.
    pub fn interpret_response(&self, response: &SolverResponse) -> Option<PlotResult<Scene>> {
        response
            .specification()
            .map(|spec| spec.and_then(|spec| self.interpret(&spec)))
    }

    /// Marker set for overlay points, or `None` when there are none.
    fn overlay_markers(&self, overlays: &[&OverlayPoint]) -> Option<Trace> {
        if overlays.is_empty() {
            return None;
        }
        Some(Trace::Markers(MarkerSet {
            name: self.config.names.points.clone(),
            x: overlays.iter().map(|p| p.x).collect(),
            y: overlays.iter().map(|p| p.y).collect(),
            labels: overlays
                .iter()
                .map(|p| p.label.clone().unwrap_or_default())
                .collect(),
        }))
    }
}

/// Builds the scene for `spec` with the default configuration.
pub fn interpret(spec: &PlotSpecification) -> PlotResult<Scene> {
    Interpreter::default().interpret(spec)
}
