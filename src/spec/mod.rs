//! Typed plot specifications.
//!
//! A [`PlotSpecification`] is what the interpreter consumes. It is usually
//! produced by decoding the solver's loosely-typed JSON through
//! [`PlotSpecification::from_value`], which rejects structural problems up
//! front so that rendering code only ever sees well-formed variants.

mod decode;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{InterpretError, PlotResult};
use crate::expression::mentions_identifier;
use crate::sampling::AxisRange;

pub use decode::{RawPlotSpec, SolverResponse};

/// A literal `(x, y)` coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Coord {
    /// Creates a coordinate.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether both components are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A labelled marker drawn on top of the primary geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayPoint {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
    /// Optional text shown next to the marker.
    pub label: Option<String>,
}

impl OverlayPoint {
    /// Creates an unlabelled overlay point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y, label: None }
    }

    /// Attaches a label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Whether both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// One expression to plot, with an optional legend label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionEntry {
    /// Expression text in the restricted grammar.
    pub expression: String,
    /// Legend label.
    pub label: Option<String>,
}

impl FunctionEntry {
    /// Creates an unlabelled entry.
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            label: None,
        }
    }

    /// Attaches a legend label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// `y = f(x)` curves over an x interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveSpec {
    /// Sampled interval.
    pub x_range: AxisRange,
    /// Fixed y-axis range; `None` leaves scaling to the renderer.
    pub y_range: Option<AxisRange>,
    /// Functions of `x`, in drawing order.
    pub functions: Vec<FunctionEntry>,
    /// Requested sample count.
    pub samples: Option<usize>,
}

/// `z = f(x, y)` fields over a rectangular domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Sampled x interval.
    pub x_range: AxisRange,
    /// Sampled y interval.
    pub y_range: AxisRange,
    /// Functions of `x` and `y`, in drawing order.
    pub functions: Vec<FunctionEntry>,
    /// Requested samples along x.
    pub nx: Option<usize>,
    /// Requested samples along y.
    pub ny: Option<usize>,
}

/// Geometry of a plot, one variant per plot kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    /// A single marker: the first overlay point, or `fallback` when there is none.
    Point {
        /// Coordinate used when no overlay point is present.
        fallback: Coord,
    },
    /// The overlay points themselves.
    Points,
    /// An open polyline through at least two vertices.
    Line {
        /// Vertices in drawing order.
        vertices: Vec<Coord>,
    },
    /// An axis-aligned rectangle.
    Rect {
        /// Horizontal extent.
        x: AxisRange,
        /// Vertical extent.
        y: AxisRange,
    },
    /// A filled polygon with at least three vertices.
    Polygon {
        /// Vertices in ring order, without the closing repeat.
        vertices: Vec<Coord>,
    },
    /// Sampled curves.
    Curve(CurveSpec),
    /// Height fields rendered as 3-D surfaces.
    Surface(FieldSpec),
    /// Height fields rendered as contour lines.
    Contour(FieldSpec),
}

/// Plot kind tags, after alias normalisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotKind {
    /// `point`
    Point,
    /// `points`
    Points,
    /// `line`
    Line,
    /// `rect`
    Rect,
    /// `polygon`
    Polygon,
    /// `curve2d` (aliases `curve`, `2d`)
    Curve2d,
    /// `surface`
    Surface,
    /// `contour`
    Contour,
}

impl PlotKind {
    /// Parses a kind tag, ignoring case and surrounding whitespace.
    pub fn parse(raw: &str) -> PlotResult<Self> {
        let kind = match raw.trim().to_ascii_lowercase().as_str() {
            "point" => PlotKind::Point,
            "points" => PlotKind::Points,
            "line" => PlotKind::Line,
            "rect" => PlotKind::Rect,
            "polygon" => PlotKind::Polygon,
            "curve2d" | "curve" | "2d" => PlotKind::Curve2d,
            "surface" => PlotKind::Surface,
            "contour" => PlotKind::Contour,
            _ => return Err(InterpretError::UnsupportedKind(raw.to_string())),
        };
        Ok(kind)
    }

    /// Canonical tag.
    pub const fn as_str(self) -> &'static str {
        match self {
            PlotKind::Point => "point",
            PlotKind::Points => "points",
            PlotKind::Line => "line",
            PlotKind::Rect => "rect",
            PlotKind::Polygon => "polygon",
            PlotKind::Curve2d => "curve2d",
            PlotKind::Surface => "surface",
            PlotKind::Contour => "contour",
        }
    }
}

impl fmt::Display for PlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated description of what to draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotSpecification {
    /// Chart title.
    pub title: Option<String>,
    /// Markers drawn over the primary geometry.
    pub overlays: Vec<OverlayPoint>,
    /// Primary geometry.
    pub geometry: Geometry,
}

impl PlotSpecification {
    /// Creates a specification with no title and no overlays.
    pub const fn new(geometry: Geometry) -> Self {
        Self {
            title: None,
            overlays: Vec::new(),
            geometry,
        }
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Appends an overlay point.
    pub fn with_overlay(mut self, point: OverlayPoint) -> Self {
        self.overlays.push(point);
        self
    }

    /// The kind tag of the geometry.
    pub const fn kind(&self) -> PlotKind {
        match self.geometry {
            Geometry::Point { .. } => PlotKind::Point,
            Geometry::Points => PlotKind::Points,
            Geometry::Line { .. } => PlotKind::Line,
            Geometry::Rect { .. } => PlotKind::Rect,
            Geometry::Polygon { .. } => PlotKind::Polygon,
            Geometry::Curve(_) => PlotKind::Curve2d,
            Geometry::Surface(_) => PlotKind::Surface,
            Geometry::Contour(_) => PlotKind::Contour,
        }
    }

    /// Overlay points with finite coordinates, in input order.
    pub fn overlay_points(&self) -> impl Iterator<Item = &OverlayPoint> {
        self.overlays.iter().filter(|p| p.is_finite())
    }

    /// Decodes and validates a JSON specification object.
    pub fn from_value(value: &serde_json::Value) -> PlotResult<Self> {
        let raw = RawPlotSpec::from_value(value)?;
        Self::from_raw(&raw)
    }

    /// Parses, decodes and validates a JSON specification document.
    pub fn from_json(json: &str) -> PlotResult<Self> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| InterpretError::Decode(e.to_string()))?;
        Self::from_value(&value)
    }

    /// Builds the typed specification from its raw form and validates it.
    pub fn from_raw(raw: &RawPlotSpec) -> PlotResult<Self> {
        let spec = raw.to_specification()?;
        spec.validate()?;
        Ok(spec)
    }

    /// Checks the structural requirements of the geometry variant.
    ///
    /// Decoding runs this automatically; call it directly for specifications
    /// assembled by hand.
    pub fn validate(&self) -> PlotResult<()> {
        match &self.geometry {
            Geometry::Point { fallback } => {
                if self.overlay_points().next().is_none() && !fallback.is_finite() {
                    return Err(InterpretError::InvalidRange(
                        "point fallback coordinate is not finite".to_string(),
                    ));
                }
            }
            Geometry::Points => {
                if self.overlay_points().next().is_none() {
                    return Err(InterpretError::MissingGeometry(
                        "points plot needs at least one overlay point".to_string(),
                    ));
                }
            }
            Geometry::Line { vertices } => check_vertices("line", vertices, 2)?,
            Geometry::Polygon { vertices } => check_vertices("polygon", vertices, 3)?,
            Geometry::Rect { x, y } => {
                check_range("rect xRange", x)?;
                check_range("rect yRange", y)?;
            }
            Geometry::Curve(curve) => {
                check_range("curve2d xRange", &curve.x_range)?;
                if let Some(y) = &curve.y_range {
                    check_range("curve2d yRange", y)?;
                }
                if curve.functions.is_empty() {
                    return Err(InterpretError::NoFunctions(PlotKind::Curve2d.to_string()));
                }
            }
            Geometry::Surface(field) | Geometry::Contour(field) => {
                let kind = self.kind();
                check_range(&format!("{kind} xRange"), &field.x_range)?;
                check_range(&format!("{kind} yRange"), &field.y_range)?;
                if field.functions.is_empty() {
                    return Err(InterpretError::NoFunctions(kind.to_string()));
                }
                if let Some(entry) = field
                    .functions
                    .iter()
                    .find(|f| mentions_identifier(&f.expression, "z"))
                {
                    return Err(InterpretError::UnsupportedImplicitSurface(
                        entry.expression.clone(),
                    ));
                }
            }
        }
        Ok(())
    }
}

fn check_vertices(what: &str, vertices: &[Coord], min: usize) -> PlotResult<()> {
    if vertices.len() < min {
        return Err(InterpretError::MissingGeometry(format!(
            "{what} needs at least {min} points, found {}",
            vertices.len()
        )));
    }
    if let Some(i) = vertices.iter().position(|c| !c.is_finite()) {
        return Err(InterpretError::MissingGeometry(format!(
            "{what} point {i} has non-finite coordinates"
        )));
    }
    Ok(())
}

fn check_range(what: &str, range: &AxisRange) -> PlotResult<()> {
    if range.min.is_finite() && range.max.is_finite() {
        Ok(())
    } else {
        Err(InterpretError::InvalidRange(format!(
            "{what} has non-finite bounds"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(a: f64, b: f64) -> AxisRange {
        AxisRange::new(a, b).expect("finite range")
    }

    #[test]
    fn test_kind_aliases() {
        assert_eq!(PlotKind::parse("curve"), Ok(PlotKind::Curve2d));
        assert_eq!(PlotKind::parse(" 2D "), Ok(PlotKind::Curve2d));
        assert_eq!(PlotKind::parse("Surface"), Ok(PlotKind::Surface));
        assert_eq!(
            PlotKind::parse("pie"),
            Err(InterpretError::UnsupportedKind("pie".to_string()))
        );
    }

    #[test]
    fn test_polygon_needs_three_vertices() {
        let spec = PlotSpecification::new(Geometry::Polygon {
            vertices: vec![Coord::new(0.0, 0.0), Coord::new(1.0, 0.0)],
        });
        assert!(matches!(spec.validate(), Err(InterpretError::MissingGeometry(_))));
    }

    #[test]
    fn test_line_rejects_non_finite_vertices() {
        let spec = PlotSpecification::new(Geometry::Line {
            vertices: vec![Coord::new(0.0, 0.0), Coord::new(f64::NAN, 1.0)],
        });
        assert!(matches!(spec.validate(), Err(InterpretError::MissingGeometry(_))));
    }

    #[test]
    fn test_points_need_a_finite_overlay() {
        let spec = PlotSpecification::new(Geometry::Points)
            .with_overlay(OverlayPoint::new(f64::INFINITY, 0.0));
        assert!(matches!(spec.validate(), Err(InterpretError::MissingGeometry(_))));

        let spec = PlotSpecification::new(Geometry::Points).with_overlay(OverlayPoint::new(1.0, 2.0));
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn test_field_rejects_z_and_empty_function_lists() {
        let field = FieldSpec {
            x_range: range(0.0, 1.0),
            y_range: range(0.0, 1.0),
            functions: vec![FunctionEntry::new("x*y"), FunctionEntry::new("x + z")],
            nx: None,
            ny: None,
        };
        let spec = PlotSpecification::new(Geometry::Surface(field.clone()));
        assert_eq!(
            spec.validate(),
            Err(InterpretError::UnsupportedImplicitSurface("x + z".to_string()))
        );

        let empty = FieldSpec {
            functions: Vec::new(),
            ..field
        };
        let spec = PlotSpecification::new(Geometry::Contour(empty));
        assert_eq!(
            spec.validate(),
            Err(InterpretError::NoFunctions("contour".to_string()))
        );
    }

    #[test]
    fn test_hand_built_ranges_are_checked() {
        let spec = PlotSpecification::new(Geometry::Rect {
            x: AxisRange { min: f64::NAN, max: 1.0 },
            y: range(0.0, 1.0),
        });
        assert!(matches!(spec.validate(), Err(InterpretError::InvalidRange(_))));
    }

    #[test]
    fn test_kind_follows_geometry() {
        let spec = PlotSpecification::new(Geometry::Curve(CurveSpec {
            x_range: range(-1.0, 1.0),
            y_range: None,
            functions: vec![FunctionEntry::new("x")],
            samples: None,
        }));
        assert_eq!(spec.kind(), PlotKind::Curve2d);
        assert_eq!(spec.kind().to_string(), "curve2d");
    }
}
