//! Lenient decoding of the solver's JSON payload.
//!
//! Every field is read as an arbitrary JSON value so that a malformed field
//! becomes a typed [`InterpretError`] naming that field instead of a decoder
//! failure for the whole document.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use super::{
    Coord, CurveSpec, FieldSpec, FunctionEntry, Geometry, OverlayPoint, PlotKind,
    PlotSpecification,
};
use crate::error::{InterpretError, PlotResult};
use crate::sampling::AxisRange;

/// The solver's response body: an answer text and an optional plot specification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverResponse {
    /// Markdown answer, typeset by the caller.
    #[serde(default)]
    pub answer_text: Option<String>,
    /// Raw specification object, if the solver produced one.
    #[serde(default)]
    pub plot_spec: Option<Value>,
}

impl SolverResponse {
    /// Parses a response body.
    pub fn from_json(json: &str) -> PlotResult<Self> {
        serde_json::from_str(json).map_err(|e| InterpretError::Decode(e.to_string()))
    }

    /// The answer text, or an empty string.
    pub fn answer(&self) -> &str {
        self.answer_text.as_deref().unwrap_or_default()
    }

    /// Decodes the embedded specification, if present and not `null`.
    pub fn specification(&self) -> Option<PlotResult<PlotSpecification>> {
        match &self.plot_spec {
            None | Some(Value::Null) => None,
            Some(value) => Some(PlotSpecification::from_value(value)),
        }
    }
}

/// The specification object exactly as sent, before any validation.
///
/// Accepts both `kind` and `plotType` as the tag; `kind` wins when both are set.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPlotSpec {
    /// Plot kind tag.
    pub kind: Option<Value>,
    /// Plot kind tag under its older name.
    pub plot_type: Option<Value>,
    /// Chart title.
    pub title: Option<Value>,
    /// `[min, max]` along x.
    pub x_range: Option<Value>,
    /// `[min, max]` along y.
    pub y_range: Option<Value>,
    /// Overlay entries, `{ type: "point", x, y, label? }`.
    pub overlays: Option<Value>,
    /// Polyline vertices.
    pub line: Option<Value>,
    /// Polygon vertices.
    pub polygon: Option<Value>,
    /// Function list, `[{ expression, label? }]`.
    pub functions: Option<Value>,
    /// Single function expression.
    pub function: Option<Value>,
    /// Label for the single `function`.
    pub label: Option<Value>,
    /// Sample counts, `{ n, nx, ny }`.
    pub grid: Option<Value>,
}

impl RawPlotSpec {
    /// Reads the raw fields from a JSON object.
    pub fn from_value(value: &Value) -> PlotResult<Self> {
        if !value.is_object() {
            return Err(InterpretError::Decode(
                "plot specification must be a JSON object".to_string(),
            ));
        }
        Self::deserialize(value).map_err(|e| InterpretError::Decode(e.to_string()))
    }

    /// The kind tag as written, or an empty string.
    pub fn kind_tag(&self) -> String {
        let tag = match (&self.kind, &self.plot_type) {
            (Some(kind), _) if !kind.is_null() => kind,
            (_, Some(plot_type)) => plot_type,
            _ => return String::new(),
        };
        match tag {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    pub(super) fn to_specification(&self) -> PlotResult<PlotSpecification> {
        let kind = PlotKind::parse(&self.kind_tag())?;
        let geometry = match kind {
            PlotKind::Point => Geometry::Point {
                fallback: self.fallback_point()?,
            },
            PlotKind::Points => Geometry::Points,
            PlotKind::Line => Geometry::Line {
                vertices: coords("line", self.line.as_ref(), 2)?,
            },
            PlotKind::Polygon => Geometry::Polygon {
                vertices: coords("polygon", self.polygon.as_ref(), 3)?,
            },
            PlotKind::Rect => Geometry::Rect {
                x: required_range("rect", "xRange", self.x_range.as_ref())?,
                y: required_range("rect", "yRange", self.y_range.as_ref())?,
            },
            PlotKind::Curve2d => {
                let grid = self.grid.as_ref();
                Geometry::Curve(CurveSpec {
                    x_range: required_range("curve2d", "xRange", self.x_range.as_ref())?,
                    y_range: optional_range("yRange", self.y_range.as_ref())?,
                    functions: self.function_entries(),
                    samples: grid_count(grid, "n"),
                })
            }
            PlotKind::Surface | PlotKind::Contour => {
                let grid = self.grid.as_ref();
                let field = FieldSpec {
                    x_range: required_range(kind.as_str(), "xRange", self.x_range.as_ref())?,
                    y_range: required_range(kind.as_str(), "yRange", self.y_range.as_ref())?,
                    functions: self.function_entries(),
                    nx: grid_count(grid, "nx"),
                    ny: grid_count(grid, "ny"),
                };
                if kind == PlotKind::Surface {
                    Geometry::Surface(field)
                } else {
                    Geometry::Contour(field)
                }
            }
        };

        Ok(PlotSpecification {
            title: self.title.as_ref().and_then(text),
            overlays: overlay_points(self.overlays.as_ref()),
            geometry,
        })
    }

    /// Functions from the `functions` list, then the single `function`.
    fn function_entries(&self) -> Vec<FunctionEntry> {
        let mut entries = Vec::new();

        if let Some(Value::Array(items)) = &self.functions {
            for item in items {
                let Some(expression) = item.get("expression").and_then(Value::as_str) else {
                    continue;
                };
                let expression = expression.trim();
                if expression.is_empty() {
                    continue;
                }
                entries.push(FunctionEntry {
                    expression: expression.to_string(),
                    label: item.get("label").and_then(text),
                });
            }
        }

        if let Some(expression) = self.function.as_ref().and_then(Value::as_str) {
            let expression = expression.trim();
            if !expression.is_empty() {
                entries.push(FunctionEntry {
                    expression: expression.to_string(),
                    label: self.label.as_ref().and_then(text),
                });
            }
        }

        entries
    }

    /// `(xRange[0], yRange[0])`, with an absent range reading as zero.
    fn fallback_point(&self) -> PlotResult<Coord> {
        let first = |field: &str, value: Option<&Value>| -> PlotResult<f64> {
            match value {
                None | Some(Value::Null) => Ok(0.0),
                Some(Value::Array(items)) => match items.first() {
                    None => Ok(0.0),
                    Some(v) => number(v).ok_or_else(|| {
                        InterpretError::InvalidRange(format!(
                            "point {field}[0] is not a finite number"
                        ))
                    }),
                },
                Some(_) => Err(InterpretError::InvalidRange(format!(
                    "point {field} must be an array"
                ))),
            }
        };
        Ok(Coord::new(
            first("xRange", self.x_range.as_ref())?,
            first("yRange", self.y_range.as_ref())?,
        ))
    }
}

/// A finite JSON number.
fn number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite())
}

/// Non-empty text from a string or number value.
fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn overlay_points(value: Option<&Value>) -> Vec<OverlayPoint> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let is_point = item.get("type").and_then(Value::as_str) == Some("point");
            let x = item.get("x").and_then(number);
            let y = item.get("y").and_then(number);
            match (is_point, x, y) {
                (true, Some(x), Some(y)) => Some(OverlayPoint {
                    x,
                    y,
                    label: item.get("label").and_then(text),
                }),
                _ => {
                    trace!(overlay = %item, "dropping overlay entry");
                    None
                }
            }
        })
        .collect()
}

/// Vertices given as `{x, y}` objects or `[x, y]` pairs.
fn coords(what: &str, value: Option<&Value>, min: usize) -> PlotResult<Vec<Coord>> {
    let items: &[Value] = match value {
        Some(Value::Array(items)) => items,
        _ => &[],
    };
    if items.len() < min {
        return Err(InterpretError::MissingGeometry(format!(
            "{what} needs at least {min} points, found {}",
            items.len()
        )));
    }

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let pair = match item {
                Value::Array(pair) if pair.len() == 2 => (number(&pair[0]), number(&pair[1])),
                _ => (
                    item.get("x").and_then(number),
                    item.get("y").and_then(number),
                ),
            };
            match pair {
                (Some(x), Some(y)) => Ok(Coord::new(x, y)),
                _ => Err(InterpretError::MissingGeometry(format!(
                    "{what} point {i} has invalid coordinates"
                ))),
            }
        })
        .collect()
}

fn optional_range(field: &str, value: Option<&Value>) -> PlotResult<Option<AxisRange>> {
    let items = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(items)) if items.len() == 2 => items,
        Some(_) => {
            return Err(InterpretError::InvalidRange(format!(
                "{field} must be a two-element array"
            )));
        }
    };
    match (number(&items[0]), number(&items[1])) {
        (Some(a), Some(b)) => AxisRange::new(a, b).map(Some),
        _ => Err(InterpretError::InvalidRange(format!(
            "{field} bounds must be finite numbers"
        ))),
    }
}

fn required_range(kind: &str, field: &str, value: Option<&Value>) -> PlotResult<AxisRange> {
    optional_range(field, value)?
        .ok_or_else(|| InterpretError::MissingGeometry(format!("{kind} needs {field}")))
}

/// A positive integer sample count from `grid.<key>`; anything else falls back to the default.
fn grid_count(grid: Option<&Value>, key: &str) -> Option<usize> {
    let value = grid?.get(key)?;
    let count = value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|v| v.is_finite() && *v >= 1.0 && v.fract() == 0.0)
            .map(|v| v as u64)
    })?;
    usize::try_from(count).ok().filter(|n| *n > 0)
}
