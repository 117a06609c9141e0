//! Renderer-agnostic scene model.
//!
//! A [`Scene`] is an ordered list of [`Trace`]s plus [`Layout`] metadata.
//! Missing values ("no value" samples) are `None` so a renderer can draw a
//! gap instead of a point.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::sampling::AxisRange;

/// 2-D markers with optional text labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerSet {
    /// Legend name.
    pub name: String,
    /// Horizontal coordinates.
    pub x: Vec<f64>,
    /// Vertical coordinates.
    pub y: Vec<f64>,
    /// One label per marker; empty when unlabelled.
    pub labels: Vec<String>,
}

/// An open polyline; `None` samples break the line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    /// Legend name.
    pub name: String,
    /// Horizontal coordinates.
    pub x: Vec<f64>,
    /// Vertical coordinates.
    pub y: Vec<Option<f64>>,
}

/// A closed ring drawn filled. The last vertex repeats the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilledRegion {
    /// Legend name.
    pub name: String,
    /// Horizontal coordinates.
    pub x: Vec<f64>,
    /// Vertical coordinates.
    pub y: Vec<f64>,
}

/// Samples of `z = f(x, y)` on a rectangular grid.
///
/// `z` has one row per `y` sample and one column per `x` sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarField {
    /// Legend name.
    pub name: String,
    /// Grid columns.
    pub x: Vec<f64>,
    /// Grid rows.
    pub y: Vec<f64>,
    /// Field values, `z[[row, col]] = f(x[col], y[row])`.
    pub z: Array2<Option<f64>>,
    /// Whether this trace shows the shared colour scale.
    pub show_scale: bool,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
}

impl ScalarField {
    /// The value at grid position `(row, col)`, if any.
    pub fn value(&self, row: usize, col: usize) -> Option<f64> {
        self.z.get((row, col)).copied().flatten()
    }
}

/// Markers in 3-D space; `None` heights are drawn without a z position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Markers3d {
    /// Legend name.
    pub name: String,
    /// Horizontal coordinates.
    pub x: Vec<f64>,
    /// Depth coordinates.
    pub y: Vec<f64>,
    /// Heights.
    pub z: Vec<Option<f64>>,
    /// One label per marker.
    pub labels: Vec<String>,
}

/// One drawable layer of a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Trace {
    /// 2-D marker set.
    Markers(MarkerSet),
    /// Open polyline.
    Polyline(Polyline),
    /// Filled closed ring.
    FilledRegion(FilledRegion),
    /// Height field drawn as a surface.
    HeightField(ScalarField),
    /// Height field drawn as contour lines.
    ContourField(ScalarField),
    /// 3-D marker set.
    Markers3d(Markers3d),
}

/// Geometric kind of a [`Trace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceKind {
    /// [`Trace::Markers`]
    Markers,
    /// [`Trace::Polyline`]
    Polyline,
    /// [`Trace::FilledRegion`]
    FilledRegion,
    /// [`Trace::HeightField`]
    HeightField,
    /// [`Trace::ContourField`]
    ContourField,
    /// [`Trace::Markers3d`]
    Markers3d,
}

impl Trace {
    /// The geometric kind.
    pub const fn kind(&self) -> TraceKind {
        match self {
            Trace::Markers(_) => TraceKind::Markers,
            Trace::Polyline(_) => TraceKind::Polyline,
            Trace::FilledRegion(_) => TraceKind::FilledRegion,
            Trace::HeightField(_) => TraceKind::HeightField,
            Trace::ContourField(_) => TraceKind::ContourField,
            Trace::Markers3d(_) => TraceKind::Markers3d,
        }
    }

    /// The legend name.
    pub fn name(&self) -> &str {
        match self {
            Trace::Markers(t) => &t.name,
            Trace::Polyline(t) => &t.name,
            Trace::FilledRegion(t) => &t.name,
            Trace::HeightField(t) | Trace::ContourField(t) => &t.name,
            Trace::Markers3d(t) => &t.name,
        }
    }
}

/// How the scene is projected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    /// Flat x/y axes.
    #[default]
    Planar,
    /// Free 3-D view with no fixed axis ranges.
    Volumetric,
}

/// Scene-wide metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Chart title.
    pub title: String,
    /// Fixed x-axis range; `None` lets the renderer scale.
    pub x_range: Option<AxisRange>,
    /// Fixed y-axis range; `None` lets the renderer scale.
    pub y_range: Option<AxisRange>,
    /// View type.
    pub projection: Projection,
}

/// Traces plus layout, ready for a plotting surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Traces in drawing order.
    pub traces: Vec<Trace>,
    /// Layout metadata.
    pub layout: Layout,
}

impl Scene {
    /// Kinds of all traces, in drawing order.
    pub fn trace_kinds(&self) -> Vec<TraceKind> {
        self.traces.iter().map(Trace::kind).collect()
    }

    /// Whether the scene has nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }
}
