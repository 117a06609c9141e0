//! Plotly figure export.
//!
//! [`to_plot`] builds a [`Plot`] from a [`Scene`]; [`to_figure`] serializes it
//! to the `{ "data": [...], "layout": {...} }` object that Plotly's JavaScript
//! `newPlot` (or `react-plotly`) accepts directly. Gaps in sampled data are
//! emitted as `null`, which Plotly draws as breaks.

use ::plotly::common::{Fill, Line, Marker, Mode, Orientation, Position, Title};
use ::plotly::layout::{Axis, Layout as PlotlyLayout, Legend, Margin as PlotlyMargin};
use ::plotly::{Contour, Plot, Scatter, Scatter3D, Surface};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{InterpretError, PlotResult};
use crate::sampling::AxisRange;
use crate::scene::{Layout, Projection, ScalarField, Scene, Trace};

/// Figure margins in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margin {
    /// Left margin.
    pub left: usize,
    /// Right margin.
    pub right: usize,
    /// Bottom margin.
    pub bottom: usize,
    /// Top margin.
    pub top: usize,
}

impl Margin {
    /// Creates a margin from its four sides.
    pub const fn new(left: usize, right: usize, bottom: usize, top: usize) -> Self {
        Self {
            left,
            right,
            bottom,
            top,
        }
    }

    fn to_plotly_margin(self) -> PlotlyMargin {
        PlotlyMargin::new()
            .left(self.left)
            .right(self.right)
            .bottom(self.bottom)
            .top(self.top)
    }
}

/// Styling applied when exporting a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotlyTheme {
    /// Figure height in pixels.
    pub height: usize,
    /// Margins around flat charts.
    pub planar_margin: Margin,
    /// Margins around 3-D charts.
    pub volumetric_margin: Margin,
    /// Marker size for 2-D points.
    pub marker_size: usize,
    /// Marker size for 3-D points.
    pub marker_size_3d: usize,
    /// Stroke width for polylines.
    pub line_width: f64,
    /// CSS colour filling rectangles and polygons.
    pub region_fill: String,
    /// Whether the legend runs horizontally.
    pub horizontal_legend: bool,
}

impl Default for PlotlyTheme {
    fn default() -> Self {
        Self {
            height: 520,
            planar_margin: Margin::new(55, 15, 55, 55),
            volumetric_margin: Margin::new(15, 15, 15, 55),
            marker_size: 10,
            marker_size_3d: 5,
            line_width: 2.0,
            region_fill: "rgba(124,92,255,0.15)".to_string(),
            horizontal_legend: true,
        }
    }
}

impl PlotlyTheme {
    fn add_trace(&self, plot: &mut Plot, trace: &Trace) {
        match trace {
            Trace::Markers(m) => plot.add_trace(
                Scatter::new(m.x.clone(), m.y.clone())
                    .name(&m.name)
                    .mode(Mode::MarkersText)
                    .text_array(m.labels.clone())
                    .text_position(Position::TopCenter)
                    .marker(Marker::new().size(self.marker_size)),
            ),
            Trace::Polyline(p) => plot.add_trace(
                Scatter::new(p.x.clone(), p.y.clone())
                    .name(&p.name)
                    .mode(Mode::Lines)
                    .line(Line::new().width(self.line_width)),
            ),
            Trace::FilledRegion(r) => plot.add_trace(
                Scatter::new(r.x.clone(), r.y.clone())
                    .name(&r.name)
                    .mode(Mode::Lines)
                    .fill(Fill::ToSelf)
                    .fill_color(self.region_fill.clone()),
            ),
            Trace::HeightField(f) => plot.add_trace(
                Surface::new(z_rows(f))
                    .x(f.x.clone())
                    .y(f.y.clone())
                    .name(&f.name)
                    .show_scale(f.show_scale)
                    .opacity(f.opacity),
            ),
            Trace::ContourField(f) => plot.add_trace(
                Contour::new(f.x.clone(), f.y.clone(), z_rows(f))
                    .name(&f.name)
                    .show_scale(f.show_scale),
            ),
            Trace::Markers3d(m) => plot.add_trace(
                Scatter3D::new(m.x.clone(), m.y.clone(), m.z.clone())
                    .name(&m.name)
                    .mode(Mode::MarkersText)
                    .text_array(m.labels.clone())
                    .text_position(Position::TopCenter)
                    .marker(Marker::new().size(self.marker_size_3d)),
            ),
        }
    }

    fn to_plotly_layout(&self, layout: &Layout) -> PlotlyLayout {
        let mut plotly_layout = PlotlyLayout::new()
            .title(Title::with_text(&layout.title))
            .auto_size(true)
            .height(self.height);

        if self.horizontal_legend {
            plotly_layout =
                plotly_layout.legend(Legend::new().orientation(Orientation::Horizontal));
        }

        match layout.projection {
            Projection::Planar => plotly_layout
                .margin(self.planar_margin.to_plotly_margin())
                .x_axis(create_axis("x", layout.x_range))
                .y_axis(create_axis("y", layout.y_range)),
            Projection::Volumetric => {
                plotly_layout.margin(self.volumetric_margin.to_plotly_margin())
            }
        }
    }
}

/// Rows of the field grid, one per y sample.
fn z_rows(field: &ScalarField) -> Vec<Vec<Option<f64>>> {
    field.z.outer_iter().map(|row| row.to_vec()).collect()
}

fn create_axis(title: &str, range: Option<AxisRange>) -> Axis {
    let axis = Axis::new().title(Title::with_text(title)).zero_line(false);
    match range {
        Some(range) => axis.range(vec![range.min, range.max]),
        None => axis,
    }
}

/// Builds a Plotly [`Plot`] holding one trace per scene trace.
pub fn to_plot(scene: &Scene, theme: &PlotlyTheme) -> Plot {
    let mut plot = Plot::new();
    for trace in &scene.traces {
        theme.add_trace(&mut plot, trace);
    }
    plot.set_layout(theme.to_plotly_layout(&scene.layout));
    debug!(traces = scene.traces.len(), "built plotly figure");
    plot
}

/// Converts `scene` into a Plotly figure object.
///
/// ```rust
/// use mathplot::render::{PlotlyTheme, to_figure};
/// use serde_json::json;
///
/// let scene = mathplot::Interpreter::default()
///     .interpret_value(&json!({ "kind": "rect", "xRange": [0, 1], "yRange": [0, 1] }))
///     .unwrap();
/// let figure = to_figure(&scene, &PlotlyTheme::default()).unwrap();
/// assert_eq!(figure["data"][0]["fill"], "toself");
/// assert_eq!(figure["layout"]["xaxis"]["range"], json!([-1.0, 2.0]));
/// ```
pub fn to_figure(scene: &Scene, theme: &PlotlyTheme) -> PlotResult<Value> {
    let plot = to_plot(scene, theme);
    serde_json::to_value(&plot).map_err(|e| InterpretError::Export(e.to_string()))
}
