//! Literal geometry: points, lines, rectangles and polygons.

use super::{Draft, Interpreter};
use crate::sampling::{AxisRange, Bounds};
use crate::scene::{FilledRegion, MarkerSet, Polyline, Trace};
use crate::spec::{Coord, OverlayPoint};

impl Interpreter {
    pub(super) fn point(&self, fallback: Coord, overlays: &[&OverlayPoint]) -> Draft {
        let (x, y, label) = match overlays.first() {
            Some(p) => (p.x, p.y, p.label.clone().unwrap_or_default()),
            None => (fallback.x, fallback.y, String::new()),
        };
        let trace = Trace::Markers(MarkerSet {
            name: self.config.names.points.clone(),
            x: vec![x],
            y: vec![y],
            labels: vec![label],
        });
        let (x_range, y_range) = self.padded(Bounds::around(x, y));
        Draft::planar(vec![trace], x_range, y_range)
    }

    pub(super) fn points(&self, overlays: &[&OverlayPoint]) -> Draft {
        let bounds = Bounds::from_points(overlays.iter().map(|p| (p.x, p.y)))
            .unwrap_or(Bounds::around(0.0, 0.0));
        let (x_range, y_range) = self.padded(bounds);
        let traces = self.overlay_markers(overlays).into_iter().collect();
        Draft::planar(traces, x_range, y_range)
    }

    pub(super) fn line(&self, vertices: &[Coord], overlays: &[&OverlayPoint]) -> Draft {
        let mut traces = vec![Trace::Polyline(Polyline {
            name: self.config.names.line.clone(),
            x: vertices.iter().map(|c| c.x).collect(),
            y: vertices.iter().map(|c| Some(c.y)).collect(),
        })];
        traces.extend(self.overlay_markers(overlays));

        let (x_range, y_range) = self.padded(joint_bounds(vertices, overlays));
        Draft::planar(traces, x_range, y_range)
    }

    pub(super) fn rect(&self, x: AxisRange, y: AxisRange, overlays: &[&OverlayPoint]) -> Draft {
        let margin = self.config.degenerate_margin;
        let x = x.widened(margin);
        let y = y.widened(margin);

        let mut traces = vec![Trace::FilledRegion(FilledRegion {
            name: self.config.names.region.clone(),
            x: vec![x.min, x.max, x.max, x.min, x.min],
            y: vec![y.min, y.min, y.max, y.max, y.min],
        })];
        traces.extend(self.overlay_markers(overlays));

        let pad = self.config.padding;
        Draft::planar(traces, x.padded(pad), y.padded(pad))
    }

    pub(super) fn polygon(&self, vertices: &[Coord], overlays: &[&OverlayPoint]) -> Draft {
        let ring = vertices.iter().chain(vertices.first());
        let mut traces = vec![Trace::FilledRegion(FilledRegion {
            name: self.config.names.region.clone(),
            x: ring.clone().map(|c| c.x).collect(),
            y: ring.map(|c| c.y).collect(),
        })];
        traces.extend(self.overlay_markers(overlays));

        let (x_range, y_range) = self.padded(joint_bounds(vertices, overlays));
        Draft::planar(traces, x_range, y_range)
    }

    fn padded(&self, bounds: Bounds) -> (AxisRange, AxisRange) {
        bounds.padded_ranges(self.config.padding, self.config.degenerate_margin)
    }
}

/// Bounding box over vertices and overlay points together.
fn joint_bounds(vertices: &[Coord], overlays: &[&OverlayPoint]) -> Bounds {
    let mut bounds = Bounds::from_points(vertices.iter().map(|c| (c.x, c.y)))
        .unwrap_or(Bounds::around(0.0, 0.0));
    if let Some(extra) = Bounds::from_points(overlays.iter().map(|p| (p.x, p.y))) {
        bounds.expand_to_include(&extra);
    }
    bounds
}

#[cfg(test)]
mod tests {
    use crate::error::InterpretError;
    use crate::interpreter::Interpreter;
    use crate::scene::{Scene, Trace, TraceKind};
    use serde_json::{Value, json};

    fn run(value: Value) -> Scene {
        Interpreter::default()
            .interpret_value(&value)
            .expect("interpret failed")
    }

    fn ranges(scene: &Scene) -> ([f64; 2], [f64; 2]) {
        (
            scene.layout.x_range.expect("x range").to_array(),
            scene.layout.y_range.expect("y range").to_array(),
        )
    }

    #[test]
    fn test_point_uses_first_overlay() {
        let scene = run(json!({
            "kind": "point",
            "xRange": [9, 9],
            "overlays": [
                { "type": "point", "x": 2, "y": 3, "label": "P" },
                { "type": "point", "x": 50, "y": 50 }
            ]
        }));
        let Trace::Markers(markers) = &scene.traces[0] else {
            panic!("expected markers");
        };
        assert_eq!(markers.x, vec![2.0]);
        assert_eq!(markers.labels, vec!["P".to_string()]);
        assert_eq!(scene.traces.len(), 1);
        assert_eq!(ranges(&scene), ([1.0, 3.0], [2.0, 4.0]));
    }

    #[test]
    fn test_point_fallback() {
        let scene = run(json!({ "kind": "point", "xRange": [4, 8], "yRange": [-1, 1] }));
        let Trace::Markers(markers) = &scene.traces[0] else {
            panic!("expected markers");
        };
        assert_eq!((markers.x[0], markers.y[0]), (4.0, -1.0));
        assert_eq!(ranges(&scene), ([3.0, 5.0], [-2.0, 0.0]));
    }

    #[test]
    fn test_points_bounding_box() {
        let scene = run(json!({
            "kind": "points",
            "overlays": [
                { "type": "point", "x": 0, "y": 0 },
                { "type": "point", "x": 4, "y": -2, "label": "B" }
            ]
        }));
        assert_eq!(scene.trace_kinds(), vec![TraceKind::Markers]);
        assert_eq!(ranges(&scene), ([-1.0, 5.0], [-3.0, 1.0]));
    }

    #[test]
    fn test_points_without_overlays() {
        let err = Interpreter::default()
            .interpret_value(&json!({ "kind": "points", "overlays": [] }))
            .expect_err("should fail");
        assert!(matches!(err, InterpretError::MissingGeometry(_)));
    }

    #[test]
    fn test_line_with_overlays() {
        let scene = run(json!({
            "kind": "line",
            "line": [{ "x": 0, "y": 0 }, { "x": 2, "y": 2 }],
            "overlays": [{ "type": "point", "x": 5, "y": 1 }]
        }));
        assert_eq!(scene.trace_kinds(), vec![TraceKind::Polyline, TraceKind::Markers]);
        let Trace::Polyline(line) = &scene.traces[0] else {
            panic!("expected a polyline");
        };
        assert_eq!(line.y, vec![Some(0.0), Some(2.0)]);
        assert_eq!(ranges(&scene), ([-1.0, 6.0], [-1.0, 3.0]));
    }

    #[test]
    fn test_rect_widens_degenerate_range() {
        let scene = run(json!({ "kind": "rect", "xRange": [2, 2], "yRange": [0, 5] }));
        let Trace::FilledRegion(region) = &scene.traces[0] else {
            panic!("expected a region");
        };
        assert_eq!(region.x, vec![1.0, 3.0, 3.0, 1.0, 1.0]);
        assert_eq!(region.y, vec![0.0, 0.0, 5.0, 5.0, 0.0]);
        assert_eq!(ranges(&scene), ([0.0, 4.0], [-1.0, 6.0]));
    }

    #[test]
    fn test_rect_widens_large_degenerate_range() {
        let scene = run(json!({ "kind": "rect", "xRange": [1e17, 1e17], "yRange": [0, 5] }));
        let Trace::FilledRegion(region) = &scene.traces[0] else {
            panic!("expected a region");
        };
        let min = region.x.iter().copied().fold(f64::INFINITY, f64::min);
        let max = region.x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert!(min < 1e17 && 1e17 < max);
        let (x, _) = ranges(&scene);
        assert!(x[0] < x[1]);
    }

    #[test]
    fn test_point_at_large_coordinate_has_open_axes() {
        let scene = run(json!({ "kind": "point", "xRange": [1e17] }));
        let Trace::Markers(markers) = &scene.traces[0] else {
            panic!("expected markers");
        };
        assert_eq!((markers.x[0], markers.y[0]), (1e17, 0.0));
        let (x, y) = ranges(&scene);
        assert!(x[0] < x[1]);
        assert_eq!(y, [-1.0, 1.0]);
    }

    #[test]
    fn test_rect_overlays_do_not_move_axes() {
        let scene = run(json!({
            "kind": "rect",
            "xRange": [0, 1],
            "yRange": [0, 1],
            "overlays": [{ "type": "point", "x": 10, "y": 10 }]
        }));
        assert_eq!(scene.trace_kinds(), vec![TraceKind::FilledRegion, TraceKind::Markers]);
        assert_eq!(ranges(&scene), ([-1.0, 2.0], [-1.0, 2.0]));
    }

    #[test]
    fn test_polygon_ring_is_closed() {
        let scene = run(json!({
            "kind": "polygon",
            "polygon": [{ "x": 0, "y": 0 }, { "x": 4, "y": 0 }, { "x": 2, "y": 3 }]
        }));
        let Trace::FilledRegion(region) = &scene.traces[0] else {
            panic!("expected a region");
        };
        assert_eq!(region.x, vec![0.0, 4.0, 2.0, 0.0]);
        assert_eq!(region.y, vec![0.0, 0.0, 3.0, 0.0]);
        assert_eq!(ranges(&scene), ([-1.0, 5.0], [-1.0, 4.0]));
    }

    #[test]
    fn test_polygon_with_two_points_is_rejected() {
        let err = Interpreter::default()
            .interpret_value(&json!({
                "kind": "polygon",
                "polygon": [{ "x": 0, "y": 0 }, { "x": 1, "y": 0 }]
            }))
            .expect_err("should fail");
        assert!(matches!(err, InterpretError::MissingGeometry(_)));
    }
}
