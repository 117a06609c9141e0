//! End-to-end properties of the expression compiler and the plot interpreter.

use approx_eq::assert_approx_eq;
use mathplot::scene::Polyline;
use mathplot::{
    Arity, CompileError, InterpretError, Interpreter, PlotSpecification, Projection, Scene, Trace,
    TraceKind, compile, interpret,
};
use serde_json::{Value, json};

fn scene(value: Value) -> Scene {
    Interpreter::default()
        .interpret_value(&value)
        .expect("interpret failed")
}

fn first_polyline(scene: &Scene) -> &Polyline {
    match &scene.traces[0] {
        Trace::Polyline(p) => p,
        other => panic!("expected a polyline, got {other:?}"),
    }
}

#[test]
fn test_allow_listed_expressions_compile_or_classify() {
    let inputs = [
        "x^2 + 1",
        "sin(x) * cos(x)",
        "((x))",
        "x +",
        "foo(x)",
        "1..2",
        "max(x, 2, pi)",
        "sqrt",
        ")(",
        "2 ^ -x",
    ];
    for input in inputs {
        match compile(input, Arity::One) {
            Ok(f) => {
                let _ = f.evaluate_raw(0.5, 0.0);
            }
            Err(
                CompileError::Syntax { .. }
                | CompileError::UnknownIdentifier { .. }
                | CompileError::ArgumentCount { .. },
            ) => {}
            Err(other) => panic!("{input}: unexpected error {other:?}"),
        }
    }
}

#[test]
fn test_disallowed_characters_are_rejected() {
    for input in ["x; 1", "`x`", "{x}", "x = 1", "x'", "x#1", "process.exit()"] {
        let result = compile(input, Arity::Two);
        match input {
            // '.' and letters are allowed; the call syntax is what fails.
            "process.exit()" => assert!(result.is_err()),
            _ => assert!(
                matches!(result, Err(CompileError::IllegalCharacter { .. })),
                "{input} should be rejected by the allow-list"
            ),
        }
    }
}

#[test]
fn test_polynomial_value() {
    let f = compile("x^2+1", Arity::One).expect("compile failed");
    assert_eq!(f.evaluate(3.0, 0.0), Some(10.0));
}

#[test]
fn test_sin_pi_is_zero_everywhere() {
    let f = compile("sin(pi)", Arity::One).expect("compile failed");
    for x in [-100.0, -1.0, 0.0, 0.25, 7.0] {
        let v = f.evaluate(x, 0.0).expect("finite");
        assert!(v.abs() < 1e-12, "sin(pi) = {v} at x = {x}");
    }
}

#[test]
fn test_reciprocal_curve_has_a_gap_near_zero() {
    let scene = scene(json!({
        "kind": "curve2d",
        "xRange": [-1, 1],
        "functions": [{ "expression": "1/x" }]
    }));
    let curve = first_polyline(&scene);

    let gaps: Vec<f64> = curve
        .x
        .iter()
        .zip(&curve.y)
        .filter(|(_, y)| y.is_none())
        .map(|(x, _)| *x)
        .collect();
    assert!(!gaps.is_empty());
    assert!(gaps.iter().all(|x| x.abs() < 0.01));
    assert!(
        curve
            .y
            .iter()
            .flatten()
            .all(|v| v.is_finite())
    );
    assert_eq!(curve.y.iter().flatten().count(), 400);
    assert_eq!(scene.layout.x_range.expect("x range").to_array(), [-1.0, 1.0]);
}

#[test]
fn test_sign_changes_without_poles_have_no_gaps() {
    let oscillation = scene(json!({
        "kind": "curve2d",
        "xRange": [-10, 10],
        "functions": [{ "expression": "sin(50*x)" }]
    }));
    let curve = first_polyline(&oscillation);
    assert_eq!(curve.x.len(), 400);
    assert!(curve.y.iter().all(Option::is_some));

    let cubic = scene(json!({
        "kind": "curve2d",
        "xRange": [-1.9, 1.8],
        "grid": { "n": 2 },
        "functions": [{ "expression": "x^3 - 3*x" }]
    }));
    let curve = first_polyline(&cubic);
    assert_eq!(curve.y.len(), 2);
    assert!(curve.y.iter().all(Option::is_some));
}

#[test]
fn test_rect_widens_degenerate_x_range() {
    let scene = scene(json!({ "kind": "rect", "xRange": [2, 2], "yRange": [0, 5] }));
    let Trace::FilledRegion(region) = &scene.traces[0] else {
        panic!("expected a filled region");
    };
    let min = region.x.iter().copied().fold(f64::INFINITY, f64::min);
    let max = region.x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    assert_eq!((min, max), (1.0, 3.0));
}

#[test]
fn test_implicit_surface_is_rejected() {
    let err = Interpreter::default()
        .interpret_value(&json!({
            "kind": "surface",
            "xRange": [0, 1],
            "yRange": [0, 1],
            "functions": [{ "expression": "x+z" }]
        }))
        .expect_err("should fail");
    assert!(matches!(err, InterpretError::UnsupportedImplicitSurface(_)));
    assert!(err.fallback_message().starts_with("could not plot: "));
}

#[test]
fn test_two_vertex_polygon_is_missing_geometry() {
    let err = Interpreter::default()
        .interpret_value(&json!({
            "kind": "polygon",
            "polygon": [{ "x": 0, "y": 0 }, { "x": 1, "y": 0 }]
        }))
        .expect_err("should fail");
    assert!(matches!(err, InterpretError::MissingGeometry(_)));
}

#[test]
fn test_interpretation_is_idempotent() {
    let specs = [
        json!({ "kind": "curve2d", "xRange": [-3, 3], "functions": [{ "expression": "tan(x)" }] }),
        json!({
            "kind": "surface",
            "xRange": [-1, 1],
            "yRange": [-1, 1],
            "grid": { "nx": 15, "ny": 10 },
            "functions": [{ "expression": "log(x^2 + y^2)" }, { "expression": "x*y" }],
            "overlays": [{ "type": "point", "x": 0, "y": 0, "label": "O" }]
        }),
        json!({ "kind": "polygon", "polygon": [[0, 0], [3, 0], [0, 4]] }),
    ];
    for value in specs {
        let spec = PlotSpecification::from_value(&value).expect("decode failed");
        let first = interpret(&spec).expect("interpret failed");
        let second = interpret(&spec).expect("interpret failed");
        assert_eq!(first, second);
    }
}

#[test]
fn test_interpreter_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Interpreter>();
    assert_send_sync::<Scene>();

    let interpreter = Interpreter::default();
    let spec = json!({
        "kind": "contour",
        "xRange": [0, 2],
        "yRange": [0, 2],
        "grid": { "nx": 30, "ny": 30 },
        "function": "sin(x) * cos(y)"
    });
    let expected = interpreter.interpret_value(&spec).expect("interpret failed");

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| interpreter.interpret_value(&spec)))
            .collect();
        for handle in handles {
            let scene = handle
                .join()
                .expect("thread panicked")
                .expect("interpret failed");
            assert_eq!(scene, expected);
        }
    });
}

#[test]
fn test_scene_round_trips_through_json() {
    let scene = scene(json!({
        "kind": "surface",
        "title": "Saddle",
        "xRange": [-1, 1],
        "yRange": [-1, 1],
        "grid": { "nx": 4, "ny": 3 },
        "function": "x^2 - y^2"
    }));
    assert_eq!(scene.layout.projection, Projection::Volumetric);

    let json = serde_json::to_string(&scene).expect("serialize failed");
    let back: Scene = serde_json::from_str(&json).expect("deserialize failed");
    assert_eq!(back.trace_kinds(), vec![TraceKind::HeightField]);
    assert_eq!(back.layout.title, "Saddle");

    let (Trace::HeightField(a), Trace::HeightField(b)) = (&scene.traces[0], &back.traces[0]) else {
        panic!("expected height fields");
    };
    assert_eq!(a.z.dim(), b.z.dim());
    for (va, vb) in a.z.iter().zip(b.z.iter()) {
        match (va, vb) {
            (Some(va), Some(vb)) => {
                assert_approx_eq!(*va + 10.0, *vb + 10.0, 1e-12);
            }
            (None, None) => {}
            _ => panic!("gap mismatch"),
        }
    }
}
