//! Function plots: sampled curves, surfaces and contour fields.

use ndarray::Array2;
use tracing::{debug, warn};

use super::{Draft, Interpreter};
use crate::expression::{Arity, CompiledFunction, compile};
use crate::scene::{Markers3d, Polyline, Projection, ScalarField, Trace};
use crate::spec::{CurveSpec, FieldSpec, FunctionEntry, OverlayPoint};

/// A function that compiled, with its position in the specification's list.
struct Compiled<'a> {
    index: usize,
    entry: &'a FunctionEntry,
    function: CompiledFunction,
}

impl Interpreter {
    pub(super) fn curve(&self, curve: &CurveSpec, overlays: &[&OverlayPoint]) -> Draft {
        let margin = self.config.degenerate_margin;
        let x_range = curve.x_range.widened(margin);
        let samples = self.config.curve_sample_count(curve.samples);
        let xs = x_range.linspace(samples);
        debug!(samples = xs.len(), functions = curve.functions.len(), "sampling curves");

        let mut traces: Vec<Trace> = compile_all(&curve.functions, Arity::One)
            .into_iter()
            .map(|c| {
                let ys = c.function.sample(&xs);
                let (x, y) = if self.config.split_poles {
                    split_at_poles(&c.function, &xs, &ys)
                } else {
                    (xs.clone(), ys)
                };
                Trace::Polyline(Polyline {
                    name: c
                        .entry
                        .label
                        .clone()
                        .unwrap_or_else(|| self.config.names.function.clone()),
                    x,
                    y,
                })
            })
            .collect();
        traces.extend(self.overlay_markers(overlays));

        Draft {
            traces,
            x_range: Some(x_range),
            y_range: curve.y_range.map(|r| r.widened(margin)),
            projection: Projection::Planar,
        }
    }

    pub(super) fn surface(&self, field: &FieldSpec, overlays: &[&OverlayPoint]) -> Draft {
        let compiled = compile_all(&field.functions, Arity::Two);
        let mut traces: Vec<Trace> = self
            .sample_fields(field, &compiled, &self.config.names.surface)
            .into_iter()
            .enumerate()
            .map(|(i, mut sampled)| {
                if i > 0 {
                    sampled.opacity = self.config.secondary_surface_opacity;
                }
                Trace::HeightField(sampled)
            })
            .collect();

        if !overlays.is_empty() {
            let height = compiled.first().map(|c| &c.function);
            traces.push(Trace::Markers3d(Markers3d {
                name: self.config.names.points.clone(),
                x: overlays.iter().map(|p| p.x).collect(),
                y: overlays.iter().map(|p| p.y).collect(),
                z: overlays
                    .iter()
                    .map(|p| height.and_then(|f| f.evaluate(p.x, p.y)))
                    .collect(),
                labels: overlays
                    .iter()
                    .map(|p| p.label.clone().unwrap_or_default())
                    .collect(),
            }));
        }

        Draft {
            traces,
            x_range: None,
            y_range: None,
            projection: Projection::Volumetric,
        }
    }

    pub(super) fn contour(&self, field: &FieldSpec, overlays: &[&OverlayPoint]) -> Draft {
        let compiled = compile_all(&field.functions, Arity::Two);
        let mut traces: Vec<Trace> = self
            .sample_fields(field, &compiled, &self.config.names.contour)
            .into_iter()
            .map(Trace::ContourField)
            .collect();
        traces.extend(self.overlay_markers(overlays));

        Draft {
            traces,
            x_range: None,
            y_range: None,
            projection: Projection::Planar,
        }
    }

    /// Samples every compiled function over the field grid, row-major by y then x.
    ///
    /// Only the first field carries the colour scale.
    fn sample_fields(
        &self,
        field: &FieldSpec,
        compiled: &[Compiled<'_>],
        unnamed_prefix: &str,
    ) -> Vec<ScalarField> {
        let margin = self.config.degenerate_margin;
        let (nx, ny) = self.config.field_sample_counts(field.nx, field.ny);
        let xs = field.x_range.widened(margin).linspace(nx);
        let ys = field.y_range.widened(margin).linspace(ny);
        debug!(nx = xs.len(), ny = ys.len(), functions = compiled.len(), "sampling fields");

        compiled
            .iter()
            .enumerate()
            .map(|(i, c)| ScalarField {
                name: c
                    .entry
                    .label
                    .clone()
                    .unwrap_or_else(|| format!("{unnamed_prefix} {}", c.index + 1)),
                x: xs.clone(),
                y: ys.clone(),
                z: Array2::from_shape_fn((ys.len(), xs.len()), |(row, col)| {
                    c.function.evaluate(xs[col], ys[row])
                }),
                show_scale: i == 0,
                opacity: 1.0,
            })
            .collect()
    }
}

/// Bisection steps spent locating the sign change between two samples.
const POLE_BISECTIONS: usize = 64;

/// Inserts a `None` sample midway between neighbours that straddle a pole.
///
/// Grid samples are kept as they are; only the extra break points are added.
fn split_at_poles(
    function: &CompiledFunction,
    xs: &[f64],
    ys: &[Option<f64>],
) -> (Vec<f64>, Vec<Option<f64>>) {
    let mut out_x = Vec::with_capacity(xs.len());
    let mut out_y = Vec::with_capacity(ys.len());
    for (i, (&x, &y)) in xs.iter().zip(ys).enumerate() {
        if i > 0 {
            if let (Some(prev), Some(current)) = (ys[i - 1], y) {
                if straddles_pole(function, xs[i - 1], prev, x, current) {
                    out_x.push(xs[i - 1] / 2.0 + x / 2.0);
                    out_y.push(None);
                }
            }
        }
        out_x.push(x);
        out_y.push(y);
    }
    (out_x, out_y)
}

/// Whether `f` blows up somewhere in `(lo, hi)` given finite values of opposite sign at the ends.
///
/// Bisects the sign change down to adjacent floats. A continuous function
/// narrows onto a root, where both bracket values shrink towards zero. A pole
/// either evaluates to a non-finite value on the way or leaves both bracket
/// values larger than anything seen at the original ends.
fn straddles_pole(
    f: &CompiledFunction,
    mut lo: f64,
    mut f_lo: f64,
    mut hi: f64,
    mut f_hi: f64,
) -> bool {
    if f_lo == 0.0 || f_hi == 0.0 || (f_lo < 0.0) == (f_hi < 0.0) {
        return false;
    }
    let limit = f_lo.abs().max(f_hi.abs());
    for _ in 0..POLE_BISECTIONS {
        let mid = lo / 2.0 + hi / 2.0;
        if mid <= lo || mid >= hi {
            break;
        }
        let Some(f_mid) = f.evaluate(mid, 0.0) else {
            return true;
        };
        if f_mid == 0.0 {
            return false;
        }
        if (f_mid < 0.0) == (f_lo < 0.0) {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
            f_hi = f_mid;
        }
    }
    f_lo.abs().min(f_hi.abs()) > limit
}

/// Compiles each entry, logging and skipping the ones that fail.
fn compile_all(entries: &[FunctionEntry], arity: Arity) -> Vec<Compiled<'_>> {
    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| match compile(&entry.expression, arity) {
            Ok(function) => Some(Compiled {
                index,
                entry,
                function,
            }),
            Err(error) => {
                warn!(
                    expression = %entry.expression,
                    %error,
                    "skipping function that failed to compile"
                );
                None
            }
        })
        .collect()
}
