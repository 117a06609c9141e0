//! Axis ranges, bounding boxes and uniform sample grids.

use serde::{Deserialize, Serialize};

use crate::error::{InterpretError, PlotResult};

/// An inclusive, finite `[min, max]` interval with `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl AxisRange {
    /// Builds a range from two finite bounds given in either order.
    pub fn new(a: f64, b: f64) -> PlotResult<Self> {
        if !a.is_finite() || !b.is_finite() {
            return Err(InterpretError::InvalidRange(format!(
                "bounds [{a}, {b}] are not finite"
            )));
        }
        Ok(Self {
            min: a.min(b),
            max: a.max(b),
        })
    }

    /// Width of the interval.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Whether both bounds coincide.
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    /// Widens a degenerate range by `margin` on each side; other ranges are returned as is.
    ///
    /// Where `margin` is too small to move a large coordinate, the step grows
    /// to a few ulps of it, so the result always has `min < max`.
    pub fn widened(self, margin: f64) -> Self {
        if !self.is_degenerate() {
            return self;
        }
        let v = self.min;
        let step = margin
            .max(v.abs() * f64::EPSILON * 4.0)
            .max(f64::MIN_POSITIVE);
        Self {
            min: (v - step).max(f64::MIN),
            max: (v + step).min(f64::MAX),
        }
    }

    /// Grows the range by `pad` on each side.
    pub fn padded(self, pad: f64) -> Self {
        Self {
            min: self.min - pad,
            max: self.max + pad,
        }
    }

    /// Uniform grid of `n` samples across the range.
    pub fn linspace(&self, n: usize) -> Vec<f64> {
        linspace(self.min, self.max, n)
    }

    /// The range as a `[min, max]` pair.
    pub const fn to_array(self) -> [f64; 2] {
        [self.min, self.max]
    }
}

/// Uniform samples `a (1 - t) + b t` for `t = i / (n - 1)` and `i` in `0..n`.
///
/// Both ends are hit exactly and no intermediate value overflows, even when
/// `b - a` is not representable. Fewer than two samples still yield both
/// endpoints.
pub fn linspace(a: f64, b: f64, n: usize) -> Vec<f64> {
    if n < 2 {
        return vec![a, b];
    }
    let last = n - 1;
    (0..n)
        .map(|i| match i {
            0 => a,
            i if i == last => b,
            i => {
                let t = i as f64 / last as f64;
                a * (1.0 - t) + b * t
            }
        })
        .collect()
}

/// Axis-aligned bounding box over plotted coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Smallest x.
    pub x_min: f64,
    /// Largest x.
    pub x_max: f64,
    /// Smallest y.
    pub y_min: f64,
    /// Largest y.
    pub y_max: f64,
}

impl Bounds {
    /// Box around a single point.
    pub const fn around(x: f64, y: f64) -> Self {
        Self {
            x_min: x,
            x_max: x,
            y_min: y,
            y_max: y,
        }
    }

    /// Box around every point, or `None` when the iterator is empty.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut iter = points.into_iter();
        let (x, y) = iter.next()?;
        let mut bounds = Self::around(x, y);
        for (x, y) in iter {
            bounds.include(x, y);
        }
        Some(bounds)
    }

    /// Grows the box to cover `(x, y)`.
    pub fn include(&mut self, x: f64, y: f64) {
        self.x_min = self.x_min.min(x);
        self.x_max = self.x_max.max(x);
        self.y_min = self.y_min.min(y);
        self.y_max = self.y_max.max(y);
    }

    /// Grows the box to cover `other`.
    pub fn expand_to_include(&mut self, other: &Bounds) {
        self.x_min = self.x_min.min(other.x_min);
        self.x_max = self.x_max.max(other.x_max);
        self.y_min = self.y_min.min(other.y_min);
        self.y_max = self.y_max.max(other.y_max);
    }

    /// Axis ranges padded by `pad` on every side, then widened by `margin` if still degenerate.
    pub fn padded_ranges(&self, pad: f64, margin: f64) -> (AxisRange, AxisRange) {
        let x = AxisRange {
            min: self.x_min,
            max: self.x_max,
        };
        let y = AxisRange {
            min: self.y_min,
            max: self.y_max,
        };
        (x.padded(pad).widened(margin), y.padded(pad).widened(margin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx_eq::assert_approx_eq;

    #[test]
    fn test_new_orders_bounds_and_rejects_non_finite() {
        let r = AxisRange::new(3.0, -1.0).expect("finite range");
        assert_eq!(r.to_array(), [-1.0, 3.0]);
        assert!(matches!(
            AxisRange::new(f64::NAN, 1.0),
            Err(InterpretError::InvalidRange(_))
        ));
        assert!(AxisRange::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_widened_only_touches_degenerate_ranges() {
        let r = AxisRange::new(2.0, 2.0).expect("finite range").widened(1.0);
        assert_eq!(r.to_array(), [1.0, 3.0]);

        let r = AxisRange::new(0.0, 5.0).expect("finite range").widened(1.0);
        assert_eq!(r.to_array(), [0.0, 5.0]);
    }

    #[test]
    fn test_linspace_endpoints_and_spacing() {
        let xs = linspace(-1.0, 1.0, 5);
        assert_eq!(xs.len(), 5);
        assert_approx_eq!(xs[0], -1.0);
        assert_approx_eq!(xs[1], -0.5);
        assert_approx_eq!(xs[3], 0.5);
        assert_approx_eq!(xs[4], 1.0);
        assert_eq!(xs[2], 0.0);
    }

    #[test]
    fn test_linspace_short_grids_keep_endpoints() {
        assert_eq!(linspace(0.0, 4.0, 0), vec![0.0, 4.0]);
        assert_eq!(linspace(0.0, 4.0, 1), vec![0.0, 4.0]);
        assert_eq!(linspace(0.0, 4.0, 2), vec![0.0, 4.0]);
    }

    #[test]
    fn test_linspace_over_the_whole_float_line() {
        let xs = linspace(-1e308, 1e308, 5);
        assert!(xs.iter().all(|x| x.is_finite()));
        assert_eq!(xs[0], -1e308);
        assert_eq!(xs[2], 0.0);
        assert_eq!(xs[4], 1e308);
        assert_approx_eq!(xs[1] / 1e307, -5.0, 1e-12);
        assert_approx_eq!(xs[3] / 1e307, 5.0, 1e-12);

        let xs = linspace(f64::MIN, f64::MAX, 400);
        assert!(xs.iter().all(|x| x.is_finite()));
        assert!(xs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_widened_moves_large_coordinates() {
        let r = AxisRange::new(1e17, 1e17).expect("finite range").widened(1.0);
        assert!(r.min < 1e17 && r.max > 1e17);
        assert!(!r.is_degenerate());

        let r = AxisRange::new(f64::MAX, f64::MAX).expect("finite range").widened(1.0);
        assert!(r.min < r.max);
        assert!(r.max.is_finite());

        let r = AxisRange::new(0.0, 0.0).expect("finite range").widened(0.0);
        assert!(r.min < r.max);
    }

    #[test]
    fn test_padded_ranges_around_large_point() {
        let (x, y) = Bounds::around(1e17, -1e17).padded_ranges(1.0, 1.0);
        assert!(x.min < x.max);
        assert!(y.min < y.max);
    }

    #[test]
    fn test_bounds_from_points() {
        assert_eq!(Bounds::from_points(Vec::<(f64, f64)>::new()), None);

        let b = Bounds::from_points([(1.0, 5.0), (-2.0, 3.0), (4.0, -1.0)]).expect("non-empty");
        assert_eq!(b, Bounds { x_min: -2.0, x_max: 4.0, y_min: -1.0, y_max: 5.0 });
    }

    #[test]
    fn test_padded_ranges_are_never_degenerate() {
        let (x, y) = Bounds::around(2.0, 3.0).padded_ranges(1.0, 1.0);
        assert_eq!(x.to_array(), [1.0, 3.0]);
        assert_eq!(y.to_array(), [2.0, 4.0]);

        let (x, _) = Bounds::around(2.0, 3.0).padded_ranges(0.0, 1.0);
        assert!(!x.is_degenerate());
    }

    #[test]
    fn test_expand_to_include() {
        let mut a = Bounds::around(0.0, 0.0);
        a.expand_to_include(&Bounds::around(-3.0, 7.0));
        assert_eq!(a, Bounds { x_min: -3.0, x_max: 0.0, y_min: 0.0, y_max: 7.0 });
    }
}
