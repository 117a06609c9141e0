//! Interpreter configuration.

use serde::{Deserialize, Serialize};

/// Default samples along a curve.
pub const DEFAULT_CURVE_SAMPLES: usize = 400;

/// Default samples along each axis of a surface or contour grid.
pub const DEFAULT_FIELD_SAMPLES: usize = 80;

/// Names given to traces that carry no label of their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceNames {
    /// Title used when the specification has none.
    pub default_title: String,
    /// Marker sets built from overlay points.
    pub points: String,
    /// Literal polylines.
    pub line: String,
    /// Rectangles and polygons.
    pub region: String,
    /// Unlabelled curves.
    pub function: String,
    /// Prefix for unlabelled surfaces, followed by the function's position.
    pub surface: String,
    /// Prefix for unlabelled contour fields, followed by the function's position.
    pub contour: String,
}

impl Default for TraceNames {
    fn default() -> Self {
        Self {
            default_title: "Chart".to_string(),
            points: "Points".to_string(),
            line: "Line".to_string(),
            region: "Region".to_string(),
            function: "f".to_string(),
            surface: "Surface".to_string(),
            contour: "Contour".to_string(),
        }
    }
}

/// Sampling, padding and naming knobs for the [`Interpreter`](super::Interpreter).
///
/// Every field has a default, so a partial JSON object deserializes cleanly:
///
/// ```rust
/// use mathplot::InterpreterConfig;
///
/// let config: InterpreterConfig = serde_json::from_str(r#"{ "curve_samples": 100 }"#).unwrap();
/// assert_eq!(config.curve_samples, 100);
/// assert_eq!(config.field_samples_x, 80);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Samples along a curve when the specification gives none.
    pub curve_samples: usize,
    /// Samples along x of a field when the specification gives none.
    pub field_samples_x: usize,
    /// Samples along y of a field when the specification gives none.
    pub field_samples_y: usize,
    /// Upper bound on requested curve samples.
    pub max_curve_samples: usize,
    /// Upper bound on requested samples along either field axis.
    pub max_field_samples: usize,
    /// Padding added around point, line and polygon bounding boxes, and around rectangles.
    pub padding: f64,
    /// Half-width given to a range whose bounds coincide.
    pub degenerate_margin: f64,
    /// Opacity of every surface after the first.
    pub secondary_surface_opacity: f64,
    /// Whether curves get a gap inserted where neighbouring samples straddle a pole.
    pub split_poles: bool,
    /// Fallback trace names.
    pub names: TraceNames,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            curve_samples: DEFAULT_CURVE_SAMPLES,
            field_samples_x: DEFAULT_FIELD_SAMPLES,
            field_samples_y: DEFAULT_FIELD_SAMPLES,
            max_curve_samples: 10_000,
            max_field_samples: 400,
            padding: 1.0,
            degenerate_margin: 1.0,
            secondary_surface_opacity: 0.85,
            split_poles: true,
            names: TraceNames::default(),
        }
    }
}

impl InterpreterConfig {
    /// Sets the default curve sample count.
    pub fn with_curve_samples(mut self, samples: usize) -> Self {
        self.curve_samples = samples;
        self
    }

    /// Sets the default field grid size.
    pub fn with_field_samples(mut self, nx: usize, ny: usize) -> Self {
        self.field_samples_x = nx;
        self.field_samples_y = ny;
        self
    }

    /// Sets the caps applied to requested sample counts.
    pub fn with_sample_limits(mut self, max_curve: usize, max_field: usize) -> Self {
        self.max_curve_samples = max_curve;
        self.max_field_samples = max_field;
        self
    }

    /// Sets the bounding-box padding.
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Enables or disables gap insertion at poles.
    pub fn with_pole_splitting(mut self, enabled: bool) -> Self {
        self.split_poles = enabled;
        self
    }

    /// Sets the fallback trace names.
    pub fn with_names(mut self, names: TraceNames) -> Self {
        self.names = names;
        self
    }

    /// Curve sample count for a requested value.
    pub fn curve_sample_count(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.curve_samples)
            .min(self.max_curve_samples)
    }

    /// Field grid size for requested values.
    pub fn field_sample_counts(&self, nx: Option<usize>, ny: Option<usize>) -> (usize, usize) {
        (
            nx.unwrap_or(self.field_samples_x).min(self.max_field_samples),
            ny.unwrap_or(self.field_samples_y).min(self.max_field_samples),
        )
    }
}
