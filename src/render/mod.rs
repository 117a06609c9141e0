//! Exporters that turn a [`Scene`](crate::scene::Scene) into a concrete plotting library's format.

pub mod plotly;

pub use self::plotly::{Margin, PlotlyTheme, to_figure, to_plot};
