//! # Plot Module
//!
//! Thin rendering collaborator: bins each clean table into a 2D density
//! grid over the reconciled axis ranges and draws a filled contour-style
//! figure per group, plus one combined grid figure, with `plotters`.

mod histogram;
mod render;

pub use histogram::DensityGrid;
pub use render::{render_combined, render_individual};

use crate::group::FeatureRange;
use thiserror::Error;

/// Errors raised while binning or drawing.
#[derive(Error, Debug)]
pub enum PlotError {
    /// Bin sizes must be positive and finite.
    #[error("invalid bin size {size} for axis '{axis}'")]
    InvalidBinSize { axis: String, size: f64 },

    /// X and Y feature columns of one table must be equally long.
    #[error("axis columns have mismatched lengths: {x_len} vs {y_len}")]
    MismatchedColumns { x_len: usize, y_len: usize },

    /// Backend drawing failure, flattened to text since plotters error
    /// types are generic over the backend.
    #[error("rendering failed: {0}")]
    Backend(String),
}

/// Color scales the renderer knows how to sample.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorScale {
    #[default]
    Viridis,
    Greens,
}

impl ColorScale {
    /// Samples the scale at `t` in [0, 1] as an (r, g, b) triple.
    pub(crate) fn sample(&self, t: f64) -> (u8, u8, u8) {
        let stops: &[(u8, u8, u8)] = match self {
            ColorScale::Viridis => &[
                (68, 1, 84),
                (59, 82, 139),
                (33, 145, 140),
                (94, 201, 98),
                (253, 231, 37),
            ],
            ColorScale::Greens => &[(247, 252, 245), (116, 196, 118), (0, 68, 27)],
        };
        let t = t.clamp(0.0, 1.0) * (stops.len() - 1) as f64;
        let lower = t.floor() as usize;
        let upper = (lower + 1).min(stops.len() - 1);
        let fraction = t - lower as f64;
        let channel = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * fraction).round() as u8;
        (
            channel(stops[lower].0, stops[upper].0),
            channel(stops[lower].1, stops[upper].1),
            channel(stops[lower].2, stops[upper].2),
        )
    }
}

/// Everything the contour renderer needs to draw one group's histogram.
#[derive(Clone, Debug)]
pub struct ContourSettings {
    /// Lower color bound for the density scale
    pub count_min: f64,
    /// Upper color bound for the density scale; equal bounds fall back to
    /// scaling by the observed maximum
    pub count_max: f64,
    /// Color scale sampled for cell filling
    pub colorscale: ColorScale,
    /// Draw cell outlines on top of the filled bins
    pub show_outlines: bool,
    /// Report percentages per bin instead of raw counts
    pub normalized: bool,
}

impl Default for ContourSettings {
    fn default() -> Self {
        ContourSettings {
            count_min: 0.0,
            count_max: 0.0,
            colorscale: ColorScale::default(),
            show_outlines: false,
            normalized: true,
        }
    }
}

impl ContourSettings {
    /// Label of the density colorbar axis.
    pub fn z_label(&self) -> &'static str {
        if self.normalized {
            "Frequency"
        } else {
            "Count"
        }
    }
}

/// Figure dimensions and subplot layout.
#[derive(Clone, Debug)]
pub struct LayoutSettings {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        LayoutSettings {
            width: 1600,
            height: 800,
            margin: 10,
        }
    }
}

/// Immutable description of one plot axis: the feature it shows, its
/// reconciled range, and the histogram bin width.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisSpec {
    pub feature: String,
    pub range: FeatureRange,
    pub bin_size: f64,
}

/// The two resolved plot axes, produced once per run and passed by value
/// into rendering; nothing mutates shared settings behind the scenes.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedAxes {
    pub x: AxisSpec,
    pub y: AxisSpec,
}
