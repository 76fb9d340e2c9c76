use crate::plot::{AxisSpec, PlotError, ResolvedAxes};

/// A 2D histogram of one group over the shared axis ranges.
///
/// Bucketing matches the original plotly configuration: bins start one bin
/// width below the reconciled minimum and end at the maximum, so every
/// group shares identical bucket boundaries regardless of its own spread.
#[derive(Clone, Debug)]
pub struct DensityGrid {
    x_start: f64,
    y_start: f64,
    x_bins: usize,
    y_bins: usize,
    x_size: f64,
    y_size: f64,
    /// Row-major densities, y-major: `bins[iy * x_bins + ix]`
    bins: Vec<f64>,
}

/// Number of buckets covering `[min - size, max]`.
fn bin_count(axis: &AxisSpec) -> Result<usize, PlotError> {
    if !(axis.bin_size.is_finite() && axis.bin_size > 0.0) {
        return Err(PlotError::InvalidBinSize {
            axis: axis.feature.to_owned(),
            size: axis.bin_size,
        });
    }
    let span = axis.range.max - (axis.range.min - axis.bin_size);
    Ok(((span / axis.bin_size).ceil() as usize).max(1))
}

impl DensityGrid {
    /// Bins paired x/y samples. When `normalized` is set each bin holds the
    /// percentage of samples that fell into it instead of a raw count.
    pub fn new(
        x_values: &[f64],
        y_values: &[f64],
        axes: &ResolvedAxes,
        normalized: bool,
    ) -> Result<DensityGrid, PlotError> {
        if x_values.len() != y_values.len() {
            return Err(PlotError::MismatchedColumns {
                x_len: x_values.len(),
                y_len: y_values.len(),
            });
        }
        let x_bins = bin_count(&axes.x)?;
        let y_bins = bin_count(&axes.y)?;
        let mut grid = DensityGrid {
            x_start: axes.x.range.min - axes.x.bin_size,
            y_start: axes.y.range.min - axes.y.bin_size,
            x_bins,
            y_bins,
            x_size: axes.x.bin_size,
            y_size: axes.y.bin_size,
            bins: vec![0.0; x_bins * y_bins],
        };
        for (&x, &y) in x_values.iter().zip(y_values) {
            let ix = grid.bucket(x, grid.x_start, grid.x_size, grid.x_bins);
            let iy = grid.bucket(y, grid.y_start, grid.y_size, grid.y_bins);
            grid.bins[iy * x_bins + ix] += 1.0;
        }
        if normalized && !x_values.is_empty() {
            let share = 100.0 / x_values.len() as f64;
            for bin in &mut grid.bins {
                *bin *= share;
            }
        }
        Ok(grid)
    }

    /// Index of the bucket holding `value`, clamped to the grid.
    fn bucket(&self, value: f64, start: f64, size: f64, count: usize) -> usize {
        let index = ((value - start) / size).floor();
        (index.max(0.0) as usize).min(count - 1)
    }

    /// Largest density in the grid.
    pub fn max_density(&self) -> f64 {
        self.bins.iter().fold(0.0f64, |max, &bin| max.max(bin))
    }

    /// Iterates non-empty cells as (x0, y0, x1, y1, density).
    pub fn cells(&self) -> impl Iterator<Item = (f64, f64, f64, f64, f64)> + '_ {
        self.bins
            .iter()
            .enumerate()
            .filter(|(_, &density)| density > 0.0)
            .map(move |(index, &density)| {
                let ix = index % self.x_bins;
                let iy = index / self.x_bins;
                let x0 = self.x_start + ix as f64 * self.x_size;
                let y0 = self.y_start + iy as f64 * self.y_size;
                (x0, y0, x0 + self.x_size, y0 + self.y_size, density)
            })
    }

    /// Coordinate span of the whole grid as (x0, y0, x1, y1).
    pub fn extent(&self) -> (f64, f64, f64, f64) {
        (
            self.x_start,
            self.y_start,
            self.x_start + self.x_bins as f64 * self.x_size,
            self.y_start + self.y_bins as f64 * self.y_size,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::FeatureRange;

    fn axes() -> ResolvedAxes {
        ResolvedAxes {
            x: AxisSpec {
                feature: "Area".to_owned(),
                range: FeatureRange { max: 4.0, min: 0.0 },
                bin_size: 1.0,
            },
            y: AxisSpec {
                feature: "Intensity".to_owned(),
                range: FeatureRange { max: 2.0, min: 0.0 },
                bin_size: 1.0,
            },
        }
    }

    #[test]
    fn buckets_start_one_bin_below_the_minimum() {
        let grid = DensityGrid::new(&[0.0], &[0.0], &axes(), false).unwrap();
        let (x0, y0, x1, y1) = grid.extent();
        assert_eq!((x0, y0), (-1.0, -1.0));
        assert_eq!((x1, y1), (4.0, 2.0));
    }

    #[test]
    fn counts_land_in_the_right_cells() {
        let grid = DensityGrid::new(&[0.5, 0.5, 3.5], &[0.5, 0.5, 1.5], &axes(), false).unwrap();
        let cells: Vec<_> = grid.cells().collect();
        assert_eq!(cells.len(), 2);
        assert!(cells.contains(&(0.0, 0.0, 1.0, 1.0, 2.0)));
        assert!(cells.contains(&(3.0, 1.0, 4.0, 2.0, 1.0)));
    }

    #[test]
    fn normalization_reports_percentages() {
        let grid = DensityGrid::new(&[0.5, 0.5, 3.5, 3.5], &[0.5, 0.5, 1.5, 1.5], &axes(), true)
            .unwrap();
        assert_eq!(grid.max_density(), 50.0);
    }

    #[test]
    fn out_of_range_samples_clamp_to_edge_bins() {
        let grid = DensityGrid::new(&[100.0], &[-100.0], &axes(), false).unwrap();
        assert_eq!(grid.cells().count(), 1);
    }

    #[test]
    fn zero_bin_size_is_rejected() {
        let mut bad = axes();
        bad.x.bin_size = 0.0;
        assert!(matches!(
            DensityGrid::new(&[1.0], &[1.0], &bad, false),
            Err(PlotError::InvalidBinSize { .. })
        ));
    }

    #[test]
    fn mismatched_columns_are_rejected() {
        assert!(matches!(
            DensityGrid::new(&[1.0, 2.0], &[1.0], &axes(), false),
            Err(PlotError::MismatchedColumns { x_len: 2, y_len: 1 })
        ));
    }
}
