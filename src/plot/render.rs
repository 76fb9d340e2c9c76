use crate::plot::{ContourSettings, DensityGrid, LayoutSettings, PlotError, ResolvedAxes};
use crate::table::CleanTable;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ffi::OsStr;
use std::path::Path;

/// Renders every group into one figure laid out as a near-square grid of
/// subplots, one per group, titled with the group names. The output format
/// follows the path extension: `.svg` gets the SVG backend, everything else
/// the bitmap backend.
pub fn render_combined(
    path: &Path,
    tables: &[CleanTable],
    titles: &[String],
    axes: &ResolvedAxes,
    settings: &ContourSettings,
    layout: &LayoutSettings,
) -> Result<(), PlotError> {
    if tables.is_empty() {
        return Ok(());
    }
    let size = (layout.width, layout.height);
    if is_svg(path) {
        let root = SVGBackend::new(path, size).into_drawing_area();
        draw_grid(&root, tables, titles, axes, settings, layout)?;
        root.present().map_err(backend)
    } else {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        draw_grid(&root, tables, titles, axes, settings, layout)?;
        root.present().map_err(backend)
    }
}

/// Renders one group into its own figure.
pub fn render_individual(
    path: &Path,
    table: &CleanTable,
    title: &str,
    axes: &ResolvedAxes,
    settings: &ContourSettings,
    layout: &LayoutSettings,
) -> Result<(), PlotError> {
    let size = (layout.width, layout.height);
    if is_svg(path) {
        let root = SVGBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(backend)?;
        draw_contour(&root, table, title, axes, settings, layout)?;
        root.present().map_err(backend)
    } else {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(backend)?;
        draw_contour(&root, table, title, axes, settings, layout)?;
        root.present().map_err(backend)
    }
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .map(|extension| extension.eq_ignore_ascii_case("svg"))
        .unwrap_or(false)
}

/// Fills the figure and draws one subplot per group.
fn draw_grid<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    tables: &[CleanTable],
    titles: &[String],
    axes: &ResolvedAxes,
    settings: &ContourSettings,
    layout: &LayoutSettings,
) -> Result<(), PlotError> {
    root.fill(&WHITE).map_err(backend)?;
    let cols = (tables.len() as f64).sqrt().ceil() as usize;
    let rows = tables.len().div_ceil(cols);
    let areas = root.split_evenly((rows, cols));
    for ((table, title), area) in tables.iter().zip(titles).zip(&areas) {
        draw_contour(area, table, title, axes, settings, layout)?;
    }
    Ok(())
}

/// Draws one group's density grid as filled cells inside `area`.
fn draw_contour<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    table: &CleanTable,
    title: &str,
    axes: &ResolvedAxes,
    settings: &ContourSettings,
    layout: &LayoutSettings,
) -> Result<(), PlotError> {
    let grid = grid_for(table, axes, settings)?;
    let (x0, y0, x1, y1) = grid.extent();
    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 20))
        .margin(layout.margin)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(backend)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(axes.x.feature.as_str())
        .y_desc(axes.y.feature.as_str())
        .draw()
        .map_err(backend)?;

    // Fixed color bounds when configured, otherwise scale to this group
    let floor = settings.count_min;
    let ceiling = if settings.count_max > floor {
        settings.count_max
    } else {
        grid.max_density()
    };
    chart
        .draw_series(grid.cells().map(|(cx0, cy0, cx1, cy1, density)| {
            let t = if ceiling > floor {
                (density - floor) / (ceiling - floor)
            } else {
                1.0
            };
            let (r, g, b) = settings.colorscale.sample(t);
            Rectangle::new([(cx0, cy0), (cx1, cy1)], RGBColor(r, g, b).filled())
        }))
        .map_err(backend)?;
    if settings.show_outlines {
        chart
            .draw_series(grid.cells().map(|(cx0, cy0, cx1, cy1, _)| {
                Rectangle::new([(cx0, cy0), (cx1, cy1)], BLACK.stroke_width(1))
            }))
            .map_err(backend)?;
    }
    Ok(())
}

/// Bins one table over the resolved axes.
fn grid_for(
    table: &CleanTable,
    axes: &ResolvedAxes,
    settings: &ContourSettings,
) -> Result<DensityGrid, PlotError> {
    let x_values = table
        .column(&axes.x.feature)
        .ok_or_else(|| PlotError::Backend(format!("column '{}' vanished", axes.x.feature)))?;
    let y_values = table
        .column(&axes.y.feature)
        .ok_or_else(|| PlotError::Backend(format!("column '{}' vanished", axes.y.feature)))?;
    DensityGrid::new(x_values, y_values, axes, settings.normalized)
}

fn backend<E: std::fmt::Display>(error: E) -> PlotError {
    PlotError::Backend(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::FeatureRange;
    use crate::plot::AxisSpec;

    fn sample_table() -> CleanTable {
        CleanTable::new(
            vec!["Area".to_owned(), "Intensity".to_owned()],
            vec![vec![1.0, 2.0, 3.0, 3.1], vec![0.2, 0.4, 0.4, 0.9]],
        )
    }

    fn sample_axes() -> ResolvedAxes {
        ResolvedAxes {
            x: AxisSpec {
                feature: "Area".to_owned(),
                range: FeatureRange { max: 4.0, min: 0.0 },
                bin_size: 0.5,
            },
            y: AxisSpec {
                feature: "Intensity".to_owned(),
                range: FeatureRange { max: 1.0, min: 0.0 },
                bin_size: 0.1,
            },
        }
    }

    fn output(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("contourgrid-render-{}-{name}", std::process::id()))
    }

    fn small_layout() -> LayoutSettings {
        LayoutSettings {
            width: 320,
            height: 240,
            margin: 5,
        }
    }

    #[test]
    fn writes_an_individual_svg() {
        let path = output("single.svg");
        render_individual(
            &path,
            &sample_table(),
            "Flat",
            &sample_axes(),
            &ContourSettings::default(),
            &small_layout(),
        )
        .unwrap();
        assert!(path.metadata().unwrap().len() > 0);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn writes_a_combined_png() {
        let path = output("combined.png");
        let tables = [sample_table(), sample_table(), sample_table()];
        let titles = ["Flat".to_owned(), "1 um".to_owned(), "2 um".to_owned()];
        render_combined(
            &path,
            &tables,
            &titles,
            &sample_axes(),
            &ContourSettings::default(),
            &small_layout(),
        )
        .unwrap();
        assert!(path.metadata().unwrap().len() > 0);
        std::fs::remove_file(&path).unwrap();
    }
}
