use anyhow::{Context, Result};
use clap::Parser;
use contourgrid::group::RangeSeed;
use contourgrid::pipeline::{ImageFormat, Orchestrator};
use contourgrid::plot::ColorScale;
use std::path::PathBuf;

/// Split side-by-side experiment groups out of one wide spreadsheet and
/// render a 2D density-contour figure per group plus a combined grid.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Workbook to read (first worksheet is used)
    sheet: PathBuf,

    /// Feature columns to plot; defaults to the first two columns of the
    /// first group
    #[arg(short, long)]
    features: Vec<String>,

    /// Histogram bucket width on the x axis
    #[arg(long, default_value_t = 25_000.0)]
    x_bin_size: f64,

    /// Histogram bucket width on the y axis
    #[arg(long, default_value_t = 0.01)]
    y_bin_size: f64,

    /// Lower bound of the density color scale
    #[arg(long, default_value_t = 0.0)]
    count_min: f64,

    /// Upper bound of the density color scale; 0 scales per group
    #[arg(long, default_value_t = 0.0)]
    count_max: f64,

    /// Color scale for the density cells
    #[arg(long, value_enum, default_value = "viridis")]
    colorscale: ColorScale,

    /// Plot raw counts instead of per-group percentages
    #[arg(long)]
    counts: bool,

    /// Draw bucket outlines on top of the filled cells
    #[arg(long)]
    outlines: bool,

    /// Seed axis ranges from the data instead of anchoring them at zero
    #[arg(long)]
    data_bounds: bool,

    /// Image formats to write
    #[arg(long, value_enum, value_delimiter = ',', default_values = ["png", "svg"])]
    formats: Vec<ImageFormat>,

    /// Root folder for the timestamped output directory
    #[arg(short, long, default_value = "outputs")]
    output: PathBuf,

    /// Figure width in pixels
    #[arg(long, default_value_t = 1600)]
    width: u32,

    /// Figure height in pixels
    #[arg(long, default_value_t = 800)]
    height: u32,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut orchestrator = Orchestrator::default();
    orchestrator.contour.count_min = args.count_min;
    orchestrator.contour.count_max = args.count_max;
    orchestrator.contour.colorscale = args.colorscale;
    orchestrator.contour.normalized = !args.counts;
    orchestrator.contour.show_outlines = args.outlines;
    orchestrator.layout.width = args.width;
    orchestrator.layout.height = args.height;
    orchestrator.seed = if args.data_bounds {
        RangeSeed::DataBounds
    } else {
        RangeSeed::ZeroAnchored
    };
    orchestrator.x_bin_size = args.x_bin_size;
    orchestrator.y_bin_size = args.y_bin_size;
    orchestrator.formats = args.formats;
    orchestrator.output_root = args.output;

    let summary = orchestrator
        .run(&args.sheet, &args.features)
        .with_context(|| format!("processing '{}' failed", args.sheet.display()))?;
    println!(
        "wrote {} group plots and a combined figure to {}",
        summary.groups.len(),
        summary.output_dir.display()
    );
    Ok(())
}
