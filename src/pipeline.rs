//! # Pipeline Module
//!
//! End-to-end driver: read the workbook, split and clean the groups,
//! resolve the plot axes, and render every figure. One synchronous pass,
//! each stage consuming the previous stage's output; any failure aborts
//! the run before further plot files are written.

use crate::error::ContourGridError;
use crate::group::{
    clean_group, feature_ranges, resolve_features, split_groups, FeatureRange, GroupError,
    RangeSeed, MAX_FEATURES,
};
use crate::plot::{
    render_combined, render_individual, AxisSpec, ContourSettings, LayoutSettings, ResolvedAxes,
};
use crate::source::read_table;
use crate::table::CleanTable;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

/// Image formats the pipeline can emit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

/// One pipeline run's configuration. Nothing in here is mutated by the run;
/// the resolved axis ranges come back in the [`RunSummary`] instead of
/// being written onto shared settings.
#[derive(Clone, Debug)]
pub struct Orchestrator {
    pub contour: ContourSettings,
    pub layout: LayoutSettings,
    /// How range accumulators are seeded; see [`RangeSeed`]
    pub seed: RangeSeed,
    pub x_bin_size: f64,
    pub y_bin_size: f64,
    pub formats: Vec<ImageFormat>,
    /// Figures land in a timestamped folder under this root
    pub output_root: PathBuf,
}

impl Default for Orchestrator {
    fn default() -> Self {
        Orchestrator {
            contour: ContourSettings::default(),
            layout: LayoutSettings::default(),
            seed: RangeSeed::default(),
            x_bin_size: 25_000.0,
            y_bin_size: 0.01,
            formats: vec![ImageFormat::Png, ImageFormat::Svg],
            output_root: PathBuf::from("outputs"),
        }
    }
}

/// What a successful run produced.
#[derive(Clone, Debug)]
pub struct RunSummary {
    /// Timestamped folder holding every figure of this run
    pub output_dir: PathBuf,
    /// Group names in sheet order
    pub groups: Vec<String>,
    /// The axes every figure was drawn against
    pub axes: ResolvedAxes,
}

impl Orchestrator {
    /// Runs the whole pipeline over the workbook at `sheet_path`.
    ///
    /// `requested` names the feature columns to plot; leave it empty to take
    /// the first two columns of the first group. A sheet without named group
    /// headers fails with [`GroupError::MissingGroups`]: the degenerate
    /// single-group split is valid for the splitter but not for a caller
    /// that is about to title subplots with group names.
    pub fn run(
        &self,
        sheet_path: &Path,
        requested: &[String],
    ) -> Result<RunSummary, ContourGridError> {
        let raw = read_table(sheet_path)?;
        log::debug!("read {} columns x {} rows", raw.width(), raw.height());

        let split = split_groups(&raw);
        if split.is_degenerate() {
            Err(GroupError::MissingGroups)?;
        }
        log::info!("groups identified: {:?}", split.names);

        let tables = split
            .tables
            .iter()
            .map(clean_group)
            .collect::<Result<Vec<CleanTable>, _>>()?;
        for (table, name) in tables.iter().zip(&split.names) {
            log::debug!("group '{}': {} rows after cleaning", name, table.height());
        }

        let features = resolve_features(&tables, requested)?;
        log::info!("features to be used: {features:?}");
        let ranges = feature_ranges(&tables, &features, self.seed)?;
        let axes = self.resolve_axes(&ranges)?;

        let output_dir = self.prepare_output_dir()?;
        for format in &self.formats {
            let path = output_dir.join(format!("combined.{}", format.extension()));
            render_combined(&path, &tables, &split.names, &axes, &self.contour, &self.layout)?;
        }
        log::info!("combined plot saved");
        for (table, title) in tables.iter().zip(&split.names) {
            for format in &self.formats {
                let path = output_dir.join(format!("{}.{}", file_stem(title), format.extension()));
                render_individual(&path, table, title, &axes, &self.contour, &self.layout)?;
            }
            log::info!("individual plot for '{title}' saved");
        }

        Ok(RunSummary {
            output_dir,
            groups: split.names,
            axes,
        })
    }

    /// Pairs the reconciled ranges with the configured bin sizes.
    fn resolve_axes(&self, ranges: &[(String, FeatureRange)]) -> Result<ResolvedAxes, GroupError> {
        if ranges.len() < MAX_FEATURES {
            return Err(GroupError::TooFewColumns {
                needed: MAX_FEATURES,
                available: ranges.iter().map(|(name, _)| name.to_owned()).collect(),
            });
        }
        Ok(ResolvedAxes {
            x: AxisSpec {
                feature: ranges[0].0.to_owned(),
                range: ranges[0].1,
                bin_size: self.x_bin_size,
            },
            y: AxisSpec {
                feature: ranges[1].0.to_owned(),
                range: ranges[1].1,
                bin_size: self.y_bin_size,
            },
        })
    }

    /// Creates `output_root/<timestamp>` for this run's figures.
    fn prepare_output_dir(&self) -> Result<PathBuf, std::io::Error> {
        let stamp = Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
        let output_dir = self.output_root.join(stamp);
        fs::create_dir_all(&output_dir)?;
        Ok(output_dir)
    }
}

/// Group names become file names; strip the separators that would not
/// survive the trip.
fn file_stem(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|character| match character {
            '/' | '\\' => '-',
            _ => character,
        })
        .collect();
    if stem.is_empty() {
        "group".to_owned()
    } else {
        stem
    }
}
