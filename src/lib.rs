//! # contourgrid
//!
//! Splits a wide spreadsheet holding several side-by-side experiment groups
//! into independent tables and renders a 2D density-contour figure per
//! group, plus one combined grid figure.
//!
//! Spreadsheets exported with merged group-header cells read back as one
//! named column followed by "Unnamed: N" placeholder columns per group;
//! the true per-feature names sit in the first data row. This crate
//! recovers the groups from that convention, promotes the real headers,
//! drops incomplete rows, coerces every column to numbers, and reconciles
//! min/max ranges across the groups so every plot shares one set of
//! histogram buckets.
//!
//! ## Pipeline
//!
//! ```text
//! workbook -> RawTable -> split_groups -> clean_group* -> resolve_features
//!          -> feature_ranges -> ResolvedAxes -> render combined + per-group
//! ```
//!
//! The [`pipeline::Orchestrator`] drives the stages end to end; every stage
//! is also usable on its own against in-memory tables.

pub mod error;
pub mod group;
pub mod pipeline;
pub mod plot;
pub mod source;
pub mod table;

pub use error::ContourGridError;
pub use pipeline::{ImageFormat, Orchestrator, RunSummary};
