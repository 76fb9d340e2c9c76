//! # Group Extraction Module
//!
//! The non-trivial part of the pipeline: recovering independent per-group
//! tables from one wide spreadsheet whose merged header cells collapsed into
//! "unnamed" placeholder columns, then reconciling numeric ranges across the
//! recovered groups so every plot shares one set of histogram buckets.
//!
//! Stages, leaf to root:
//! 1. [`split_groups`] cuts the wide table at every named header column.
//! 2. [`clean_group`] promotes each group's first data row to column names
//!    and produces a numeric, gap-free table.
//! 3. [`resolve_features`] picks and validates the two axis columns.
//! 4. [`feature_range`] folds per-column min/max across all groups.

mod clean;
mod features;
mod range;
mod split;

pub use clean::{clean_group, promote_headers};
pub use features::{resolve_features, MAX_FEATURES};
pub use range::{feature_range, feature_ranges, FeatureRange, RangeSeed};
pub use split::{split_groups, GroupSplit};

use thiserror::Error;

/// Errors raised while extracting groups or reconciling their columns.
#[derive(Error, Debug)]
pub enum GroupError {
    /// The sheet had no named header columns but the caller requires groups.
    #[error("no group headers found; expected named columns followed by 'unnamed' placeholders")]
    MissingGroups,

    /// A column requested for range reconciliation is absent from one group.
    #[error("column '{column}' not found; available columns: {available:?}")]
    ColumnLookup {
        column: String,
        available: Vec<String>,
    },

    /// Default feature selection needs more columns than the first group has.
    #[error("need at least {needed} columns to pick default features; available columns: {available:?}")]
    TooFewColumns {
        needed: usize,
        available: Vec<String>,
    },

    /// An explicitly requested feature is missing from one of the groups.
    #[error("feature '{feature}' is missing from a group; available columns: {available:?}")]
    FeatureNotFound {
        feature: String,
        available: Vec<String>,
    },
}
