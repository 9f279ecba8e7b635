//! # sb-viz
//!
//! Visualization data artifacts for systband.
//!
//! This crate is intentionally dependency-light and focuses on emitting
//! plot-friendly JSON structures (arrays instead of nested objects).

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Stacked simulation vs. data comparison with ratio panel.
pub mod comparison;

/// Axis labels derived from object/variable names.
pub mod labels;

pub use comparison::{
    COMPARISON_SCHEMA_VERSION, ComparisonArtifact, ComparisonSample, comparison_artifact,
};
pub use labels::{axis_label, round_to_1};
