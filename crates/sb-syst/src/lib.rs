//! # sb-syst
//!
//! Systematic-uncertainty aggregation for stacked data/simulation comparisons.
//!
//! Pipeline:
//! 1. [`aggregate`]: sum flavour sub-histograms per sample, compute per-variation relative
//!    deviations from nominal.
//! 2. [`combine`]: per-sample quadrature sum of deviations (or a single substitution
//!    deviation against a reference sample).
//! 3. [`band`]: yield-weighted quadrature sum across samples into an absolute band.
//! 4. [`apply`]: merge the band with the summed simulation's statistical error.
//!
//! [`pipeline`] drives steps 1–2 over a histogram store (`create`) and gathers the inputs of
//! steps 3–4 for plotting.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aggregate;
pub mod apply;
pub mod band;
pub mod combine;
pub mod config;
pub mod discover;
pub mod pipeline;

pub use aggregate::{aggregate_sample, relative_deviation, sum_histograms};
pub use apply::apply_band;
pub use band::{BandContribution, build_band, combine_band};
pub use combine::{combine_in_quadrature, substitution_total_uncertainty, tree_total_uncertainty};
pub use config::{PlotsConfig, RunConfig, SampleKind, SamplesConfig};
pub use pipeline::{CreateReport, PlotInputs, collect_plot_inputs, create_syst_file};
