//! # sb-core
//!
//! Core types shared by the systband crates.
//!
//! - [`Histogram`]: named 1D histogram with per-bin content and statistical error.
//! - [`UncertaintySeries`]: per-bin `(x, y)` points holding a relative or absolute uncertainty.
//! - [`naming`]: the `h_<scope>_<object>[_<variable>]_<suffix>` naming convention.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod histogram;
pub mod naming;
pub mod series;

pub use error::{Error, Result};
pub use histogram::Histogram;
pub use naming::{CategorySuffix, HistName, ObjVar, SeriesName};
pub use series::UncertaintySeries;

/// Crate version, stamped into artifacts.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
