//! Named 1D histogram with independent per-bin content and statistical error.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A 1D histogram: `n_bins` contents and errors plus `n_bins + 1` edges.
///
/// The bin count is fixed at construction. Contents and errors are independently mutable
/// through [`Histogram::set_bin_content`] and [`Histogram::set_bin_error`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HistogramRepr", into = "HistogramRepr")]
pub struct Histogram {
    name: String,
    title: String,
    bin_edges: Vec<f64>,
    bin_content: Vec<f64>,
    bin_error: Vec<f64>,
}

/// On-disk shape of a histogram; converted through [`Histogram::new`] so invariants hold.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct HistogramRepr {
    name: String,
    #[serde(default)]
    title: String,
    bin_edges: Vec<f64>,
    bin_content: Vec<f64>,
    bin_error: Vec<f64>,
}

impl TryFrom<HistogramRepr> for Histogram {
    type Error = Error;

    fn try_from(r: HistogramRepr) -> Result<Self> {
        let mut h = Histogram::new(r.name, r.bin_edges, r.bin_content, r.bin_error)?;
        h.title = r.title;
        Ok(h)
    }
}

impl From<Histogram> for HistogramRepr {
    fn from(h: Histogram) -> Self {
        Self {
            name: h.name,
            title: h.title,
            bin_edges: h.bin_edges,
            bin_content: h.bin_content,
            bin_error: h.bin_error,
        }
    }
}

impl Histogram {
    /// Create a histogram, validating that edges, contents and errors agree in length.
    pub fn new(
        name: impl Into<String>,
        bin_edges: Vec<f64>,
        bin_content: Vec<f64>,
        bin_error: Vec<f64>,
    ) -> Result<Self> {
        let name = name.into();
        let n = bin_content.len();
        if bin_error.len() != n {
            return Err(Error::Validation(format!(
                "histogram '{}': {} errors for {} bins",
                name,
                bin_error.len(),
                n
            )));
        }
        if bin_edges.len() != n + 1 {
            return Err(Error::Validation(format!(
                "histogram '{}': {} edges for {} bins (expected {})",
                name,
                bin_edges.len(),
                n,
                n + 1
            )));
        }
        if bin_edges.windows(2).any(|w| w[0].partial_cmp(&w[1]) != Some(Ordering::Less)) {
            return Err(Error::Validation(format!(
                "histogram '{}': bin edges must be strictly increasing",
                name
            )));
        }
        Ok(Self { name, title: String::new(), bin_edges, bin_content, bin_error })
    }

    /// Create a histogram whose errors are `sqrt(content)` (unweighted counts).
    pub fn from_counts(
        name: impl Into<String>,
        bin_edges: Vec<f64>,
        bin_content: Vec<f64>,
    ) -> Result<Self> {
        let bin_error = bin_content.iter().map(|c| c.abs().sqrt()).collect();
        Self::new(name, bin_edges, bin_content, bin_error)
    }

    /// Empty histogram with `n_bins` uniform bins over `[x_min, x_max)`.
    pub fn uniform(name: impl Into<String>, n_bins: usize, x_min: f64, x_max: f64) -> Result<Self> {
        let width = (x_max - x_min) / n_bins.max(1) as f64;
        let edges = (0..=n_bins).map(|i| x_min + width * i as f64).collect();
        Self::new(name, edges, vec![0.0; n_bins], vec![0.0; n_bins])
    }

    /// Histogram name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Histogram title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Set the title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Number of bins (fixed at construction).
    pub fn n_bins(&self) -> usize {
        self.bin_content.len()
    }

    /// Bin edges (length `n_bins + 1`).
    pub fn bin_edges(&self) -> &[f64] {
        &self.bin_edges
    }

    /// Bin contents.
    pub fn bin_content(&self) -> &[f64] {
        &self.bin_content
    }

    /// Per-bin statistical errors.
    pub fn bin_error(&self) -> &[f64] {
        &self.bin_error
    }

    /// Bin centres, one per bin.
    pub fn bin_centers(&self) -> Vec<f64> {
        self.bin_edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
    }

    /// Set the content of bin `i`. Panics if `i >= n_bins()`.
    pub fn set_bin_content(&mut self, i: usize, value: f64) {
        self.bin_content[i] = value;
    }

    /// Set the statistical error of bin `i`. Panics if `i >= n_bins()`.
    pub fn set_bin_error(&mut self, i: usize, value: f64) {
        self.bin_error[i] = value;
    }

    /// Sum of all bin contents.
    pub fn integral(&self) -> f64 {
        self.bin_content.iter().sum()
    }

    /// Largest bin content (0 for an empty histogram or all-negative contents).
    pub fn max_content(&self) -> f64 {
        self.bin_content.iter().copied().fold(0.0_f64, f64::max)
    }

    /// Clone under a new name with an empty title.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self { name: name.into(), title: String::new(), ..self.clone() }
    }

    /// Bin-wise add `other`: contents sum, errors add in quadrature.
    pub fn add(&mut self, other: &Histogram) -> Result<()> {
        if other.n_bins() != self.n_bins() {
            return Err(Error::Validation(format!(
                "cannot add '{}' ({} bins) to '{}' ({} bins)",
                other.name,
                other.n_bins(),
                self.name,
                self.n_bins()
            )));
        }
        for i in 0..self.n_bins() {
            self.bin_content[i] += other.bin_content[i];
            let (a, b) = (self.bin_error[i], other.bin_error[i]);
            self.bin_error[i] = (a * a + b * b).sqrt();
        }
        Ok(())
    }
}
