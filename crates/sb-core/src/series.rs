//! Per-bin uncertainty series (one `(x, y)` point per histogram bin).

use serde::{Deserialize, Serialize};

use crate::{Error, Histogram, Result};

/// Ordered `(x, y)` points addressed by bin position.
///
/// Depending on the stage, `y` is a relative deviation (dimensionless) or an absolute
/// uncertainty in histogram-content units. `x` is the bin centre of the source histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SeriesRepr", into = "SeriesRepr")]
pub struct UncertaintySeries {
    name: String,
    title: String,
    x: Vec<f64>,
    y: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SeriesRepr {
    name: String,
    #[serde(default)]
    title: String,
    x: Vec<f64>,
    y: Vec<f64>,
}

impl TryFrom<SeriesRepr> for UncertaintySeries {
    type Error = Error;

    fn try_from(r: SeriesRepr) -> Result<Self> {
        let mut s = UncertaintySeries::from_points(r.name, r.x, r.y)?;
        s.title = r.title;
        Ok(s)
    }
}

impl From<UncertaintySeries> for SeriesRepr {
    fn from(s: UncertaintySeries) -> Self {
        Self { name: s.name, title: s.title, x: s.x, y: s.y }
    }
}

impl UncertaintySeries {
    /// Build from explicit coordinates.
    pub fn from_points(name: impl Into<String>, x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        let name = name.into();
        if x.len() != y.len() {
            return Err(Error::Validation(format!(
                "series '{}': {} x values for {} y values",
                name,
                x.len(),
                y.len()
            )));
        }
        Ok(Self { name, title: String::new(), x, y })
    }

    /// All-zero series positioned on the bin centres of `hist`.
    pub fn zeros_like(hist: &Histogram, name: impl Into<String>) -> Self {
        let x = hist.bin_centers();
        let y = vec![0.0; x.len()];
        Self { name: name.into(), title: String::new(), x, y }
    }

    /// Series name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Series title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Number of points.
    pub fn n_points(&self) -> usize {
        self.y.len()
    }

    /// X coordinates (bin centres).
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Y values.
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Overwrite point `i`'s y value. Panics if `i >= n_points()`.
    pub fn set_y(&mut self, i: usize, value: f64) {
        self.y[i] = value;
    }

    /// Rename, also setting the title to the new name.
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self.title = self.name.clone();
        self
    }
}
