//! Final band: yield-weighted quadrature sum of per-sample total uncertainties.

use sb_core::naming::{HistName, ObjVar, SeriesName};
use sb_core::{Histogram, UncertaintySeries};
use sb_store::HistFile;

use crate::combine::finalize_quadrature;

/// Label of the in-memory band series.
pub const BAND_LABEL: &str = "syst_band";

/// One sample's input to the band.
#[derive(Debug, Clone, Copy)]
pub struct BandContribution<'a> {
    /// Sample name (for logging).
    pub sample: &'a str,
    /// Relative total uncertainty.
    pub relative: &'a UncertaintySeries,
    /// Combined nominal histogram providing per-bin yields.
    pub yields: &'a Histogram,
}

/// `band_i = sqrt(Σ_s (rel_i(s) · yield_i(s))²)`.
///
/// The first contribution fixes the bin count; later ones that disagree (series or yields)
/// are skipped with a warning. `None` if nothing contributes.
pub fn combine_band(
    contributions: &[BandContribution<'_>],
    name: &str,
) -> Option<UncertaintySeries> {
    let mut x: Option<&[f64]> = None;
    let mut sum_sq: Vec<f64> = Vec::new();

    for c in contributions {
        let n = c.relative.n_points();
        if c.yields.n_bins() != n {
            tracing::warn!(
                sample = c.sample,
                points = n,
                bins = c.yields.n_bins(),
                "series/histogram size mismatch, sample skipped"
            );
            continue;
        }
        match x {
            None => {
                x = Some(c.relative.x());
                sum_sq = vec![0.0; n];
            }
            Some(_) if sum_sq.len() != n => {
                tracing::warn!(
                    sample = c.sample,
                    points = n,
                    expected = sum_sq.len(),
                    "band size mismatch, sample skipped"
                );
                continue;
            }
            Some(_) => {}
        }
        for ((acc, rel), yld) in sum_sq.iter_mut().zip(c.relative.y()).zip(c.yields.bin_content()) {
            let abs = rel * yld;
            *acc += abs * abs;
        }
    }

    let x = x?;
    let y = sum_sq.into_iter().enumerate().map(|(i, s)| finalize_quadrature(s, i)).collect();
    UncertaintySeries::from_points(name, x.to_vec(), y).ok()
}

/// Build the band for `(scope, objvar)` from the per-sample totals stored in `store`.
///
/// Samples without a directory, a total series or a nominal histogram are skipped silently
/// (debug log): they are incomplete or do not produce that objvar.
pub fn build_band(
    store: &HistFile,
    scope: &str,
    objvar: &ObjVar,
    samples: &[String],
) -> Option<UncertaintySeries> {
    let total_name = SeriesName::total(scope, objvar);
    let nominal_name = HistName::nominal(scope, objvar);

    let mut inputs: Vec<(&str, UncertaintySeries, Histogram)> = Vec::new();
    for sample in samples {
        let dir = format!("{scope}/{sample}");
        let series = store.get_series(&format!("{dir}/{total_name}"));
        let yields = store.get_histogram(&format!("{dir}/{nominal_name}"));
        match (series, yields) {
            (Ok(s), Ok(h)) => inputs.push((sample.as_str(), s, h)),
            (s, h) => {
                let reason = s.err().or(h.err()).map(|e| e.to_string()).unwrap_or_default();
                tracing::debug!(
                    sample = sample.as_str(),
                    objvar = %objvar,
                    "not in band: {reason}"
                );
            }
        }
    }

    let contributions: Vec<BandContribution<'_>> = inputs
        .iter()
        .map(|(sample, relative, yields)| BandContribution { sample: *sample, relative, yields })
        .collect();
    tracing::debug!(objvar = %objvar, n = contributions.len(), "band contributors");
    combine_band(&contributions, &SeriesName::new(scope, objvar, BAND_LABEL).to_string())
}
