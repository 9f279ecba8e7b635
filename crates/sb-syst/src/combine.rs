//! Per-sample total uncertainty: quadrature sum of variation deviations (tree mode) or a
//! single deviation against a reference sample (substitution mode).

use sb_core::naming::{HistName, ObjVar, SeriesName};
use sb_core::{Error, Result, UncertaintySeries};
use sb_store::{HistFile, ObjectClass};

use crate::aggregate::relative_deviation;

/// Square root of an accumulated sum of squares.
///
/// A negative sum cannot come out of correct accumulation; it is still handled by taking
/// `sqrt(|sum|)` and flagging the bin.
#[inline]
pub fn finalize_quadrature(sum_sq: f64, bin: usize) -> f64 {
    if sum_sq < 0.0 {
        tracing::warn!(bin, sum_sq, "negative quadrature sum, value is suspect");
        (-sum_sq).sqrt()
    } else {
        sum_sq.sqrt()
    }
}

/// Bin-wise `sqrt(Σ y²)` over `series`, on the x positions of the first one.
///
/// Returns `Ok(None)` for an empty input and [`Error::Validation`] if point counts differ.
pub fn combine_in_quadrature<'a>(
    series: impl IntoIterator<Item = &'a UncertaintySeries>,
    name: &str,
) -> Result<Option<UncertaintySeries>> {
    let mut iter = series.into_iter();
    let Some(first) = iter.next() else {
        return Ok(None);
    };
    let mut sum_sq: Vec<f64> = first.y().iter().map(|y| y * y).collect();
    for s in iter {
        if s.n_points() != sum_sq.len() {
            return Err(Error::Validation(format!(
                "cannot combine '{}' ({} points) with '{}' ({} points)",
                s.name(),
                s.n_points(),
                first.name(),
                sum_sq.len()
            )));
        }
        for (acc, y) in sum_sq.iter_mut().zip(s.y()) {
            *acc += y * y;
        }
    }
    let y = sum_sq.into_iter().enumerate().map(|(i, s)| finalize_quadrature(s, i)).collect();
    UncertaintySeries::from_points(name, first.x().to_vec(), y).map(Some)
}

/// Tree-mode total uncertainty of `sample` for `objvar`, read from `store`.
///
/// Every `Gr_<scope>_<objvar>_<label>` series under `<scope>/<sample>/` contributes, except
/// the total itself. `objvars` is the full candidate list used to disambiguate names. With no
/// variation series the result is all-zero on the nominal histogram's bin centres; a missing
/// nominal histogram is [`Error::MissingResource`].
pub fn tree_total_uncertainty(
    store: &HistFile,
    scope: &str,
    sample: &str,
    objvar: &ObjVar,
    objvars: &[ObjVar],
) -> Result<UncertaintySeries> {
    let dir = format!("{scope}/{sample}");
    let total_name = SeriesName::total(scope, objvar).to_string();

    let mut inputs = Vec::new();
    for key in store.list_keys(&dir)? {
        if key.class != ObjectClass::Series {
            continue;
        }
        let Some(parsed) = SeriesName::resolve(&key.name, scope, objvars) else {
            continue;
        };
        if &parsed.objvar != objvar || parsed.is_total() {
            continue;
        }
        inputs.push(store.get_series(&format!("{dir}/{}", key.name))?);
    }
    tracing::debug!(sample, objvar = %objvar, n = inputs.len(), "combining variations");

    match combine_in_quadrature(&inputs, &total_name)? {
        Some(total) => Ok(total),
        None => {
            let path = format!("{dir}/{}", HistName::nominal(scope, objvar));
            let nominal = store.get_histogram(&path)?;
            Ok(UncertaintySeries::zeros_like(&nominal, total_name))
        }
    }
}

/// Substitution-mode total uncertainty: signed relative deviation of the sample's nominal
/// histogram from its reference sample's nominal histogram.
pub fn substitution_total_uncertainty(
    store: &HistFile,
    scope: &str,
    sample: &str,
    reference: &str,
    objvar: &ObjVar,
) -> Result<UncertaintySeries> {
    let nominal_name = HistName::nominal(scope, objvar);
    let reference_hist = store.get_histogram(&format!("{scope}/{reference}/{nominal_name}"))?;
    let sample_hist = store.get_histogram(&format!("{scope}/{sample}/{nominal_name}"))?;
    relative_deviation(&reference_hist, &sample_hist, SeriesName::total(scope, objvar).to_string())
}
