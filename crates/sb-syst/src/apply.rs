//! Merge a systematic band with a histogram's statistical errors.

use sb_core::{Error, Histogram, Result, UncertaintySeries};

/// `content · sqrt((stat/content)² + (syst/content)²)`; relative terms are 0 for empty bins.
#[inline]
pub fn combined_error(content: f64, stat: f64, syst: f64) -> f64 {
    let (stat_rel, syst_rel) =
        if content == 0.0 { (0.0, 0.0) } else { (stat / content, syst / content) };
    content * (stat_rel * stat_rel + syst_rel * syst_rel).sqrt()
}

/// Clone of `hist` whose errors combine its statistical error with `band` (absolute).
pub fn apply_band(hist: &Histogram, band: &UncertaintySeries) -> Result<Histogram> {
    if band.n_points() != hist.n_bins() {
        return Err(Error::Validation(format!(
            "band '{}' has {} points, histogram '{}' has {} bins",
            band.name(),
            band.n_points(),
            hist.name(),
            hist.n_bins()
        )));
    }
    let mut out = hist.clone();
    for (i, &syst) in band.y().iter().enumerate() {
        let err = combined_error(hist.bin_content()[i], hist.bin_error()[i], syst);
        out.set_bin_error(i, err);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn mc() -> Histogram {
        Histogram::new("mc", vec![0.0, 1.0, 2.0, 3.0], vec![100.0, 0.0, 25.0], vec![10.0, 0.0, 5.0])
            .unwrap()
    }

    #[test]
    fn zero_band_keeps_stat_errors() {
        let h = mc();
        let band = UncertaintySeries::zeros_like(&h, "band");
        let out = apply_band(&h, &band).unwrap();
        for (a, b) in out.bin_error().iter().zip(h.bin_error()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-12);
        }
    }

    #[test]
    fn combines_in_quadrature_and_leaves_input_untouched() {
        let h = mc();
        let band = UncertaintySeries::from_points("band", h.bin_centers(), vec![10.0, 3.0, 12.0])
            .unwrap();
        let out = apply_band(&h, &band).unwrap();
        assert_relative_eq!(out.bin_error()[0], 200f64.sqrt(), epsilon = 1e-12);
        // Empty bin: both relative terms are zero.
        assert_eq!(out.bin_error()[1], 0.0);
        assert_relative_eq!(out.bin_error()[2], 13.0, epsilon = 1e-12);
        assert_eq!(out.bin_content(), h.bin_content());
        assert_eq!(h.bin_error(), &[10.0, 0.0, 5.0]);
    }

    #[test]
    fn size_mismatch_is_validation_error() {
        let h = mc();
        let band = UncertaintySeries::from_points("band", vec![0.5], vec![1.0]).unwrap();
        assert!(matches!(apply_band(&h, &band), Err(Error::Validation(_))));
    }
}
