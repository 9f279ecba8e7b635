//! Histogram aggregation: flavour sub-histograms → combined nominal/variation histograms →
//! relative-deviation series.

use sb_core::naming::{HistName, ObjVar, SeriesName, SuffixKind};
use sb_core::{Error, Histogram, Result, UncertaintySeries};
use sb_store::{HistFile, ObjectClass};

use crate::config::SampleKind;

/// Relative deviation of one bin.
///
/// Both zero → 0; nominal zero → 1 (saturated); otherwise `(variation − nominal) / nominal`.
#[inline]
pub fn bin_deviation(nominal: f64, variation: f64) -> f64 {
    if nominal == 0.0 {
        if variation == 0.0 { 0.0 } else { 1.0 }
    } else {
        (variation - nominal) / nominal
    }
}

/// Per-bin relative deviation of `variation` from `nominal`, on the nominal bin centres.
pub fn relative_deviation(
    nominal: &Histogram,
    variation: &Histogram,
    name: impl Into<String>,
) -> Result<UncertaintySeries> {
    if nominal.n_bins() != variation.n_bins() {
        return Err(Error::Validation(format!(
            "bin count mismatch: '{}' has {}, '{}' has {}",
            nominal.name(),
            nominal.n_bins(),
            variation.name(),
            variation.n_bins()
        )));
    }
    let y = nominal
        .bin_content()
        .iter()
        .zip(variation.bin_content())
        .map(|(&n, &v)| bin_deviation(n, v))
        .collect();
    UncertaintySeries::from_points(name, nominal.bin_centers(), y)
}

/// Names of the histograms in `names` that belong to `(scope, objvar)` under `kind`.
pub fn select_matching<'a>(
    names: impl IntoIterator<Item = &'a str>,
    scope: &str,
    objvar: &ObjVar,
    kind: SuffixKind,
) -> Vec<String> {
    names
        .into_iter()
        .filter(|n| HistName::match_input(n, scope, objvar, kind).is_some())
        .map(str::to_string)
        .collect()
}

/// Bin-wise sum of `dir/<name>` for every name, renamed to `out_name`.
///
/// An empty name list is [`Error::NoMatchingData`]; a missing name is
/// [`Error::MissingResource`].
pub fn sum_histograms(
    file: &HistFile,
    dir: &str,
    names: &[String],
    out_name: &str,
) -> Result<Histogram> {
    let Some((first, rest)) = names.split_first() else {
        return Err(Error::NoMatchingData(format!("{dir}: nothing to sum for {out_name}")));
    };
    let mut total = file.get_histogram(&format!("{dir}/{first}"))?.renamed(out_name);
    for name in rest {
        let h = file.get_histogram(&format!("{dir}/{name}"))?;
        total.add(&h)?;
    }
    Ok(total)
}

/// Counters of one [`aggregate_sample`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateOutcome {
    /// Combined nominal histograms written.
    pub nominal_written: usize,
    /// Deviation series written.
    pub series_written: usize,
    /// (variation, objvar) combinations skipped.
    pub variations_skipped: usize,
}

/// Aggregate one sample within one scope and write the results under `<scope>/<sample>/`.
///
/// `variations` holds already-opened variation stores with their labels; it is ignored for
/// data samples. If nothing in the nominal store matches any objvar, the sample is
/// incomplete and [`Error::NoMatchingData`] is returned before anything is written.
pub fn aggregate_sample(
    scope: &str,
    sample: &str,
    kind: SampleKind,
    objvars: &[ObjVar],
    nominal: &HistFile,
    variations: &[(String, HistFile)],
    out: &mut HistFile,
) -> Result<AggregateOutcome> {
    let suffix_kind = match kind {
        SampleKind::Data => SuffixKind::Data,
        SampleKind::Nominal | SampleKind::Systematic => SuffixKind::Flavour,
    };

    let hist_names: Vec<String> = match nominal.list_keys(scope) {
        Ok(keys) => {
            keys.into_iter().filter(|k| k.class == ObjectClass::Histogram).map(|k| k.name).collect()
        }
        Err(e) if e.is_missing() => Vec::new(),
        Err(e) => return Err(e.into()),
    };

    let selected: Vec<(&ObjVar, Vec<String>)> = objvars
        .iter()
        .map(|ov| {
            let names = hist_names.iter().map(String::as_str);
            (ov, select_matching(names, scope, ov, suffix_kind))
        })
        .collect();
    if selected.iter().all(|(_, m)| m.is_empty()) {
        return Err(Error::NoMatchingData(format!(
            "{sample}: no histograms in scope '{scope}' match the configured plots"
        )));
    }

    let out_dir = format!("{scope}/{sample}");
    out.mkdir(&out_dir);
    let mut outcome = AggregateOutcome::default();

    for (objvar, matches) in &selected {
        if matches.is_empty() {
            tracing::debug!(sample, objvar = %objvar, "no input histograms");
            continue;
        }
        tracing::debug!(sample, objvar = %objvar, n = matches.len(), "summing sub-histograms");

        let nominal_name = HistName::nominal(scope, objvar).to_string();
        let nominal_hist = sum_histograms(nominal, scope, matches, &nominal_name)?;

        if kind != SampleKind::Data {
            for (label, vfile) in variations {
                let var_name = HistName::new(scope, objvar, label).to_string();
                let series_name = SeriesName::new(scope, objvar, label).to_string();
                let deviation = sum_histograms(vfile, scope, matches, &var_name)
                    .and_then(|v| relative_deviation(&nominal_hist, &v, series_name));
                match deviation {
                    Ok(series) => {
                        out.put_series(&out_dir, series);
                        outcome.series_written += 1;
                    }
                    Err(e) => {
                        tracing::warn!(
                            sample,
                            variation = %label,
                            objvar = %objvar,
                            "skipping variation: {e}"
                        );
                        outcome.variations_skipped += 1;
                    }
                }
            }
        }

        out.put_histogram(&out_dir, nominal_hist);
        outcome.nominal_written += 1;
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SCOPE: &str = "emu_OS_J2";

    fn hist(name: &str, content: &[f64]) -> Histogram {
        let edges: Vec<f64> = (0..=content.len()).map(|i| i as f64 * 10.0).collect();
        Histogram::from_counts(name, edges, content.to_vec()).unwrap()
    }

    fn store_with(hists: &[Histogram]) -> HistFile {
        let mut f = HistFile::create("unused.json");
        for h in hists {
            f.put_histogram(SCOPE, h.clone());
        }
        f
    }

    #[test]
    fn deviation_saturation_policy() {
        assert_eq!(bin_deviation(0.0, 0.0), 0.0);
        assert_eq!(bin_deviation(0.0, 3.0), 1.0);
        assert_eq!(bin_deviation(0.0, -3.0), 1.0);
        assert_relative_eq!(bin_deviation(4.0, 5.0), 0.25);
    }

    #[test]
    fn deviation_reference_values() {
        let n = hist("n", &[10.0, 20.0, 0.0]);
        let v = hist("v", &[12.0, 18.0, 5.0]);
        let s = relative_deviation(&n, &v, "Gr").unwrap();
        assert_relative_eq!(s.y()[0], 0.2, epsilon = 1e-12);
        assert_relative_eq!(s.y()[1], -0.1, epsilon = 1e-12);
        assert_relative_eq!(s.y()[2], 1.0);
        assert_eq!(s.x(), &[5.0, 15.0, 25.0]);
    }

    #[test]
    fn identical_variation_gives_zero_series() {
        let n = hist("n", &[3.0, 0.0, 7.5]);
        let s = relative_deviation(&n, &n.renamed("v"), "Gr").unwrap();
        assert!(s.y().iter().all(|&y| y == 0.0));
    }

    #[test]
    fn deviation_bin_mismatch_is_validation_error() {
        let err =
            relative_deviation(&hist("n", &[1.0]), &hist("v", &[1.0, 2.0]), "Gr").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn sums_matching_flavours_only() {
        let ov = ObjVar::new("jet1", "pt");
        let f = store_with(&[
            hist("h_emu_OS_J2_jet1_pt_bb", &[1.0, 2.0]),
            hist("h_emu_OS_J2_jet1_pt_l", &[3.0, 4.0]),
            hist("h_emu_OS_J2_jet1_pt_data", &[100.0, 100.0]),
            hist("h_emu_OS_J2_jet1_eta_bb", &[100.0, 100.0]),
        ]);
        let names = f.list_keys(SCOPE).unwrap().into_iter().map(|k| k.name).collect::<Vec<_>>();
        let matches =
            select_matching(names.iter().map(String::as_str), SCOPE, &ov, SuffixKind::Flavour);
        assert_eq!(matches.len(), 2);

        let total = sum_histograms(&f, SCOPE, &matches, "h_emu_OS_J2_jet1_pt_nominal").unwrap();
        assert_eq!(total.name(), "h_emu_OS_J2_jet1_pt_nominal");
        assert_eq!(total.bin_content(), &[4.0, 6.0]);
        assert_relative_eq!(total.bin_error()[0], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn sum_of_nothing_is_no_matching_data() {
        let f = store_with(&[]);
        let err = sum_histograms(&f, SCOPE, &[], "x").unwrap_err();
        assert!(matches!(err, Error::NoMatchingData(_)));
    }

    #[test]
    fn aggregate_writes_nominal_and_deviations() {
        let ov = ObjVar::new("jet1", "pt");
        let nominal = store_with(&[
            hist("h_emu_OS_J2_jet1_pt_b", &[4.0, 10.0, 0.0]),
            hist("h_emu_OS_J2_jet1_pt_l", &[6.0, 10.0, 0.0]),
        ]);
        let up = store_with(&[
            hist("h_emu_OS_J2_jet1_pt_b", &[6.0, 9.0, 2.0]),
            hist("h_emu_OS_J2_jet1_pt_l", &[6.0, 9.0, 3.0]),
        ]);
        // Lacks one of the matched names: skipped, not fatal.
        let broken = store_with(&[hist("h_emu_OS_J2_jet1_pt_b", &[1.0, 1.0, 1.0])]);
        let variations = vec![("JES_UP".to_string(), up), ("BROKEN".to_string(), broken)];

        let mut out = HistFile::create("out.json");
        let outcome = aggregate_sample(
            SCOPE,
            "S_tt_a",
            SampleKind::Nominal,
            std::slice::from_ref(&ov),
            &nominal,
            &variations,
            &mut out,
        )
        .unwrap();
        assert_eq!(
            outcome,
            AggregateOutcome { nominal_written: 1, series_written: 1, variations_skipped: 1 }
        );

        let nom = out.get_histogram("emu_OS_J2/S_tt_a/h_emu_OS_J2_jet1_pt_nominal").unwrap();
        assert_eq!(nom.bin_content(), &[10.0, 20.0, 0.0]);
        let dev = out.get_series("emu_OS_J2/S_tt_a/Gr_emu_OS_J2_jet1_pt_JES_UP").unwrap();
        assert_relative_eq!(dev.y()[0], 0.2, epsilon = 1e-12);
        assert_relative_eq!(dev.y()[1], -0.1, epsilon = 1e-12);
        assert_relative_eq!(dev.y()[2], 1.0);
        assert!(out.get_series("emu_OS_J2/S_tt_a/Gr_emu_OS_J2_jet1_pt_BROKEN").is_err());
    }

    #[test]
    fn data_sample_uses_data_suffix_and_ignores_variations() {
        let ov = ObjVar::event("nJets");
        let nominal = store_with(&[
            hist("h_emu_OS_J2_nJets_data", &[5.0, 6.0]),
            hist("h_emu_OS_J2_nJets_bb", &[100.0, 100.0]),
        ]);
        let variations = vec![("X".to_string(), nominal.clone())];
        let mut out = HistFile::create("out.json");
        let outcome = aggregate_sample(
            SCOPE,
            "S_data_c",
            SampleKind::Data,
            std::slice::from_ref(&ov),
            &nominal,
            &variations,
            &mut out,
        )
        .unwrap();
        assert_eq!(outcome.series_written, 0);
        let h = out.get_histogram("emu_OS_J2/S_data_c/h_emu_OS_J2_nJets_nominal").unwrap();
        assert_eq!(h.bin_content(), &[5.0, 6.0]);
    }

    #[test]
    fn no_match_marks_sample_incomplete() {
        let nominal = store_with(&[hist("h_emu_OS_J2_mu1_pt_bb", &[1.0])]);
        let mut out = HistFile::create("out.json");
        let err = aggregate_sample(
            SCOPE,
            "S_tt_a",
            SampleKind::Nominal,
            &[ObjVar::new("jet1", "pt")],
            &nominal,
            &[],
            &mut out,
        )
        .unwrap_err();
        assert!(matches!(err, Error::NoMatchingData(_)));
        assert!(!out.has_dir("emu_OS_J2/S_tt_a"));

        // Missing scope directory behaves the same way.
        let empty = HistFile::create("empty.json");
        let err = aggregate_sample(SCOPE, "S", SampleKind::Nominal, &[], &empty, &[], &mut out)
            .unwrap_err();
        assert!(err.is_recoverable());
    }
}
