//! Stacked simulation vs. data comparison artifact (numbers-first).

use std::time::{SystemTime, UNIX_EPOCH};

use sb_core::{Error, Histogram, Result};
use sb_syst::apply_band;
use sb_syst::pipeline::{PlotInputs, SampleHistogram};
use serde::{Deserialize, Serialize};

use crate::labels::{axis_label, round_to_1};

/// Schema tag of [`ComparisonArtifact`].
pub const COMPARISON_SCHEMA_VERSION: &str = "systband_comparison_v0";

/// One comparison plot: stacked simulation, total with combined errors, data, ratio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonArtifact {
    /// [`COMPARISON_SCHEMA_VERSION`].
    pub schema_version: String,
    /// Producer metadata.
    pub meta: ComparisonMeta,
    /// `Final_h_<scope>_<objvar>`.
    pub plot_name: String,
    /// Directory scope.
    pub scope: String,
    /// x-axis label.
    pub x_label: String,
    /// y-axis label of the main panel.
    pub y_label: String,
    /// `n + 1` bin edges.
    pub bin_edges: Vec<f64>,
    /// Stacked samples, ascending integral (smallest at the bottom).
    pub samples: Vec<ComparisonSample>,
    /// Sum of all stacked samples.
    pub total_mc_y: Vec<f64>,
    /// Statistical error of the total.
    pub total_mc_stat_err: Vec<f64>,
    /// Absolute systematic band, if any sample contributed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syst_band: Option<Vec<f64>>,
    /// Statistical and systematic error combined.
    pub total_mc_err: Vec<f64>,
    /// Summed data, if any data sample is present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<DataSeries>,
    /// How the ratio is formed.
    pub ratio_policy: RatioPolicy,
    /// Data / total simulation; `null` where undefined.
    pub ratio_y: Vec<Option<f64>>,
    /// Data error / total simulation.
    pub ratio_yerr: Vec<Option<f64>>,
    /// `1 ± total_mc_err / total_mc_y`; `null` for empty bins.
    pub ratio_band: BandEnvelope,
    /// Largest simulation bin rounded to one significant figure.
    pub y_max: f64,
}

/// Producer metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonMeta {
    /// Tool name.
    pub tool: String,
    /// Tool version.
    pub tool_version: String,
    /// Creation time.
    pub created_unix_ms: u64,
}

/// One stacked sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonSample {
    /// Sample name.
    pub name: String,
    /// Legend label (process token).
    pub label: String,
    /// Bin contents.
    pub y: Vec<f64>,
}

/// Data points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSeries {
    /// Bin contents.
    pub y: Vec<f64>,
    /// Symmetric errors.
    pub yerr: Vec<f64>,
}

/// Ratio definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatioPolicy {
    /// Numerator series.
    pub numerator: String,
    /// Denominator series (its errors are not propagated).
    pub denominator: String,
    /// Value used where the denominator is zero.
    pub zero_policy: String,
}

/// Lower/upper envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BandEnvelope {
    /// Lower edge.
    pub lo: Vec<Option<f64>>,
    /// Upper edge.
    pub hi: Vec<Option<f64>>,
}

fn now_unix_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or(0)
}

fn divide(num: f64, den: f64) -> Option<f64> {
    (den.is_finite() && den != 0.0 && num.is_finite()).then(|| num / den)
}

fn ratio_band(total: &Histogram) -> BandEnvelope {
    let mut band = BandEnvelope::default();
    for (&y, &e) in total.bin_content().iter().zip(total.bin_error()) {
        let rel = divide(e, y);
        band.lo.push(rel.map(|r| 1.0 - r));
        band.hi.push(rel.map(|r| 1.0 + r));
    }
    band
}

fn sum_stack(inputs: &PlotInputs) -> Result<Histogram> {
    let Some((first, rest)) = inputs.mc.split_first() else {
        return Err(Error::NoMatchingData(format!("{}: no simulation", inputs.plot_name)));
    };
    let mut total = first.hist.renamed(format!("{}_total", inputs.plot_name));
    for s in rest {
        total.add(&s.hist)?;
    }
    Ok(total)
}

/// Build the comparison artifact for one (scope, objvar).
///
/// Errors if there is no simulation, or if stacked, band and data binnings disagree.
pub fn comparison_artifact(inputs: &PlotInputs) -> Result<ComparisonArtifact> {
    let total = sum_stack(inputs)?;
    let n_bins = total.n_bins();

    let combined = match &inputs.band {
        Some(band) => apply_band(&total, band)?,
        None => total.clone(),
    };

    let mut stacked: Vec<&SampleHistogram> = inputs.mc.iter().collect();
    stacked.sort_by(|a, b| a.hist.integral().total_cmp(&b.hist.integral()));
    let samples = stacked
        .into_iter()
        .map(|s| ComparisonSample {
            name: s.sample.clone(),
            label: s.label.clone(),
            y: s.hist.bin_content().to_vec(),
        })
        .collect();

    let data = match &inputs.data {
        Some(d) if d.n_bins() != n_bins => {
            return Err(Error::Validation(format!(
                "{}: data has {} bins, simulation has {n_bins}",
                inputs.plot_name,
                d.n_bins()
            )));
        }
        Some(d) => Some(DataSeries { y: d.bin_content().to_vec(), yerr: d.bin_error().to_vec() }),
        None => None,
    };

    let (ratio_y, ratio_yerr): (Vec<Option<f64>>, Vec<Option<f64>>) = match &data {
        Some(d) => total
            .bin_content()
            .iter()
            .zip(d.y.iter().zip(&d.yerr))
            .map(|(&mc, (&y, &e))| (divide(y, mc), divide(e, mc)))
            .unzip(),
        None => (vec![None; n_bins], vec![None; n_bins]),
    };

    tracing::debug!(plot = inputs.plot_name.as_str(), n_bins, "comparison artifact");

    Ok(ComparisonArtifact {
        schema_version: COMPARISON_SCHEMA_VERSION.to_string(),
        meta: ComparisonMeta {
            tool: "systband".to_string(),
            tool_version: sb_core::VERSION.to_string(),
            created_unix_ms: now_unix_ms(),
        },
        plot_name: inputs.plot_name.clone(),
        scope: inputs.scope.clone(),
        x_label: axis_label(&inputs.objvar),
        y_label: "No. of Events".to_string(),
        bin_edges: total.bin_edges().to_vec(),
        samples,
        total_mc_y: total.bin_content().to_vec(),
        total_mc_stat_err: total.bin_error().to_vec(),
        syst_band: inputs.band.as_ref().map(|b| b.y().to_vec()),
        total_mc_err: combined.bin_error().to_vec(),
        data,
        ratio_policy: RatioPolicy {
            numerator: "data".to_string(),
            denominator: "mc_total".to_string(),
            zero_policy: "null".to_string(),
        },
        ratio_y,
        ratio_yerr,
        ratio_band: ratio_band(&combined),
        y_max: round_to_1(total.max_content()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use sb_core::UncertaintySeries;
    use sb_core::naming::ObjVar;

    fn hist(name: &str, content: &[f64]) -> Histogram {
        let edges = (0..=content.len()).map(|i| i as f64 * 25.0).collect();
        Histogram::from_counts(name, edges, content.to_vec()).unwrap()
    }

    fn sample(name: &str, label: &str, content: &[f64]) -> SampleHistogram {
        SampleHistogram { sample: name.into(), label: label.into(), hist: hist(name, content) }
    }

    fn inputs() -> PlotInputs {
        PlotInputs {
            scope: "emu_OS_J2".into(),
            objvar: ObjVar::new("jet1", "pt"),
            plot_name: "Final_h_emu_OS_J2_jet1_pt".into(),
            mc: vec![
                sample("S_ttbar_a", "ttbar", &[900.0, 16.0, 0.0]),
                sample("S_Wjets_b", "Wjets", &[100.0, 9.0, 0.0]),
            ],
            data: Some(hist("data", &[1100.0, 20.0, 3.0])),
            band: None,
        }
    }

    #[test]
    fn stack_totals_and_ratio() {
        let art = comparison_artifact(&inputs()).unwrap();
        assert_eq!(art.schema_version, COMPARISON_SCHEMA_VERSION);
        assert_eq!(art.x_label, "j₁ - pT");
        // Ascending integral: Wjets first.
        let labels: Vec<&str> = art.samples.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["Wjets", "ttbar"]);
        assert_eq!(art.total_mc_y, [1000.0, 25.0, 0.0]);
        assert_relative_eq!(art.y_max, 1000.0);

        assert_relative_eq!(art.ratio_y[0].unwrap(), 1.1, epsilon = 1e-12);
        assert_relative_eq!(art.ratio_y[1].unwrap(), 0.8, epsilon = 1e-12);
        assert_eq!(art.ratio_y[2], None);
        // Denominator errors are not propagated.
        assert_relative_eq!(art.ratio_yerr[1].unwrap(), 20f64.sqrt() / 25.0, epsilon = 1e-12);

        // No band: combined errors are the statistical ones.
        assert!(art.syst_band.is_none());
        assert_eq!(art.total_mc_err, art.total_mc_stat_err);
        assert_relative_eq!(art.ratio_band.hi[1].unwrap(), 1.2, epsilon = 1e-12);
        assert_eq!(art.ratio_band.lo[2], None);
    }

    #[test]
    fn band_widens_errors() {
        let mut inp = inputs();
        let centers = inp.mc[0].hist.bin_centers();
        let band = UncertaintySeries::from_points("band", centers, vec![0.0, 3.0, 0.0]).unwrap();
        inp.band = Some(band);
        let art = comparison_artifact(&inp).unwrap();
        // stat = 5, syst = 3
        assert_relative_eq!(art.total_mc_err[1], 34f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(art.total_mc_err[0], art.total_mc_stat_err[0], epsilon = 1e-12);
        assert_eq!(art.syst_band.as_deref(), Some(&[0.0, 3.0, 0.0][..]));
    }

    #[test]
    fn json_keeps_null_ratio() {
        let art = comparison_artifact(&inputs()).unwrap();
        let json = serde_json::to_string(&art).unwrap();
        assert!(json.contains("\"ratio_y\":[1.1"));
        let back: ComparisonArtifact = serde_json::from_str(&json).unwrap();
        assert_eq!(back.ratio_y[2], None);
        assert_eq!(back.samples.len(), 2);
    }

    #[test]
    fn binning_mismatch_and_empty_stack() {
        let mut inp = inputs();
        inp.data = Some(hist("data", &[1.0]));
        assert!(matches!(comparison_artifact(&inp), Err(Error::Validation(_))));

        let mut inp = inputs();
        inp.mc.clear();
        assert!(comparison_artifact(&inp).is_err());
    }
}
