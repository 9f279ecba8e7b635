//! Pipelines over a histogram store.
//!
//! - [`create_syst_file`]: per scope, aggregate every sample from its input files into the
//!   output store, then compute each sample's `tot_uncert` series.
//! - [`collect_plot_inputs`]: per (scope, objvar), gather stacked simulation, data and the
//!   final band from a store written by `create`.

use std::path::Path;

use sb_core::naming::{HistName, ObjVar};
use sb_core::{Error, Histogram, Result, UncertaintySeries};
use sb_store::HistFile;
use serde::Serialize;

use crate::aggregate::{AggregateOutcome, aggregate_sample};
use crate::band::build_band;
use crate::combine::{substitution_total_uncertainty, tree_total_uncertainty};
use crate::config::{RunConfig, SampleKind, process_label};
use crate::discover::discover_sample_inputs;

/// Outcome of one scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScopeReport {
    /// Scope name.
    pub scope: String,
    /// Samples aggregated successfully.
    pub complete: Vec<String>,
    /// Samples excluded from later stages.
    pub incomplete: Vec<String>,
    /// `tot_uncert` series written.
    pub totals_written: usize,
}

/// Outcome of [`create_syst_file`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateReport {
    /// One entry per scope, in processing order.
    pub scopes: Vec<ScopeReport>,
}

fn process_sample(
    config: &RunConfig,
    input_root: &Path,
    scope: &str,
    sample: &str,
    kind: SampleKind,
    objvars: &[ObjVar],
    out: &mut HistFile,
) -> Result<AggregateOutcome> {
    let inputs = discover_sample_inputs(input_root, sample, &config.samples)?;
    let nominal = HistFile::open(&inputs.nominal).map_err(|e| {
        Error::MissingResource(format!("{}: {e}", inputs.nominal.display()))
    })?;

    let mut variations = Vec::with_capacity(inputs.variations.len());
    for v in &inputs.variations {
        match HistFile::open(&v.path) {
            Ok(f) => variations.push((v.label.clone(), f)),
            Err(e) => tracing::warn!(sample, variation = %v.label, "cannot open variation: {e}"),
        }
    }

    aggregate_sample(scope, sample, kind, objvars, &nominal, &variations, out)
}

fn sample_total(
    config: &RunConfig,
    out: &HistFile,
    scope: &str,
    sample: &str,
    kind: SampleKind,
    objvar: &ObjVar,
    objvars: &[ObjVar],
) -> Result<UncertaintySeries> {
    match (kind, config.samples.reference_for(sample)) {
        (SampleKind::Systematic, Some(reference)) => {
            substitution_total_uncertainty(out, scope, sample, reference, objvar)
        }
        _ => tree_total_uncertainty(out, scope, sample, objvar, objvars),
    }
}

/// Aggregate all configured samples into the store at `output` (created or updated).
///
/// Failing to open or write the output store aborts; every per-sample or per-objvar failure
/// is logged and skipped. Each sample directory is cleared before it is aggregated, so a re-run
/// leaves nothing behind from inputs that have since disappeared.
pub fn create_syst_file(
    config: &RunConfig,
    input_root: &Path,
    output: &Path,
) -> Result<CreateReport> {
    let mut out = HistFile::open_or_create(output)?;
    let objvars = config.object_variables();
    let mut report = CreateReport::default();

    for scope in &config.scopes {
        tracing::info!(scope = scope.as_str(), "processing scope");
        out.mkdir(scope);
        let mut scope_report = ScopeReport { scope: scope.clone(), ..Default::default() };
        let mut complete: Vec<(&str, SampleKind)> = Vec::new();

        for (sample, kind) in config.samples.all() {
            tracing::info!(scope = scope.as_str(), sample, "aggregating sample");
            out.clear_dir(&format!("{scope}/{sample}"));
            match process_sample(config, input_root, scope, sample, kind, &objvars, &mut out) {
                Ok(outcome) => {
                    tracing::debug!(
                        sample,
                        nominal = outcome.nominal_written,
                        series = outcome.series_written,
                        skipped = outcome.variations_skipped,
                        "sample aggregated"
                    );
                    complete.push((sample, kind));
                    scope_report.complete.push(sample.to_string());
                }
                Err(e) => {
                    tracing::warn!(scope = scope.as_str(), sample, "sample incomplete: {e}");
                    scope_report.incomplete.push(sample.to_string());
                }
            }
        }
        out.write()?;

        for &(sample, kind) in &complete {
            if kind == SampleKind::Data {
                continue;
            }
            let dir = format!("{scope}/{sample}");
            for objvar in &objvars {
                match sample_total(config, &out, scope, sample, kind, objvar, &objvars) {
                    Ok(total) => {
                        out.put_series(&dir, total);
                        scope_report.totals_written += 1;
                    }
                    Err(e) if e.is_recoverable() => {
                        tracing::debug!(sample, objvar = %objvar, "no total uncertainty: {e}");
                    }
                    Err(e) => {
                        tracing::warn!(sample, objvar = %objvar, "no total uncertainty: {e}");
                    }
                }
            }
        }
        tracing::info!(
            scope = scope.as_str(),
            complete = scope_report.complete.len(),
            incomplete = scope_report.incomplete.len(),
            totals = scope_report.totals_written,
            "scope done"
        );
        report.scopes.push(scope_report);
    }

    out.write()?;
    Ok(report)
}

/// A sample's combined nominal histogram, labelled for the legend.
#[derive(Debug, Clone)]
pub struct SampleHistogram {
    /// Sample name.
    pub sample: String,
    /// Process token used as legend label.
    pub label: String,
    /// Combined nominal histogram.
    pub hist: Histogram,
}

/// Everything needed to build one comparison plot.
#[derive(Debug, Clone)]
pub struct PlotInputs {
    /// Scope.
    pub scope: String,
    /// Object/variable pair.
    pub objvar: ObjVar,
    /// `Final_h_<scope>_<objvar>`.
    pub plot_name: String,
    /// Nominal simulation samples, in config order.
    pub mc: Vec<SampleHistogram>,
    /// Sum of all data samples, if any.
    pub data: Option<Histogram>,
    /// Final absolute systematic band, if any sample contributes.
    pub band: Option<UncertaintySeries>,
}

fn sum_data(
    store: &HistFile,
    scope: &str,
    objvar: &ObjVar,
    samples: &[String],
) -> Option<Histogram> {
    let name = HistName::nominal(scope, objvar);
    let mut total: Option<Histogram> = None;
    for sample in samples {
        let Ok(h) = store.get_histogram(&format!("{scope}/{sample}/{name}")) else {
            continue;
        };
        match total.as_mut() {
            None => total = Some(h),
            Some(t) => {
                if let Err(e) = t.add(&h) {
                    tracing::warn!(
                        sample = sample.as_str(),
                        objvar = %objvar,
                        "data not summed: {e}"
                    );
                }
            }
        }
    }
    total
}

/// Gather plot inputs for every (scope, objvar) from a store written by [`create_syst_file`].
///
/// Combinations without any simulation histogram are skipped.
pub fn collect_plot_inputs(config: &RunConfig, store: &HistFile) -> Vec<PlotInputs> {
    let samples = &config.samples;
    let band_samples: Vec<String> =
        samples.nominal_samples().iter().chain(samples.systematic_samples()).cloned().collect();
    let mut out = Vec::new();

    for scope in &config.scopes {
        for objvar in config.object_variables() {
            let name = HistName::nominal(scope, &objvar);
            let mc: Vec<SampleHistogram> = samples
                .nominal_samples()
                .iter()
                .filter_map(|sample| {
                    let hist = store.get_histogram(&format!("{scope}/{sample}/{name}")).ok()?;
                    Some(SampleHistogram {
                        sample: sample.clone(),
                        label: process_label(sample).to_string(),
                        hist,
                    })
                })
                .collect();
            if mc.is_empty() {
                tracing::warn!(
                    scope = scope.as_str(),
                    objvar = %objvar,
                    "no simulation, skipping plot"
                );
                continue;
            }

            let data = sum_data(store, scope, &objvar, samples.data_samples());
            let band = build_band(store, scope, &objvar, &band_samples);
            if band.is_none() {
                tracing::info!(objvar = %objvar, "no systematic band, statistical errors only");
            }
            out.push(PlotInputs {
                scope: scope.clone(),
                plot_name: HistName::plot_name(scope, &objvar),
                objvar,
                mc,
                data,
                band,
            });
        }
    }
    out
}
