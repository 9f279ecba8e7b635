//! Run configuration: which plots to build and which samples contribute.
//!
//! Both documents are JSON. The parsed [`RunConfig`] is immutable and passed by reference
//! through the pipelines.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use sb_core::naming::{DATA_SUFFIX, NOMINAL_LABEL, ObjVar};
use sb_core::{Error, Result};
use serde::Deserialize;

/// Plot category whose entries are event-level quantities (no variable component).
pub const EVENT_CATEGORY: &str = "Events";

/// Scope used when none is given.
pub const DEFAULT_SCOPE: &str = "emu_OS_J2";

/// One plot category: a list of objects and the variables plotted for each.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PlotCategory {
    /// Physics objects (e.g. `jet1`, `mu1`).
    #[serde(rename = "Objs")]
    pub objects: Vec<String>,
    /// Variables of each object (ignored for [`EVENT_CATEGORY`]).
    #[serde(rename = "Vars", default)]
    pub variables: Vec<String>,
}

/// Plots config: category name → [`PlotCategory`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct PlotsConfig {
    categories: BTreeMap<String, PlotCategory>,
}

impl PlotsConfig {
    /// Parse and validate a plots config document.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| Error::Configuration(format!("plots config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a plots config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Configuration(format!("read {}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    fn validate(&self) -> Result<()> {
        for (name, cat) in &self.categories {
            if cat.objects.iter().any(|o| o.is_empty()) {
                return Err(Error::Configuration(format!("category '{name}': empty object name")));
            }
            if name != EVENT_CATEGORY && cat.variables.iter().any(|v| v.is_empty()) {
                return Err(Error::Configuration(format!(
                    "category '{name}': empty variable name"
                )));
            }
        }
        Ok(())
    }

    /// Categories in name order.
    pub fn categories(&self) -> impl Iterator<Item = (&str, &PlotCategory)> {
        self.categories.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Every (object, variable) pair to process, in category → object → variable order.
    ///
    /// Event-level pairs are de-duplicated; a pair listed by two categories appears once.
    pub fn object_variables(&self) -> Vec<ObjVar> {
        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        for (name, cat) in &self.categories {
            for obj in &cat.objects {
                if name == EVENT_CATEGORY {
                    let ov = ObjVar::event(obj.as_str());
                    if seen.insert(ov.clone()) {
                        out.push(ov);
                    }
                    continue;
                }
                for var in &cat.variables {
                    let ov = ObjVar::new(obj.as_str(), var.as_str());
                    if seen.insert(ov.clone()) {
                        out.push(ov);
                    }
                }
            }
        }
        out
    }
}

/// Role of a sample in the comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    /// Nominal simulation: stacked, carries tree-based variations.
    Nominal,
    /// Alternative simulation: contributes one substitution deviation against its reference.
    Systematic,
    /// Recorded data.
    Data,
}

#[derive(Debug, Deserialize)]
struct SamplesDocument {
    #[serde(rename = "NomSamples", default)]
    nominal: Vec<String>,
    #[serde(rename = "SystSamples", default)]
    systematic: Vec<String>,
    #[serde(rename = "DataSamples", default)]
    data: Vec<String>,
    #[serde(rename = "SystReferences", default)]
    references: BTreeMap<String, String>,
    #[serde(rename = "NominalOverrides", default)]
    nominal_overrides: BTreeMap<String, String>,
}

/// Samples config, validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SamplesConfig {
    nominal: Vec<String>,
    systematic: Vec<String>,
    data: Vec<String>,
    references: BTreeMap<String, String>,
    nominal_overrides: BTreeMap<String, String>,
}

impl SamplesConfig {
    /// Parse and validate a samples config document.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let doc: SamplesDocument = serde_json::from_str(s)
            .map_err(|e| Error::Configuration(format!("samples config: {e}")))?;
        let cfg = Self {
            nominal: doc.nominal,
            systematic: doc.systematic,
            data: doc.data,
            references: doc.references,
            nominal_overrides: doc.nominal_overrides,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a samples config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Configuration(format!("read {}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for s in self.nominal.iter().chain(&self.systematic).chain(&self.data) {
            if s.is_empty() {
                return Err(Error::Configuration("empty sample name".into()));
            }
            if !seen.insert(s.as_str()) {
                return Err(Error::Configuration(format!("sample '{s}' listed more than once")));
            }
        }

        for s in &self.systematic {
            let Some(reference) = self.references.get(s) else {
                return Err(Error::Configuration(format!(
                    "systematic sample '{s}' has no entry in SystReferences"
                )));
            };
            if reference == s {
                return Err(Error::Configuration(format!("sample '{s}' references itself")));
            }
            if !matches!(self.kind(reference), Some(SampleKind::Nominal | SampleKind::Systematic))
            {
                return Err(Error::Configuration(format!(
                    "reference '{reference}' of '{s}' is not a simulation sample"
                )));
            }
        }
        if let Some(extra) = self.references.keys().find(|k| !self.systematic.contains(*k)) {
            return Err(Error::Configuration(format!(
                "SystReferences entry '{extra}' is not a systematic sample"
            )));
        }

        for (s, label) in &self.nominal_overrides {
            if !matches!(self.kind(s), Some(SampleKind::Nominal | SampleKind::Systematic)) {
                return Err(Error::Configuration(format!(
                    "NominalOverrides entry '{s}' is not a simulation sample"
                )));
            }
            if label.is_empty() {
                return Err(Error::Configuration(format!("empty nominal override for '{s}'")));
            }
        }
        Ok(())
    }

    /// Role of `sample`, if configured.
    pub fn kind(&self, sample: &str) -> Option<SampleKind> {
        let has = |v: &[String]| v.iter().any(|s| s == sample);
        if has(&self.nominal) {
            Some(SampleKind::Nominal)
        } else if has(&self.systematic) {
            Some(SampleKind::Systematic)
        } else if has(&self.data) {
            Some(SampleKind::Data)
        } else {
            None
        }
    }

    /// Nominal simulation samples, in config order.
    pub fn nominal_samples(&self) -> &[String] {
        &self.nominal
    }

    /// Systematic simulation samples, in config order.
    pub fn systematic_samples(&self) -> &[String] {
        &self.systematic
    }

    /// Data samples, in config order.
    pub fn data_samples(&self) -> &[String] {
        &self.data
    }

    /// All samples with their role: nominal, then systematic, then data.
    pub fn all(&self) -> impl Iterator<Item = (&str, SampleKind)> {
        let nominal = self.nominal.iter().map(|s| (s.as_str(), SampleKind::Nominal));
        let systematic = self.systematic.iter().map(|s| (s.as_str(), SampleKind::Systematic));
        let data = self.data.iter().map(|s| (s.as_str(), SampleKind::Data));
        nominal.chain(systematic).chain(data)
    }

    /// Reference sample of a systematic sample.
    pub fn reference_for(&self, sample: &str) -> Option<&str> {
        self.references.get(sample).map(String::as_str)
    }

    /// Label of the sample's nominal input file.
    pub fn nominal_label(&self, sample: &str) -> &str {
        if self.kind(sample) == Some(SampleKind::Data) {
            return DATA_SUFFIX;
        }
        self.nominal_overrides.get(sample).map(String::as_str).unwrap_or(NOMINAL_LABEL)
    }

    /// Whether variation files are discovered for `sample`.
    ///
    /// Data samples and samples with a nominal override carry no file-level variations.
    pub fn has_variation_files(&self, sample: &str) -> bool {
        self.kind(sample) != Some(SampleKind::Data) && !self.nominal_overrides.contains_key(sample)
    }
}

/// Legend label of a sample: the process token, i.e. the second `_`-separated field
/// (`FTAG2_ttbar_PhPy8` → `ttbar`). Falls back to the whole name.
pub fn process_label(sample: &str) -> &str {
    sample.split('_').nth(1).filter(|s| !s.is_empty()).unwrap_or(sample)
}

/// Immutable configuration of one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory scopes to process, in order.
    pub scopes: Vec<String>,
    /// Plot categories.
    pub plots: PlotsConfig,
    /// Sample roles.
    pub samples: SamplesConfig,
}

impl RunConfig {
    /// Assemble a run config. An empty scope list falls back to [`DEFAULT_SCOPE`].
    pub fn new(scopes: Vec<String>, plots: PlotsConfig, samples: SamplesConfig) -> Result<Self> {
        let scopes = if scopes.is_empty() { vec![DEFAULT_SCOPE.to_string()] } else { scopes };
        let mut seen = BTreeSet::new();
        for s in &scopes {
            if s.is_empty() || s.contains('/') {
                return Err(Error::Configuration(format!("invalid scope name '{s}'")));
            }
            if !seen.insert(s.as_str()) {
                return Err(Error::Configuration(format!("scope '{s}' listed more than once")));
            }
        }
        Ok(Self { scopes, plots, samples })
    }

    /// Load both config files.
    pub fn load(plots: &Path, samples: &Path, scopes: Vec<String>) -> Result<Self> {
        Self::new(scopes, PlotsConfig::load(plots)?, SamplesConfig::load(samples)?)
    }

    /// Shorthand for [`PlotsConfig::object_variables`].
    pub fn object_variables(&self) -> Vec<ObjVar> {
        self.plots.object_variables()
    }
}
