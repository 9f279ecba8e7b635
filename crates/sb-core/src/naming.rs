//! Naming convention for stored histograms and series.
//!
//! ```text
//! h_<scope>_<object>[_<variable>]_<suffix>      input sub-histograms
//! h_<scope>_<object>[_<variable>]_<label>       combined histograms (label = nominal | variation)
//! Gr_<scope>_<object>[_<variable>]_<label>      relative-deviation series
//! Gr_<scope>_<object>[_<variable>]_tot_uncert   per-sample total uncertainty
//! Final_h_<scope>_<object>[_<variable>]         rendered plot
//! ```
//!
//! Scopes, objects, variables and variation labels may themselves contain `_`, so names are
//! never split blindly. Matching builds the expected prefix from the known fields and then
//! validates the remaining token against a fixed vocabulary.

use std::fmt;

/// Label of combined nominal histograms.
pub const NOMINAL_LABEL: &str = "nominal";
/// Label of per-sample total-uncertainty series.
pub const TOTAL_UNCERT_LABEL: &str = "tot_uncert";
/// Suffix of data sub-histograms.
pub const DATA_SUFFIX: &str = "data";

/// Letters allowed in a flavour-category suffix.
const FLAVOUR_LETTERS: &[char] = &['b', 'c', 'l'];

/// An (object, variable) pair. Event-level quantities have no variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjVar {
    /// Physics object (e.g. `jet1`, `mu1`).
    pub object: String,
    /// Variable of the object (e.g. `pt`), `None` for event-level quantities.
    pub variable: Option<String>,
}

impl ObjVar {
    /// Object-level quantity.
    pub fn new(object: impl Into<String>, variable: impl Into<String>) -> Self {
        Self { object: object.into(), variable: Some(variable.into()) }
    }

    /// Event-level quantity (no variable component).
    pub fn event(object: impl Into<String>) -> Self {
        Self { object: object.into(), variable: None }
    }

    /// `<object>` or `<object>_<variable>`.
    pub fn key(&self) -> String {
        match &self.variable {
            Some(v) => format!("{}_{}", self.object, v),
            None => self.object.clone(),
        }
    }
}

impl fmt::Display for ObjVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// Which suffix vocabulary an input sub-histogram must use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuffixKind {
    /// Flavour-category tokens (simulation samples).
    Flavour,
    /// The literal `data` (data samples).
    Data,
}

/// A validated input sub-histogram suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategorySuffix {
    /// Flavour-category token over `{b, c, l}`; may be empty.
    Flavour(String),
    /// Data sub-histogram.
    Data,
}

impl CategorySuffix {
    /// Parse a suffix token under the given vocabulary.
    pub fn parse(token: &str, kind: SuffixKind) -> Option<Self> {
        match kind {
            SuffixKind::Data => (token == DATA_SUFFIX).then_some(CategorySuffix::Data),
            SuffixKind::Flavour => token
                .chars()
                .all(|c| FLAVOUR_LETTERS.contains(&c))
                .then(|| CategorySuffix::Flavour(token.to_string())),
        }
    }

    /// Token as it appears in the name.
    pub fn as_str(&self) -> &str {
        match self {
            CategorySuffix::Flavour(s) => s,
            CategorySuffix::Data => DATA_SUFFIX,
        }
    }
}

/// Name of a histogram: `h_<scope>_<objvar>_<label>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistName {
    /// Directory scope.
    pub scope: String,
    /// Object/variable pair.
    pub objvar: ObjVar,
    /// Trailing label (suffix, `nominal`, or a variation label).
    pub label: String,
}

impl HistName {
    /// Generic constructor.
    pub fn new(scope: &str, objvar: &ObjVar, label: &str) -> Self {
        Self { scope: scope.to_string(), objvar: objvar.clone(), label: label.to_string() }
    }

    /// Combined nominal histogram name.
    pub fn nominal(scope: &str, objvar: &ObjVar) -> Self {
        Self::new(scope, objvar, NOMINAL_LABEL)
    }

    /// `h_<scope>_<objvar>_`
    fn prefix(scope: &str, objvar: &ObjVar) -> String {
        format!("h_{}_{}_", scope, objvar.key())
    }

    /// Match a stored input name against `(scope, objvar)` and the expected suffix vocabulary.
    ///
    /// Returns the validated suffix, or `None` if the name belongs to something else.
    pub fn match_input(
        name: &str,
        scope: &str,
        objvar: &ObjVar,
        kind: SuffixKind,
    ) -> Option<CategorySuffix> {
        let rest = name.strip_prefix(&Self::prefix(scope, objvar))?;
        CategorySuffix::parse(rest, kind)
    }

    /// Name of the rendered plot for this histogram's (scope, objvar).
    pub fn plot_name(scope: &str, objvar: &ObjVar) -> String {
        format!("Final_h_{}_{}", scope, objvar.key())
    }
}

impl fmt::Display for HistName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h_{}_{}_{}", self.scope, self.objvar.key(), self.label)
    }
}

/// Name of an uncertainty series: `Gr_<scope>_<objvar>_<label>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesName {
    /// Directory scope.
    pub scope: String,
    /// Object/variable pair.
    pub objvar: ObjVar,
    /// Variation label or `tot_uncert`.
    pub label: String,
}

impl SeriesName {
    /// Generic constructor.
    pub fn new(scope: &str, objvar: &ObjVar, label: &str) -> Self {
        Self { scope: scope.to_string(), objvar: objvar.clone(), label: label.to_string() }
    }

    /// Per-sample total-uncertainty series name.
    pub fn total(scope: &str, objvar: &ObjVar) -> Self {
        Self::new(scope, objvar, TOTAL_UNCERT_LABEL)
    }

    /// Whether this is a total-uncertainty series.
    pub fn is_total(&self) -> bool {
        self.label == TOTAL_UNCERT_LABEL
    }

    /// Resolve a stored series name against a set of candidate objvars.
    ///
    /// Variable names may share prefixes (`pt` vs `pt_lead`), so the candidate with the
    /// longest matching key wins. Returns `None` if no candidate matches or the label is empty.
    pub fn resolve<'a>(
        name: &str,
        scope: &str,
        candidates: impl IntoIterator<Item = &'a ObjVar>,
    ) -> Option<Self> {
        let scoped = name.strip_prefix("Gr_")?.strip_prefix(scope)?.strip_prefix('_')?;
        candidates
            .into_iter()
            .filter_map(|ov| {
                let key = ov.key();
                let label = scoped.strip_prefix(key.as_str())?.strip_prefix('_')?;
                (!label.is_empty()).then(|| (key.len(), ov, label))
            })
            .max_by_key(|(len, _, _)| *len)
            .map(|(_, ov, label)| Self::new(scope, ov, label))
    }
}

impl fmt::Display for SeriesName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Gr_{}_{}_{}", self.scope, self.objvar.key(), self.label)
    }
}
