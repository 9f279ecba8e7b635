//! Input discovery: nominal and variation store files of a sample.
//!
//! ```text
//! <input>/<S>/<S>_<label>_combination.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use sb_core::{Error, Result};

use crate::config::SamplesConfig;

const FILE_SUFFIX: &str = "_combination.json";

/// A file-level systematic variation of a sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariationFile {
    /// Label between `<S>_` and `_combination.json`.
    pub label: String,
    /// Full path.
    pub path: PathBuf,
}

/// Input files of one sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleInputs {
    /// Nominal store file.
    pub nominal: PathBuf,
    /// Variation store files, sorted by path.
    pub variations: Vec<VariationFile>,
}

/// `<S>_<label>_combination.json`
pub fn combination_file_name(sample: &str, label: &str) -> String {
    format!("{sample}_{label}{FILE_SUFFIX}")
}

/// Extract the label from a file name of `sample`, if it follows the convention.
fn label_of<'a>(file_name: &'a str, sample: &str) -> Option<&'a str> {
    let label = file_name.strip_prefix(sample)?.strip_prefix('_')?.strip_suffix(FILE_SUFFIX)?;
    (!label.is_empty()).then_some(label)
}

/// Locate the nominal file and, where applicable, the variation files of `sample`.
///
/// A missing nominal file is [`Error::MissingResource`]. The sample directory is not
/// scanned for samples without variation files (data, nominal overrides).
pub fn discover_sample_inputs(
    input_root: &Path,
    sample: &str,
    samples: &SamplesConfig,
) -> Result<SampleInputs> {
    let dir = input_root.join(sample);
    let nominal_label = samples.nominal_label(sample);
    let nominal = dir.join(combination_file_name(sample, nominal_label));
    if !nominal.is_file() {
        return Err(Error::MissingResource(nominal.display().to_string()));
    }

    let mut variations = Vec::new();
    if samples.has_variation_files(sample) {
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let ft = entry.file_type()?;
            if !ft.is_file() {
                continue;
            }
            let path = entry.path();
            if let Some(name) = path.file_name().and_then(|s| s.to_str())
                && let Some(label) = label_of(name, sample)
                && label != nominal_label
            {
                variations.push(VariationFile { label: label.to_string(), path: path.clone() });
            }
        }
        variations.sort_by(|a, b| a.path.cmp(&b.path));
    }
    tracing::debug!(sample, n_variations = variations.len(), "discovered inputs");

    Ok(SampleInputs { nominal, variations })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn tmp_dir(name: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
        p.push(format!("sb-syst-{}-{}-{}", name, std::process::id(), nanos));
        p
    }

    fn rm_rf(path: &Path) {
        let _ = std::fs::remove_dir_all(path);
    }

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), "{}").unwrap();
    }

    fn samples() -> SamplesConfig {
        SamplesConfig::from_json_str(
            r#"{"NomSamples": ["S_tt_a", "S_W_b"], "DataSamples": ["S_data_c"],
                "NominalOverrides": {"S_W_b": "nominal_AFII"}}"#,
        )
        .unwrap()
    }

    #[test]
    fn label_extraction() {
        assert_eq!(label_of("S_tt_a_JES_UP_combination.json", "S_tt_a"), Some("JES_UP"));
        assert_eq!(label_of("S_tt_a__combination.json", "S_tt_a"), None);
        assert_eq!(label_of("S_tt_ab_x_combination.json", "S_tt_a"), None);
        assert_eq!(label_of("S_tt_a_x.json", "S_tt_a"), None);
    }

    #[test]
    fn discovers_sorted_variations() {
        let root = tmp_dir("disc1");
        rm_rf(&root);
        let dir = root.join("S_tt_a");
        std::fs::create_dir_all(dir.join("subdir_combination.json")).unwrap();
        touch(&dir, "S_tt_a_nominal_combination.json");
        touch(&dir, "S_tt_a_JES_UP_combination.json");
        touch(&dir, "S_tt_a_FSR_DOWN_combination.json");
        touch(&dir, "README.txt");

        let inputs = discover_sample_inputs(&root, "S_tt_a", &samples()).unwrap();
        assert!(inputs.nominal.ends_with("S_tt_a/S_tt_a_nominal_combination.json"));
        let labels: Vec<&str> = inputs.variations.iter().map(|v| v.label.as_str()).collect();
        assert_eq!(labels, ["FSR_DOWN", "JES_UP"]);

        rm_rf(&root);
    }

    #[test]
    fn overrides_and_data_have_no_variations() {
        let root = tmp_dir("disc2");
        rm_rf(&root);
        let w = root.join("S_W_b");
        std::fs::create_dir_all(&w).unwrap();
        touch(&w, "S_W_b_nominal_AFII_combination.json");
        touch(&w, "S_W_b_JES_UP_combination.json");
        let d = root.join("S_data_c");
        std::fs::create_dir_all(&d).unwrap();
        touch(&d, "S_data_c_data_combination.json");

        let cfg = samples();
        let w_inputs = discover_sample_inputs(&root, "S_W_b", &cfg).unwrap();
        assert!(w_inputs.nominal.ends_with("S_W_b_nominal_AFII_combination.json"));
        assert!(w_inputs.variations.is_empty());
        let d_inputs = discover_sample_inputs(&root, "S_data_c", &cfg).unwrap();
        assert!(d_inputs.variations.is_empty());

        rm_rf(&root);
    }

    #[test]
    fn missing_nominal_is_recoverable() {
        let root = tmp_dir("disc3");
        rm_rf(&root);
        let err = discover_sample_inputs(&root, "S_tt_a", &samples()).unwrap_err();
        assert!(matches!(err, Error::MissingResource(_)));
        assert!(err.is_recoverable());
    }
}
