use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::RenderError;
use crate::color::{Color, fallback_color};
use crate::theme::BuiltinTheme;

/// Top-level visualization configuration (YAML or programmatic).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    pub theme: String,
    pub figure: FigureConfig,
    pub font: FontConfig,
    pub axes: AxesConfig,
    pub experiment: ExperimentConfig,
    pub colors: ColorsConfig,
    /// Stack colour per process label.
    pub sample_colors: BTreeMap<String, Color>,
    pub output: OutputConfig,
    pub comparison: ComparisonConfig,
}

impl Default for VizConfig {
    fn default() -> Self {
        BuiltinTheme::Atlas.base_config()
    }
}

impl VizConfig {
    /// Stack colour for `label`; unknown labels cycle through the fallback palette by
    /// their position in the stack.
    pub fn sample_color(&self, label: &str, index: usize) -> Color {
        self.sample_colors.get(label).copied().unwrap_or_else(|| fallback_color(index))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self { width: 576.0, height: 504.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub size: f64,
    pub label_size: f64,
    pub tick_size: f64,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self { size: 11.0, label_size: 12.0, tick_size: 9.5 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AxesConfig {
    /// `in` or `out`.
    pub tick_direction: String,
    pub show_top_ticks: bool,
    pub show_right_ticks: bool,
    pub tick_length: f64,
    pub minor_tick_length: f64,
}

impl Default for AxesConfig {
    fn default() -> Self {
        Self {
            tick_direction: "in".into(),
            show_top_ticks: true,
            show_right_ticks: true,
            tick_length: 6.0,
            minor_tick_length: 3.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub name: String,
    pub status: String,
    pub sqrt_s_tev: f64,
    pub lumi_fb_inv: f64,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            name: "ATLAS".into(),
            status: "Internal".into(),
            sqrt_s_tev: 13.0,
            lumi_fb_inv: 139.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    pub observed: Color,
    /// Hatch of the total-uncertainty band.
    pub band: Color,
    /// Outline of the stack total.
    pub total: Color,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            observed: Color::rgb(0, 0, 0),
            band: Color::rgb(0, 0, 0),
            total: Color::rgb(103, 76, 71),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dpi: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { dpi: 220 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    pub show_mc_band: bool,
    pub ratio_y_range: [f64; 2],
    /// Lower limit of the log-scaled main panel.
    pub y_min: f64,
    /// Upper limit is `y_max * headroom`, leaving space for header and legend.
    pub headroom: f64,
    /// Share of the content height given to the ratio panel.
    pub ratio_fraction: f64,
    pub legend_columns: usize,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            show_mc_band: true,
            ratio_y_range: [0.5, 1.5],
            y_min: 0.1,
            headroom: 1000.0,
            ratio_fraction: 0.3,
            legend_columns: 2,
        }
    }
}

impl VizConfig {
    fn validate(&self) -> crate::Result<()> {
        let c = &self.comparison;
        if c.y_min.is_nan() || c.y_min <= 0.0 {
            return Err(RenderError::Config(format!(
                "comparison.y_min must be > 0, got {}",
                c.y_min
            )));
        }
        if c.headroom.is_nan() || c.headroom < 1.0 {
            return Err(RenderError::Config(format!(
                "comparison.headroom must be >= 1, got {}",
                c.headroom
            )));
        }
        let [lo, hi] = c.ratio_y_range;
        if lo.is_nan() || hi.is_nan() || lo >= hi {
            return Err(RenderError::Config(format!(
                "comparison.ratio_y_range [{lo}, {hi}] is empty"
            )));
        }
        if c.ratio_fraction.is_nan() || c.ratio_fraction <= 0.0 || c.ratio_fraction >= 1.0 {
            return Err(RenderError::Config(format!(
                "comparison.ratio_fraction must be in (0, 1), got {}",
                c.ratio_fraction
            )));
        }
        if c.legend_columns == 0 {
            return Err(RenderError::Config("comparison.legend_columns must be >= 1".into()));
        }
        Ok(())
    }
}

/// Recursively overlay `top` onto `base`; mappings merge, everything else replaces.
fn merge_yaml(base: &mut serde_yaml_ng::Value, top: serde_yaml_ng::Value) {
    use serde_yaml_ng::Value;
    match (base, top) {
        (Value::Mapping(b), Value::Mapping(t)) => {
            for (k, v) in t {
                match b.get_mut(&k) {
                    Some(slot) => merge_yaml(slot, v),
                    None => {
                        b.insert(k, v);
                    }
                }
            }
        }
        (slot, v) => *slot = v,
    }
}

/// Resolve a [`VizConfig`] from optional YAML.
///
/// The `theme` key picks the base preset; the remaining keys override it field by field.
pub fn resolve_config(user_yaml: Option<&str>) -> crate::Result<VizConfig> {
    let Some(yaml) = user_yaml else {
        return Ok(VizConfig::default());
    };
    let user: serde_yaml_ng::Value =
        serde_yaml_ng::from_str(yaml).map_err(|e| RenderError::Config(e.to_string()))?;
    let theme = user.get("theme").and_then(|t| t.as_str()).map(BuiltinTheme::parse);
    let base = theme.unwrap_or(BuiltinTheme::Atlas).base_config();

    let mut merged =
        serde_yaml_ng::to_value(&base).map_err(|e| RenderError::Config(e.to_string()))?;
    if !user.is_null() {
        merge_yaml(&mut merged, user);
    }
    let config: VizConfig =
        serde_yaml_ng::from_value(merged).map_err(|e| RenderError::Config(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// Load and resolve a YAML config file.
pub fn load_config(path: &Path) -> crate::Result<VizConfig> {
    let text = std::fs::read_to_string(path)?;
    resolve_config(Some(&text))
}
