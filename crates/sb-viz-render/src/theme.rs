use crate::color::PROCESS_COLORS;
use crate::config::*;

/// Built-in theme presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinTheme {
    Atlas,
    Minimal,
}

impl BuiltinTheme {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "minimal" => Self::Minimal,
            _ => Self::Atlas,
        }
    }

    pub fn base_config(self) -> VizConfig {
        match self {
            Self::Atlas => atlas(),
            Self::Minimal => minimal(),
        }
    }
}

fn atlas() -> VizConfig {
    VizConfig {
        theme: "atlas".into(),
        figure: FigureConfig::default(),
        font: FontConfig::default(),
        axes: AxesConfig::default(),
        experiment: ExperimentConfig::default(),
        colors: ColorsConfig::default(),
        sample_colors: PROCESS_COLORS.iter().map(|(k, c)| (k.to_string(), *c)).collect(),
        output: OutputConfig::default(),
        comparison: ComparisonConfig::default(),
    }
}

/// No experiment header, outward ticks, smaller figure.
fn minimal() -> VizConfig {
    VizConfig {
        theme: "minimal".into(),
        figure: FigureConfig { width: 432.0, height: 396.0 },
        font: FontConfig { size: 9.0, label_size: 10.0, tick_size: 8.0 },
        axes: AxesConfig {
            tick_direction: "out".into(),
            show_top_ticks: false,
            show_right_ticks: false,
            tick_length: 4.0,
            minor_tick_length: 2.0,
        },
        experiment: ExperimentConfig {
            name: String::new(),
            status: String::new(),
            sqrt_s_tev: 0.0,
            lumi_fb_inv: 0.0,
        },
        ..atlas()
    }
}
