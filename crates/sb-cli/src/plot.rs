use std::path::Path;

use anyhow::Result;
use sb_store::HistFile;
use sb_syst::{RunConfig, collect_plot_inputs};
use sb_viz::comparison_artifact;
use sb_viz_render::config::{VizConfig, load_config};

use crate::write_json;

pub fn cmd_plot(
    config: &RunConfig,
    plot_file: &Path,
    output_dir: &Path,
    format: &str,
    viz_config: Option<&Path>,
    artifacts: bool,
) -> Result<()> {
    let supported = sb_viz_render::supported_formats();
    if !supported.iter().any(|f| *f == format) {
        anyhow::bail!(
            "unsupported format '{format}' (this build supports: {})",
            supported.join(", ")
        );
    }
    let viz = match viz_config {
        Some(path) => load_config(path)
            .map_err(|e| anyhow::anyhow!("invalid viz config {}: {e}", path.display()))?,
        None => VizConfig::default(),
    };

    let store = HistFile::open(plot_file)?;
    let inputs = collect_plot_inputs(config, &store);
    if inputs.is_empty() {
        tracing::warn!(store = %plot_file.display(), "nothing to plot");
    }

    let mut written = Vec::new();
    let mut failed = Vec::new();
    for input in &inputs {
        let dir = output_dir.join(&input.scope);
        let path = dir.join(format!("{}.{format}", input.plot_name));

        let artifact = match comparison_artifact(input) {
            Ok(a) => a,
            Err(e) => {
                tracing::warn!(plot = input.plot_name.as_str(), "skipped: {e}");
                failed.push(input.plot_name.clone());
                continue;
            }
        };
        if let Err(e) = sb_viz_render::render_to_file(&artifact, &path, &viz) {
            tracing::warn!(plot = input.plot_name.as_str(), "render failed: {e}");
            failed.push(input.plot_name.clone());
            continue;
        }
        if artifacts {
            let json_path = dir.join(format!("{}.json", input.plot_name));
            write_json(Some(&json_path), serde_json::to_value(&artifact)?)?;
        }
        tracing::info!(plot = %path.display(), "plot written");
        written.push(path.display().to_string());
    }

    write_json(
        None,
        serde_json::json!({
            "written": written,
            "failed": failed,
        }),
    )
}
