//! Rendering of systband comparison artifacts.
//!
//! Artifacts from `sb-viz` are drawn onto an immediate-mode SVG [`canvas::Canvas`]. PNG and PDF
//! output are converted from the SVG behind the `png` and `pdf` features.

pub mod canvas;
pub mod color;
pub mod config;
pub mod header;
pub mod layout;
pub mod output;
pub mod plots;
pub mod style;
pub mod text;
pub mod theme;

use std::path::Path;

use config::VizConfig;
use sb_viz::ComparisonArtifact;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unsupported output format: {0}")]
    UnknownFormat(String),
    #[error("deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),
    #[error("config error: {0}")]
    Config(String),
    #[error("layout error: {0}")]
    Layout(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "png")]
    #[error("PNG encoding error: {0}")]
    Png(String),
    #[cfg(feature = "pdf")]
    #[error("PDF conversion error: {0}")]
    Pdf(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// Output formats compiled into this build.
pub fn supported_formats() -> Vec<&'static str> {
    let mut formats = vec!["svg"];
    if cfg!(feature = "png") {
        formats.push("png");
    }
    if cfg!(feature = "pdf") {
        formats.push("pdf");
    }
    formats
}

/// Render a comparison artifact to an SVG string.
pub fn render_svg(artifact: &ComparisonArtifact, config: &VizConfig) -> Result<String> {
    plots::comparison::render(artifact, config)
}

/// Render a comparison artifact given as JSON.
pub fn render_json_svg(artifact_json: &str, config: &VizConfig) -> Result<String> {
    let artifact: ComparisonArtifact = serde_json::from_str(artifact_json)?;
    render_svg(&artifact, config)
}

/// Render to bytes in `format` (`svg`, and `png`/`pdf` when enabled).
pub fn render_to_bytes(
    artifact: &ComparisonArtifact,
    format: &str,
    config: &VizConfig,
) -> Result<Vec<u8>> {
    let svg = render_svg(artifact, config)?;
    match format {
        "svg" => Ok(svg.into_bytes()),
        #[cfg(feature = "png")]
        "png" => output::png::svg_to_png(&svg, config.output.dpi),
        #[cfg(feature = "pdf")]
        "pdf" => output::pdf::svg_to_pdf(&svg),
        other => Err(RenderError::UnknownFormat(other.to_string())),
    }
}

/// Render to a file; the format is taken from the extension (default `svg`).
pub fn render_to_file(
    artifact: &ComparisonArtifact,
    path: &Path,
    config: &VizConfig,
) -> Result<()> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("svg");
    let bytes = render_to_bytes(artifact, ext, config)?;
    output::write_atomic(path, &bytes)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "plot written");
    Ok(())
}
