//! systband CLI

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use sb_syst::RunConfig;

mod plot;

#[derive(Parser)]
#[command(name = "systband")]
#[command(about = "systband - systematic-uncertainty bands for stacked histogram comparisons")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate per-sample inputs into a store with deviations and total uncertainties
    Create {
        /// Directory holding `<sample>/<sample>_<label>_combination.json` inputs
        #[arg(long)]
        input_path: PathBuf,

        /// Plots config (JSON): categories of objects and variables
        #[arg(long)]
        plots: PathBuf,

        /// Samples config (JSON): nominal, systematic and data samples
        #[arg(long)]
        samples: PathBuf,

        /// Output store; created, or updated in place if it exists
        #[arg(short, long)]
        output: PathBuf,

        /// Directory scope(s) to process (repeatable). Defaults to `emu_OS_J2`.
        #[arg(long = "scope")]
        scopes: Vec<String>,
    },

    /// Draw stacked comparison plots with the systematic band from a store written by `create`
    Plot {
        /// Store written by `create`
        #[arg(long)]
        plot_file: PathBuf,

        /// Plots config (JSON)
        #[arg(long)]
        plots: PathBuf,

        /// Samples config (JSON)
        #[arg(long)]
        samples: PathBuf,

        /// Output directory; plots land in `<output-dir>/<scope>/`
        #[arg(long)]
        output_dir: PathBuf,

        /// Output format (svg; png/pdf when built with those features)
        #[arg(long, default_value = "svg")]
        format: String,

        /// Visualization config (YAML)
        #[arg(long)]
        viz_config: Option<PathBuf>,

        /// Also write each plot's numbers as `<plot>.json` next to it
        #[arg(long)]
        artifacts: bool,

        /// Directory scope(s) to plot (repeatable). Defaults to `emu_OS_J2`.
        #[arg(long = "scope")]
        scopes: Vec<String>,
    },

    /// Print version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout carries the JSON report
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Create { input_path, plots, samples, output, scopes } => {
            cmd_create(&input_path, &plots, &samples, &output, scopes)
        }
        Commands::Plot {
            plot_file,
            plots,
            samples,
            output_dir,
            format,
            viz_config,
            artifacts,
            scopes,
        } => {
            let config = load_run_config(&plots, &samples, scopes)?;
            plot::cmd_plot(
                &config,
                &plot_file,
                &output_dir,
                &format,
                viz_config.as_deref(),
                artifacts,
            )
        }
        Commands::Version => {
            println!("systband {}", sb_core::VERSION);
            println!("formats: {}", sb_viz_render::supported_formats().join(", "));
            Ok(())
        }
    }
}

fn load_run_config(plots: &Path, samples: &Path, scopes: Vec<String>) -> Result<RunConfig> {
    let config = RunConfig::load(plots, samples, scopes)?;
    tracing::info!(
        scopes = ?config.scopes,
        objvars = config.object_variables().len(),
        samples = config.samples.all().count(),
        "config loaded"
    );
    Ok(config)
}

fn cmd_create(
    input_path: &Path,
    plots: &Path,
    samples: &Path,
    output: &Path,
    scopes: Vec<String>,
) -> Result<()> {
    if !input_path.is_dir() {
        anyhow::bail!("input path {} is not a directory", input_path.display());
    }
    let config = load_run_config(plots, samples, scopes)?;
    let report = sb_syst::create_syst_file(&config, input_path, output)?;

    let incomplete: usize = report.scopes.iter().map(|s| s.incomplete.len()).sum();
    if incomplete > 0 {
        tracing::warn!(incomplete, "some samples were excluded, see warnings above");
    }
    tracing::info!(output = %output.display(), "store written");
    write_json(None, serde_json::to_value(&report)?)
}

pub(crate) fn write_json(output: Option<&Path>, value: serde_json::Value) -> Result<()> {
    if let Some(path) = output {
        std::fs::write(path, serde_json::to_string_pretty(&value)?)?;
    } else {
        println!("{}", serde_json::to_string_pretty(&value)?);
    }
    Ok(())
}
