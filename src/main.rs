//! micrometa - Olympus FluoView mosaic metadata tools.
//!
//! This binary reads mosaic projects and writes Fiji stitching inputs.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use micrometa::{
    config::{Cli, Command, InfoConfig, StitchConfig},
    format::open_project,
    imagej::{
        gen_stitching_macro_code, gen_stitching_macro_code_from, load_template_file,
        write_all_tile_configs, write_stitching_macro,
    },
    MacroError,
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Info(config) => run_info(config),
        Command::Stitch(config) => run_stitch(config),
    }
}

// =============================================================================
// Info Command
// =============================================================================

fn run_info(config: InfoConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let experiment = match open_project(&config.project) {
        Ok(exp) => exp,
        Err(e) => {
            error!("Failed to read project {}: {}", config.project.display(), e);
            return ExitCode::FAILURE;
        }
    };

    if config.json {
        match serde_json::to_string_pretty(&experiment) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize experiment: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("{}", experiment.summarize());
    }

    ExitCode::SUCCESS
}

// =============================================================================
// Stitch Command
// =============================================================================

fn run_stitch(config: StitchConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let experiment = match open_project(&config.project) {
        Ok(exp) => exp,
        Err(e) => {
            error!("Failed to read project {}: {}", config.project.display(), e);
            return ExitCode::FAILURE;
        }
    };
    info!("Found {} usable mosaics.", experiment.len());

    match write_outputs(&experiment, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Failed to generate stitching macro: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn write_outputs(
    experiment: &micrometa::MosaicExperiment,
    config: &StitchConfig,
) -> Result<(), MacroError> {
    let opts = config.stitching_options();

    let code = match config.template_file {
        Some(ref path) => {
            let template = load_template_file(path)?;
            gen_stitching_macro_code_from(experiment, &template, &opts)?
        }
        None => gen_stitching_macro_code(experiment, &config.template, &opts)?,
    };

    let configs = write_all_tile_configs(experiment, &config.tile_config_options())?;
    for path in &configs {
        info!("  {}", path.display());
    }

    let macro_dir = config
        .output_dir
        .clone()
        .unwrap_or_else(|| experiment.infile.path.clone());
    let path = write_stitching_macro(&code, &config.macro_name, &macro_dir)?;
    println!("{}", path.display());
    Ok(())
}

// =============================================================================
// Logging
// =============================================================================

fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "micrometa=debug"
    } else {
        "micrometa=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
