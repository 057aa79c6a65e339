use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use simplelog::LevelFilter;
use tablenorm::config::ExtractionConfig;

mod preservation;
mod recipe;

/// Normalizes OCR'd preservation-test and recipe tables into sheets.
#[derive(Parser)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Logging level.
    #[arg(long, default_value = "Warn")]
    log_level: LevelFilter,

    /// Path to a YAML file overriding the header keywords and scan limits.
    #[arg(long)]
    config: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    Preservation(preservation::Command),
    Recipe(recipe::Command),
}

pub fn run() -> Result<()> {
    let args = Args::parse();

    simplelog::SimpleLogger::init(args.log_level, simplelog::Config::default())
        .with_context(|| "configuring logging")?;

    let cfg = match &args.config {
        Some(path) => load_config(path)?,
        None => ExtractionConfig::default(),
    };

    use Command::*;
    match &args.command {
        Preservation(cmd) => preservation::run(cmd),
        Recipe(cmd) => recipe::run(cmd, &cfg),
    }
}

fn load_config(path: &Path) -> Result<ExtractionConfig> {
    let file = File::open(path).with_context(|| format!("opening config {:?}", path))?;
    ExtractionConfig::from_yaml_reader(file)
        .with_context(|| format!("reading config {:?}", path))
}

/// Fails when any input failed, after every input has been tried.
fn check_failures(failed: usize, total: usize) -> Result<()> {
    if failed > 0 {
        anyhow::bail!("{failed} of {total} inputs failed");
    }
    Ok(())
}
