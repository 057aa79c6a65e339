use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Args;
use pipeline::{
    recipe::{self, RecipeExtraction, layout::LayoutPage},
    sink::{self, csv_dir::CsvDirSink},
};
use tablenorm::config::ExtractionConfig;

/// Extracts formulation recipes from layout-analysis JSON pages into CSV
/// sheets, a normalized sheet and a raw sheet per page.
#[derive(Args, Debug)]
pub struct Command {
    /// Layout JSON files, one page each.
    #[arg(required = true)]
    pages: Vec<PathBuf>,

    /// Directory to write the CSV sheets into.
    #[arg(long)]
    output_dir: PathBuf,

    /// Also print each extraction as JSON to standard output.
    #[arg(long)]
    json: bool,
}

fn read_page(path: &Path, cfg: &ExtractionConfig) -> Result<RecipeExtraction> {
    let file = File::open(path).with_context(|| format!("opening {:?}", path))?;
    let page = LayoutPage::from_json_reader(file).with_context(|| format!("reading {:?}", path))?;
    recipe::extract_recipe(&page, cfg).with_context(|| format!("extracting recipe from {:?}", path))
}

/// Runs the subcommand.
pub fn run(cmd: &Command, cfg: &ExtractionConfig) -> Result<()> {
    std::fs::create_dir_all(&cmd.output_dir)
        .with_context(|| format!("creating output directory {:?}", cmd.output_dir))?;
    let mut writer = CsvDirSink::new(&cmd.output_dir);

    let mut failed = 0;
    for path in &cmd.pages {
        let extraction = match read_page(path, cfg) {
            Ok(extraction) => extraction,
            Err(e) => {
                log::error!("{e:?}");
                failed += 1;
                continue;
            }
        };
        if extraction.status.is_degraded() {
            log::warn!(
                "{:?} was read with fallbacks: {:?}",
                path,
                extraction.status.fallbacks
            );
        }
        if cmd.json {
            let json = serde_json::to_string_pretty(&extraction)
                .with_context(|| "serializing extraction")?;
            println!("{json}");
        }
        for outcome in sink::add_all(&mut writer, &[extraction.to_batch(), extraction.raw_batch()]) {
            if let Some(name) = outcome.sheet_name {
                println!("{name}");
            }
        }
    }

    super::check_failures(failed, cmd.pages.len())
}
