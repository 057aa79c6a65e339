use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use pipeline::{
    preservation::{self, PreservationPage},
    sink::{self, csv_dir::CsvDirSink},
    state::PageCoordinator,
};

/// Extracts preservation-test results from OCR HTML tables, one file per
/// page, into one CSV sheet per test number.
#[derive(Args, Debug)]
pub struct Command {
    /// HTML files in page order.
    #[arg(required = true)]
    pages: Vec<PathBuf>,

    /// Directory to write the CSV sheets into.
    #[arg(long)]
    output_dir: PathBuf,
}

fn read_page(path: &Path, coordinator: &mut PageCoordinator) -> Result<PreservationPage> {
    let html = std::fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
    preservation::extract_page(&html, coordinator)
        .with_context(|| format!("extracting preservation table from {:?}", path))
}

/// Runs the subcommand.
pub fn run(cmd: &Command) -> Result<()> {
    std::fs::create_dir_all(&cmd.output_dir)
        .with_context(|| format!("creating output directory {:?}", cmd.output_dir))?;
    let mut writer = CsvDirSink::new(&cmd.output_dir);
    let mut coordinator = PageCoordinator::new();

    let mut failed = 0;
    for path in &cmd.pages {
        coordinator.reset_page();
        let page = match read_page(path, &mut coordinator) {
            Ok(page) => page,
            Err(e) => {
                log::error!("{e:?}");
                failed += 1;
                continue;
            }
        };
        for outcome in sink::add_all(&mut writer, &page.to_batches()) {
            if let Some(name) = outcome.sheet_name {
                println!("{name}");
            }
        }
    }

    super::check_failures(failed, cmd.pages.len())
}
