use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;

use super::{AddOutcome, SheetBatch, SheetNames, WorkbookSink};

/// Writes each sheet as `<sheet name>.csv` in a directory.
///
/// The file holds the metadata pairs, an empty line, the header row with a
/// trailing `corrections` column, and the data rows. Corrections are written
/// as `column=kind` joined by `;`.
pub struct CsvDirSink {
    dir: PathBuf,
    names: SheetNames,
}

impl CsvDirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            names: SheetNames::default(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write_sheet(&self, path: &Path, batch: &SheetBatch) -> Result<()> {
        let mut file = AtomicWriteFile::open(path)
            .with_context(|| format!("opening {:?} for writing", path))?;
        let mut w = csv::WriterBuilder::new()
            .terminator(csv::Terminator::CRLF)
            .flexible(true)
            .from_writer(&mut file);

        for (label, value) in &batch.metadata {
            w.write_record([label, value])?;
        }
        if !batch.metadata.is_empty() {
            w.write_record([""])?;
        }

        w.write_record(batch.headers.iter().map(String::as_str).chain(["corrections"]))?;
        for (i, row) in batch.rows.iter().enumerate() {
            let corrections = batch
                .provenance
                .get(i)
                .map(|cells| {
                    cells
                        .iter()
                        .map(|(column, kind)| format!("{column}={kind}"))
                        .collect::<Vec<_>>()
                        .join(";")
                })
                .unwrap_or_default();
            w.write_record(row.iter().map(String::as_str).chain([corrections.as_str()]))
                .with_context(|| "writing record")?;
        }

        w.flush().with_context(|| "flushing to CSV")?;
        drop(w);
        file.commit().with_context(|| "committing CSV file")?;
        Ok(())
    }
}

/// Keeps characters that are safe in a file name.
fn file_stem(sheet_name: &str) -> String {
    sheet_name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}

impl WorkbookSink for CsvDirSink {
    fn add(&mut self, batch: &SheetBatch) -> AddOutcome {
        if batch.rows.is_empty() {
            log::warn!("not adding sheet {:?} without rows", batch.preferred_name);
            return AddOutcome::failed();
        }
        let name = self.names.claim(&batch.preferred_name);
        let path = self.dir.join(format!("{}.csv", file_stem(&name)));
        match self.write_sheet(&path, batch) {
            Ok(()) => {
                log::info!("wrote sheet {name:?} to {:?}", path);
                AddOutcome::written(name)
            }
            Err(e) => {
                log::error!("writing sheet {name:?}: {e:?}");
                AddOutcome::failed()
            }
        }
    }
}
