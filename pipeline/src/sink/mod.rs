//! The contract between the pipelines and the workbook writer that persists
//! their output.

pub mod csv_dir;


use hashbrown::HashMap;
use serde::Serialize;
use tablenorm::correct::Correction;

/// Everything one sheet is rendered from.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct SheetBatch {
    /// Sheet name to use when it is still free. Empty means the default name.
    pub preferred_name: String,
    /// Label and value pairs shown above the table.
    pub metadata: Vec<(String, String)>,
    /// Measurement identifiers in column order.
    pub identifier_order: Vec<String>,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Per row: the columns whose value was filled rather than read.
    pub provenance: Vec<Vec<(String, Correction)>>,
}

/// What happened to a batch handed to a [WorkbookSink].
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct AddOutcome {
    pub success: bool,
    /// The sheet name actually used, when the batch was written.
    pub sheet_name: Option<String>,
}

impl AddOutcome {
    pub fn written(sheet_name: String) -> Self {
        Self {
            success: true,
            sheet_name: Some(sheet_name),
        }
    }

    pub fn failed() -> Self {
        Self::default()
    }
}

/// Accepts normalized batches one sheet at a time.
#[cfg_attr(test, mockall::automock)]
pub trait WorkbookSink {
    fn add(&mut self, batch: &SheetBatch) -> AddOutcome;
}

/// Hands each batch to `sink` in order. A failed batch does not stop the
/// ones after it.
pub fn add_all(sink: &mut dyn WorkbookSink, batches: &[SheetBatch]) -> Vec<AddOutcome> {
    batches
        .iter()
        .map(|batch| {
            let outcome = sink.add(batch);
            if !outcome.success {
                log::warn!("sheet {:?} was not written", batch.preferred_name);
            }
            outcome
        })
        .collect()
}

pub const DEFAULT_SHEET_NAME: &str = "Sheet";

/// Hands out unique sheet names.
#[derive(Debug, Default)]
pub struct SheetNames {
    claimed: HashMap<String, usize>,
}

impl SheetNames {
    /// Returns `preferred` (or the default name when it is empty) the first
    /// time, then the same name suffixed with `_1`, `_2` and so on.
    pub fn claim(&mut self, preferred: &str) -> String {
        let base = match preferred.trim() {
            "" => DEFAULT_SHEET_NAME,
            name => name,
        };
        let count = self.claimed.entry(base.to_string()).or_insert(0);
        let name = match *count {
            0 => base.to_string(),
            n => format!("{base}_{n}"),
        };
        *count += 1;
        name
    }
}

/// Keeps every written batch in memory, keyed by its sheet name.
#[derive(Debug, Default)]
pub struct MemorySink {
    names: SheetNames,
    pub sheets: Vec<(String, SheetBatch)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheet(&self, name: &str) -> Option<&SheetBatch> {
        self.sheets
            .iter()
            .find(|(sheet_name, _)| sheet_name == name)
            .map(|(_, batch)| batch)
    }
}

impl WorkbookSink for MemorySink {
    fn add(&mut self, batch: &SheetBatch) -> AddOutcome {
        if batch.rows.is_empty() {
            log::warn!("not adding sheet {:?} without rows", batch.preferred_name);
            return AddOutcome::failed();
        }
        let name = self.names.claim(&batch.preferred_name);
        self.sheets.push((name.clone(), batch.clone()));
        AddOutcome::written(name)
    }
}
