//! Extraction of a formulation recipe from a layout-analysis page.

pub mod layout;
pub mod metadata;

#[cfg(test)]
mod tests;

use serde::Serialize;
use tablenorm::{
    config::ExtractionConfig, ident::Identifier, layout::StructuralStatus, normalize_table,
    rows::Record,
};

use crate::{ExtractError, sink::SheetBatch};

use layout::LayoutPage;
use metadata::RecipeMetadata;

/// Everything read from one recipe page.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecipeExtraction {
    pub metadata: RecipeMetadata,
    pub records: Vec<Record>,
    /// Measurement identifiers in column order.
    pub identifier_order: Vec<Identifier>,
    /// Identifiers with no value in any record.
    pub empty_columns: Vec<Identifier>,
    pub status: StructuralStatus,
    /// The formulation table as read, before any correction.
    pub raw_rows: Vec<Vec<String>>,
    pub dropped_rows: Vec<usize>,
}

/// Reads the metadata and the normalized formulation records of a page.
pub fn extract_recipe(
    page: &LayoutPage,
    cfg: &ExtractionConfig,
) -> Result<RecipeExtraction, ExtractError> {
    let (metadata_table, formula_table) = page.select_tables()?;
    let formula_grid = formula_table.to_grid();
    let metadata_grid = metadata_table.map(layout::LayoutTable::to_grid);

    let metadata = RecipeMetadata::extract(metadata_grid.as_ref(), &formula_grid, &page.content);
    let raw_rows = formula_grid.to_rows();

    let table = normalize_table(formula_grid, cfg)?;
    let identifier_order = table.identifier_order();
    let status = table.status();
    log::info!(
        "recipe {:?}: {} records over {} identifiers",
        metadata.formula_number,
        table.records.len(),
        identifier_order.len()
    );

    Ok(RecipeExtraction {
        metadata,
        records: table.records,
        identifier_order,
        empty_columns: table.summary.empty_columns,
        status,
        raw_rows,
        dropped_rows: table.dropped_rows,
    })
}

/// Sheet column index of the first label given to measurement columns when
/// none of them has an identifier. Index 20 is `U`.
const FIRST_UNLABELLED_COLUMN: usize = 20;

/// Spreadsheet-style column name: `A`..`Z`, then `AA`, `AB` and on.
fn sheet_column_name(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(char::from(b'A' + (index % 26) as u8));
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.into_iter().rev().collect()
}

impl RecipeExtraction {
    /// Sheet labels of the measurement columns. When no column has an
    /// identifier, the columns are labelled `U`, `V` and onwards instead of
    /// `Col_<n>`.
    pub fn identifier_labels(&self) -> Vec<String> {
        let unlabelled = !self.identifier_order.is_empty()
            && self.identifier_order.iter().all(|id| id.is_placeholder());
        if unlabelled {
            log::warn!(
                "no identifiers read, labelling {} columns from {}",
                self.identifier_order.len(),
                sheet_column_name(FIRST_UNLABELLED_COLUMN)
            );
            (0..self.identifier_order.len())
                .map(|i| sheet_column_name(FIRST_UNLABELLED_COLUMN + i))
                .collect()
        } else {
            self.identifier_order.iter().map(Identifier::to_string).collect()
        }
    }

    /// The normalized sheet, named after the formula number.
    pub fn to_batch(&self) -> SheetBatch {
        let labels = self.identifier_labels();
        let headers = ["Phase", "Code", "Raw_Materials"]
            .into_iter()
            .map(str::to_string)
            .chain(labels.iter().cloned())
            .collect();

        let rows = self
            .records
            .iter()
            .map(|record| {
                [&record.phase, &record.code, &record.name]
                    .into_iter()
                    .cloned()
                    .chain(self.identifier_order.iter().map(|&id| record.value(id).to_string()))
                    .collect()
            })
            .collect();

        let provenance = self
            .records
            .iter()
            .map(|record| {
                self.identifier_order
                    .iter()
                    .zip(&labels)
                    .filter_map(|(id, label)| {
                        record
                            .corrections
                            .get(id)
                            .map(|&kind| (label.clone(), kind))
                    })
                    .collect()
            })
            .collect();

        SheetBatch {
            preferred_name: self.metadata.formula_number.clone(),
            metadata: self.metadata.pairs(),
            identifier_order: labels,
            headers,
            rows,
            provenance,
        }
    }

    /// The table exactly as read, under `Col_<n>` headers.
    pub fn raw_batch(&self) -> SheetBatch {
        let width = self.raw_rows.iter().map(Vec::len).max().unwrap_or(0);
        SheetBatch {
            preferred_name: format!("{}_raw", self.metadata.formula_number),
            metadata: Vec::new(),
            identifier_order: Vec::new(),
            headers: (0..width).map(|i| format!("Col_{i}")).collect(),
            rows: self.raw_rows.clone(),
            provenance: Vec::new(),
        }
    }
}
