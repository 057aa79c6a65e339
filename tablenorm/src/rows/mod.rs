//! Extraction of one [Record] per data row.


use hashbrown::HashMap;
use serde::Serialize;

use crate::{correct::Correction, grid::Grid, ident::Identifier, layout::TableLayout, textnorm};

/// One ingredient row of a formulation table.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Record {
    /// Grid row the record was read from.
    pub row: usize,
    pub phase: String,
    /// True when the phase was empty and taken from an earlier record.
    pub phase_inherited: bool,
    pub code: String,
    pub name: String,
    pub measurements: HashMap<Identifier, String>,
    /// Provenance of values that were filled rather than read.
    pub corrections: HashMap<Identifier, Correction>,
    /// Original text of values that were replaced with `0` for having an
    /// unrecognized shape.
    pub rejected: HashMap<Identifier, String>,
}

impl Record {
    /// The value for `id`, or the empty string if there is none.
    pub fn value(&self, id: Identifier) -> &str {
        self.measurements.get(&id).map_or("", String::as_str)
    }

    pub fn set_value(&mut self, id: Identifier, value: impl Into<String>) {
        self.measurements.insert(id, value.into());
    }
}

/// Records in grid row order, and the data rows dropped for lacking a code.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RowExtraction {
    pub records: Vec<Record>,
    pub dropped_rows: Vec<usize>,
}

/// Reads every row from the layout's data start to the end of the grid.
///
/// Rows whose code cell is empty are dropped. The name is the name column,
/// joined with the column to its right unless that column is a measurement
/// or role column. Measurement values pass through
/// [textnorm::normalize_numeric_token].
pub fn extract_rows(grid: &Grid, layout: &TableLayout) -> RowExtraction {
    let roles = &layout.roles;
    let name_col = roles.name.value;
    let name_extra_col = Some(name_col + 1).filter(|&col| {
        layout.identifiers.get(col).is_none() && !roles.is_role_column(col)
    });

    let mut extraction = RowExtraction::default();
    for row in layout.header.data_start()..grid.row_count() {
        let code = grid.text(row, roles.code.value).trim();
        if code.is_empty() {
            if grid.has_row(row) {
                log::debug!("row {row}: no code, dropped");
                extraction.dropped_rows.push(row);
            }
            continue;
        }

        let phase = roles
            .phase
            .map(|phase| textnorm::clean(grid.text(row, phase.value)))
            .unwrap_or_default();

        let name = [Some(name_col), name_extra_col]
            .into_iter()
            .flatten()
            .map(|col| grid.text(row, col).trim())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        let measurements = layout
            .identifiers
            .columns
            .iter()
            .map(|&(col, id)| (id, textnorm::normalize_numeric_token(grid.text(row, col))))
            .collect();

        extraction.records.push(Record {
            row,
            phase,
            code: code.to_string(),
            name,
            measurements,
            ..Default::default()
        });
    }

    log::info!(
        "extracted {} records, dropped {} rows without a code",
        extraction.records.len(),
        extraction.dropped_rows.len()
    );
    extraction
}
