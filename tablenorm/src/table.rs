//! One-call normalization of a grid into corrected records.

use crate::{
    TableError,
    config::ExtractionConfig,
    correct::{self, CorrectionSummary},
    grid::Grid,
    ident::Identifier,
    layout::{StructuralStatus, TableLayout},
    rows::{self, Record},
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NormalizedTable {
    /// The grid after header realignment.
    pub grid: Grid,
    pub layout: TableLayout,
    pub records: Vec<Record>,
    pub dropped_rows: Vec<usize>,
    pub summary: CorrectionSummary,
}

impl NormalizedTable {
    /// Measurement identifiers in column order.
    pub fn identifier_order(&self) -> Vec<Identifier> {
        self.layout.identifiers.order()
    }

    pub fn status(&self) -> StructuralStatus {
        self.layout.status()
    }
}

/// Infers the layout of `grid`, extracts its records and applies the
/// correction rules.
pub fn normalize_table(
    mut grid: Grid,
    cfg: &ExtractionConfig,
) -> Result<NormalizedTable, TableError> {
    let layout = TableLayout::infer(&mut grid, cfg)?;
    let rows::RowExtraction {
        mut records,
        dropped_rows,
    } = rows::extract_rows(&grid, &layout);
    let summary = correct::apply_corrections(&mut records, &layout.identifiers.order());

    let status = layout.status();
    if status.is_degraded() {
        log::warn!("table read with fallbacks: {:?}", status.fallbacks);
    }

    Ok(NormalizedTable {
        grid,
        layout,
        records,
        dropped_rows,
        summary,
    })
}
