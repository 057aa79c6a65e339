//! Whole-table structure inference: header rows, column roles and
//! measurement identifiers, with the fallbacks taken along the way.

use serde::Serialize;

use crate::{
    TableError,
    columns::{self, ColumnRoles, Role},
    config::ExtractionConfig,
    grid::Grid,
    header::{self, HeaderRows, Relocation},
    ident::{self, IdentifierIssue, IdentifierMap},
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TableLayout {
    pub header: HeaderRows,
    pub relocation: Option<Relocation>,
    pub roles: ColumnRoles,
    pub identifiers: IdentifierMap,
}

impl TableLayout {
    /// Infers the layout of `grid`. The material-name header label may be
    /// moved in `grid` as part of this.
    pub fn infer(grid: &mut Grid, cfg: &ExtractionConfig) -> Result<Self, TableError> {
        if grid.is_empty() {
            return Err(TableError::EmptyGrid);
        }

        let header = header::find_header_rows(grid, cfg);
        let header_row = header.header_row();
        let relocation = header::realign_material_header(grid, header_row, cfg);
        let roles = columns::identify_roles(grid, header_row, cfg);
        let measurement_cols = columns::discover_measurements(
            grid,
            &roles,
            header_row,
            header.identifier_row(),
            cfg,
        );
        let raw = ident::raw_identifiers(grid, header.identifier_row(), &measurement_cols, cfg);
        let identifiers = ident::infer_identifiers(&measurement_cols, &raw);

        Ok(Self {
            header,
            relocation,
            roles,
            identifiers,
        })
    }

    /// Every structural fallback taken while inferring this layout.
    pub fn status(&self) -> StructuralStatus {
        let mut fallbacks = Vec::new();
        if self.header.header.is_fallback() {
            fallbacks.push(StructuralFallback::HeaderRow);
        }
        match self.header.identifier {
            Some(identifier) if identifier.is_fallback() => {
                fallbacks.push(StructuralFallback::IdentifierRow)
            }
            Some(_) => {}
            None => fallbacks.push(StructuralFallback::MissingIdentifierRow),
        }
        fallbacks.extend(
            self.roles
                .defaulted()
                .into_iter()
                .map(|role| StructuralFallback::Role { role }),
        );
        if self.identifiers.columns.is_empty() {
            fallbacks.push(StructuralFallback::NoMeasurementColumns);
        }
        fallbacks.extend(
            self.identifiers
                .issues
                .iter()
                .copied()
                .map(|issue| StructuralFallback::Identifier { issue }),
        );
        StructuralStatus { fallbacks }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StructuralFallback {
    /// No header row qualified; row 0 was assumed.
    HeaderRow,
    /// The identifier row failed the single-letter check.
    IdentifierRow,
    /// The table ends before any identifier row.
    MissingIdentifierRow,
    /// The role's column was not found and a default index (or none, for
    /// phase) was used.
    Role { role: Role },
    NoMeasurementColumns,
    Identifier { issue: IdentifierIssue },
}

/// Whether the table matched the expected structure or was read through
/// documented fallbacks.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct StructuralStatus {
    pub fallbacks: Vec<StructuralFallback>,
}

impl StructuralStatus {
    pub fn is_degraded(&self) -> bool {
        !self.fallbacks.is_empty()
    }
}
