//! The page structure returned by the layout-analysis service.

use std::io::Read;

use anyhow::{Context, Result};
use serde::Deserialize;
use tablenorm::grid::Grid;

use crate::ExtractError;

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutPage {
    /// Full recognized text of the page.
    pub content: String,
    pub tables: Vec<LayoutTable>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutTable {
    pub row_count: usize,
    pub column_count: usize,
    pub cells: Vec<LayoutCell>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutCell {
    pub row_index: usize,
    pub column_index: usize,
    pub content: String,
}

impl LayoutPage {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).with_context(|| "parsing layout JSON")
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader).with_context(|| "parsing layout JSON")
    }

    /// The metadata table, if there is one, and the formulation table.
    ///
    /// With two or more tables the smallest is the metadata table and the
    /// largest the formulation table. A single table is the formulation
    /// table.
    pub fn select_tables(&self) -> Result<(Option<&LayoutTable>, &LayoutTable), ExtractError> {
        let formula = self
            .tables
            .iter()
            .max_by_key(|t| t.area())
            .ok_or(ExtractError::NoTables)?;
        if self.tables.len() < 2 {
            return Ok((None, formula));
        }
        let metadata = self.tables.iter().min_by_key(|t| t.area());
        Ok((metadata, formula))
    }
}

impl LayoutTable {
    pub fn area(&self) -> usize {
        self.row_count * self.column_count
    }

    pub fn to_grid(&self) -> Grid {
        Grid::from_cells(
            self.cells
                .iter()
                .map(|cell| (cell.row_index, cell.column_index, cell.content.as_str())),
        )
    }
}
