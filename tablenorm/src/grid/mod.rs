//! Sparse, addressable grid of cell text built from OCR output.
//!
//! Absent cells are distinct from cells holding an empty string, though most
//! callers treat both as "no content" via [Grid::has_content].

mod html;
#[cfg(test)]
mod tests;

use hashbrown::HashMap;

pub use html::{HtmlCell, HtmlRow, HtmlTable};

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Grid {
    cells: HashMap<(usize, usize), String>,
    row_count: usize,
    col_count: usize,
}

impl Grid {
    /// Builds a grid from `(row, column, content)` tuples, as produced by a
    /// layout-analysis result. Content is trimmed; a later tuple for the same
    /// position replaces an earlier one.
    pub fn from_cells<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize, S)>,
        S: AsRef<str>,
    {
        let mut grid = Self::default();
        for (row, col, content) in cells {
            grid.insert(row, col, content.as_ref().trim().to_string());
        }
        grid
    }

    fn insert(&mut self, row: usize, col: usize, text: String) {
        self.row_count = self.row_count.max(row + 1);
        self.col_count = self.col_count.max(col + 1);
        self.cells.insert((row, col), text);
    }

    /// One past the largest observed row index.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// One past the largest observed column index.
    pub fn col_count(&self) -> usize {
        self.col_count
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.cells.get(&(row, col)).map(String::as_str)
    }

    /// Cell text, or the empty string for an absent cell.
    pub fn text(&self, row: usize, col: usize) -> &str {
        self.get(row, col).unwrap_or("")
    }

    pub fn has_content(&self, row: usize, col: usize) -> bool {
        !self.text(row, col).trim().is_empty()
    }

    /// True if any cell was observed on the row, empty or not.
    pub fn has_row(&self, row: usize) -> bool {
        (0..self.col_count).any(|col| self.cells.contains_key(&(row, col)))
    }

    /// The observed cells of a row in column order.
    pub fn row_cells(&self, row: usize) -> impl Iterator<Item = (usize, &str)> {
        (0..self.col_count).filter_map(move |col| self.get(row, col).map(|text| (col, text)))
    }

    /// All observed text of a row joined with spaces, for keyword scanning.
    pub fn row_text(&self, row: usize) -> String {
        self.row_cells(row)
            .map(|(_, text)| text)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Counts rows in `rows` with content in `col`.
    pub fn count_filled(&self, col: usize, rows: std::ops::Range<usize>) -> usize {
        rows.filter(|&row| self.has_content(row, col)).count()
    }

    /// Moves the text of one cell to another column on the same row, leaving
    /// the source cell empty.
    pub fn move_cell(&mut self, row: usize, from_col: usize, to_col: usize) {
        if let Some(text) = self.cells.get_mut(&(row, from_col)) {
            let text = std::mem::take(text);
            self.insert(row, to_col, text);
        }
    }

    /// Dense rows of `col_count` cells each, absent cells as empty strings.
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        (0..self.row_count)
            .filter(|&row| self.has_row(row))
            .map(|row| {
                (0..self.col_count)
                    .map(|col| self.text(row, col).to_string())
                    .collect()
            })
            .collect()
    }
}
