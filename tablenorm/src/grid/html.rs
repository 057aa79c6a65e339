use scraper::{ElementRef, Html, Node, Selector};

use crate::TableError;

use super::Grid;

/// One `<td>`/`<th>` of an HTML table.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct HtmlCell {
    /// Trimmed text content, with `<br>` rendered as a line break.
    pub text: String,
    /// Parsed `rowspan` attribute, if present.
    pub row_span: Option<usize>,
    /// Parsed `colspan` attribute, if present.
    pub col_span: Option<usize>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct HtmlRow {
    pub cells: Vec<HtmlCell>,
}

/// The rows of the first `<table>` in an HTML fragment, with cells kept in
/// document order rather than expanded over their spans.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct HtmlTable {
    pub rows: Vec<HtmlRow>,
}

fn selector(selector: &'static str) -> Result<Selector, TableError> {
    Selector::parse(selector).map_err(|e| TableError::Selector {
        selector,
        reason: e.to_string(),
    })
}

fn span_attr(cell: &ElementRef, name: &str) -> Option<usize> {
    let digits: String = cell
        .value()
        .attr(name)?
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

fn cell_text(cell: &ElementRef) -> String {
    let mut text = String::new();
    for node in cell.descendants() {
        match node.value() {
            Node::Text(t) => text.push_str(t),
            Node::Element(e) if e.name() == "br" => text.push('\n'),
            _ => {}
        }
    }
    text.trim().to_string()
}

impl HtmlTable {
    pub fn parse(html: &str) -> Result<Self, TableError> {
        let table_selector = selector("table")?;
        let row_selector = selector("tr")?;
        let cell_selector = selector("td, th")?;

        let fragment = Html::parse_fragment(html);
        let table = fragment
            .select(&table_selector)
            .next()
            .ok_or(TableError::NoTable)?;

        let rows = table
            .select(&row_selector)
            .map(|row| HtmlRow {
                cells: row
                    .select(&cell_selector)
                    .map(|cell| HtmlCell {
                        text: cell_text(&cell),
                        row_span: span_attr(&cell, "rowspan"),
                        col_span: span_attr(&cell, "colspan"),
                    })
                    .collect(),
            })
            .collect();

        Ok(Self { rows })
    }

    /// Positional grid: each cell lands at its `<tr>` index and its index
    /// within that row.
    pub fn to_grid(&self) -> Grid {
        Grid::from_cells(self.rows.iter().enumerate().flat_map(|(row, html_row)| {
            html_row
                .cells
                .iter()
                .enumerate()
                .map(move |(col, cell)| (row, col, cell.text.as_str()))
        }))
    }
}

impl HtmlRow {
    pub fn cell_text(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(|cell| cell.text.as_str())
    }
}
