//! Formula number, product name and characteristics of a recipe page.

use lazy_regex::{regex, regex_captures, regex_find, regex_replace_all};
use serde::Serialize;
use tablenorm::grid::Grid;

/// The formulation header rows searched when there is no metadata table, or
/// it lacks a field.
const HEADER_ROWS: usize = 5;
/// Product names read from page text must be longer than this.
const MIN_TEXT_PRODUCT_LEN: usize = 3;

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct RecipeMetadata {
    /// `WE` followed by four digits.
    pub formula_number: String,
    pub product_name: String,
    pub characteristics: String,
    pub origin: String,
}

impl RecipeMetadata {
    /// Label and value pairs in sheet order.
    pub fn pairs(&self) -> Vec<(String, String)> {
        [
            ("처방번호", &self.formula_number),
            ("제품명", &self.product_name),
            ("처방특성", &self.characteristics),
        ]
        .into_iter()
        .map(|(label, value)| (label.to_string(), value.clone()))
        .collect()
    }

    /// Fills the empty fields from cell labels in the first `row_limit` rows
    /// of `grid`.
    pub fn fill_from_grid(&mut self, grid: &Grid, row_limit: usize) {
        let rows = 0..grid.row_count().min(row_limit);
        for row in rows.clone() {
            let cells: Vec<(usize, &str)> = grid.row_cells(row).collect();
            for (i, &(_, text)) in cells.iter().enumerate() {
                let following = &cells[i + 1..];
                if self.formula_number.is_empty() && is_formula_label(text) {
                    if let Some(number) = following.first().and_then(|&(_, next)| formula_number(next)) {
                        log::debug!("formula number {number:?} next to label {text:?}");
                        self.formula_number = number;
                    }
                }
                if self.product_name.is_empty() && text.contains("제품") && text.contains('명') {
                    self.product_name = join_values(following, clean_product_cell);
                }
                if self.characteristics.is_empty() && text.contains("특성") {
                    self.characteristics =
                        join_values(following, |value| Some(value.trim().to_string()));
                }
            }
        }

        if self.formula_number.is_empty() {
            if let Some(number) = rows
                .flat_map(|row| grid.row_cells(row).map(|(_, text)| text))
                .find_map(formula_number)
            {
                log::debug!("formula number {number:?} found without a label");
                self.formula_number = number;
            }
        }
    }

    /// Fills the empty fields from the full text of the page.
    pub fn fill_from_text(&mut self, text: &str) {
        if self.formula_number.is_empty() {
            if let Some(number) = formula_number(text) {
                self.formula_number = number;
            }
        }
        if self.product_name.is_empty() {
            if let Some(name) = product_from_text(text) {
                self.product_name = name;
            }
        }
        if self.characteristics.is_empty() {
            if let Some((_, value)) = regex_captures!(r"처방특성[:\s]*([가-힣\s\w\(\)]+)", text) {
                self.characteristics = value.trim().to_string();
            }
        }
        if self.origin.is_empty() {
            if let Some((_, value)) = regex_captures!(r"(?i)Origin[:\s]*([A-Z0-9]+)", text) {
                self.origin = value.to_string();
            }
        }
    }

    /// Reads the metadata of a page.
    ///
    /// The metadata table is searched first, then the header rows of the
    /// formulation table, then the page text.
    pub fn extract(metadata_table: Option<&Grid>, formula_table: &Grid, page_text: &str) -> Self {
        let mut metadata = RecipeMetadata::default();
        if let Some(grid) = metadata_table {
            metadata.fill_from_grid(grid, grid.row_count());
        }
        if metadata.product_name.is_empty() || metadata.characteristics.is_empty() {
            metadata.fill_from_grid(formula_table, HEADER_ROWS);
        }
        if metadata.formula_number.is_empty() || metadata.product_name.is_empty() {
            metadata.fill_from_text(page_text);
        }
        if metadata.formula_number.is_empty() {
            log::warn!("no formula number found");
        }
        metadata
    }
}

fn is_formula_label(text: &str) -> bool {
    let key: String = text.split_whitespace().collect::<String>().to_uppercase();
    key.contains("FORMULANO") || key.contains("FORMELLENO") || key.contains("처방번호")
}

fn formula_number(text: &str) -> Option<String> {
    regex_find!(r"WE\d{4}", &text.to_uppercase()).map(str::to_string)
}

/// Joins the cleaned non-empty values of `cells`.
fn join_values(cells: &[(usize, &str)], clean: impl Fn(&str) -> Option<String>) -> String {
    cells
        .iter()
        .filter_map(|&(_, text)| clean(text))
        .filter(|value| !value.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Drops cells holding only a neighbouring label, and strips `Date` and `No`
/// label fragments.
fn clean_product_cell(text: &str) -> Option<String> {
    let text = text.trim();
    if matches!(text, "" | "DATE" | "Date" | "NO" | "No" | "/") {
        return None;
    }
    let text = regex_replace_all!(r"(?i)\s*Date\s*/?\s*", text, "");
    let text = regex_replace_all!(r"(?i)\s*No\s*/?\s*$", &text, "");
    Some(text.trim().to_string())
}

fn product_from_text(text: &str) -> Option<String> {
    let labelled = regex!(r"제품\s*명[:\s]*([가-힣\s\w\(\)]+?)(?:DATE|Date|ORIGIN|Origin|\n|$)");
    let candidates = labelled
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .into_iter()
        .chain(regex_find!(r"(?:페이스|에센스|세럼|크림|로션|토너)[가-힣\s\w\(\)]+제형", text))
        .chain(regex_find!(r"[가-힣]{2,}\s+[가-힣]{2,}\s+제형", text));

    for candidate in candidates {
        let mut name = candidate.trim().to_string();
        for word in ["DATE", "Date", "ORIGIN", "Origin", "제품명", "제품 명"] {
            name = name.replace(word, "");
        }
        let name = name.trim();
        if name.chars().count() > MIN_TEXT_PRODUCT_LEN {
            return Some(name.to_string());
        }
    }
    None
}
