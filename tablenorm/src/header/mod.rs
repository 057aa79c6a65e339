//! Location of the main header row and the identifier row beneath it, plus
//! the one-time realignment of a misplaced material-name header label.


use crate::{
    config::{ExtractionConfig, Keywords},
    detect::{Confidence, Detection, Strategy},
    grid::Grid,
    textnorm,
};

/// Header-row strategies, in evaluation order.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, strum_macros::Display)]
pub enum HeaderStrategy {
    /// A row with a code keyword whose own, preceding or following row holds
    /// a material keyword.
    CodeWithAdjacentMaterial,
    /// Row 0 as header, row 1 as identifier row.
    FirstRow,
}

pub const HEADER_STRATEGIES: [HeaderStrategy; 2] = [
    HeaderStrategy::CodeWithAdjacentMaterial,
    HeaderStrategy::FirstRow,
];

impl Strategy for HeaderStrategy {
    fn confidence(self) -> Confidence {
        match self {
            HeaderStrategy::CodeWithAdjacentMaterial => Confidence::Detected,
            HeaderStrategy::FirstRow => Confidence::Fallback,
        }
    }
}

impl HeaderStrategy {
    fn locate(self, grid: &Grid, cfg: &ExtractionConfig) -> Option<HeaderRows> {
        match self {
            HeaderStrategy::CodeWithAdjacentMaterial => locate_code_with_material(grid, cfg),
            HeaderStrategy::FirstRow => Some(first_row(grid)),
        }
    }
}

/// How the identifier row was settled.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, strum_macros::Display)]
pub enum IdentifierRowStrategy {
    /// The row at the structural offset below the header passed the
    /// single-letter check.
    AtOffset,
    /// The row after the offset row passed the check instead.
    BelowOffset,
    /// No candidate passed; the offset row is used as is.
    Unverified,
}

impl Strategy for IdentifierRowStrategy {
    fn confidence(self) -> Confidence {
        match self {
            IdentifierRowStrategy::AtOffset | IdentifierRowStrategy::BelowOffset => {
                Confidence::Detected
            }
            IdentifierRowStrategy::Unverified => Confidence::Fallback,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HeaderRows {
    pub header: Detection<usize, HeaderStrategy>,
    pub identifier: Option<Detection<usize, IdentifierRowStrategy>>,
}

impl HeaderRows {
    pub fn header_row(&self) -> usize {
        self.header.value
    }

    pub fn identifier_row(&self) -> Option<usize> {
        self.identifier.map(|d| d.value)
    }

    /// First row that may hold data.
    pub fn data_start(&self) -> usize {
        self.identifier_row().unwrap_or(self.header.value) + 1
    }
}

/// Runs [HEADER_STRATEGIES] in order and returns the first result.
pub fn find_header_rows(grid: &Grid, cfg: &ExtractionConfig) -> HeaderRows {
    let rows = HEADER_STRATEGIES
        .into_iter()
        .find_map(|strategy| strategy.locate(grid, cfg))
        .unwrap_or_else(|| first_row(grid));

    if rows.header.is_fallback() {
        log::warn!(
            "no header row found in the first {} rows, assuming row 0",
            cfg.limits.header_rows
        );
    } else {
        log::info!(
            "header row {} ({}), identifier row {:?}",
            rows.header.value,
            rows.header.strategy,
            rows.identifier,
        );
    }
    rows
}

fn row_has_material(grid: &Grid, row: usize, keywords: &Keywords) -> bool {
    grid.row_cells(row)
        .any(|(_, text)| keywords.is_material(text) && !keywords.is_code(text))
}

fn locate_code_with_material(grid: &Grid, cfg: &ExtractionConfig) -> Option<HeaderRows> {
    let keywords = &cfg.keywords;
    let scan_end = cfg.limits.header_rows.min(grid.row_count());

    for row in 0..scan_end {
        if !grid.row_cells(row).any(|(_, text)| keywords.is_code(text)) {
            continue;
        }

        let material_here = row_has_material(grid, row, keywords);
        let material_prev = row > 0 && row_has_material(grid, row - 1, keywords);
        let material_next = row_has_material(grid, row + 1, keywords);

        // A material label on the next row pushes the identifier row down
        // even when the code row carries one too.
        let offset = if material_prev {
            1
        } else if material_next {
            2
        } else if material_here {
            1
        } else {
            log::debug!("row {row} has a code keyword but no material keyword nearby");
            continue;
        };

        return Some(HeaderRows {
            header: Detection::new(row, HeaderStrategy::CodeWithAdjacentMaterial),
            identifier: locate_identifier_row(grid, cfg, row + offset),
        });
    }

    None
}

fn first_row(grid: &Grid) -> HeaderRows {
    HeaderRows {
        header: Detection::new(0, HeaderStrategy::FirstRow),
        identifier: (grid.row_count() > 1)
            .then(|| Detection::new(1, IdentifierRowStrategy::Unverified)),
    }
}

fn locate_identifier_row(
    grid: &Grid,
    cfg: &ExtractionConfig,
    candidate: usize,
) -> Option<Detection<usize, IdentifierRowStrategy>> {
    if candidate >= grid.row_count() {
        return None;
    }
    if is_identifier_row(grid, candidate, cfg) {
        return Some(Detection::new(candidate, IdentifierRowStrategy::AtOffset));
    }
    if is_identifier_row(grid, candidate + 1, cfg) {
        return Some(Detection::new(
            candidate + 1,
            IdentifierRowStrategy::BelowOffset,
        ));
    }
    log::warn!("identifier row {candidate} failed the single-letter check");
    Some(Detection::new(candidate, IdentifierRowStrategy::Unverified))
}

/// True if enough cells of the row reduce to a single letter.
pub fn is_identifier_row(grid: &Grid, row: usize, cfg: &ExtractionConfig) -> bool {
    let letters = grid
        .row_cells(row)
        .filter(|(_, text)| {
            textnorm::single_letter(&textnorm::strip_non_alphanumeric(&textnorm::clean(text)))
                .is_some()
        })
        .count();
    letters >= cfg.limits.min_identifier_letters
}

/// A header label moved by [realign_material_header].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Relocation {
    pub row: usize,
    pub from_col: usize,
    pub to_col: usize,
}

/// Moves the material-name header label to the column between the code
/// column and the label that holds the most data below the header, when that
/// is not the label's own column.
///
/// This is the only mutation a [Grid] undergoes after construction.
pub fn realign_material_header(
    grid: &mut Grid,
    header_row: usize,
    cfg: &ExtractionConfig,
) -> Option<Relocation> {
    let keywords = &cfg.keywords;
    let code_col = grid
        .row_cells(header_row)
        .find(|(_, text)| keywords.is_code(text))
        .map(|(col, _)| col)?;
    let material_col = grid
        .row_cells(header_row)
        .find(|(_, text)| keywords.is_material(text) && !keywords.is_code(text))
        .map(|(col, _)| col)?;
    if material_col <= code_col + 1 {
        return None;
    }

    let window_end = (header_row + cfg.limits.data_window_rows).min(grid.row_count());
    let window = (header_row + 2)..window_end;

    let mut best: Option<(usize, usize)> = None;
    for col in (code_col + 1)..=material_col {
        let filled = grid.count_filled(col, window.clone());
        if filled > best.map_or(0, |(_, most)| most) {
            best = Some((col, filled));
        }
    }

    let (to_col, filled) = best?;
    if to_col == material_col {
        return None;
    }

    log::info!(
        "moving material header from column {material_col} to column {to_col} ({filled} filled rows)"
    );
    grid.move_cell(header_row, material_col, to_col);
    Some(Relocation {
        row: header_row,
        from_col: material_col,
        to_col,
    })
}
