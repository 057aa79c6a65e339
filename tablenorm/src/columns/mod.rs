//! Classification of columns into the phase, code and name roles, and
//! discovery of the measurement columns.

#[cfg(test)]
mod tests;

use serde::Serialize;

use crate::{
    config::ExtractionConfig,
    detect::{Confidence, Detection, Strategy},
    grid::Grid,
    textnorm,
};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    Phase,
    Code,
    Name,
}

/// How a role column was found.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, strum_macros::Display)]
pub enum RoleStrategy {
    /// A keyword in the header row.
    HeaderKeyword,
    /// A keyword in the row above the header. Used for the phase role only.
    PrecedingRowKeyword,
    /// The stock column index for the role.
    DefaultIndex,
}

impl Strategy for RoleStrategy {
    fn confidence(self) -> Confidence {
        match self {
            RoleStrategy::HeaderKeyword | RoleStrategy::PrecedingRowKeyword => {
                Confidence::Detected
            }
            RoleStrategy::DefaultIndex => Confidence::Fallback,
        }
    }
}

pub type RoleColumn = Detection<usize, RoleStrategy>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ColumnRoles {
    /// Absent when no phase column could be found or defaulted.
    pub phase: Option<RoleColumn>,
    pub code: RoleColumn,
    pub name: RoleColumn,
}

impl ColumnRoles {
    pub fn is_role_column(&self, col: usize) -> bool {
        self.phase.is_some_and(|p| p.value == col)
            || self.code.value == col
            || self.name.value == col
    }

    /// Roles that were assigned by default rather than detected.
    pub fn defaulted(&self) -> Vec<Role> {
        let mut roles = Vec::new();
        if self.phase.is_none_or(|p| p.is_fallback()) {
            roles.push(Role::Phase);
        }
        if self.code.is_fallback() {
            roles.push(Role::Code);
        }
        if self.name.is_fallback() {
            roles.push(Role::Name);
        }
        roles
    }
}

const DEFAULT_PHASE_COL: usize = 0;
const DEFAULT_CODE_COL: usize = 1;
const DEFAULT_NAME_COL: usize = 2;

fn unclaimed(preferred: usize, claimed: &[usize]) -> usize {
    if !claimed.contains(&preferred) {
        return preferred;
    }
    (0..)
        .find(|col| !claimed.contains(col))
        .unwrap_or(preferred)
}

/// Classifies header-row columns by keyword.
///
/// A cell takes at most one role, tried in the order code, name, phase, so
/// that a combined label such as `원료코드` is read as the code column.
pub fn identify_roles(grid: &Grid, header_row: usize, cfg: &ExtractionConfig) -> ColumnRoles {
    let keywords = &cfg.keywords;
    let mut phase = None;
    let mut code = None;
    let mut name = None;

    for (col, text) in grid.row_cells(header_row) {
        let text = textnorm::clean(text);
        if code.is_none() && keywords.is_code(&text) {
            code = Some(col);
        } else if name.is_none() && keywords.is_name(&text) {
            name = Some(col);
        } else if phase.is_none() && keywords.is_phase(&text) {
            phase = Some(col);
        }
    }

    let mut phase = phase.map(|col| Detection::new(col, RoleStrategy::HeaderKeyword));
    if phase.is_none() && header_row > 0 {
        phase = grid
            .row_cells(header_row - 1)
            .find(|(col, text)| {
                Some(*col) != code && Some(*col) != name && keywords.is_phase(text)
            })
            .map(|(col, _)| Detection::new(col, RoleStrategy::PrecedingRowKeyword));
    }

    let mut claimed: Vec<usize> = [phase.map(|p| p.value), code, name]
        .into_iter()
        .flatten()
        .collect();

    let code = match code {
        Some(col) => Detection::new(col, RoleStrategy::HeaderKeyword),
        None => {
            let col = unclaimed(DEFAULT_CODE_COL, &claimed);
            claimed.push(col);
            log::warn!("no code column in header row {header_row}, defaulting to column {col}");
            Detection::new(col, RoleStrategy::DefaultIndex)
        }
    };
    let name = match name {
        Some(col) => Detection::new(col, RoleStrategy::HeaderKeyword),
        None => {
            let col = unclaimed(DEFAULT_NAME_COL, &claimed);
            claimed.push(col);
            log::warn!("no name column in header row {header_row}, defaulting to column {col}");
            Detection::new(col, RoleStrategy::DefaultIndex)
        }
    };
    let phase = phase.or_else(|| {
        if claimed.contains(&DEFAULT_PHASE_COL) {
            log::warn!("no phase column in header row {header_row}");
            None
        } else {
            log::warn!(
                "no phase column in header row {header_row}, defaulting to column {DEFAULT_PHASE_COL}"
            );
            Some(Detection::new(DEFAULT_PHASE_COL, RoleStrategy::DefaultIndex))
        }
    });

    ColumnRoles { phase, code, name }
}

/// Finds the measurement columns, sorted by index.
///
/// A column qualifies when its identifier-row cell reads as a single letter
/// and the column has any content in the scan window, or, lacking such a
/// letter, when it lies right of the name column, directly follows an
/// accepted column and has at least `min_data_rows` filled rows. Gaps are
/// then closed: columns between two accepted columns, and columns between
/// the name column and the first accepted one whose identifier-row cell has
/// any content.
pub fn discover_measurements(
    grid: &Grid,
    roles: &ColumnRoles,
    header_row: usize,
    identifier_row: Option<usize>,
    cfg: &ExtractionConfig,
) -> Vec<usize> {
    let window_start = identifier_row.unwrap_or(header_row + 1);
    let window_end = (header_row + cfg.limits.data_window_rows).min(grid.row_count());
    let window = window_start..window_end.max(window_start);
    let name_col = roles.name.value;

    let identifier_text = |col: usize| -> String {
        identifier_row
            .map(|row| textnorm::strip_non_alphanumeric(&textnorm::clean(grid.text(row, col))))
            .unwrap_or_default()
    };

    let mut accepted: Vec<usize> = Vec::new();
    for col in 0..grid.col_count() {
        if roles.is_role_column(col) {
            continue;
        }
        let has_letter = identifier_row
            .and_then(|row| textnorm::identifier_letter(grid.text(row, col)))
            .is_some();
        let filled = grid.count_filled(col, window.clone());

        let accept = if has_letter {
            filled > 0
        } else {
            filled >= cfg.limits.min_data_rows
                && col > name_col
                && accepted.last().is_some_and(|&last| last + 1 == col)
        };
        if accept {
            log::debug!("measurement column {col} (letter: {has_letter}, filled: {filled})");
            accepted.push(col);
        }
    }

    let Some(&first) = accepted.first() else {
        log::warn!("no measurement columns found below header row {header_row}");
        return accepted;
    };

    let mut gaps: Vec<usize> = ((name_col + 1)..first)
        .filter(|&col| !roles.is_role_column(col) && !identifier_text(col).is_empty())
        .collect();
    for pair in accepted.windows(2) {
        gaps.extend(((pair[0] + 1)..pair[1]).filter(|&col| !roles.is_role_column(col)));
    }
    if !gaps.is_empty() {
        log::info!("filling measurement column gaps {gaps:?}");
    }

    accepted.extend(gaps);
    accepted.sort_unstable();
    accepted.dedup();
    accepted
}
