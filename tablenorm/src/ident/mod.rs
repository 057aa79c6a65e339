//! Measurement identifiers: reading them from the identifier row and
//! inferring the ones OCR lost.


use std::fmt;

use hashbrown::{HashMap, HashSet};
use serde::{Serialize, Serializer};

use crate::{config::ExtractionConfig, grid::Grid, textnorm};

/// The label of one measurement column.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Identifier {
    /// A single uppercase letter, read or inferred.
    Letter(char),
    /// Stands in for an identifier that could not be inferred. Carries the
    /// column index, so it is unique within a table.
    Placeholder(usize),
}

impl Identifier {
    pub fn letter(self) -> Option<char> {
        match self {
            Identifier::Letter(c) => Some(c),
            Identifier::Placeholder(_) => None,
        }
    }

    pub fn is_placeholder(self) -> bool {
        matches!(self, Identifier::Placeholder(_))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Letter(c) => write!(f, "{c}"),
            Identifier::Placeholder(col) => write!(f, "Col_{col}"),
        }
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Conditions in an [IdentifierMap] that callers should not take as clean
/// data.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IdentifierIssue {
    /// The column got a [Identifier::Placeholder].
    Unresolved { column: usize },
    /// The inferred letter wrapped around the alphabet (`Z` to `A`).
    Wraparound { column: usize },
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct IdentifierMap {
    /// Measurement columns in index order with their identifiers.
    pub columns: Vec<(usize, Identifier)>,
    pub issues: Vec<IdentifierIssue>,
}

impl IdentifierMap {
    /// Identifiers in left-to-right column order.
    pub fn order(&self) -> Vec<Identifier> {
        self.columns.iter().map(|&(_, id)| id).collect()
    }

    pub fn get(&self, col: usize) -> Option<Identifier> {
        self.columns
            .iter()
            .find(|&&(c, _)| c == col)
            .map(|&(_, id)| id)
    }

    pub fn is_fully_resolved(&self) -> bool {
        !self.columns.iter().any(|&(_, id)| id.is_placeholder())
    }
}

/// Reads the raw identifier text of each measurement column: cleaned, with
/// times-glyphs read as `X`. Empty and over-long tokens are left out.
pub fn raw_identifiers(
    grid: &Grid,
    identifier_row: Option<usize>,
    columns: &[usize],
    cfg: &ExtractionConfig,
) -> HashMap<usize, String> {
    let Some(row) = identifier_row else {
        return HashMap::new();
    };
    columns
        .iter()
        .filter_map(|&col| {
            let mut raw = textnorm::clean(grid.get(row, col)?);
            if textnorm::is_times_glyph(&raw) {
                raw = "X".to_string();
            }
            let len = raw.chars().count();
            (len > 0 && len <= cfg.limits.max_identifier_len).then_some((col, raw))
        })
        .collect()
}

fn advance(letter: char, forward: bool) -> (char, bool) {
    let index = letter as u8 - b'A';
    let (next, wrapped) = match (forward, index) {
        (true, 25) => (0, true),
        (true, i) => (i + 1, false),
        (false, 0) => (25, true),
        (false, i) => (i - 1, false),
    };
    ((b'A' + next) as char, wrapped)
}

/// Assigns every column in `columns` exactly one identifier.
///
/// Raw tokens are first normalized: punctuation is dropped, `1` reads as
/// `I`, and `0` reads as `D` after `C` or as `O` after `N`. A column still
/// without a letter takes the successor of its left neighbour's letter
/// (provided that stays below a resolved right neighbour), or else the
/// predecessor of its right neighbour. Anything else, including an inferred
/// letter already used in the table, becomes a placeholder.
pub fn infer_identifiers(columns: &[usize], raw: &HashMap<usize, String>) -> IdentifierMap {
    let mut resolved: Vec<Option<char>> = vec![None; columns.len()];
    let mut used: HashSet<char> = HashSet::new();

    for (i, col) in columns.iter().enumerate() {
        let Some(raw) = raw.get(col) else {
            continue;
        };
        let token = textnorm::strip_non_alphanumeric(raw);
        let previous = i.checked_sub(1).and_then(|p| resolved[p]);
        let letter = match (token.as_str(), previous) {
            ("1", _) => Some('I'),
            ("0", Some('C')) => Some('D'),
            ("0", Some('N')) => Some('O'),
            (token, _) => textnorm::single_letter(token),
        };
        match letter {
            Some(letter) if used.insert(letter) => resolved[i] = Some(letter),
            Some(letter) => log::warn!("column {col}: identifier {letter} already used"),
            None => {}
        }
    }

    let mut map = IdentifierMap::default();
    for (i, &col) in columns.iter().enumerate() {
        if let Some(letter) = resolved[i] {
            map.columns.push((col, Identifier::Letter(letter)));
            continue;
        }

        let left = i
            .checked_sub(1)
            .and_then(|p| map.columns.get(p))
            .and_then(|&(_, id)| id.letter());
        let right = resolved.get(i + 1).copied().flatten();

        let inferred = match (left, right) {
            (Some(left), right) => {
                let (letter, wrapped) = advance(left, true);
                match right {
                    Some(right) if letter >= right => None,
                    _ => Some((letter, wrapped)),
                }
            }
            (None, Some(right)) => Some(advance(right, false)),
            (None, None) => None,
        };

        match inferred {
            Some((letter, wrapped)) if used.insert(letter) => {
                if wrapped {
                    log::warn!("column {col}: inferred identifier {letter} wraps the alphabet");
                    map.issues.push(IdentifierIssue::Wraparound { column: col });
                }
                log::debug!("column {col}: inferred identifier {letter}");
                map.columns.push((col, Identifier::Letter(letter)));
            }
            _ => {
                log::warn!("column {col}: identifier could not be inferred");
                map.issues.push(IdentifierIssue::Unresolved { column: col });
                map.columns.push((col, Identifier::Placeholder(col)));
            }
        }
    }

    map
}
