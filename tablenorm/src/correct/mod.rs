//! The deterministic correction rules applied to extracted records.
//!
//! Rules run per record in a fixed order:
//!
//! 1. Columns empty in every record are found up front and left empty.
//! 2. Phase labels are corrected, and an empty phase takes the last
//!    non-empty one.
//! 3. An empty first measurement is filled with `0`.
//! 4. Any other empty measurement copies the nearest non-empty value to its
//!    left.
//! 5. A value of unrecognized shape is replaced with `0`.

#[cfg(test)]
mod tests;

use hashbrown::HashSet;
use serde::Serialize;

use crate::{ident::Identifier, rows::Record, textnorm};

/// Why a measurement value was filled rather than read.
#[derive(
    Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, strum_macros::Display, strum_macros::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Correction {
    /// The first measurement was empty and set to `0`.
    FilledZero,
    /// Copied from the nearest non-empty measurement to the left.
    Copied,
    /// Carried over from an earlier row, such as a grouping label.
    Inherited,
}

/// Counts of what [apply_corrections] changed.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct CorrectionSummary {
    /// Identifiers with no value in any record, in column order.
    pub empty_columns: Vec<Identifier>,
    pub filled_zero: usize,
    pub copied: usize,
    pub rejected: usize,
    pub phases_inherited: usize,
}

/// Identifiers, in `order`, whose value is empty in every record.
pub fn empty_columns(records: &[Record], order: &[Identifier]) -> Vec<Identifier> {
    order
        .iter()
        .copied()
        .filter(|&id| records.iter().all(|record| record.value(id).is_empty()))
        .collect()
}

/// Applies the correction rules to `records` in place. `order` is the
/// left-to-right identifier order.
pub fn apply_corrections(records: &mut [Record], order: &[Identifier]) -> CorrectionSummary {
    let mut summary = CorrectionSummary {
        empty_columns: empty_columns(records, order),
        ..Default::default()
    };
    if !summary.empty_columns.is_empty() {
        log::info!("empty columns left unfilled: {:?}", summary.empty_columns);
    }
    let empty: HashSet<Identifier> = summary.empty_columns.iter().copied().collect();
    let filled: Vec<Identifier> = order
        .iter()
        .copied()
        .filter(|id| !empty.contains(id))
        .collect();

    let mut last_phase = String::new();
    for record in records.iter_mut() {
        correct_phase(record, &mut last_phase, &mut summary);
        fill_first(record, order, &empty, &mut summary);
        copy_forward(record, &filled, &mut summary);
        reject_unrecognized(record, &filled, &mut summary);
    }

    log::debug!("corrections: {summary:?}");
    summary
}

fn correct_phase(record: &mut Record, last_phase: &mut String, summary: &mut CorrectionSummary) {
    let phase = textnorm::correct_phase(&record.phase);
    if phase.is_empty() {
        if !last_phase.is_empty() {
            record.phase = last_phase.clone();
            record.phase_inherited = true;
            summary.phases_inherited += 1;
        } else {
            record.phase = phase;
        }
    } else {
        last_phase.clone_from(&phase);
        record.phase = phase;
    }
}

fn fill_first(
    record: &mut Record,
    order: &[Identifier],
    empty: &HashSet<Identifier>,
    summary: &mut CorrectionSummary,
) {
    let Some(&first) = order.first() else {
        return;
    };
    if empty.contains(&first) || !record.value(first).is_empty() {
        return;
    }
    record.set_value(first, "0");
    record.corrections.insert(first, Correction::FilledZero);
    summary.filled_zero += 1;
}

/// `filled` holds the non-empty columns in order; values copied earlier in
/// the pass are themselves available as sources.
fn copy_forward(record: &mut Record, filled: &[Identifier], summary: &mut CorrectionSummary) {
    for (i, &id) in filled.iter().enumerate().skip(1) {
        if !record.value(id).is_empty() {
            continue;
        }
        let source = filled[..i]
            .iter()
            .rev()
            .map(|&left| record.value(left))
            .find(|value| !value.is_empty())
            .map(str::to_string);
        if let Some(value) = source {
            record.set_value(id, value);
            record.corrections.insert(id, Correction::Copied);
            summary.copied += 1;
        }
    }
}

fn reject_unrecognized(record: &mut Record, filled: &[Identifier], summary: &mut CorrectionSummary) {
    for &id in filled {
        let value = record.value(id);
        if value.is_empty() || textnorm::is_accepted_measurement(value) {
            continue;
        }
        log::warn!(
            "row {}: value {value:?} for {id} has an unrecognized shape, replaced with 0",
            record.row
        );
        let original = value.to_string();
        record.rejected.insert(id, original);
        record.set_value(id, "0");
        summary.rejected += 1;
    }
}
