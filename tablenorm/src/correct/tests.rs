use googletest::prelude::*;
use map_macro::hashbrown::hash_map;

use crate::ident::Identifier::{self, Letter};

use super::*;

fn record(phase: &str, values: &[(char, &str)]) -> Record {
    Record {
        phase: phase.to_string(),
        code: "1001".to_string(),
        measurements: values
            .iter()
            .map(|&(id, value)| (Letter(id), value.to_string()))
            .collect(),
        ..Default::default()
    }
}

fn order(ids: &str) -> Vec<Identifier> {
    ids.chars().map(Letter).collect()
}

#[gtest]
fn test_gap_copies_nearest_left_value() {
    let mut records = vec![record("A", &[('X', "5"), ('Y', ""), ('Z', "5")])];

    let summary = apply_corrections(&mut records, &order("XYZ"));

    expect_eq!(records[0].value(Letter('Y')), "5");
    expect_eq!(
        records[0].corrections,
        hash_map! { Letter('Y') => Correction::Copied }
    );
    expect_eq!(summary.copied, 1);
}

#[gtest]
fn test_empty_first_value_is_zero_filled() {
    let mut records = vec![record("A", &[('X', ""), ('Y', "3")])];

    apply_corrections(&mut records, &order("XY"));

    expect_eq!(records[0].value(Letter('X')), "0");
    expect_eq!(records[0].value(Letter('Y')), "3");
    expect_eq!(
        records[0].corrections,
        hash_map! { Letter('X') => Correction::FilledZero }
    );
}

#[gtest]
fn test_copy_chains_through_filled_values() {
    // GIVEN: X is zero-filled first, then Y and Z copy from it.
    let mut records = vec![
        record("A", &[('X', ""), ('Y', ""), ('Z', "")]),
        record("A", &[('X', "1"), ('Y', "2"), ('Z', "3")]),
    ];

    apply_corrections(&mut records, &order("XYZ"));

    expect_eq!(records[0].value(Letter('Y')), "0");
    expect_eq!(records[0].value(Letter('Z')), "0");
    expect_eq!(
        records[0].corrections,
        hash_map! {
            Letter('X') => Correction::FilledZero,
            Letter('Y') => Correction::Copied,
            Letter('Z') => Correction::Copied,
        }
    );
}

#[gtest]
#[test_log::test]
fn test_unrecognized_text_is_rejected() {
    let mut records = vec![record("A", &[('X', "확인요청"), ('Y', "<0.1")])];

    let summary = apply_corrections(&mut records, &order("XY"));

    expect_eq!(records[0].value(Letter('X')), "0");
    expect_eq!(records[0].value(Letter('Y')), "<0.1");
    expect_eq!(
        records[0].rejected,
        hash_map! { Letter('X') => "확인요청".to_string() }
    );
    expect_that!(records[0].corrections, is_empty());
    expect_eq!(summary.rejected, 1);
}

#[gtest]
fn test_accepted_shapes_are_kept() {
    let values = ["12.5", "TO100", "to 100", "<5", "≥ 1.5", "1-2", "0.5 ~ 1", "3%", "0"];
    for value in values {
        let mut records = vec![record("A", &[('X', value)])];

        apply_corrections(&mut records, &order("X"));

        expect_eq!(records[0].value(Letter('X')), value);
        expect_that!(records[0].rejected, is_empty());
    }
}

#[gtest]
fn test_empty_columns_stay_empty() {
    // GIVEN: column X is empty in every record, Z is empty in one.
    let mut records = vec![
        record("A", &[('X', ""), ('Y', "1"), ('Z', "")]),
        record("A", &[('X', ""), ('Y', "2"), ('Z', "4")]),
    ];

    let summary = apply_corrections(&mut records, &order("XYZ"));

    expect_eq!(summary.empty_columns, vec![Letter('X')]);
    for record in &records {
        expect_eq!(record.value(Letter('X')), "");
        expect_false!(record.corrections.contains_key(&Letter('X')));
    }
    // Z copies from Y, skipping the empty X.
    expect_eq!(records[0].value(Letter('Z')), "1");
    expect_eq!(records[1].value(Letter('Z')), "4");
}

#[gtest]
fn test_empty_columns_lists_all_when_no_values() {
    let records = vec![record("A", &[('X', ""), ('Y', "")])];

    expect_eq!(empty_columns(&records, &order("XY")), order("XY"));
}

#[gtest]
fn test_phase_is_corrected_and_inherited() {
    let mut records = vec![
        record("", &[]),
        record("a1", &[]),
        record("", &[]),
        record(" 8 ", &[]),
        record("", &[]),
    ];

    let summary = apply_corrections(&mut records, &[]);

    let phases: Vec<(&str, bool)> = records
        .iter()
        .map(|r| (r.phase.as_str(), r.phase_inherited))
        .collect();
    expect_eq!(
        phases,
        vec![
            ("", false),
            ("AI", false),
            ("AI", true),
            ("B", false),
            ("B", true),
        ]
    );
    expect_eq!(summary.phases_inherited, 2);
}

#[gtest]
fn test_placeholder_columns_are_corrected_like_letters() {
    let mut records = vec![record("", &[('A', "2")]), record("", &[])];
    records[0].set_value(Identifier::Placeholder(4), "");
    records[1].set_value(Identifier::Placeholder(4), "1");
    let order = vec![Letter('A'), Identifier::Placeholder(4)];

    apply_corrections(&mut records, &order);

    expect_eq!(records[0].value(Identifier::Placeholder(4)), "2");
}

#[gtest]
fn test_correction_labels() {
    expect_eq!(Correction::FilledZero.to_string(), "filled_zero");
    expect_eq!(
        serde_json::to_string(&Correction::Copied).ok(),
        Some("\"copied\"".to_string())
    );
}
