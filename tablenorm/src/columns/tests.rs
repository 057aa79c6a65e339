use googletest::prelude::*;
use testutils::grid_cells;

use super::*;

fn grid(rows: &[&[&str]]) -> Grid {
    Grid::from_cells(grid_cells(rows))
}

#[gtest]
fn test_roles_from_header_keywords() {
    let grid = grid(&[
        &["Phase", "원료코드", "원료명", "A"],
        &["A", "1001", "Water", "1"],
    ]);

    let roles = identify_roles(&grid, 0, &ExtractionConfig::default());

    expect_eq!(
        roles,
        ColumnRoles {
            phase: Some(Detection::new(0, RoleStrategy::HeaderKeyword)),
            code: Detection::new(1, RoleStrategy::HeaderKeyword),
            name: Detection::new(2, RoleStrategy::HeaderKeyword),
        }
    );
    expect_that!(roles.defaulted(), is_empty());
}

#[gtest]
fn test_phase_from_preceding_row() {
    let grid = grid(&[
        &["", "", "", "STAGE"],
        &["", "CODE", "INCI NAME", ""],
    ]);

    let roles = identify_roles(&grid, 1, &ExtractionConfig::default());

    expect_eq!(
        roles.phase,
        Some(Detection::new(3, RoleStrategy::PrecedingRowKeyword))
    );
    expect_eq!(roles.code.value, 1);
    expect_eq!(roles.name.value, 2);
}

#[gtest]
#[test_log::test]
fn test_roles_default_when_missing() {
    let grid = grid(&[&["foo", "bar", "baz"]]);

    let roles = identify_roles(&grid, 0, &ExtractionConfig::default());

    expect_eq!(
        roles,
        ColumnRoles {
            phase: Some(Detection::new(0, RoleStrategy::DefaultIndex)),
            code: Detection::new(1, RoleStrategy::DefaultIndex),
            name: Detection::new(2, RoleStrategy::DefaultIndex),
        }
    );
    expect_eq!(roles.defaulted(), vec![Role::Phase, Role::Code, Role::Name]);
}

#[gtest]
fn test_default_index_never_collides_with_detected_role() {
    // GIVEN: the code column sits where the phase default would go.
    let grid = grid(&[&["CODE", "RAW MATERIALS"]]);

    let roles = identify_roles(&grid, 0, &ExtractionConfig::default());

    expect_eq!(roles.code, Detection::new(0, RoleStrategy::HeaderKeyword));
    expect_eq!(roles.name, Detection::new(1, RoleStrategy::HeaderKeyword));
    expect_eq!(roles.phase, None);
    expect_eq!(roles.defaulted(), vec![Role::Phase]);
}

#[gtest]
fn test_default_name_skips_claimed_index() {
    let grid = grid(&[&["", "", "CODE"]]);

    let roles = identify_roles(&grid, 0, &ExtractionConfig::default());

    expect_eq!(roles.code.value, 2);
    expect_eq!(roles.name, Detection::new(0, RoleStrategy::DefaultIndex));
    expect_eq!(roles.phase, None);
}

fn standard_roles() -> ColumnRoles {
    ColumnRoles {
        phase: Some(Detection::new(0, RoleStrategy::HeaderKeyword)),
        code: Detection::new(1, RoleStrategy::HeaderKeyword),
        name: Detection::new(2, RoleStrategy::HeaderKeyword),
    }
}

#[gtest]
fn test_measurements_from_identifier_letters() {
    let grid = grid(&[
        &["PHASE", "CODE", "RAW MATERIALS"],
        &["", "", "", "U", "V", "W", "X", "Y", "Z"],
        &["A", "1001", "Water", "1", "2", "3", "4", "5", "6"],
    ]);

    let cols = discover_measurements(&grid, &standard_roles(), 0, Some(1), &Default::default());

    expect_eq!(cols, vec![3, 4, 5, 6, 7, 8]);
}

#[gtest]
fn test_dense_column_without_letter_must_be_contiguous() {
    // GIVEN: column 5 has no identifier but follows accepted column 4; column
    // 7 is equally dense but separated by the empty column 6.
    let grid = grid(&[
        &["PHASE", "CODE", "RAW MATERIALS"],
        &["", "", "", "A", "B", "", "", ""],
        &["A", "1", "n", "1", "1", "1", "", "9"],
        &["A", "2", "n", "1", "1", "1", "", "9"],
        &["A", "3", "n", "1", "1", "1", "", "9"],
        &["A", "4", "n", "1", "1", "1", "", "9"],
        &["A", "5", "n", "1", "1", "1", "", "9"],
    ]);

    let cols = discover_measurements(&grid, &standard_roles(), 0, Some(1), &Default::default());

    expect_eq!(cols, vec![3, 4, 5]);
}

#[gtest]
fn test_sparse_column_without_letter_is_rejected() {
    let grid = grid(&[
        &["PHASE", "CODE", "RAW MATERIALS"],
        &["", "", "", "A", "B", ""],
        &["A", "1", "n", "1", "1", "1"],
        &["A", "2", "n", "1", "1", "1"],
    ]);

    let cols = discover_measurements(&grid, &standard_roles(), 0, Some(1), &Default::default());

    expect_eq!(cols, vec![3, 4]);
}

#[gtest]
fn test_interior_gap_is_filled() {
    // GIVEN: column 4's identifier is unreadable and it has no data.
    let grid = grid(&[
        &["PHASE", "CODE", "RAW MATERIALS"],
        &["", "", "", "P", "?", "R"],
        &["A", "1", "n", "1", "", "1"],
    ]);

    let cols = discover_measurements(&grid, &standard_roles(), 0, Some(1), &Default::default());

    expect_eq!(cols, vec![3, 4, 5]);
}

#[gtest]
fn test_leading_gap_with_identifier_content_is_filled() {
    // GIVEN: column 3's identifier is garbled but present, column 4 is the
    // first clean letter.
    let grid = grid(&[
        &["PHASE", "CODE", "RAW MATERIALS"],
        &["", "", "", "AB", "C", "D"],
        &["A", "1", "n", "", "1", "1"],
    ]);

    let cols = discover_measurements(&grid, &standard_roles(), 0, Some(1), &Default::default());

    expect_eq!(cols, vec![3, 4, 5]);
}

#[gtest]
fn test_leading_gap_without_identifier_content_is_left() {
    let grid = grid(&[
        &["PHASE", "CODE", "RAW MATERIALS"],
        &["", "", "", "-", "C", "D"],
        &["A", "1", "n", "note", "1", "1"],
    ]);

    let cols = discover_measurements(&grid, &standard_roles(), 0, Some(1), &Default::default());

    expect_eq!(cols, vec![4, 5]);
}

#[gtest]
fn test_measurements_never_include_role_columns() {
    // GIVEN: single letters also appear above the role columns.
    let grid = grid(&[
        &["PHASE", "CODE", "RAW MATERIALS"],
        &["A", "B", "C", "D", "E"],
        &["A", "1", "n", "1", "1"],
    ]);

    let cols = discover_measurements(&grid, &standard_roles(), 0, Some(1), &Default::default());

    expect_eq!(cols, vec![3, 4]);
}
