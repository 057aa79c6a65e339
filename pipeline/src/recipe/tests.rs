use googletest::prelude::*;
use tablenorm::{
    correct::Correction,
    ident::Identifier::{self, Letter, Placeholder},
    layout::StructuralFallback,
};

use super::{
    layout::{LayoutCell, LayoutTable},
    *,
};

fn layout_table(rows: &[&[&str]]) -> LayoutTable {
    LayoutTable {
        row_count: rows.len(),
        column_count: rows.iter().map(|r| r.len()).max().unwrap_or(0),
        cells: rows
            .iter()
            .enumerate()
            .flat_map(|(row_index, cells)| {
                cells
                    .iter()
                    .enumerate()
                    .filter(|(_, text)| !text.is_empty())
                    .map(move |(column_index, text)| LayoutCell {
                        row_index,
                        column_index,
                        content: text.to_string(),
                    })
            })
            .collect(),
    }
}

fn formula_table() -> LayoutTable {
    layout_table(&[
        &["PHASE", "CODE", "RAW MATERIALS"],
        &["", "", "", "U", "V", "W", "X", "Y", "Z"],
        &["A", "101", "Water", "70", "70", "70", "70", "70", "70"],
        &["", "102", "Glycerin", "5", "", "5", "5,5", "5", "5"],
        &["B", "103", "Fragrance", "0.1", "0.1", "0.1", "확인요청", "0.1", "0.1"],
        &["", "", "note", "", "", "", "", "", ""],
    ])
}

fn metadata_table() -> LayoutTable {
    layout_table(&[
        &["Formula No", "WE1234"],
        &["제품명", "수분 크림"],
    ])
}

fn letters(ids: &str) -> Vec<Identifier> {
    ids.chars().map(Letter).collect()
}

#[gtest]
#[test_log::test]
fn test_formulation_table_with_identifier_row() -> googletest::Result<()> {
    // GIVEN: a page with a metadata table and a formulation table.
    let page = LayoutPage {
        content: "처방특성: 고보습".to_string(),
        tables: vec![formula_table(), metadata_table()],
    };

    // WHEN:
    let recipe = extract_recipe(&page, &ExtractionConfig::default())?;

    // THEN:
    expect_eq!(recipe.identifier_order, letters("UVWXYZ"));
    expect_eq!(
        recipe.records.iter().map(|r| r.code.as_str()).collect::<Vec<_>>(),
        vec!["101", "102", "103"]
    );
    expect_false!(recipe.status.is_degraded());
    expect_eq!(recipe.metadata.formula_number, "WE1234");
    expect_eq!(recipe.metadata.product_name, "수분 크림");
    expect_eq!(recipe.dropped_rows, vec![5]);

    let glycerin = &recipe.records[1];
    expect_eq!(glycerin.phase, "A");
    expect_eq!(glycerin.value(Letter('V')), "5");
    expect_eq!(glycerin.value(Letter('X')), "5.5");
    expect_eq!(glycerin.corrections.get(&Letter('V')), Some(&Correction::Copied));

    let fragrance = &recipe.records[2];
    expect_eq!(fragrance.value(Letter('X')), "0");
    expect_eq!(
        fragrance.rejected.get(&Letter('X')).map(String::as_str),
        Some("확인요청")
    );
    Ok(())
}

#[gtest]
fn test_alphabetic_codes_are_not_identifiers() -> googletest::Result<()> {
    // GIVEN: ingredient codes made of three letters.
    let page = LayoutPage {
        content: String::new(),
        tables: vec![layout_table(&[
            &["PHASE", "CODE", "RAW MATERIALS"],
            &["", "", "", "U", "V", "W", "X", "Y", "Z"],
            &["A", "ABC", "Water", "70", "70", "70", "70", "70", "70"],
            &["", "DEF", "Glycerin", "5", "5", "5", "5", "5", "5"],
            &["B", "GHI", "Fragrance", "0.1", "0.1", "0.1", "0.1", "0.1", "0.1"],
        ])],
    };

    // WHEN:
    let recipe = extract_recipe(&page, &ExtractionConfig::default())?;

    // THEN:
    expect_eq!(recipe.identifier_order, letters("UVWXYZ"));
    expect_eq!(
        recipe.records.iter().map(|r| r.code.as_str()).collect::<Vec<_>>(),
        vec!["ABC", "DEF", "GHI"]
    );
    expect_false!(recipe.status.is_degraded());
    expect_eq!(recipe.records[1].value(Letter('U')), "5");
    Ok(())
}

fn unlabelled_extraction(columns: usize) -> RecipeExtraction {
    let identifier_order: Vec<Identifier> = (3..3 + columns).map(Placeholder).collect();
    let mut record = Record {
        code: "101".to_string(),
        ..Default::default()
    };
    for (i, &id) in identifier_order.iter().enumerate() {
        record.set_value(id, i.to_string());
    }
    record.corrections.insert(Placeholder(4), Correction::Copied);

    RecipeExtraction {
        metadata: RecipeMetadata::default(),
        records: vec![record],
        identifier_order,
        empty_columns: Vec::new(),
        status: StructuralStatus::default(),
        raw_rows: Vec::new(),
        dropped_rows: Vec::new(),
    }
}

#[gtest]
#[test_log::test]
fn test_unlabelled_columns_are_named_from_u() {
    // GIVEN: no measurement column has an identifier.
    let recipe = unlabelled_extraction(3);

    // WHEN:
    let batch = recipe.to_batch();

    // THEN:
    expect_eq!(
        batch.headers,
        vec!["Phase", "Code", "Raw_Materials", "U", "V", "W"]
    );
    expect_eq!(batch.identifier_order, vec!["U", "V", "W"]);
    expect_eq!(batch.provenance[0], vec![("V".to_string(), Correction::Copied)]);
    expect_eq!(batch.rows[0][3..].to_vec(), vec!["0", "1", "2"]);
}

#[gtest]
fn test_unlabelled_columns_continue_past_z() {
    let recipe = unlabelled_extraction(8);

    expect_eq!(
        recipe.identifier_labels(),
        vec!["U", "V", "W", "X", "Y", "Z", "AA", "AB"]
    );
}

#[gtest]
fn test_partly_labelled_columns_keep_placeholders() {
    let mut recipe = unlabelled_extraction(2);
    recipe.identifier_order[0] = Letter('A');

    expect_eq!(recipe.identifier_labels(), vec!["A", "Col_4"]);
}

#[gtest]
fn test_sheet_column_name() {
    expect_eq!(sheet_column_name(0), "A");
    expect_eq!(sheet_column_name(25), "Z");
    expect_eq!(sheet_column_name(26), "AA");
    expect_eq!(sheet_column_name(51), "AZ");
    expect_eq!(sheet_column_name(52), "BA");
}

#[gtest]
fn test_raw_rows_keep_uncorrected_text() -> googletest::Result<()> {
    let page = LayoutPage {
        content: String::new(),
        tables: vec![formula_table()],
    };

    let recipe = extract_recipe(&page, &ExtractionConfig::default())?;

    expect_eq!(recipe.raw_rows.len(), 6);
    expect_eq!(recipe.raw_rows[3][4], "");
    expect_eq!(recipe.raw_rows[4][6], "확인요청");

    let raw = recipe.raw_batch();
    expect_eq!(raw.preferred_name, "_raw");
    expect_eq!(raw.headers.first().map(String::as_str), Some("Col_0"));
    expect_eq!(raw.headers.len(), 9);
    Ok(())
}

#[gtest]
fn test_batch_layout() -> googletest::Result<()> {
    let page = LayoutPage {
        content: String::new(),
        tables: vec![formula_table(), metadata_table()],
    };
    let recipe = extract_recipe(&page, &ExtractionConfig::default())?;

    let batch = recipe.to_batch();

    expect_eq!(batch.preferred_name, "WE1234");
    expect_eq!(
        batch.headers,
        vec!["Phase", "Code", "Raw_Materials", "U", "V", "W", "X", "Y", "Z"]
    );
    expect_eq!(
        batch.rows[1],
        vec!["A", "102", "Glycerin", "5", "5", "5", "5.5", "5", "5"]
    );
    expect_eq!(batch.provenance[1], vec![("V".to_string(), Correction::Copied)]);
    expect_that!(batch.provenance[0], is_empty());
    expect_eq!(batch.metadata[0], ("처방번호".to_string(), "WE1234".to_string()));
    Ok(())
}

#[gtest]
fn test_degraded_structure_is_reported() -> googletest::Result<()> {
    // GIVEN: no header keywords anywhere.
    let page = LayoutPage {
        content: String::new(),
        tables: vec![layout_table(&[
            &["a", "b", "c"],
            &["1", "2", "3", "4"],
            &["5", "6", "7", "8"],
        ])],
    };

    let recipe = extract_recipe(&page, &ExtractionConfig::default())?;

    expect_true!(recipe.status.is_degraded());
    expect_that!(
        recipe.status.fallbacks,
        contains(eq(&StructuralFallback::HeaderRow))
    );
    Ok(())
}

#[gtest]
fn test_page_without_tables() {
    expect_that!(
        extract_recipe(&LayoutPage::default(), &ExtractionConfig::default()),
        err(displays_as(eq("page has no tables")))
    );
}

#[gtest]
fn test_empty_formulation_table() {
    let page = LayoutPage {
        content: String::new(),
        tables: vec![LayoutTable::default()],
    };

    expect_that!(
        extract_recipe(&page, &ExtractionConfig::default()),
        err(displays_as(contains_substring("no cells")))
    );
}
