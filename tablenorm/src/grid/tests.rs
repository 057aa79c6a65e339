use googletest::prelude::*;
use testutils::{HtmlTableBuilder, grid_cells};

use super::*;

#[gtest]
fn test_from_cells_bounds_and_absent_cells() {
    let grid = Grid::from_cells(vec![(0, 0, " a "), (2, 3, "b"), (1, 1, "")]);

    expect_eq!(grid.row_count(), 3);
    expect_eq!(grid.col_count(), 4);
    expect_that!(grid.get(0, 0), some(eq("a")));
    // Observed but empty.
    expect_that!(grid.get(1, 1), some(eq("")));
    // Never observed.
    expect_that!(grid.get(1, 2), none());
    expect_eq!(grid.text(1, 2), "");
    expect_false!(grid.has_content(1, 1));
    expect_true!(grid.has_content(2, 3));
}

#[gtest]
fn test_later_cell_replaces_earlier() {
    let grid = Grid::from_cells(vec![(0, 0, "first"), (0, 0, "second")]);
    expect_eq!(grid.text(0, 0), "second");
}

#[gtest]
fn test_row_text_and_cells() {
    let grid = Grid::from_cells(grid_cells(&[&["CODE", "", "RAW MATERIALS"], &["", "U"]]));

    expect_eq!(grid.row_text(0), "CODE RAW MATERIALS");
    expect_eq!(grid.row_cells(1).collect::<Vec<_>>(), vec![(1, "U")]);
    expect_true!(grid.has_row(1));
    expect_false!(grid.has_row(2));
}

#[gtest]
fn test_move_cell() {
    let mut grid = Grid::from_cells(grid_cells(&[&["CODE", "", "", "RAW MATERIALS"]]));

    grid.move_cell(0, 3, 1);

    expect_eq!(grid.text(0, 1), "RAW MATERIALS");
    expect_eq!(grid.text(0, 3), "");
}

#[gtest]
fn test_to_rows_pads_and_skips_unobserved_rows() {
    let grid = Grid::from_cells(vec![(0, 0, "a"), (0, 2, "c"), (2, 1, "e")]);

    expect_eq!(
        grid.to_rows(),
        vec![
            vec!["a".to_string(), "".to_string(), "c".to_string()],
            vec!["".to_string(), "e".to_string(), "".to_string()],
        ]
    );
}

#[gtest]
fn test_html_table_parse() -> Result<()> {
    let html = HtmlTableBuilder::new()
        .row(&["Bulk", "Strain"])
        .label_row("25E15I14\nGB1919-ZMB", 5, &["E.coli", "  1.2×10^5 "])
        .build();

    let table = HtmlTable::parse(&format!("<div>{html}</div>"))?;

    expect_eq!(table.rows.len(), 2);
    expect_eq!(table.rows[0].cells[0].row_span, None);
    expect_eq!(table.rows[1].cells[0].row_span, Some(5));
    expect_eq!(table.rows[1].cells[0].text, "25E15I14\nGB1919-ZMB");
    expect_that!(table.rows[1].cell_text(2), some(eq("1.2×10^5")));
    expect_that!(table.rows[1].cell_text(3), none());
    Ok(())
}

#[gtest]
fn test_html_table_nested_markup_text() -> Result<()> {
    let table = HtmlTable::parse(
        r#"<table><tr><td colspan="2"><b>E.</b>coli</td><th>hdr</th></tr></table>"#,
    )?;

    expect_eq!(table.rows[0].cells[0].text, "E.coli");
    expect_eq!(table.rows[0].cells[0].col_span, Some(2));
    expect_eq!(table.rows[0].cells[1].text, "hdr");
    Ok(())
}

#[gtest]
fn test_html_without_table() {
    expect_that!(
        HtmlTable::parse("<p>nothing here</p>"),
        err(displays_as(contains_substring("no <table>")))
    );
}

#[gtest]
fn test_html_to_grid_is_positional() -> Result<()> {
    let html = HtmlTableBuilder::new()
        .row(&["h0", "h1", "h2"])
        .label_row("label", 2, &["S.aureus", "x"])
        .row(&["C.albicans", "y"])
        .build();

    let grid = HtmlTable::parse(&html)?.to_grid();

    expect_eq!(grid.row_count(), 3);
    expect_eq!(grid.text(1, 1), "S.aureus");
    expect_eq!(grid.text(2, 0), "C.albicans");
    Ok(())
}

#[gtest]
fn test_html_to_grid_does_not_expand_colspan() -> Result<()> {
    let html = r#"<table><tr><td colspan="2">wide</td><td>next</td></tr></table>"#;

    let grid = HtmlTable::parse(html)?.to_grid();

    expect_eq!(grid.col_count(), 2);
    expect_eq!(grid.text(0, 1), "next");
    Ok(())
}
