//! Extraction of preservation-test results from an HTML table.
//!
//! Each table alternates a grouping label row, whose first cell spans the
//! following strain rows and names their test and prescription numbers,
//! with plain strain rows. The grouping key and dates are carried by a
//! [PageCoordinator].

pub mod cfu;
pub mod dates;
pub mod grouping;
pub mod strain;


use hashbrown::HashMap;
use serde::Serialize;
use strum_macros::Display;
use tablenorm::{correct::Correction, grid::HtmlTable};

use crate::{ExtractError, sink::SheetBatch, state::PageCoordinator};

use cfu::{Day, Judgment, LogValue};
use dates::TestDates;
use strain::Strain;

/// Tables shorter than this hold no data rows.
const MIN_ROWS: usize = 3;
/// The row holding the dates cell.
const DATES_ROW: usize = 1;
/// Data starts here when no row looks like a label row.
const DEFAULT_DATA_START: usize = 2;
/// A spanning first cell longer than this marks the first label row.
const MIN_LABEL_LEN: usize = 10;

/// Column positions in one kind of row.
#[derive(Clone, Copy, Debug)]
struct Offsets {
    strain: usize,
    first_day: usize,
    judgment: usize,
    final_judgment: usize,
}

const LABEL_ROW: Offsets = Offsets {
    strain: 1,
    first_day: 3,
    judgment: 7,
    final_judgment: 8,
};

const PLAIN_ROW: Offsets = Offsets {
    strain: 0,
    first_day: 2,
    judgment: 6,
    final_judgment: 7,
};

/// Fields of a [PreservationRecord] that may be carried over from an earlier
/// row.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum KeyField {
    TestNumber,
    PrescriptionNumber,
}

/// One strain row.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PreservationRecord {
    /// Row index within the HTML table.
    pub row: usize,
    pub test_number: Option<String>,
    pub prescription_number: Option<String>,
    pub strain: Strain,
    /// Cleaned counts for day 0, 7, 14 and 28.
    pub cfu: [String; 4],
    pub judgment: Judgment,
    pub final_judgment: Judgment,
    pub corrections: HashMap<KeyField, Correction>,
}

impl PreservationRecord {
    pub fn cfu(&self, day: Day) -> &str {
        let index = Day::ALL.iter().position(|d| *d == day).unwrap_or(0);
        &self.cfu[index]
    }

    /// The counts on the log10 scale, in day order.
    pub fn log_values(&self) -> [LogValue; 4] {
        self.cfu.each_ref().map(|value| cfu::convert_to_log(value))
    }
}

/// The records of one page and the dates that apply to them.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PreservationPage {
    pub records: Vec<PreservationRecord>,
    pub dates: Option<TestDates>,
}

const HEADERS: [&str; 17] = [
    "Test_No",
    "Prescription_No",
    "Strain",
    "Day0",
    "Day7",
    "Day14",
    "Day28",
    "Day0_Log",
    "Day7_Log",
    "Day14_Log",
    "Day28_Log",
    "Judgment",
    "Final_Judgment",
    "Day0_Date",
    "Day7_Date",
    "Day14_Date",
    "Day28_Date",
];

impl PreservationPage {
    /// One batch per test number, in order of first appearance. Records
    /// without a test number are left out.
    pub fn to_batches(&self) -> Vec<SheetBatch> {
        let mut test_numbers: Vec<&str> = Vec::new();
        for record in &self.records {
            match record.test_number.as_deref() {
                Some(n) if !test_numbers.contains(&n) => test_numbers.push(n),
                Some(_) => {}
                None => log::warn!("row {} has no test number, not batched", record.row),
            }
        }

        let headers: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();

        test_numbers
            .into_iter()
            .map(|test_number| {
                let records: Vec<&PreservationRecord> = self
                    .records
                    .iter()
                    .filter(|r| r.test_number.as_deref() == Some(test_number))
                    .collect();
                let prescription = records
                    .iter()
                    .find_map(|r| r.prescription_number.clone())
                    .unwrap_or_default();
                SheetBatch {
                    preferred_name: test_number.to_string(),
                    metadata: vec![
                        ("시험번호".to_string(), test_number.to_string()),
                        ("처방번호".to_string(), prescription),
                    ],
                    identifier_order: Vec::new(),
                    headers: headers.clone(),
                    rows: records.iter().map(|r| self.row_cells(r)).collect(),
                    provenance: records
                        .iter()
                        .map(|r| {
                            let mut cells: Vec<(String, Correction)> = r
                                .corrections
                                .iter()
                                .map(|(field, kind)| (field.to_string(), *kind))
                                .collect();
                            cells.sort_by(|a, b| a.0.cmp(&b.0));
                            cells
                        })
                        .collect(),
                }
            })
            .collect()
    }

    fn row_cells(&self, record: &PreservationRecord) -> Vec<String> {
        let mut cells = vec![
            record.test_number.clone().unwrap_or_default(),
            record.prescription_number.clone().unwrap_or_default(),
            record.strain.to_string(),
        ];
        cells.extend(record.cfu.iter().cloned());
        cells.extend(record.log_values().iter().map(LogValue::to_string));
        cells.push(record.judgment.to_string());
        cells.push(record.final_judgment.to_string());
        cells.extend(
            Day::ALL
                .iter()
                .map(|&day| self.dates.as_ref().map_or("", |d| d.get(day)).to_string()),
        );
        cells
    }
}

fn data_start(table: &HtmlTable) -> usize {
    table
        .rows
        .iter()
        .position(|row| {
            row.cells.first().is_some_and(|cell| {
                cell.row_span.is_some() && cell.text.chars().count() > MIN_LABEL_LEN
            })
        })
        .unwrap_or(DEFAULT_DATA_START)
}

/// Extracts the strain records of one page.
///
/// The coordinator should have been reset for the page. Its last dates are
/// used when the page's dates cannot be read.
pub fn extract_page(
    html: &str,
    coordinator: &mut PageCoordinator,
) -> Result<PreservationPage, ExtractError> {
    let table = HtmlTable::parse(html)?;
    if table.rows.len() < MIN_ROWS {
        return Err(ExtractError::TooFewRows {
            found: table.rows.len(),
            required: MIN_ROWS,
        });
    }

    let dates = coordinator.resolve_dates(
        table
            .rows
            .get(DATES_ROW)
            .and_then(|row| row.cell_text(0))
            .and_then(TestDates::parse),
    );

    let start = data_start(&table);
    log::debug!("data starts at row {start}");

    let mut records = Vec::new();
    for (index, row) in table.rows.iter().enumerate().skip(start) {
        let label = row
            .cells
            .first()
            .filter(|cell| cell.row_span.is_some() && !cell.text.is_empty());
        let offsets = if label.is_some() { LABEL_ROW } else { PLAIN_ROW };
        if let Some(cell) = label {
            coordinator.apply_label(grouping::grouping_keys(&cell.text));
        }

        let Some(strain) = row.cell_text(offsets.strain).and_then(Strain::recognize) else {
            log::debug!("row {index}: no known strain, skipped");
            continue;
        };

        if strain == Strain::EColi {
            let seen = coordinator.count_ecoli();
            if label.is_none() && seen > 1 {
                coordinator.take_fallback();
            }
        }

        let cfu: [String; 4] = std::array::from_fn(|i| {
            cfu::clean_cfu(
                row.cell_text(offsets.first_day + i).unwrap_or(""),
                strain,
                Day::ALL[i],
            )
        });
        if cfu.iter().all(String::is_empty) {
            log::debug!("row {index}: no counts, skipped");
            continue;
        }

        let key = coordinator.current_key().clone();
        let mut corrections = HashMap::new();
        if label.is_none() {
            if key.test_number.is_some() {
                corrections.insert(KeyField::TestNumber, Correction::Inherited);
            }
            if key.prescription_number.is_some() {
                corrections.insert(KeyField::PrescriptionNumber, Correction::Inherited);
            }
        }

        records.push(PreservationRecord {
            row: index,
            test_number: key.test_number,
            prescription_number: key.prescription_number,
            strain,
            cfu,
            judgment: Judgment::from_cell(row.cell_text(offsets.judgment)),
            final_judgment: Judgment::from_cell(row.cell_text(offsets.final_judgment)),
            corrections,
        });
    }

    log::info!("read {} strain records", records.len());
    Ok(PreservationPage { records, dates })
}
