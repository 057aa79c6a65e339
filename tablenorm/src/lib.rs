//! Structure inference and value normalization for tables recovered by OCR.
//!
//! The flow is strictly downstream: a [grid::Grid] is built from the OCR
//! output, [layout::TableLayout] locates the header, column roles and
//! measurement identifiers, [rows] extracts one [rows::Record] per data row
//! and [correct] applies the deterministic correction rules.
//! [normalize_table] runs the whole flow.

pub mod columns;
pub mod config;
pub mod correct;
pub mod detect;
pub mod error;
pub mod grid;
pub mod header;
pub mod ident;
pub mod layout;
pub mod rows;
pub mod table;
pub mod textnorm;

pub use error::TableError;
pub use table::{NormalizedTable, normalize_table};
