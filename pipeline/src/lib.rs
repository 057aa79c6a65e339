//! The preservation-test and recipe extraction pipelines, their domain value
//! cleaners, and the workbook sink contract their output is handed to.

pub mod error;
pub mod preservation;
pub mod recipe;
pub mod sink;
pub mod state;

pub use error::ExtractError;
