/// Failures while turning raw OCR output into a [crate::grid::Grid] or
/// analysing one.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("no <table> element found in HTML input")]
    NoTable,
    #[error("invalid selector {selector:?}: {reason}")]
    Selector {
        selector: &'static str,
        reason: String,
    },
    #[error("table has no cells")]
    EmptyGrid,
}
