use tablenorm::TableError;

/// Failures that stop a single page or table from being extracted.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("table has {found} rows, at least {required} are required")]
    TooFewRows { found: usize, required: usize },
    #[error("page has no tables")]
    NoTables,
}
