/// A row that cannot be used for unit-based aggregates.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("row {row}: column '{column}' has no usable integer quantity (got {value:?})")]
pub struct DataIntegrityError {
    /// Zero-based position of the row in the input sequence.
    pub row: usize,
    pub column: &'static str,
    /// Raw cell content; `None` when the column was absent.
    pub value: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    DataIntegrity(#[from] DataIntegrityError),
}

pub type Result<T> = std::result::Result<T, IngestError>;
