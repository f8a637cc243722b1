use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("weight column not found: {0}")]
    WeightColumnNotFound(String),

    #[error("weight column '{column}' has {got} values for {expected} edge rows")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        got: usize,
    },
}
