use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MonetaryError {
    #[error("Monetary error: {0}")]
    InvalidArgument(String),
    #[error("Monetary error: Overflow")]
    Overflow,
}
