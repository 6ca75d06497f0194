//! Crate error type

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Any connection, statement, or row-processing failure in the storage
    /// layer. The original cause is preserved as the source.
    #[error("storage failure: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("{0} is not a valid number. Try again.")]
    InvalidNumber(String),

    #[error("{0} is not a valid decimal number. Try again.")]
    InvalidDecimal(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
