//! Unified error type for the riichi-ledger library.
//!
//! Module-specific errors ([`ScoreError`], [`StoreError`]) stay precise at
//! their boundaries; this wrapper lets application code handle everything
//! with one type.

use thiserror::Error;

#[cfg(feature = "store")]
use crate::ledger::StoreError;
use crate::score::ScoreError;

/// Unified error type for all riichi-ledger operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Input-validation error from the score normalizer. Nothing was
    /// written; correct the tokens and retry.
    #[error(transparent)]
    Score(#[from] ScoreError),

    /// Error from the ledger or aggregate store.
    #[cfg(feature = "store")]
    #[error(transparent)]
    Store(#[from] StoreError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A [`Result`] type alias using the unified [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns `true` if this is a score-normalization error.
    pub fn is_score(&self) -> bool {
        matches!(self, Self::Score(_))
    }

    /// Returns `true` if this is a store error.
    #[cfg(feature = "store")]
    pub fn is_store(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}
