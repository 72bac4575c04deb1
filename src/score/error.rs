//! Error types for score normalization.

use thiserror::Error;

/// Errors raised while validating and normalizing raw game scores.
///
/// All of these are local input-validation failures; nothing has touched
/// storage when one is returned, and the caller can correct the input and
/// retry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoreError {
    #[error("expected {expected} tokens (4 player/score pairs), got {got}")]
    BadArity { expected: usize, got: usize },

    #[error("raw score is not a number: '{token}'")]
    BadNumber { token: String },

    #[error("raw scores must sum to {expected}, got {got}")]
    BadSum { expected: i64, got: f64 },
}
