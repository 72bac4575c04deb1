//! Error types for the ledger store.

use thiserror::Error;

/// Errors that can occur during ledger store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Fjall error: {0}")]
    Fjall(#[from] fjall::Error),

    /// The game id is already present in the ledger; nothing was written.
    #[error("game already recorded: {0}")]
    DuplicateGame(String),

    #[error("game not found: {0}")]
    GameNotFound(String),

    #[error("player not found: {0}")]
    PlayerNotFound(String),

    #[error("row encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Row bytes failed the checksum; the stored data is damaged.
    #[error("row checksum mismatch for key '{key}'")]
    Corrupt { key: String },

    #[error("invalid format: {0}")]
    InvalidFormat(String),

    #[error("ledger not initialized at {0}")]
    NotInitialized(String),
}
