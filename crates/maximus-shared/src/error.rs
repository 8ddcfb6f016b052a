//! Error types for Maximus.

use thiserror::Error;

use crate::ledger::LedgerError;

#[derive(Error, Debug)]
pub enum MaximusError {
    #[error("Unknown module: {0}")]
    UnknownModule(String),

    #[error("Color {0} is not in the palette")]
    InvalidColor(String),

    #[error("Brush size {0} is not available")]
    InvalidBrushSize(u32),

    #[error("Unknown code block: {0}")]
    UnknownBlock(String),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MaximusError {
    /// Process exit code for the CLI
    pub fn code(&self) -> i32 {
        match self {
            MaximusError::UnknownModule(_) => 2,
            MaximusError::InvalidColor(_) => 3,
            MaximusError::InvalidBrushSize(_) => 3,
            MaximusError::UnknownBlock(_) => 3,
            MaximusError::Ledger(_) => 4,
            MaximusError::Io(_) => 5,
            MaximusError::Json(_) => 6,
            MaximusError::Internal(_) => 70,
        }
    }
}
