//! Module sessions: one generic state machine driven by a per-module strategy.
//!
//! ```text
//! Loading -> Active -> Evaluating -> Rewarding -> Loading
//!    \
//!     `-> Unavailable (no challenge could be produced; left via retry)
//! ```

mod controller;
mod strategy;

pub use controller::{RoundReport, SessionController};
pub use strategy::{Evaluation, LoadContext, LoadReason, Loaded, ModuleStrategy};

use maximus_shared::LedgerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Lifecycle state of a module session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Fetching the next challenge
    Loading,
    /// Accepting input
    Active,
    Evaluating,
    Rewarding,
    /// No challenge available until retry
    Unavailable,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Loading => "loading",
            SessionState::Active => "active",
            SessionState::Evaluating => "evaluating",
            SessionState::Rewarding => "rewarding",
            SessionState::Unavailable => "unavailable",
        };
        write!(f, "{}", name)
    }
}

/// Session errors. None of them change session state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("Session is {0} and not accepting input")]
    NotAccepting(SessionState),

    #[error("Nothing to submit")]
    EmptyInput,

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("This challenge was already answered")]
    AlreadyAnswered,

    #[error("Could not save artwork: {0}")]
    Export(String),

    #[error("No challenge available: {0}")]
    Unavailable(String),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

impl SessionError {
    /// Silently ignorable errors (the UI just does nothing)
    pub fn is_silent(&self) -> bool {
        matches!(self, SessionError::EmptyInput)
    }
}
