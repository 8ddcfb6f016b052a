//! Shared types and game rules for Maximus components.
//!
//! Everything here is synchronous and free of I/O: the currency ledger,
//! reward formulas, streak counters, local content generators and the
//! module catalog.

pub mod blocks;
pub mod catalog;
pub mod content;
pub mod error;
pub mod ledger;
pub mod notice;
pub mod palette;
pub mod rewards;
pub mod streaks;
pub mod typing;

pub use catalog::ModuleKind;
pub use error::MaximusError;
pub use ledger::{CurrencyLedger, LedgerError, LedgerSnapshot, LedgerUpdate};
pub use notice::{Notice, NoticeLevel};
pub use streaks::{Outcome, StreakCounters};
pub use typing::TypingMetrics;

pub const APP_NAME: &str = "MAXIMUS";

/// Currency shown to the player
pub const CURRENCY_NAME: &str = "V-Bucks";

/// Name of a progression level
pub const TIER_NAME: &str = "Tier";

/// Currency units per tier
pub const VBUCKS_PER_TIER: u64 = 100;
