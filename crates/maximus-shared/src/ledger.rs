//! Currency ledger for a learning session.
//!
//! Holds the V-Bucks earned since the learning section was opened. Tier and
//! in-tier progress are always derived from the total, never stored.
//! Credits are append-only: there is no spend operation.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

use crate::VBUCKS_PER_TIER;

/// Ledger errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid amount {0}: currency can only be added")]
    InvalidAmount(i64),

    #[error("Invalid tier size 0: a tier must hold at least one unit")]
    InvalidTierSize,

    #[error("Ledger overflow: {total} + {amount} does not fit")]
    Overflow { total: u64, amount: u64 },
}

/// Point-in-time view of the ledger, derived from a single read of the total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub total: u64,
    pub tier: u64,
    pub progress_in_tier: u64,
    pub tier_size: u64,
}

impl LedgerSnapshot {
    pub fn from_total(total: u64, tier_size: u64) -> Self {
        Self {
            total,
            tier: total / tier_size + 1,
            progress_in_tier: total % tier_size,
            tier_size,
        }
    }

    /// True once 90% of the current tier is filled
    pub fn near_next_tier(&self) -> bool {
        self.progress_in_tier * 10 >= self.tier_size * 9
    }
}

/// Result of a credit: the ledger before and after
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerUpdate {
    pub before: LedgerSnapshot,
    pub after: LedgerSnapshot,
}

impl LedgerUpdate {
    pub fn credited(&self) -> u64 {
        self.after.total - self.before.total
    }

    pub fn tier_changed(&self) -> bool {
        self.after.tier != self.before.tier
    }
}

/// Session-scoped currency ledger.
///
/// Shared by reference (`Arc<CurrencyLedger>`) between every module session
/// and its timers. All mutations go through a compare-and-swap on the total.
#[derive(Debug)]
pub struct CurrencyLedger {
    total: AtomicU64,
    tier_size: u64,
}

impl CurrencyLedger {
    pub fn new(tier_size: u64) -> Result<Self, LedgerError> {
        if tier_size == 0 {
            return Err(LedgerError::InvalidTierSize);
        }
        Ok(Self {
            total: AtomicU64::new(0),
            tier_size,
        })
    }

    /// Add currency. Negative amounts are rejected.
    pub fn add_currency(&self, amount: i64) -> Result<LedgerUpdate, LedgerError> {
        if amount < 0 {
            return Err(LedgerError::InvalidAmount(amount));
        }
        self.add(amount as u64)
    }

    /// Add an unsigned amount of currency
    pub fn add(&self, amount: u64) -> Result<LedgerUpdate, LedgerError> {
        let before = self
            .total
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |total| {
                total.checked_add(amount)
            })
            .map_err(|total| LedgerError::Overflow { total, amount })?;

        Ok(LedgerUpdate {
            before: LedgerSnapshot::from_total(before, self.tier_size),
            after: LedgerSnapshot::from_total(before + amount, self.tier_size),
        })
    }

    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Acquire)
    }

    pub fn tier_size(&self) -> u64 {
        self.tier_size
    }

    pub fn tier(&self) -> u64 {
        self.snapshot().tier
    }

    pub fn progress_in_tier(&self) -> u64 {
        self.snapshot().progress_in_tier
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot::from_total(self.total(), self.tier_size)
    }
}

impl Default for CurrencyLedger {
    fn default() -> Self {
        Self {
            total: AtomicU64::new(0),
            tier_size: VBUCKS_PER_TIER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_new() {
        let ledger = CurrencyLedger::default();
        assert_eq!(ledger.total(), 0);
        assert_eq!(ledger.tier(), 1);
        assert_eq!(ledger.progress_in_tier(), 0);
        assert_eq!(ledger.tier_size(), 100);
    }

    #[test]
    fn test_zero_tier_size_rejected() {
        assert_eq!(
            CurrencyLedger::new(0).unwrap_err(),
            LedgerError::InvalidTierSize
        );
    }

    #[test]
    fn test_add_crosses_tier() {
        let ledger = CurrencyLedger::default();
        ledger.add(95).unwrap();
        let update = ledger.add(10).unwrap();

        assert_eq!(update.credited(), 10);
        assert!(update.tier_changed());
        assert_eq!(update.before.tier, 1);
        assert_eq!(update.after.tier, 2);
        assert_eq!(ledger.progress_in_tier(), 5);
    }

    #[test]
    fn test_negative_amount_rejected() {
        let ledger = CurrencyLedger::default();
        ledger.add(7).unwrap();
        assert_eq!(
            ledger.add_currency(-1).unwrap_err(),
            LedgerError::InvalidAmount(-1)
        );
        assert_eq!(ledger.total(), 7);
    }

    #[test]
    fn test_zero_amount_is_noop() {
        let ledger = CurrencyLedger::default();
        let update = ledger.add_currency(0).unwrap();
        assert_eq!(update.before, update.after);
    }

    #[test]
    fn test_overflow_rejected() {
        let ledger = CurrencyLedger::default();
        ledger.add(u64::MAX - 1).unwrap();
        assert!(matches!(
            ledger.add(2),
            Err(LedgerError::Overflow { amount: 2, .. })
        ));
        assert_eq!(ledger.total(), u64::MAX - 1);
    }

    #[test]
    fn test_near_next_tier() {
        assert!(!LedgerSnapshot::from_total(89, 100).near_next_tier());
        assert!(LedgerSnapshot::from_total(90, 100).near_next_tier());
        assert!(LedgerSnapshot::from_total(199, 100).near_next_tier());
    }
}
