//! Ledger invariants across randomized credit sequences.

use maximus_shared::rewards::{reading_reward, reading_score, typing_reward, MIN_ROUND_REWARD};
use maximus_shared::{CurrencyLedger, LedgerError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::thread;

#[test]
fn test_tier_derivation_holds_for_every_total() {
    let mut rng = StdRng::seed_from_u64(0x5EED);

    for tier_size in [1u64, 7, 100, 250] {
        let ledger = CurrencyLedger::new(tier_size).unwrap();
        let mut expected = 0u64;

        for _ in 0..500 {
            let amount: i64 = rng.gen_range(0..=40);
            let update = ledger.add_currency(amount).unwrap();
            expected += amount as u64;

            let snap = ledger.snapshot();
            assert_eq!(snap.total, expected);
            assert_eq!(snap.tier, expected / tier_size + 1);
            assert_eq!(snap.progress_in_tier, expected % tier_size);
            assert!(snap.tier >= 1);
            assert!(snap.progress_in_tier < tier_size);
            assert_eq!(update.after, snap);
        }
    }
}

#[test]
fn test_total_never_decreases() {
    let mut rng = StdRng::seed_from_u64(99);
    let ledger = CurrencyLedger::default();
    let mut last = 0;

    for _ in 0..300 {
        let amount: i64 = rng.gen_range(-20..=20);
        let result = ledger.add_currency(amount);
        if amount < 0 {
            assert_eq!(result.unwrap_err(), LedgerError::InvalidAmount(amount));
        }
        assert!(ledger.total() >= last);
        last = ledger.total();
    }
}

#[test]
fn test_concurrent_credits_are_not_lost() {
    let ledger = Arc::new(CurrencyLedger::default());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let ledger = Arc::clone(&ledger);
            thread::spawn(move || {
                for _ in 0..1000 {
                    ledger.add(1).unwrap();
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(ledger.total(), 8000);
    assert_eq!(ledger.tier(), 81);
    assert_eq!(ledger.progress_in_tier(), 0);
}

#[test]
fn test_round_reward_floors() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..1000 {
        let wpm = rng.gen_range(0..300);
        let accuracy = rng.gen_range(0..=100);
        let difficulty = rng.gen_range(1..=10);
        assert!(typing_reward(wpm, accuracy, difficulty) >= MIN_ROUND_REWARD);

        let secs = rng.gen_range(0..10_000);
        assert!(reading_reward(reading_score(secs, difficulty)) >= MIN_ROUND_REWARD);
    }
}
