//! Typing round metrics: position-wise accuracy and words per minute.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Speed and accuracy of one typing round
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingMetrics {
    pub words_per_minute: u32,
    /// Percentage of target positions typed correctly (0-100)
    pub accuracy_percent: u32,
}

impl TypingMetrics {
    pub fn measure(target: &str, typed: &str, elapsed: Duration) -> Self {
        if typed.trim().is_empty() {
            return Self::default();
        }
        Self {
            words_per_minute: words_per_minute(typed, elapsed),
            accuracy_percent: accuracy_percent(target, typed),
        }
    }
}

/// Count positions where the typed char equals the target char.
///
/// Compares index by index; an inserted or dropped character shifts every
/// later position out of alignment.
pub fn matching_positions(target: &str, typed: &str) -> usize {
    target
        .chars()
        .zip(typed.chars())
        .filter(|(t, u)| t == u)
        .count()
}

/// Accuracy as a whole percentage of the target length, rounded down
pub fn accuracy_percent(target: &str, typed: &str) -> u32 {
    let target_len = target.chars().count();
    if target_len == 0 {
        return 0;
    }
    (matching_positions(target, typed) * 100 / target_len) as u32
}

pub fn word_count(typed: &str) -> usize {
    typed.split_whitespace().count()
}

pub fn words_per_minute(typed: &str, elapsed: Duration) -> u32 {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return 0;
    }
    (word_count(typed) as f64 / secs * 60.0).round() as u32
}
