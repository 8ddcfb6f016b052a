//! Consecutive correct/incorrect counters fed to the difficulty oracle.

use serde::{Deserialize, Serialize};

/// Outcome of one evaluated round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Correct,
    Incorrect,
    /// Scored on performance rather than right/wrong (reading, typing)
    Scored,
    /// Reward-only action (drawing, coding)
    Neutral,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakCounters {
    pub consecutive_correct: u32,
    pub consecutive_incorrect: u32,
}

impl StreakCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an outcome. The opposite counter resets to zero.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Correct => {
                self.consecutive_correct = self.consecutive_correct.saturating_add(1);
                self.consecutive_incorrect = 0;
            }
            Outcome::Incorrect => {
                self.consecutive_incorrect = self.consecutive_incorrect.saturating_add(1);
                self.consecutive_correct = 0;
            }
            Outcome::Scored | Outcome::Neutral => {}
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
