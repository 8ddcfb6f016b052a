//! Reward formulas for every module.
//!
//! All rewards are whole V-Bucks. Formulas that mix speed and accuracy have
//! a floor so a finished round never pays nothing.

/// Minimum reward for a finished reading or typing round
pub const MIN_ROUND_REWARD: u64 = 5;

/// Math: V-Bucks per difficulty level for a correct answer
pub const MATH_REWARD_PER_LEVEL: u64 = 10;

/// Reading: seconds budget before the difficulty multiplier
pub const READING_MAX_SECS: f64 = 60.0;
/// Reading: questions assumed per passage when reporting to the oracle
pub const READING_TOTAL_QUESTIONS: u32 = 5;

pub const DRAW_COLOR_CHANGE: u64 = 2;
pub const DRAW_BRUSH_CHANGE: u64 = 2;
pub const DRAW_CLEAR: u64 = 5;
pub const DRAW_SAVE: u64 = 20;
pub const DRAW_STROKE: u64 = 1;
/// Credited on every tick of continuous pointer-down
pub const DRAW_ACTIVITY_TICK: u64 = 1;
/// Strokes between "keep going" notices
pub const DRAW_STROKE_MILESTONE: u64 = 50;

pub const CODE_BLOCK_ADDED: u64 = 2;
pub const CODE_CLEAR: u64 = 5;
pub const CODE_PER_BLOCK: u64 = 5;
pub const CODE_RUN_BONUS: u64 = 10;

pub const KIND_CHOICE: u64 = 25;
pub const OTHER_CHOICE: u64 = 5;

pub fn math_reward(difficulty: u32, correct: bool) -> u64 {
    if correct {
        MATH_REWARD_PER_LEVEL * difficulty as u64
    } else {
        0
    }
}

/// Reading comprehension score (0-100) from seconds spent on a passage.
///
/// A zero count means the timer never ticked and is scored as the full
/// 60 second budget.
pub fn reading_score(elapsed_secs: u64, difficulty: u32) -> f64 {
    let taken = if elapsed_secs == 0 {
        READING_MAX_SECS
    } else {
        elapsed_secs as f64
    };
    let budget = READING_MAX_SECS * (difficulty as f64 * 0.3 + 1.0);
    ((1.0 - taken / budget) * 120.0).clamp(0.0, 100.0)
}

pub fn reading_reward(score: f64) -> u64 {
    ((score / 10.0).round() as u64).max(MIN_ROUND_REWARD)
}

/// Simulated correct answers reported to the reading oracle
pub fn reading_correct_answers(score: f64) -> u32 {
    (score / 20.0).round() as u32
}

pub fn typing_reward(wpm: u32, accuracy: u32, difficulty: u32) -> u64 {
    let points = wpm as f64 * 0.3 + accuracy as f64 * 0.7 + difficulty as f64 * 2.0;
    (points.round() as u64).max(MIN_ROUND_REWARD)
}

pub fn coding_run_reward(blocks: usize) -> u64 {
    blocks as u64 * CODE_PER_BLOCK + CODE_RUN_BONUS
}

pub fn kindness_reward(kind_choice: bool) -> u64 {
    if kind_choice {
        KIND_CHOICE
    } else {
        OTHER_CHOICE
    }
}
