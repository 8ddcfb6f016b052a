//! Local content generators for the math and reading modules.
//!
//! Both take the RNG as a parameter so tests can use a seeded generator.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    const ALL: [Operation; 4] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Multiply => "*",
            Operation::Divide => "÷",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One arithmetic problem with its exact answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MathProblem {
    pub text: String,
    pub operation: Operation,
    pub answer: i64,
}

impl MathProblem {
    fn new(left: i64, operation: Operation, right: i64, answer: i64) -> Self {
        Self {
            text: format!("{} {} {} = ?", left, operation, right),
            operation,
            answer,
        }
    }

    pub fn is_correct(&self, answer: i64) -> bool {
        self.answer == answer
    }
}

/// Generate a problem for a difficulty level (1 and up).
///
/// Operands fall in `1..=5*d`. Levels 1-2 only add; higher levels unlock
/// subtraction, multiplication and division in that order.
pub fn generate_math_problem<R: Rng + ?Sized>(difficulty: u32, rng: &mut R) -> MathProblem {
    let difficulty = difficulty.max(1);
    let max = (difficulty as i64) * 5;
    let a = rng.gen_range(1..=max);
    let b = rng.gen_range(1..=max);

    let operation = if difficulty > 2 {
        let unlocked = ((difficulty - 1) as usize).min(Operation::ALL.len());
        Operation::ALL[rng.gen_range(0..unlocked)]
    } else {
        Operation::Add
    };

    match operation {
        Operation::Add => MathProblem::new(a, operation, b, a + b),
        Operation::Subtract => {
            // Keep early subtraction non-negative
            if a < b && difficulty < 5 {
                MathProblem::new(b, operation, a, b - a)
            } else {
                MathProblem::new(a, operation, b, a - b)
            }
        }
        Operation::Multiply => MathProblem::new(a, operation, b, a * b),
        // Whole-number division: (a*b) ÷ a = b
        Operation::Divide => MathProblem::new(a * b, operation, a, b),
    }
}

const PASSAGES_LEVEL_1: &[&str] = &[
    "A red cat sat.",
    "The big dog ran.",
    "A bug is on the rug.",
    "See the sun.",
    "My toy is fun.",
];

const PASSAGES_LEVEL_2: &[&str] = &[
    "The fluffy cat sleeps on the mat.",
    "A small bird sings a sweet song.",
    "Frogs jump in the green pond.",
    "The yellow bus goes to school.",
    "I like to read my new book.",
];

const PASSAGES_LEVEL_3: &[&str] = &[
    "Colorful fish swim in the clear blue water.",
    "A friendly squirrel gathers nuts for the winter.",
    "The tall oak tree has many green leaves.",
    "Children play happily in the sunny park.",
    "We went to the zoo and saw a lion.",
];

const PASSAGE_BANKS: &[&[&str]] = &[PASSAGES_LEVEL_1, PASSAGES_LEVEL_2, PASSAGES_LEVEL_3];

/// Highest level with its own passage bank
pub fn max_passage_level() -> u32 {
    PASSAGE_BANKS.len() as u32
}

/// Pick a passage for a level. Levels past the last bank reuse the last bank.
pub fn generate_reading_passage<R: Rng + ?Sized>(difficulty: u32, rng: &mut R) -> String {
    let level = difficulty.clamp(1, max_passage_level());
    let bank = PASSAGE_BANKS[(level - 1) as usize];
    bank.choose(rng).copied().unwrap_or(PASSAGES_LEVEL_1[0]).to_string()
}
