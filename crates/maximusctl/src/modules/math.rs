//! Math mission: locally generated arithmetic, oracle-tuned difficulty.

use async_trait::async_trait;
use maximus_common::oracle::MATH_DIFFICULTY;
use maximus_common::{DifficultyOracle, MathDifficultyRequest, OracleError};
use maximus_shared::content::{generate_math_problem, MathProblem};
use maximus_shared::rewards::math_reward;
use maximus_shared::{ModuleKind, Notice, Outcome, CURRENCY_NAME};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::convert::Infallible;

use crate::session::{Evaluation, LoadContext, Loaded, ModuleStrategy, SessionError};

pub struct MathStrategy {
    oracle: DifficultyOracle,
    rng: StdRng,
}

impl MathStrategy {
    pub fn new(oracle: DifficultyOracle) -> Self {
        Self::with_rng(oracle, StdRng::from_entropy())
    }

    pub fn with_rng(oracle: DifficultyOracle, rng: StdRng) -> Self {
        Self { oracle, rng }
    }

    fn problem_at(&mut self, difficulty: u32) -> MathProblem {
        generate_math_problem(difficulty, &mut self.rng)
    }
}

/// Leading integer of an answer: optional sign then digits, anything after
/// is ignored ("12 apples" reads as 12).
pub fn parse_answer(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let digits_start = usize::from(trimmed.starts_with(|c: char| c == '-' || c == '+'));
    let digits_len = trimmed[digits_start..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return None;
    }
    trimmed[..digits_start + digits_len].parse().ok()
}

#[async_trait]
impl ModuleStrategy for MathStrategy {
    type Challenge = MathProblem;
    type Input = String;
    type Action = Infallible;

    fn kind(&self) -> ModuleKind {
        ModuleKind::Math
    }

    async fn load(
        &mut self,
        ctx: LoadContext<'_, MathProblem>,
    ) -> Result<Loaded<MathProblem>, OracleError> {
        if ctx.is_first() {
            let start = *MATH_DIFFICULTY.start();
            return Ok(Loaded::new(self.problem_at(start), start));
        }
        if !ctx.has_result() {
            return Ok(Loaded::new(self.problem_at(ctx.difficulty), ctx.difficulty));
        }

        let request = MathDifficultyRequest {
            current_difficulty: ctx.difficulty,
            correct_answers: ctx.streaks.consecutive_correct,
            incorrect_answers: ctx.streaks.consecutive_incorrect,
        };
        let adjustment = self.oracle.adjust_math(&request).await?;

        let difficulty = adjustment.new_difficulty;
        let mut loaded = Loaded::new(self.problem_at(difficulty), difficulty)
            .with_rationale(adjustment.rationale.clone());
        if difficulty != ctx.difficulty {
            loaded = loaded.with_notice(Notice::info(
                "Difficulty Shift!",
                format!("Threat Level changed to {}. {}", difficulty, adjustment.rationale),
            ));
        }
        Ok(loaded)
    }

    fn fallback(&mut self, ctx: LoadContext<'_, MathProblem>) -> Option<Loaded<MathProblem>> {
        Some(
            Loaded::new(self.problem_at(ctx.difficulty), ctx.difficulty).with_notice(
                Notice::warning(
                    "Storm Interference!",
                    "A little glitch! We'll stick to this Threat Level for now.",
                ),
            ),
        )
    }

    fn is_empty(&self, input: &String) -> bool {
        input.trim().is_empty()
    }

    fn evaluate(
        &mut self,
        problem: &MathProblem,
        difficulty: u32,
        input: String,
    ) -> Result<Evaluation, SessionError> {
        let correct = parse_answer(&input)
            .map(|answer| problem.is_correct(answer))
            .unwrap_or(false);

        let reward = math_reward(difficulty, correct);
        let evaluation = if correct {
            Evaluation::new(
                reward,
                Outcome::Correct,
                "Victory Royale!",
                format!("Correct! +{} {}!", reward, CURRENCY_NAME),
            )
        } else {
            Evaluation::new(
                0,
                Outcome::Incorrect,
                "So Close!",
                format!("Not quite! The answer was {}. Keep going!", problem.answer),
            )
        };
        Ok(evaluation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_answer_reads_leading_integer() {
        assert_eq!(parse_answer("12"), Some(12));
        assert_eq!(parse_answer("  12 "), Some(12));
        assert_eq!(parse_answer("12abc"), Some(12));
        assert_eq!(parse_answer("-7"), Some(-7));
        assert_eq!(parse_answer("+3"), Some(3));
        assert_eq!(parse_answer("3.9"), Some(3));
        assert_eq!(parse_answer("abc"), None);
        assert_eq!(parse_answer("-"), None);
        assert_eq!(parse_answer(""), None);
    }
}
