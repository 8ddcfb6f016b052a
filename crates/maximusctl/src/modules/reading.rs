//! Reading quest: timed passages, score from reading time.

use async_trait::async_trait;
use maximus_common::oracle::READING_DIFFICULTY;
use maximus_common::{DifficultyOracle, OracleError, ReadingDifficultyRequest};
use maximus_shared::content::generate_reading_passage;
use maximus_shared::rewards::{
    reading_correct_answers, reading_reward, reading_score, READING_TOTAL_QUESTIONS,
};
use maximus_shared::{ModuleKind, Notice, Outcome, CURRENCY_NAME};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::convert::Infallible;
use std::time::Duration;

use crate::session::{Evaluation, LoadContext, Loaded, ModuleStrategy, SessionError};
use crate::timer::ActivityTimer;

/// A passage on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingPassage {
    pub text: String,
    pub level: u32,
}

pub struct ReadingStrategy {
    oracle: DifficultyOracle,
    rng: StdRng,
    tick: Duration,
    stopwatch: Option<ActivityTimer>,
    last_score: f64,
}

impl ReadingStrategy {
    pub fn new(oracle: DifficultyOracle, tick: Duration) -> Self {
        Self::with_rng(oracle, tick, StdRng::from_entropy())
    }

    pub fn with_rng(oracle: DifficultyOracle, tick: Duration, rng: StdRng) -> Self {
        Self {
            oracle,
            rng,
            tick,
            stopwatch: None,
            last_score: 0.0,
        }
    }

    /// Whole seconds counted for the current passage
    pub fn elapsed_secs(&self) -> u64 {
        self.stopwatch
            .as_ref()
            .map(|timer| timer.ticks() * self.tick.as_secs())
            .unwrap_or(0)
    }

    pub fn is_timing(&self) -> bool {
        self.stopwatch.is_some()
    }

    fn passage_at(&mut self, level: u32) -> ReadingPassage {
        ReadingPassage {
            text: generate_reading_passage(level, &mut self.rng),
            level,
        }
    }
}

#[async_trait]
impl ModuleStrategy for ReadingStrategy {
    type Challenge = ReadingPassage;
    /// Submitting means "I finished reading"
    type Input = ();
    type Action = Infallible;

    fn kind(&self) -> ModuleKind {
        ModuleKind::Reading
    }

    async fn load(
        &mut self,
        ctx: LoadContext<'_, ReadingPassage>,
    ) -> Result<Loaded<ReadingPassage>, OracleError> {
        if ctx.is_first() {
            let start = *READING_DIFFICULTY.start();
            return Ok(Loaded::new(self.passage_at(start), start));
        }
        if !ctx.has_result() {
            return Ok(Loaded::new(self.passage_at(ctx.difficulty), ctx.difficulty));
        }

        let request = ReadingDifficultyRequest {
            level: ctx.difficulty,
            score: self.last_score,
            correct_answers: reading_correct_answers(self.last_score),
            total_questions: READING_TOTAL_QUESTIONS,
        };
        let adjustment = self.oracle.adjust_reading(&request).await?;

        let level = adjustment.new_difficulty;
        let mut loaded = Loaded::new(self.passage_at(level), level)
            .with_rationale(adjustment.rationale.clone());
        if level != ctx.difficulty {
            loaded = loaded.with_notice(Notice::info(
                "Way to go!",
                format!("New reading level: {}! {}", level, adjustment.rationale),
            ));
        }
        Ok(loaded)
    }

    fn fallback(&mut self, ctx: LoadContext<'_, ReadingPassage>) -> Option<Loaded<ReadingPassage>> {
        Some(
            Loaded::new(self.passage_at(ctx.difficulty), ctx.difficulty).with_notice(
                Notice::warning("Oops!", "A little hiccup! We'll get a new story at this level."),
            ),
        )
    }

    fn activated(&mut self, _passage: &ReadingPassage) {
        // Replacing the handle stops the previous stopwatch
        self.stopwatch = Some(ActivityTimer::stopwatch("reading", self.tick));
    }

    fn is_empty(&self, _input: &()) -> bool {
        false
    }

    fn evaluate(
        &mut self,
        _passage: &ReadingPassage,
        difficulty: u32,
        _input: (),
    ) -> Result<Evaluation, SessionError> {
        let elapsed = self.elapsed_secs();
        self.stopwatch = None;

        let score = reading_score(elapsed, difficulty);
        self.last_score = score;
        let reward = reading_reward(score);

        Ok(Evaluation::new(
            reward,
            Outcome::Scored,
            "Great Reading!",
            format!("You earned {} {}!", reward, CURRENCY_NAME),
        ))
    }
}
