//! Typing drill: oracle-written texts, scored on speed and accuracy.

use async_trait::async_trait;
use maximus_common::oracle::TYPING_DIFFICULTY;
use maximus_common::{DifficultyOracle, OracleError, TypingDifficultyRequest};
use maximus_shared::rewards::typing_reward;
use maximus_shared::{ModuleKind, Notice, Outcome, TypingMetrics, CURRENCY_NAME};
use std::convert::Infallible;
use tokio::time::Instant;

use crate::session::{Evaluation, LoadContext, Loaded, ModuleStrategy, SessionError};

/// Text offered when no generated challenge is available
pub const INITIAL_TEXT: &str = "The quick brown fox jumps over the lazy dog.";

/// Text to copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingChallengeText {
    pub text: String,
}

pub struct TypingStrategy {
    oracle: DifficultyOracle,
    started: Option<Instant>,
    last_typed: String,
    last_metrics: TypingMetrics,
}

impl TypingStrategy {
    pub fn new(oracle: DifficultyOracle) -> Self {
        Self {
            oracle,
            started: None,
            last_typed: String::new(),
            last_metrics: TypingMetrics::default(),
        }
    }

    /// Speed and accuracy of the last submitted round
    pub fn last_metrics(&self) -> TypingMetrics {
        self.last_metrics
    }
}

#[async_trait]
impl ModuleStrategy for TypingStrategy {
    type Challenge = TypingChallengeText;
    type Input = String;
    type Action = Infallible;

    fn kind(&self) -> ModuleKind {
        ModuleKind::Typing
    }

    async fn load(
        &mut self,
        ctx: LoadContext<'_, TypingChallengeText>,
    ) -> Result<Loaded<TypingChallengeText>, OracleError> {
        let request = match ctx.previous {
            Some(previous) if ctx.has_result() => TypingDifficultyRequest {
                previous_text: previous.text.clone(),
                user_typing_result: self.last_typed.clone(),
                current_difficulty_level: ctx.difficulty,
            },
            // Skipped: ask for a fresh text at the same level, with no result
            Some(_) => TypingDifficultyRequest {
                previous_text: String::new(),
                user_typing_result: String::new(),
                current_difficulty_level: ctx.difficulty,
            },
            None => TypingDifficultyRequest {
                previous_text: String::new(),
                user_typing_result: String::new(),
                current_difficulty_level: *TYPING_DIFFICULTY.start(),
            },
        };
        let challenge = self.oracle.adjust_typing(&request).await?;

        let notice_body = if challenge.feedback.trim().is_empty() {
            format!("Get ready! Difficulty: {}", challenge.difficulty)
        } else {
            challenge.feedback.clone()
        };
        Ok(Loaded::new(
            TypingChallengeText {
                text: challenge.text,
            },
            challenge.difficulty,
        )
        .with_rationale(challenge.feedback)
        .with_notice(Notice::info("New Challenge!", notice_body)))
    }

    fn fallback(
        &mut self,
        ctx: LoadContext<'_, TypingChallengeText>,
    ) -> Option<Loaded<TypingChallengeText>> {
        let loaded = match ctx.previous {
            Some(previous) => Loaded::new(previous.clone(), ctx.difficulty),
            None => Loaded::new(
                TypingChallengeText {
                    text: INITIAL_TEXT.to_string(),
                },
                *TYPING_DIFFICULTY.start(),
            ),
        };
        Some(loaded.with_notice(Notice::warning(
            "Oh no!",
            "Couldn't get a new challenge. Let's try this one again!",
        )))
    }

    fn activated(&mut self, _challenge: &TypingChallengeText) {
        self.started = Some(Instant::now());
    }

    fn is_empty(&self, input: &String) -> bool {
        input.trim().is_empty()
    }

    fn evaluate(
        &mut self,
        challenge: &TypingChallengeText,
        difficulty: u32,
        input: String,
    ) -> Result<Evaluation, SessionError> {
        let elapsed = self
            .started
            .take()
            .map(|started| started.elapsed())
            .unwrap_or_default();
        let metrics = TypingMetrics::measure(&challenge.text, &input, elapsed);
        let reward = typing_reward(metrics.words_per_minute, metrics.accuracy_percent, difficulty);

        self.last_metrics = metrics;
        self.last_typed = input;

        Ok(Evaluation::new(
            reward,
            Outcome::Scored,
            "Round Done!",
            format!(
                "SPEED: {} WPM, SMARTS: {}% accuracy! +{} {}!",
                metrics.words_per_minute, metrics.accuracy_percent, reward, CURRENCY_NAME
            ),
        ))
    }
}
