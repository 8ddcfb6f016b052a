//! Per-module behavior plugged into the session controller.

use async_trait::async_trait;
use maximus_common::OracleError;
use maximus_shared::{ModuleKind, Notice, NoticeLevel, Outcome, StreakCounters};
use std::fmt;

use super::SessionError;

/// A freshly produced challenge
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<C> {
    pub challenge: C,
    pub difficulty: u32,
    /// Why the difficulty changed, as explained by the oracle
    pub rationale: Option<String>,
    /// Shown to the player once the challenge is active
    pub notice: Option<Notice>,
}

impl<C> Loaded<C> {
    pub fn new(challenge: C, difficulty: u32) -> Self {
        Self {
            challenge,
            difficulty,
            rationale: None,
            notice: None,
        }
    }

    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = Some(rationale.into());
        self
    }

    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.notice = Some(notice);
        self
    }
}

/// Why a new challenge is being loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadReason {
    /// First challenge of the session, or a retry after `Unavailable`
    Start,
    /// The previous challenge was played and rewarded
    Completed,
    /// The player skipped the previous challenge; there is no new result
    Skipped,
}

/// What a strategy knows when asked for the next challenge
pub struct LoadContext<'a, C> {
    pub reason: LoadReason,
    /// Difficulty of the challenge being replaced (1 on first load)
    pub difficulty: u32,
    pub streaks: StreakCounters,
    /// Challenge being replaced, `None` on first load
    pub previous: Option<&'a C>,
}

impl<C> Clone for LoadContext<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for LoadContext<'_, C> {}

impl<C> LoadContext<'_, C> {
    pub fn is_first(&self) -> bool {
        self.previous.is_none()
    }

    /// Whether the oracle may be fed the last round's results
    pub fn has_result(&self) -> bool {
        self.reason == LoadReason::Completed && self.previous.is_some()
    }
}

/// Result of judging one submission or action
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub reward: u64,
    pub outcome: Outcome,
    pub title: String,
    /// Empty for actions that should not notify
    pub message: String,
    /// Additional notices (milestones, warnings)
    pub notices: Vec<Notice>,
}

impl Evaluation {
    pub fn new(
        reward: u64,
        outcome: Outcome,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            reward,
            outcome,
            title: title.into(),
            message: message.into(),
            notices: Vec::new(),
        }
    }

    /// No reward, no notice
    pub fn quiet() -> Self {
        Self::new(0, Outcome::Neutral, "", "")
    }

    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.notices.push(notice);
        self
    }

    /// Main notice for this evaluation, if it has a message
    pub fn notice(&self) -> Option<Notice> {
        if self.message.is_empty() {
            return None;
        }
        let level = match self.outcome {
            Outcome::Correct | Outcome::Scored => NoticeLevel::Success,
            Outcome::Incorrect | Outcome::Neutral => NoticeLevel::Info,
        };
        Some(Notice::new(level, self.title.clone(), self.message.clone()))
    }
}

/// One learning module: how to load, judge and reward its challenges.
///
/// Submission-driven modules (math, reading, typing, kindness) implement
/// `evaluate`; action-driven modules (drawing, coding) implement
/// `apply_action` and use `Infallible` as their input type.
#[async_trait]
pub trait ModuleStrategy: Send {
    type Challenge: Clone + fmt::Debug + Send + Sync;
    type Input: Send;
    type Action: Send;

    fn kind(&self) -> ModuleKind;

    /// Produce the next challenge. Errors are recovered by `fallback`.
    async fn load(
        &mut self,
        ctx: LoadContext<'_, Self::Challenge>,
    ) -> Result<Loaded<Self::Challenge>, OracleError>;

    /// Local replacement when `load` fails. `None` makes the session unavailable.
    fn fallback(&mut self, _ctx: LoadContext<'_, Self::Challenge>) -> Option<Loaded<Self::Challenge>> {
        None
    }

    /// Shown when neither `load` nor `fallback` produced a challenge
    fn unavailable_notice(&self) -> Notice {
        Notice::error(
            "Oops!",
            format!("Couldn't load {}. Please try again later.", self.kind().title()),
        )
    }

    /// Called each time a challenge becomes active
    fn activated(&mut self, _challenge: &Self::Challenge) {}

    /// Notices raised outside of `evaluate`/`apply_action` (timer ticks)
    fn take_notices(&mut self) -> Vec<Notice> {
        Vec::new()
    }

    /// Inputs that are ignored without a state change
    fn is_empty(&self, input: &Self::Input) -> bool;

    fn evaluate(
        &mut self,
        challenge: &Self::Challenge,
        difficulty: u32,
        input: Self::Input,
    ) -> Result<Evaluation, SessionError>;

    fn apply_action(
        &mut self,
        _challenge: &mut Self::Challenge,
        _action: Self::Action,
    ) -> Result<Evaluation, SessionError> {
        Err(SessionError::InvalidAction(format!(
            "{} has no actions",
            self.kind().title()
        )))
    }

    /// Load the next challenge right after a round is rewarded.
    /// When false the challenge stays up until `next()`.
    fn advances_after_round(&self) -> bool {
        true
    }
}
