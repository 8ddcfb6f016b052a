//! Generic session controller.

use chrono::{DateTime, Utc};
use maximus_shared::{CurrencyLedger, LedgerUpdate, Notice, StreakCounters};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::strategy::{Evaluation, LoadContext, LoadReason, Loaded, ModuleStrategy};
use super::{SessionError, SessionState};

/// Outcome of one submission or action
#[derive(Debug, Clone, PartialEq)]
pub struct RoundReport {
    pub evaluation: Evaluation,
    pub ledger: LedgerUpdate,
    /// Difficulty after any reload
    pub difficulty: u32,
    /// Session state once the call returned
    pub state: SessionState,
    pub completed_at: DateTime<Utc>,
}

/// Drives one mounted module.
///
/// Owned by a single task; every mutation takes `&mut self`, so oracle
/// responses are applied in request order and input is refused while one is
/// outstanding.
pub struct SessionController<S: ModuleStrategy> {
    strategy: S,
    ledger: Arc<CurrencyLedger>,
    state: SessionState,
    challenge: Option<S::Challenge>,
    difficulty: u32,
    rationale: Option<String>,
    streaks: StreakCounters,
    rounds_completed: u64,
    notices: Vec<Notice>,
}

impl<S: ModuleStrategy> SessionController<S> {
    pub fn new(strategy: S, ledger: Arc<CurrencyLedger>) -> Self {
        Self {
            strategy,
            ledger,
            state: SessionState::Loading,
            challenge: None,
            difficulty: 1,
            rationale: None,
            streaks: StreakCounters::new(),
            rounds_completed: 0,
            notices: Vec::new(),
        }
    }

    /// Load the first challenge
    pub async fn start(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Loading || self.challenge.is_some() {
            return Err(SessionError::NotAccepting(self.state));
        }
        info!(module = %self.strategy.kind(), "session starting");
        self.load_next(LoadReason::Start).await;
        self.available()
    }

    /// Leave `Unavailable` by loading again
    pub async fn retry(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Unavailable {
            return Err(SessionError::NotAccepting(self.state));
        }
        info!(module = %self.strategy.kind(), "retrying load");
        self.load_next(LoadReason::Start).await;
        self.available()
    }

    /// Replace the current challenge without answering it.
    ///
    /// Streaks and scores are left untouched and strategies do not report
    /// a result for the skipped challenge.
    pub async fn next(&mut self) -> Result<(), SessionError> {
        self.ensure_active()?;
        debug!(module = %self.strategy.kind(), "challenge skipped");
        self.load_next(LoadReason::Skipped).await;
        self.available()
    }

    /// Submit an answer for the current challenge
    pub async fn submit(&mut self, input: S::Input) -> Result<RoundReport, SessionError> {
        self.ensure_active()?;
        if self.strategy.is_empty(&input) {
            return Err(SessionError::EmptyInput);
        }
        let challenge = self
            .challenge
            .as_ref()
            .ok_or(SessionError::NotAccepting(self.state))?;

        self.state = SessionState::Evaluating;
        let evaluation = match self.strategy.evaluate(challenge, self.difficulty, input) {
            Ok(evaluation) => evaluation,
            Err(e) => {
                self.state = SessionState::Active;
                return Err(e);
            }
        };

        self.state = SessionState::Rewarding;
        let update = match self.reward(&evaluation) {
            Ok(update) => update,
            Err(e) => {
                self.state = SessionState::Active;
                return Err(e);
            }
        };
        self.streaks.record(evaluation.outcome);
        self.rounds_completed += 1;
        debug!(
            module = %self.strategy.kind(),
            outcome = ?evaluation.outcome,
            correct_streak = self.streaks.consecutive_correct,
            incorrect_streak = self.streaks.consecutive_incorrect,
            "round evaluated"
        );

        if self.strategy.advances_after_round() {
            self.load_next(LoadReason::Completed).await;
        } else {
            self.state = SessionState::Active;
        }

        Ok(self.report(evaluation, update))
    }

    /// Apply an in-place action (drawing, coding)
    pub fn act(&mut self, action: S::Action) -> Result<RoundReport, SessionError> {
        self.ensure_active()?;
        let challenge = self
            .challenge
            .as_mut()
            .ok_or(SessionError::NotAccepting(self.state))?;

        let evaluation = self.strategy.apply_action(challenge, action)?;
        let update = self.reward(&evaluation)?;
        Ok(self.report(evaluation, update))
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn challenge(&self) -> Option<&S::Challenge> {
        self.challenge.as_ref()
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Oracle explanation for the current difficulty
    pub fn rationale(&self) -> Option<&str> {
        self.rationale.as_deref()
    }

    pub fn streaks(&self) -> StreakCounters {
        self.streaks
    }

    pub fn rounds_completed(&self) -> u64 {
        self.rounds_completed
    }

    pub fn ledger(&self) -> &Arc<CurrencyLedger> {
        &self.ledger
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Take the notices queued since the last call
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        let mut notices = std::mem::take(&mut self.notices);
        notices.extend(self.strategy.take_notices());
        notices
    }

    fn ensure_active(&self) -> Result<(), SessionError> {
        if self.state == SessionState::Active {
            Ok(())
        } else {
            Err(SessionError::NotAccepting(self.state))
        }
    }

    fn available(&self) -> Result<(), SessionError> {
        if self.state == SessionState::Unavailable {
            Err(SessionError::Unavailable(self.strategy.kind().title().to_string()))
        } else {
            Ok(())
        }
    }

    async fn load_next(&mut self, reason: LoadReason) {
        self.state = SessionState::Loading;
        let kind = self.strategy.kind();

        let ctx = LoadContext {
            reason,
            difficulty: self.difficulty,
            streaks: self.streaks,
            previous: self.challenge.as_ref(),
        };
        let result = self.strategy.load(ctx).await;
        let loaded = match result {
            Ok(loaded) => Some(loaded),
            Err(e) => {
                warn!(module = %kind, error = %e, "load failed, using fallback");
                let ctx = LoadContext {
                    reason,
                    difficulty: self.difficulty,
                    streaks: self.streaks,
                    previous: self.challenge.as_ref(),
                };
                self.strategy.fallback(ctx)
            }
        };

        match loaded {
            Some(loaded) => self.install(loaded),
            None => {
                error!(module = %kind, "no challenge available");
                self.challenge = None;
                self.state = SessionState::Unavailable;
                self.notices.push(self.strategy.unavailable_notice());
            }
        }
    }

    fn install(&mut self, loaded: Loaded<S::Challenge>) {
        if loaded.difficulty != self.difficulty {
            info!(
                module = %self.strategy.kind(),
                from = self.difficulty,
                to = loaded.difficulty,
                "difficulty changed"
            );
        }
        self.difficulty = loaded.difficulty;
        self.rationale = loaded.rationale;
        if let Some(notice) = loaded.notice {
            self.notices.push(notice);
        }

        let challenge = self.challenge.insert(loaded.challenge);
        self.strategy.activated(challenge);
        self.state = SessionState::Active;
        debug!(module = %self.strategy.kind(), difficulty = self.difficulty, "challenge active");
    }

    fn reward(&mut self, evaluation: &Evaluation) -> Result<LedgerUpdate, SessionError> {
        let update = self.ledger.add(evaluation.reward)?;
        if update.credited() > 0 {
            info!(
                module = %self.strategy.kind(),
                amount = update.credited(),
                total = update.after.total,
                "currency credited"
            );
        }

        if let Some(notice) = evaluation.notice() {
            self.notices.push(notice);
        }
        self.notices.extend(evaluation.notices.iter().cloned());
        if update.tier_changed() {
            self.notices.push(Notice::tier_up(update.after.tier));
        }
        Ok(update)
    }

    fn report(&self, evaluation: Evaluation, ledger: LedgerUpdate) -> RoundReport {
        RoundReport {
            evaluation,
            ledger,
            difficulty: self.difficulty,
            state: self.state,
            completed_at: Utc::now(),
        }
    }
}
