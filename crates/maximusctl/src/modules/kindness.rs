//! Kindness arena: generated social scenarios with two choices.

use async_trait::async_trait;
use maximus_common::{Choice, DifficultyOracle, KindnessScenario, OracleError};
use maximus_shared::rewards::kindness_reward;
use maximus_shared::{ModuleKind, Notice, Outcome, CURRENCY_NAME};
use std::convert::Infallible;

use crate::session::{Evaluation, LoadContext, Loaded, ModuleStrategy, SessionError};

/// Scenarios have no difficulty; sessions report this fixed level
const SCENARIO_LEVEL: u32 = 1;

pub struct KindnessStrategy {
    oracle: DifficultyOracle,
    answered: Option<Choice>,
}

impl KindnessStrategy {
    pub fn new(oracle: DifficultyOracle) -> Self {
        Self {
            oracle,
            answered: None,
        }
    }

    /// Choice made for the current scenario
    pub fn answered(&self) -> Option<Choice> {
        self.answered
    }
}

#[async_trait]
impl ModuleStrategy for KindnessStrategy {
    type Challenge = KindnessScenario;
    type Input = Choice;
    type Action = Infallible;

    fn kind(&self) -> ModuleKind {
        ModuleKind::Kindness
    }

    async fn load(
        &mut self,
        _ctx: LoadContext<'_, KindnessScenario>,
    ) -> Result<Loaded<KindnessScenario>, OracleError> {
        let scenario = self.oracle.kindness_scenario().await?;
        Ok(Loaded::new(scenario, SCENARIO_LEVEL))
    }

    fn unavailable_notice(&self) -> Notice {
        Notice::error(
            "Oops! Scenario Error",
            "Couldn't load a new scenario. Please try again later.",
        )
    }

    fn activated(&mut self, _scenario: &KindnessScenario) {
        self.answered = None;
    }

    fn is_empty(&self, _input: &Choice) -> bool {
        false
    }

    fn evaluate(
        &mut self,
        scenario: &KindnessScenario,
        _difficulty: u32,
        choice: Choice,
    ) -> Result<Evaluation, SessionError> {
        if self.answered.is_some() {
            return Err(SessionError::AlreadyAnswered);
        }
        self.answered = Some(choice);

        let kind = choice == scenario.correct_choice;
        let reward = kindness_reward(kind);
        let evaluation = if kind {
            Evaluation::new(
                reward,
                Outcome::Correct,
                "Kindness Champion!",
                format!(
                    "Great choice! That was very kind. {} +{} {}!",
                    scenario.explanation, reward, CURRENCY_NAME
                ),
            )
        } else {
            Evaluation::new(
                reward,
                Outcome::Incorrect,
                "Good Try!",
                format!(
                    "That's one way to think about it. Here's another idea: {} +{} {}!",
                    scenario.explanation, reward, CURRENCY_NAME
                ),
            )
        };
        Ok(evaluation)
    }

    fn advances_after_round(&self) -> bool {
        false
    }
}
