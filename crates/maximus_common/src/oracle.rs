//! Difficulty oracle: typed LLM flows that tune each module.
//!
//! Every flow sends a small JSON record and validates the answer against a
//! fixed schema. Field names must match exactly; missing, mistyped or extra
//! fields make the call fail with [`OracleError::Schema`]. Callers treat
//! every failure as recoverable.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, warn};

use crate::llm_client::{LlmClient, LlmError};

pub const MATH_DIFFICULTY: RangeInclusive<u32> = 1..=10;
pub const READING_DIFFICULTY: RangeInclusive<u32> = 1..=10;
pub const TYPING_DIFFICULTY: RangeInclusive<u32> = 1..=10;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OracleError {
    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Response does not match schema: {0}")]
    Schema(String),
}

// ============================================================================
// Wire records
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MathDifficultyRequest {
    pub current_difficulty: u32,
    pub correct_answers: u32,
    pub incorrect_answers: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct MathDifficultyResponse {
    new_difficulty: f64,
    reasoning: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingDifficultyRequest {
    pub level: u32,
    pub score: f64,
    pub correct_answers: u32,
    pub total_questions: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ReadingDifficultyResponse {
    new_level: f64,
    reason: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingDifficultyRequest {
    pub previous_text: String,
    pub user_typing_result: String,
    pub current_difficulty_level: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct TypingDifficultyResponse {
    new_text: String,
    new_difficulty_level: f64,
    feedback: String,
}

/// Kindness scenarios take no parameters
#[derive(Debug, Clone, Default, Serialize)]
pub struct KindnessScenarioRequest {}

/// One of the two scenario answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Choice {
    A,
    B,
}

/// A generated kindness scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct KindnessScenario {
    pub scenario_text: String,
    pub choice_a: String,
    pub choice_b: String,
    pub correct_choice: Choice,
    pub explanation: String,
}

impl KindnessScenario {
    pub fn choice_text(&self, choice: Choice) -> &str {
        match choice {
            Choice::A => &self.choice_a,
            Choice::B => &self.choice_b,
        }
    }
}

// ============================================================================
// Flow results
// ============================================================================

/// New difficulty with the oracle's explanation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DifficultyAdjustment {
    pub new_difficulty: u32,
    pub rationale: String,
}

/// Next typing challenge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingChallenge {
    pub text: String,
    pub difficulty: u32,
    pub feedback: String,
}

// ============================================================================
// Prompts
// ============================================================================

const MATH_PROMPT: &str = "You are an AI math tutor who adjusts the difficulty of math problems \
for a student. You receive the current difficulty level, the number of problems answered \
correctly in a row and the number answered incorrectly in a row. If the student answered \
several problems correctly in a row, increase the difficulty. If several were wrong in a row, \
decrease it. With a mix of results, keep the difficulty the same. Explain your reasoning.";

const MATH_SCHEMA: &str = r#"{"newDifficulty": number, "reasoning": string}"#;

const READING_PROMPT: &str = "You are an AI reading tutor that adjusts the reading difficulty for \
Maximus. You receive the current level, the score, the number of correct answers and the total \
number of questions for the previous passage. If the score is above 80%, increase the level by 1. \
If the score is below 50%, decrease the level by 1. The newLevel must be between 1 and 10 \
inclusive. Return a newLevel and a short reason for the adjustment.";

const READING_SCHEMA: &str = r#"{"newLevel": number, "reason": string}"#;

const TYPING_PROMPT: &str = "You are an AI typing tutor helping Maximus improve his typing. You \
receive the text he previously typed, his result and the current difficulty level. Generate a \
new text to type, adjust the difficulty level and give short feedback. Difficulty levels range \
from 1 to 10. When he is doing well, use longer and harder words and a longer text; when he is \
struggling, use shorter and simpler words and a shorter text.";

const TYPING_SCHEMA: &str =
    r#"{"newText": string, "newDifficultyLevel": number, "feedback": string}"#;

const KINDNESS_PROMPT: &str = "You create simple social scenarios for children aged 6-9 that teach \
kindness in a fun, game-like context. Describe a short (2-3 sentence) everyday situation about \
sharing, helping, including others, honesty or empathy, give two clearly distinct choices where \
one is noticeably kinder, say which one is kinder ('A' or 'B'), and explain why in 1-2 simple \
sentences.";

const KINDNESS_SCHEMA: &str = r#"{"scenarioText": string, "choiceA": string, "choiceB": string, "correctChoice": "A" | "B", "explanation": string}"#;

// ============================================================================
// Oracle
// ============================================================================

/// Typed front end over an [`LlmClient`]
#[derive(Clone)]
pub struct DifficultyOracle {
    client: Arc<dyn LlmClient>,
}

impl DifficultyOracle {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }

    pub async fn adjust_math(
        &self,
        request: &MathDifficultyRequest,
    ) -> Result<DifficultyAdjustment, OracleError> {
        let response: MathDifficultyResponse = self
            .call("math", MATH_PROMPT, request, MATH_SCHEMA)
            .await?;
        Ok(DifficultyAdjustment {
            new_difficulty: clamp_difficulty(response.new_difficulty, &MATH_DIFFICULTY)?,
            rationale: response.reasoning,
        })
    }

    pub async fn adjust_reading(
        &self,
        request: &ReadingDifficultyRequest,
    ) -> Result<DifficultyAdjustment, OracleError> {
        let response: ReadingDifficultyResponse = self
            .call("reading", READING_PROMPT, request, READING_SCHEMA)
            .await?;
        Ok(DifficultyAdjustment {
            new_difficulty: clamp_difficulty(response.new_level, &READING_DIFFICULTY)?,
            rationale: response.reason,
        })
    }

    pub async fn adjust_typing(
        &self,
        request: &TypingDifficultyRequest,
    ) -> Result<TypingChallenge, OracleError> {
        let response: TypingDifficultyResponse = self
            .call("typing", TYPING_PROMPT, request, TYPING_SCHEMA)
            .await?;
        let text = response.new_text.trim().to_string();
        if text.is_empty() {
            return Err(OracleError::Schema("newText is empty".to_string()));
        }
        Ok(TypingChallenge {
            text,
            difficulty: clamp_difficulty(response.new_difficulty_level, &TYPING_DIFFICULTY)?,
            feedback: response.feedback,
        })
    }

    pub async fn kindness_scenario(&self) -> Result<KindnessScenario, OracleError> {
        let scenario: KindnessScenario = self
            .call(
                "kindness",
                KINDNESS_PROMPT,
                &KindnessScenarioRequest::default(),
                KINDNESS_SCHEMA,
            )
            .await?;
        if scenario.scenario_text.trim().is_empty()
            || scenario.choice_a.trim().is_empty()
            || scenario.choice_b.trim().is_empty()
        {
            return Err(OracleError::Schema("scenario is missing text".to_string()));
        }
        Ok(scenario)
    }

    async fn call<Req, Resp>(
        &self,
        flow: &'static str,
        system_prompt: &str,
        request: &Req,
        schema: &str,
    ) -> Result<Resp, OracleError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let user_prompt = serde_json::to_string_pretty(request)
            .map_err(|e| OracleError::Schema(format!("cannot encode request: {}", e)))?;

        let started = Instant::now();
        let value = self
            .client
            .call_json(system_prompt, &user_prompt, schema)
            .await
            .map_err(|e| {
                warn!(flow, error = %e, "oracle call failed");
                e
            })?;

        let response = serde_json::from_value(value).map_err(|e| {
            warn!(flow, error = %e, "oracle response rejected");
            OracleError::Schema(e.to_string())
        })?;

        debug!(flow, elapsed_ms = started.elapsed().as_millis() as u64, "oracle responded");
        Ok(response)
    }
}

/// Round a proposed difficulty and clamp it into a module's range
pub fn clamp_difficulty(value: f64, bounds: &RangeInclusive<u32>) -> Result<u32, OracleError> {
    if !value.is_finite() {
        return Err(OracleError::Schema(format!("difficulty {} is not finite", value)));
    }
    let rounded = value.round().clamp(*bounds.start() as f64, *bounds.end() as f64);
    Ok(rounded as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_difficulty() {
        assert_eq!(clamp_difficulty(3.4, &MATH_DIFFICULTY).unwrap(), 3);
        assert_eq!(clamp_difficulty(0.0, &MATH_DIFFICULTY).unwrap(), 1);
        assert_eq!(clamp_difficulty(-4.0, &READING_DIFFICULTY).unwrap(), 1);
        assert_eq!(clamp_difficulty(42.0, &READING_DIFFICULTY).unwrap(), 10);
        assert!(clamp_difficulty(f64::NAN, &TYPING_DIFFICULTY).is_err());
    }

    #[test]
    fn test_request_field_names() {
        let request = MathDifficultyRequest {
            current_difficulty: 2,
            correct_answers: 3,
            incorrect_answers: 0,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["currentDifficulty"], 2);
        assert_eq!(json["correctAnswers"], 3);
        assert_eq!(json["incorrectAnswers"], 0);
    }

    #[test]
    fn test_kindness_choice_must_be_a_or_b() {
        let bad = serde_json::json!({
            "scenarioText": "s", "choiceA": "a", "choiceB": "b",
            "correctChoice": "C", "explanation": "e"
        });
        assert!(serde_json::from_value::<KindnessScenario>(bad).is_err());
    }
}
