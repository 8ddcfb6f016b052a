//! Difficulty oracle flows against a scripted LLM.

use maximus_common::{
    Choice, DifficultyOracle, FakeLlmClient, LlmError, MathDifficultyRequest, OracleError,
    ReadingDifficultyRequest, TypingDifficultyRequest,
};
use serde_json::json;
use std::sync::Arc;

fn oracle_with(client: FakeLlmClient) -> (DifficultyOracle, Arc<FakeLlmClient>) {
    let client = Arc::new(client);
    (DifficultyOracle::new(client.clone()), client)
}

fn math_request() -> MathDifficultyRequest {
    MathDifficultyRequest {
        current_difficulty: 2,
        correct_answers: 3,
        incorrect_answers: 0,
    }
}

#[tokio::test]
async fn test_math_adjustment() {
    let (oracle, client) = oracle_with(FakeLlmClient::always_valid(json!({
        "newDifficulty": 3,
        "reasoning": "Three in a row!"
    })));

    let adjustment = oracle.adjust_math(&math_request()).await.unwrap();
    assert_eq!(adjustment.new_difficulty, 3);
    assert_eq!(adjustment.rationale, "Three in a row!");

    let sent: serde_json::Value = serde_json::from_str(&client.user_prompts()[0]).unwrap();
    assert_eq!(sent, json!({"currentDifficulty": 2, "correctAnswers": 3, "incorrectAnswers": 0}));
}

#[tokio::test]
async fn test_math_difficulty_is_rounded_and_clamped() {
    let (oracle, _) = oracle_with(FakeLlmClient::new(vec![
        Ok(json!({"newDifficulty": 2.6, "reasoning": "r"})),
        Ok(json!({"newDifficulty": 57, "reasoning": "r"})),
    ]));

    assert_eq!(oracle.adjust_math(&math_request()).await.unwrap().new_difficulty, 3);
    assert_eq!(oracle.adjust_math(&math_request()).await.unwrap().new_difficulty, 10);
}

#[tokio::test]
async fn test_wrong_field_name_is_schema_error() {
    let (oracle, _) = oracle_with(FakeLlmClient::always_valid(json!({
        "difficulty": 3,
        "reasoning": "r"
    })));

    let err = oracle.adjust_math(&math_request()).await.unwrap_err();
    assert!(matches!(err, OracleError::Schema(_)));
}

#[tokio::test]
async fn test_unknown_field_is_schema_error() {
    let (oracle, _) = oracle_with(FakeLlmClient::always_valid(json!({
        "newDifficulty": 3,
        "reasoning": "r",
        "mood": "happy"
    })));

    assert!(matches!(
        oracle.adjust_math(&math_request()).await,
        Err(OracleError::Schema(_))
    ));
}

#[tokio::test]
async fn test_string_difficulty_is_schema_error() {
    let (oracle, _) = oracle_with(FakeLlmClient::always_valid(json!({
        "newDifficulty": "three",
        "reasoning": "r"
    })));

    assert!(matches!(
        oracle.adjust_math(&math_request()).await,
        Err(OracleError::Schema(_))
    ));
}

#[tokio::test]
async fn test_llm_failure_passes_through() {
    let (oracle, _) = oracle_with(FakeLlmClient::always_error(LlmError::Timeout(30)));

    assert_eq!(
        oracle.adjust_math(&math_request()).await.unwrap_err(),
        OracleError::Llm(LlmError::Timeout(30))
    );
}

#[tokio::test]
async fn test_reading_level_clamped() {
    let (oracle, client) = oracle_with(FakeLlmClient::new(vec![
        Ok(json!({"newLevel": 0, "reason": "slow down"})),
        Ok(json!({"newLevel": 14, "reason": "speed up"})),
    ]));
    let request = ReadingDifficultyRequest {
        level: 1,
        score: 40.0,
        correct_answers: 2,
        total_questions: 5,
    };

    let low = oracle.adjust_reading(&request).await.unwrap();
    assert_eq!(low.new_difficulty, 1);
    assert_eq!(low.rationale, "slow down");
    assert_eq!(oracle.adjust_reading(&request).await.unwrap().new_difficulty, 10);

    let sent: serde_json::Value = serde_json::from_str(&client.user_prompts()[0]).unwrap();
    assert_eq!(sent["totalQuestions"], 5);
    assert_eq!(sent["correctAnswers"], 2);
}

#[tokio::test]
async fn test_typing_challenge() {
    let (oracle, _) = oracle_with(FakeLlmClient::always_valid(json!({
        "newText": "  Cats nap in the sun.  ",
        "newDifficultyLevel": 2,
        "feedback": "Nice typing!"
    })));
    let request = TypingDifficultyRequest {
        previous_text: String::new(),
        user_typing_result: String::new(),
        current_difficulty_level: 1,
    };

    let challenge = oracle.adjust_typing(&request).await.unwrap();
    assert_eq!(challenge.text, "Cats nap in the sun.");
    assert_eq!(challenge.difficulty, 2);
    assert_eq!(challenge.feedback, "Nice typing!");
}

#[tokio::test]
async fn test_typing_empty_text_rejected() {
    let (oracle, _) = oracle_with(FakeLlmClient::always_valid(json!({
        "newText": "   ",
        "newDifficultyLevel": 2,
        "feedback": "f"
    })));
    let request = TypingDifficultyRequest {
        previous_text: "a".into(),
        user_typing_result: "a".into(),
        current_difficulty_level: 1,
    };

    assert!(matches!(
        oracle.adjust_typing(&request).await,
        Err(OracleError::Schema(_))
    ));
}

#[tokio::test]
async fn test_kindness_scenario() {
    let (oracle, client) = oracle_with(FakeLlmClient::always_valid(json!({
        "scenarioText": "Sam dropped his crayons.",
        "choiceA": "Help pick them up",
        "choiceB": "Walk away",
        "correctChoice": "A",
        "explanation": "Helping shows you care."
    })));

    let scenario = oracle.kindness_scenario().await.unwrap();
    assert_eq!(scenario.correct_choice, Choice::A);
    assert_eq!(scenario.choice_text(Choice::B), "Walk away");
    assert_eq!(client.user_prompts()[0], "{}");
}

#[tokio::test]
async fn test_kindness_bad_choice_rejected() {
    let (oracle, _) = oracle_with(FakeLlmClient::always_valid(json!({
        "scenarioText": "s",
        "choiceA": "a",
        "choiceB": "b",
        "correctChoice": "C",
        "explanation": "e"
    })));

    assert!(matches!(
        oracle.kindness_scenario().await,
        Err(OracleError::Schema(_))
    ));
}
