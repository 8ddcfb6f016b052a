//! Maximus common: LLM client, difficulty oracle, configuration and logging.

pub mod config;
pub mod llm_client;
pub mod logging;
pub mod oracle;

pub use config::{DrawingConfig, LedgerConfig, MaximusConfig, ReadingConfig};
pub use llm_client::{FakeLlmClient, HttpLlmClient, LlmClient, LlmConfig, LlmError};
pub use oracle::{
    clamp_difficulty, Choice, DifficultyAdjustment, DifficultyOracle, KindnessScenario,
    MathDifficultyRequest, OracleError, ReadingDifficultyRequest, TypingChallenge,
    TypingDifficultyRequest,
};
