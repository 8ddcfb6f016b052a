//! LLM client abstraction.
//!
//! Calls an LLM backend and expects a strict JSON object back. Supports an
//! HTTP implementation (Ollama, OpenAI-compatible) and a fake client for tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

/// LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "http://localhost:11434".to_string(),
            model: "llama3.2:3b".to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

/// LLM errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LlmError {
    #[error("LLM is disabled in configuration")]
    Disabled,

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("Invalid JSON response: {0}")]
    InvalidJson(String),

    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    #[error("LLM returned empty response")]
    EmptyResponse,
}

/// Generic LLM client
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Call the LLM with a prompt and expect a JSON object back
    async fn call_json(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        schema_description: &str,
    ) -> Result<serde_json::Value, LlmError>;
}

/// HTTP client for Ollama and OpenAI-compatible endpoints
pub struct HttpLlmClient {
    config: LlmConfig,
    client: reqwest::Client,
}

impl HttpLlmClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::HttpError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Check if endpoint is Ollama-style
    fn is_ollama_endpoint(&self) -> bool {
        self.config.endpoint.contains("11434") || self.config.endpoint.contains("ollama")
    }

    fn map_send_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout(self.config.timeout_secs)
        } else {
            LlmError::HttpError(format!("Request failed: {}", e))
        }
    }

    async fn call_ollama(&self, prompt: &str) -> Result<serde_json::Value, LlmError> {
        let url = format!("{}/api/generate", self.config.endpoint);

        let request_body = serde_json::json!({
            "model": self.config.model,
            "prompt": prompt,
            "stream": false,
            "format": "json",
        });

        let response = self
            .client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            return Err(LlmError::HttpError(format!(
                "HTTP {} from Ollama",
                response.status()
            )));
        }

        let response_json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidJson(format!("Failed to parse response: {}", e)))?;

        let text = response_json
            .get("response")
            .and_then(|v| v.as_str())
            .ok_or(LlmError::EmptyResponse)?;

        parse_content(text)
    }

    async fn call_openai_compatible(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<serde_json::Value, LlmError> {
        let url = format!("{}/v1/chat/completions", self.config.endpoint);

        let request_body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_prompt},
            ],
            "response_format": {"type": "json_object"},
        });

        let mut request = self.client.post(&url).json(&request_body);
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await.map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            return Err(LlmError::HttpError(format!(
                "HTTP {} from OpenAI-compatible API",
                response.status()
            )));
        }

        let response_json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidJson(format!("Failed to parse response: {}", e)))?;

        let text = response_json
            .get("choices")
            .and_then(|v| v.get(0))
            .and_then(|v| v.get("message"))
            .and_then(|v| v.get("content"))
            .and_then(|v| v.as_str())
            .ok_or(LlmError::EmptyResponse)?;

        parse_content(text)
    }
}

#[async_trait]
impl LlmClient for HttpLlmClient {
    async fn call_json(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        schema_description: &str,
    ) -> Result<serde_json::Value, LlmError> {
        if !self.config.enabled {
            return Err(LlmError::Disabled);
        }

        let full_prompt = format!(
            "{}\n\nInput:\n{}\n\nYou must respond with valid JSON matching this schema:\n{}",
            system_prompt, user_prompt, schema_description
        );

        if self.is_ollama_endpoint() {
            match self.call_ollama(&full_prompt).await {
                Ok(json) => return Ok(json),
                Err(e) => {
                    debug!("Ollama API failed, trying OpenAI-compatible: {}", e);
                }
            }
        }

        self.call_openai_compatible(system_prompt, &full_prompt).await
    }
}

/// Parse the model's text output as a JSON object
fn parse_content(text: &str) -> Result<serde_json::Value, LlmError> {
    if text.trim().is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| LlmError::InvalidJson(format!("LLM output is not valid JSON: {}", e)))?;
    if !value.is_object() {
        return Err(LlmError::InvalidJson("LLM output is not a JSON object".to_string()));
    }
    Ok(value)
}

/// Fake LLM client for testing
pub struct FakeLlmClient {
    responses: Mutex<Vec<Result<serde_json::Value, LlmError>>>,
    prompts: Mutex<Vec<String>>,
}

impl FakeLlmClient {
    /// Create a fake client with pre-defined responses.
    /// The last response repeats once the others are used up.
    pub fn new(responses: Vec<Result<serde_json::Value, LlmError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Create a fake client that always returns the same JSON
    pub fn always_valid(json: serde_json::Value) -> Self {
        Self::new(vec![Ok(json)])
    }

    /// Create a fake client that always returns an error
    pub fn always_error(error: LlmError) -> Self {
        Self::new(vec![Err(error)])
    }

    /// Number of calls made
    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or(0)
    }

    /// User prompts received, in call order
    pub fn user_prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for FakeLlmClient {
    async fn call_json(
        &self,
        _system_prompt: &str,
        user_prompt: &str,
        _schema_description: &str,
    ) -> Result<serde_json::Value, LlmError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(user_prompt.to_string());
        }

        let mut responses = self
            .responses
            .lock()
            .map_err(|_| LlmError::HttpError("fake client poisoned".to_string()))?;
        match responses.len() {
            0 => Err(LlmError::EmptyResponse),
            1 => responses[0].clone(),
            _ => responses.remove(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_config_default() {
        let config = LlmConfig::default();
        assert!(config.enabled);
        assert_eq!(config.endpoint, "http://localhost:11434");
        assert_eq!(config.model, "llama3.2:3b");
        assert!(config.api_key.is_none());
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_parse_content() {
        assert!(parse_content(r#"{"a": 1}"#).is_ok());
        assert_eq!(parse_content("  "), Err(LlmError::EmptyResponse));
        assert!(matches!(parse_content("[1, 2]"), Err(LlmError::InvalidJson(_))));
        assert!(matches!(parse_content("level: 3"), Err(LlmError::InvalidJson(_))));
    }

    #[tokio::test]
    async fn test_disabled_client() {
        let config = LlmConfig {
            enabled: false,
            ..Default::default()
        };
        let client = HttpLlmClient::new(config).unwrap();
        let result = client.call_json("s", "u", "{}").await;
        assert_eq!(result, Err(LlmError::Disabled));
    }

    #[tokio::test]
    async fn test_fake_client_always_valid() {
        let json = serde_json::json!({"test": "data"});
        let client = FakeLlmClient::always_valid(json.clone());

        assert_eq!(client.call_json("system", "user", "schema").await.unwrap(), json);
        assert!(client.call_json("system", "user", "schema").await.is_ok());
        assert_eq!(client.call_count(), 2);
    }

    #[tokio::test]
    async fn test_fake_client_multiple_responses() {
        let client = FakeLlmClient::new(vec![
            Ok(serde_json::json!({"response": 1})),
            Ok(serde_json::json!({"response": 2})),
            Err(LlmError::Timeout(30)),
        ]);

        assert_eq!(client.call_json("", "a", "").await.unwrap()["response"], 1);
        assert_eq!(client.call_json("", "b", "").await.unwrap()["response"], 2);
        assert_eq!(client.call_json("", "c", "").await, Err(LlmError::Timeout(30)));
        assert_eq!(client.call_count(), 3);
        assert_eq!(client.user_prompts(), vec!["a", "b", "c"]);
    }
}
