//! Generative model access
//!
//! Everything that talks to the generative-AI service goes through the
//! [`GenerativeModel`] trait. [`LlmService`] implements it against the Gemini
//! `generateContent` REST endpoint; tests substitute canned replies.

pub mod prompts;
pub mod schema;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::config::AppConfig;
use crate::errors::PincodeError;
use crate::errors::Result;
use crate::llm::types::Content;
use crate::llm::types::GenerateContentRequest;
use crate::llm::types::GenerateContentResponse;
use crate::llm::types::GenerationConfig;
use crate::llm::types::GoogleSearch;
use crate::llm::types::Tool;

/// Who said a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Model,
}

impl ChatRole {
    const fn as_wire(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

/// One generation call
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub model: String,
    pub system_instruction: Option<String>,
    pub turns: Vec<ChatTurn>,
    /// Ask for JSON matching this schema
    pub response_schema: Option<Value>,
    /// Attach the web-search tool and return grounding chunks
    pub grounded: bool,
}

impl GenerationRequest {
    /// Single prompt, JSON reply
    pub fn structured(model: impl Into<String>, prompt: impl Into<String>, schema: Value) -> Self {
        Self {
            model: model.into(),
            system_instruction: None,
            turns: vec![ChatTurn::user(prompt)],
            response_schema: Some(schema),
            grounded: false,
        }
    }

    /// Free-text conversation under a system instruction
    pub fn conversation(model: impl Into<String>, system: impl Into<String>, turns: Vec<ChatTurn>) -> Self {
        Self {
            model: model.into(),
            system_instruction: Some(system.into()),
            turns,
            response_schema: None,
            grounded: false,
        }
    }

    #[must_use]
    pub fn with_grounding(mut self) -> Self {
        self.grounded = true;
        self
    }
}

/// A grounding chunk as returned, before any filtering
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroundingChunk {
    pub uri: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReply {
    pub text: String,
    pub grounding: Vec<GroundingChunk>,
}

#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationReply>;
}

/// Model names used for each task
#[derive(Debug, Clone)]
pub struct ModelSelection {
    pub normalizer: String,
    pub insight: String,
    pub support: String,
}

impl ModelSelection {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            normalizer: config.llm.normalizer_model.clone(),
            insight: config.llm.insight_model.clone(),
            support: config.llm.support_model.clone(),
        }
    }
}

/// Gemini REST client
#[derive(Clone)]
pub struct LlmService {
    endpoint: String,
    api_key: Option<String>,
    client: Client,
}

impl LlmService {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PincodeError::ConfigError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            config.llm.llm_endpoint.clone(),
            config.llm_key(),
            Duration::from_secs(config.llm.timeout_secs),
        )
    }

    pub fn into_shared(self) -> Arc<dyn GenerativeModel> {
        Arc::new(self)
    }

    /// Whether a key is available at all
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn build_body(request: &GenerationRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: request
                .turns
                .iter()
                .map(|turn| Content::text(Some(turn.role.as_wire()), turn.text.clone()))
                .collect(),
            system_instruction: request
                .system_instruction
                .as_ref()
                .map(|text| Content::text(None, text.clone())),
            tools: request.grounded.then(|| {
                vec![Tool {
                    google_search: GoogleSearch::default(),
                }]
            }),
            generation_config: request.response_schema.as_ref().map(|schema| GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: schema.clone(),
            }),
        }
    }
}

/// Turn a `generateContent` body into text plus grounding chunks
pub fn decode_generation_payload(body: &str) -> Result<GenerationReply> {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| PincodeError::SchemaViolation(format!("generation payload: {e}")))?;

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| PincodeError::SchemaViolation("generation returned no candidates".to_string()))?;

    let text: String = candidate
        .content
        .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(PincodeError::SchemaViolation(
            "generation returned no text".to_string(),
        ));
    }

    let grounding = candidate
        .grounding_metadata
        .map(|metadata| {
            metadata
                .grounding_chunks
                .into_iter()
                .map(|chunk| {
                    let web = chunk.web;
                    GroundingChunk {
                        uri: web.as_ref().and_then(|w| w.uri.clone()),
                        title: web.and_then(|w| w.title),
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(GenerationReply {
        text: text.trim().to_string(),
        grounding,
    })
}

#[async_trait]
impl GenerativeModel for LlmService {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationReply> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| PincodeError::ConfigError("LLM API key not provided".to_string()))?;

        let url = format!("{}/v1beta/models/{}:generateContent", self.endpoint, request.model);
        debug!(
            "Calling generateContent: model={} grounded={} structured={}",
            request.model,
            request.grounded,
            request.response_schema.is_some()
        );

        let body = Self::build_body(&request);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PincodeError::Transport(format!(
                "generateContent error ({status}): {error_text}"
            )));
        }

        let text = response.text().await?;
        decode_generation_payload(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_body_structured() {
        let request = GenerationRequest::structured("gemini-test", "hello", serde_json::json!({"type": "OBJECT"}));
        let body = serde_json::to_value(LlmService::build_body(&request)).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
        assert!(body.get("tools").is_none());
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn test_build_body_grounded_conversation() {
        let request = GenerationRequest::conversation(
            "gemini-test",
            "be nice",
            vec![ChatTurn::user("hi"), ChatTurn::model("hello"), ChatTurn::user("what is B.O?")],
        )
        .with_grounding();
        let body = serde_json::to_value(LlmService::build_body(&request)).unwrap();

        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be nice");
        assert!(body["systemInstruction"].get("role").is_none());
        assert_eq!(body["contents"][1]["role"], "model");
        assert_eq!(body["contents"].as_array().unwrap().len(), 3);
        assert!(body["tools"][0]["googleSearch"].is_object());
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn test_decode_joins_parts_and_reads_grounding() {
        let body = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "{\"a\":"}, {"text": "1}"}]},
                "groundingMetadata": {"groundingChunks": [
                    {"web": {"uri": "https://example.org", "title": "Example"}},
                    {"web": {"title": "No link"}},
                    {}
                ]}
            }]
        }"#;
        let reply = decode_generation_payload(body).unwrap();
        assert_eq!(reply.text, "{\"a\":1}");
        assert_eq!(reply.grounding.len(), 3);
        assert_eq!(reply.grounding[0].uri.as_deref(), Some("https://example.org"));
        assert_eq!(reply.grounding[1].uri, None);
        assert_eq!(reply.grounding[2], GroundingChunk::default());
    }

    #[test]
    fn test_decode_without_candidates_is_schema_violation() {
        let body = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        assert!(matches!(
            decode_generation_payload(body),
            Err(PincodeError::SchemaViolation(_))
        ));
    }

    #[test]
    fn test_decode_empty_text_is_schema_violation() {
        let body = r#"{"candidates": [{"content": {"parts": []}}]}"#;
        assert!(matches!(
            decode_generation_payload(body),
            Err(PincodeError::SchemaViolation(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_key_is_config_error() {
        let service = LlmService::new("http://127.0.0.1:9", None, Duration::from_secs(1)).unwrap();
        assert!(!service.is_configured());
        let result = service
            .generate(GenerationRequest::structured("m", "p", serde_json::json!({})))
            .await;
        assert!(matches!(result, Err(PincodeError::ConfigError(_))));
    }
}
