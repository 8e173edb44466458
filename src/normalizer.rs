//! Query normalization through the generative model
//!
//! Free text ("what is the pincode of Ameerpet") is rewritten into a search
//! term plus a detected type. The step is best effort: any failure hands the
//! original term back untouched.

use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::classifier::classify;
use crate::classifier::token_count;
use crate::config::PipelineConfig;
use crate::errors::PincodeError;
use crate::errors::Result;
use crate::llm::prompts::PostalPrompts;
use crate::llm::schema::query_normalization_schema;
use crate::llm::GenerationRequest;
use crate::llm::GenerativeModel;
use crate::models::NormalizedQuery;
use crate::models::QueryMode;

/// What the model claims the term is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectedType {
    Pincode,
    Area,
}

/// Decoded normalizer reply
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSearchResult {
    pub query: String,
    pub detected_type: DetectedType,
    pub explanation: String,
}

impl AiSearchResult {
    fn into_normalized(self) -> NormalizedQuery {
        let mode = match self.detected_type {
            DetectedType::Pincode => QueryMode::Pincode,
            DetectedType::Area => QueryMode::PostOffice,
        };
        let explanation = self.explanation.trim();
        NormalizedQuery {
            canonical_term: self.query.trim().to_string(),
            mode,
            rationale: (!explanation.is_empty()).then(|| explanation.to_string()),
        }
    }
}

/// Parse and validate the model's JSON
pub fn decode_normalizer_reply(text: &str) -> Result<AiSearchResult> {
    let result: AiSearchResult = serde_json::from_str(text.trim())
        .map_err(|e| PincodeError::SchemaViolation(format!("normalizer reply: {e}")))?;
    if result.query.trim().is_empty() {
        return Err(PincodeError::SchemaViolation(
            "normalizer returned an empty query".to_string(),
        ));
    }
    Ok(result)
}

/// When to spend a model call on a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizationPolicy {
    /// Rewrite multi-word place names even without an explicit AI trigger
    pub multi_word_heuristic: bool,
    /// Token count at which the heuristic applies
    pub min_tokens: usize,
}

impl NormalizationPolicy {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            multi_word_heuristic: config.multi_word_heuristic,
            min_tokens: config.min_tokens.max(1),
        }
    }

    /// Forced requests always go out; otherwise only multi-word place names
    #[must_use]
    pub fn should_normalize(&self, raw: &str, mode: QueryMode, force_ai: bool) -> bool {
        if force_ai {
            return true;
        }
        self.multi_word_heuristic && mode == QueryMode::PostOffice && token_count(raw) >= self.min_tokens
    }
}

impl Default for NormalizationPolicy {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

pub struct QueryNormalizer {
    model: Arc<dyn GenerativeModel>,
    model_name: String,
    policy: NormalizationPolicy,
}

impl QueryNormalizer {
    pub fn new(model: Arc<dyn GenerativeModel>, model_name: impl Into<String>, policy: NormalizationPolicy) -> Self {
        Self {
            model,
            model_name: model_name.into(),
            policy,
        }
    }

    #[must_use]
    pub const fn policy(&self) -> NormalizationPolicy {
        self.policy
    }

    /// Whether [`QueryNormalizer::normalize`] would call the model for this input
    #[must_use]
    pub fn will_call_model(&self, raw: &str, force_ai: bool) -> bool {
        self.policy.should_normalize(raw.trim(), classify(raw), force_ai)
    }

    /// Normalize a raw query. Never fails: on any model problem the trimmed
    /// input is returned with the classifier's mode and no rationale.
    pub async fn normalize(&self, raw: &str, force_ai: bool) -> NormalizedQuery {
        let term = raw.trim();
        let mode = classify(term);

        if !self.policy.should_normalize(term, mode, force_ai) {
            debug!("Skipping normalization for '{}' ({})", term, mode);
            return NormalizedQuery::passthrough(term, mode);
        }

        match self.rewrite(term).await {
            Ok(result) => {
                let normalized = result.into_normalized();
                info!(
                    "Normalized '{}' -> '{}' ({})",
                    term, normalized.canonical_term, normalized.mode
                );
                normalized
            }
            Err(e) => {
                let kind = e
                    .failure_kind()
                    .map_or_else(|| "unclassified".to_string(), |k| k.to_string());
                warn!("Normalization of '{}' failed ({}), using input as-is: {}", term, kind, e);
                NormalizedQuery::passthrough(term, mode)
            }
        }
    }

    /// One model call, decoded and validated
    pub async fn rewrite(&self, term: &str) -> Result<AiSearchResult> {
        let prompt = PostalPrompts::query_normalization().render_pairs(&[("input", term)]);
        let request = GenerationRequest::structured(&self.model_name, prompt, query_normalization_schema());
        let reply = self.model.generate(request).await?;
        decode_normalizer_reply(&reply.text)
    }
}
