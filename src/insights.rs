//! Grounded locality insights for a selected post office

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use tracing::warn;

use crate::errors::PincodeError;
use crate::errors::Result;
use crate::llm::prompts::PostalPrompts;
use crate::llm::schema::locality_insight_schema;
use crate::llm::GenerationReply;
use crate::llm::GenerationRequest;
use crate::llm::GenerativeModel;
use crate::llm::GroundingChunk;
use crate::models::InsightReport;
use crate::models::LocalityInsight;
use crate::models::PostalRecord;
use crate::models::SourceCitation;
use crate::retry::RetryPolicy;

const DEFAULT_SOURCE_TITLE: &str = "Source";

/// Keep chunks that carry a link; untitled ones get a generic title
#[must_use]
pub fn extract_citations(chunks: &[GroundingChunk]) -> Vec<SourceCitation> {
    chunks
        .iter()
        .filter_map(|chunk| {
            let uri = chunk.uri.as_deref().unwrap_or("").trim();
            if uri.is_empty() {
                return None;
            }
            let title = chunk
                .title
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .unwrap_or(DEFAULT_SOURCE_TITLE);
            Some(SourceCitation {
                uri: uri.to_string(),
                title: title.to_string(),
            })
        })
        .collect()
}

/// Decode the insight JSON and attach citations
pub fn decode_insight_reply(reply: &GenerationReply) -> Result<InsightReport> {
    let insights: LocalityInsight = serde_json::from_str(reply.text.trim())
        .map_err(|e| PincodeError::SchemaViolation(format!("insight reply: {e}")))?;

    Ok(InsightReport {
        insights,
        sources: extract_citations(&reply.grounding),
        fetched_at: Utc::now(),
    })
}

pub struct LocalityInsightFetcher {
    model: Arc<dyn GenerativeModel>,
    model_name: String,
    retry: RetryPolicy,
}

impl LocalityInsightFetcher {
    pub fn new(model: Arc<dyn GenerativeModel>, model_name: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            model,
            model_name: model_name.into(),
            retry,
        }
    }

    /// Fetch insights for an area. `None` on any failure.
    pub async fn fetch_insights(&self, area: &str, pincode: &str, state: &str) -> Option<InsightReport> {
        match self.try_fetch(area, pincode, state).await {
            Ok(report) => {
                info!(
                    "Fetched insights for {} ({}) with {} sources",
                    area,
                    pincode,
                    report.sources.len()
                );
                Some(report)
            }
            Err(e) => {
                let kind = e
                    .failure_kind()
                    .map_or_else(|| "unclassified".to_string(), |k| k.to_string());
                warn!("Insight fetch for {} ({}) failed ({}): {}", area, pincode, kind, e);
                None
            }
        }
    }

    /// Convenience for a directory record
    pub async fn fetch_for_record(&self, record: &PostalRecord) -> Option<InsightReport> {
        self.fetch_insights(&record.office_name, &record.pincode, &record.state)
            .await
    }

    /// Typed fetch; transport failures are retried, schema violations are not
    pub async fn try_fetch(&self, area: &str, pincode: &str, state: &str) -> Result<InsightReport> {
        let prompt = PostalPrompts::locality_insight().render_pairs(&[
            ("area", area),
            ("pincode", pincode),
            ("state", state),
        ]);
        let request =
            GenerationRequest::structured(&self.model_name, prompt, locality_insight_schema()).with_grounding();

        let model = &self.model;
        let reply = self
            .retry
            .run("locality insights", || {
                let request = request.clone();
                async move { model.generate(request).await }
            })
            .await?;

        decode_insight_reply(&reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(uri: Option<&str>, title: Option<&str>) -> GroundingChunk {
        GroundingChunk {
            uri: uri.map(str::to_string),
            title: title.map(str::to_string),
        }
    }

    #[test]
    fn test_citations_drop_empty_uri_and_default_title() {
        let citations = extract_citations(&[
            chunk(Some("https://a.example"), Some("A")),
            chunk(None, Some("No link")),
            chunk(Some(""), Some("Blank link")),
            chunk(Some("https://b.example"), None),
        ]);
        assert_eq!(
            citations,
            vec![
                SourceCitation {
                    uri: "https://a.example".to_string(),
                    title: "A".to_string()
                },
                SourceCitation {
                    uri: "https://b.example".to_string(),
                    title: "Source".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_decode_insight_reply() {
        let reply = GenerationReply {
            text: r#"{
                "summary": "Busy commercial hub.",
                "keyPlaces": ["Ameerpet Metro"],
                "connectivity": "Metro and bus",
                "popularFor": ["Coaching centres"],
                "hospitals": ["Govt Hospital"],
                "schools": ["Govt School"]
            }"#
            .to_string(),
            grounding: vec![chunk(Some("https://news.example"), Some("News"))],
        };
        let report = decode_insight_reply(&reply).unwrap();
        assert_eq!(report.insights.summary, "Busy commercial hub.");
        assert_eq!(report.insights.key_places, vec!["Ameerpet Metro"]);
        assert_eq!(report.sources.len(), 1);
    }

    #[test]
    fn test_decode_missing_field_is_schema_violation() {
        let reply = GenerationReply {
            text: r#"{"summary": "x"}"#.to_string(),
            grounding: vec![],
        };
        assert!(matches!(
            decode_insight_reply(&reply),
            Err(PincodeError::SchemaViolation(_))
        ));
    }
}
