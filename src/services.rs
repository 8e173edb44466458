//! The pipeline, insight fetcher and support agent wired together

use std::sync::Arc;

use tracing::info;
use tracing::warn;

use crate::config::AppConfig;
use crate::directory::DirectoryClient;
use crate::directory::PostalDirectory;
use crate::errors::Result;
use crate::geocoder::NominatimGeocoder;
use crate::geocoder::ReverseGeocoder;
use crate::insights::LocalityInsightFetcher;
use crate::llm::GenerativeModel;
use crate::llm::LlmService;
use crate::llm::ModelSelection;
use crate::normalizer::NormalizationPolicy;
use crate::normalizer::QueryNormalizer;
use crate::pipeline::QueryPipeline;
use crate::retry::RetryPolicy;
use crate::support::SupportAgent;

#[derive(Clone)]
pub struct PincodeServices {
    pub pipeline: Arc<QueryPipeline>,
    pub insights: Arc<LocalityInsightFetcher>,
    pub support: Arc<SupportAgent>,
}

impl PincodeServices {
    /// Build the HTTP-backed services described by `config`
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let llm = LlmService::from_config(config)?;
        if llm.is_configured() {
            info!("Generative model configured at {}", config.llm_endpoint());
        } else {
            warn!("No LLM API key configured; AI normalization, insights and support are unavailable");
        }

        Ok(Self::with_collaborators(
            config,
            llm.into_shared(),
            DirectoryClient::from_config(config)?.into_shared(),
            NominatimGeocoder::from_config(config)?.into_shared(),
        ))
    }

    /// Build around caller-supplied collaborators
    pub fn with_collaborators(
        config: &AppConfig,
        model: Arc<dyn GenerativeModel>,
        directory: Arc<dyn PostalDirectory>,
        geocoder: Arc<dyn ReverseGeocoder>,
    ) -> Self {
        let models = ModelSelection::from_config(config);

        let normalizer = QueryNormalizer::new(
            Arc::clone(&model),
            models.normalizer,
            NormalizationPolicy::from_config(&config.pipeline),
        );
        let pipeline = QueryPipeline::new(normalizer, directory, geocoder, config.resolve_timeout());
        let insights = LocalityInsightFetcher::new(
            Arc::clone(&model),
            models.insight,
            RetryPolicy::from_config(&config.retry),
        );
        let support = SupportAgent::new(model, models.support);

        Self {
            pipeline: Arc::new(pipeline),
            insights: Arc::new(insights),
            support: Arc::new(support),
        }
    }
}
