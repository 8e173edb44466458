//! Query resolution pipeline
//!
//! Classify, optionally normalize, look up, reconcile. Every collaborator is
//! best effort, so [`QueryPipeline::resolve`] always produces a [`Resolution`].

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::classifier::classify;
use crate::directory::PostalDirectory;
use crate::geocoder::ReverseGeocoder;
use crate::models::DirectoryResponse;
use crate::models::NormalizedQuery;
use crate::models::QueryMode;
use crate::models::RawQuery;
use crate::models::Resolution;
use crate::models::ResultSet;
use crate::normalizer::QueryNormalizer;

pub const NO_RECORDS_NOTE: &str = "No official records found for this query.";
pub const EMPTY_QUERY_NOTE: &str = "Enter a pincode or post office name to search.";
const NO_RECORDS_SUFFIX: &str = "(No records found in official database)";

/// Merge a directory answer with what the normalizer said about the query
#[must_use]
pub fn reconcile(query: NormalizedQuery, response: DirectoryResponse) -> Resolution {
    let results = if response.success && !response.records.is_empty() {
        ResultSet::new(response.records, query.rationale.clone())
    } else {
        let note = match query.rationale.as_deref() {
            Some(rationale) => format!("{rationale} {NO_RECORDS_SUFFIX}"),
            None => NO_RECORDS_NOTE.to_string(),
        };
        ResultSet::empty(note)
    };
    Resolution::new(query, results)
}

pub struct QueryPipeline {
    normalizer: QueryNormalizer,
    directory: Arc<dyn PostalDirectory>,
    geocoder: Arc<dyn ReverseGeocoder>,
    deadline: Duration,
}

impl QueryPipeline {
    pub fn new(
        normalizer: QueryNormalizer,
        directory: Arc<dyn PostalDirectory>,
        geocoder: Arc<dyn ReverseGeocoder>,
        deadline: Duration,
    ) -> Self {
        Self {
            normalizer,
            directory,
            geocoder,
            deadline,
        }
    }

    #[must_use]
    pub const fn normalizer(&self) -> &QueryNormalizer {
        &self.normalizer
    }

    /// Resolve free text. Never fails; a missed deadline resolves to no records.
    pub async fn resolve(&self, raw: &str, force_ai: bool) -> Resolution {
        let term = raw.trim();
        if term.is_empty() {
            return Resolution::new(
                NormalizedQuery::passthrough(term, classify(term)),
                ResultSet::empty(EMPTY_QUERY_NOTE),
            );
        }

        match tokio::time::timeout(self.deadline, self.resolve_inner(term, force_ai)).await {
            Ok(resolution) => resolution,
            Err(_) => {
                warn!(
                    "Resolution of '{}' exceeded {:?}, returning no records",
                    term, self.deadline
                );
                reconcile(
                    NormalizedQuery::passthrough(term, classify(term)),
                    DirectoryResponse::not_found(),
                )
            }
        }
    }

    /// Resolve a validated query; voice and geolocation input force normalization
    pub async fn resolve_query(&self, query: &RawQuery) -> Resolution {
        self.resolve(query.text(), query.origin().forces_ai()).await
    }

    /// Direct directory lookup, skipping classification and normalization
    pub async fn lookup(&self, term: &str, mode: QueryMode) -> DirectoryResponse {
        self.directory.lookup(term.trim(), mode).await
    }

    /// Locality token for a coordinate pair
    pub async fn locality(&self, lat: f64, lon: f64) -> Option<String> {
        let locality = self.geocoder.locality_from_coordinates(lat, lon).await;
        match &locality {
            Some(token) => debug!("Coordinates ({}, {}) -> '{}'", lat, lon, token),
            None => info!("No locality for ({}, {})", lat, lon),
        }
        locality
    }

    /// Reverse-geocode and resolve the locality token, if any
    pub async fn resolve_coordinates(&self, lat: f64, lon: f64) -> Option<Resolution> {
        let locality = self.locality(lat, lon).await?;
        Some(self.resolve(&locality, true).await)
    }

    async fn resolve_inner(&self, term: &str, force_ai: bool) -> Resolution {
        debug!("Step 1: normalizing '{}' (force_ai={})", term, force_ai);
        let query = self.normalizer.normalize(term, force_ai).await;

        debug!(
            "Step 2: directory lookup {}/{}",
            query.mode, query.canonical_term
        );
        let response = self.directory.lookup(&query.canonical_term, query.mode).await;

        let resolution = reconcile(query, response);
        info!(
            "Resolved '{}' to {} record(s)",
            term,
            resolution.results.len()
        );
        resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PostalRecord;

    fn record(pincode: &str) -> PostalRecord {
        PostalRecord {
            pincode: pincode.to_string(),
            office_name: "Ameerpet".to_string(),
            office_type: "S.O".to_string(),
            delivery_status: "Non-Delivery".to_string(),
            division_name: "Hyderabad City".to_string(),
            region_name: "Hyderabad City".to_string(),
            circle_name: "Telangana".to_string(),
            district: "Hyderabad".to_string(),
            state: "Telangana".to_string(),
            block: "Khairatabad".to_string(),
        }
    }

    #[test]
    fn test_reconcile_records_keep_rationale() {
        let query = NormalizedQuery {
            canonical_term: "Ameerpet".to_string(),
            mode: QueryMode::PostOffice,
            rationale: Some("Analyzing Ameerpet.".to_string()),
        };
        let resolution = reconcile(query, DirectoryResponse::found(vec![record("500016")]));
        assert_eq!(resolution.results.len(), 1);
        assert_eq!(resolution.results.context(), "Analyzing Ameerpet.");
        assert!(resolution.should_auto_open());
    }

    #[test]
    fn test_reconcile_empty_with_rationale() {
        let query = NormalizedQuery {
            canonical_term: "Atlantis".to_string(),
            mode: QueryMode::PostOffice,
            rationale: Some("Looking up Atlantis.".to_string()),
        };
        let resolution = reconcile(query, DirectoryResponse::not_found());
        assert!(resolution.results.is_empty());
        assert_eq!(
            resolution.results.context(),
            "Looking up Atlantis. (No records found in official database)"
        );
        assert!(!resolution.should_auto_open());
    }

    #[test]
    fn test_reconcile_empty_without_rationale() {
        let resolution = reconcile(
            NormalizedQuery::passthrough("999999", QueryMode::Pincode),
            DirectoryResponse::not_found(),
        );
        assert_eq!(resolution.results.context(), NO_RECORDS_NOTE);
    }

    #[test]
    fn test_reconcile_multiple_records_do_not_auto_open() {
        let resolution = reconcile(
            NormalizedQuery::passthrough("500016", QueryMode::Pincode),
            DirectoryResponse::found(vec![record("500016"), record("500016")]),
        );
        assert_eq!(resolution.results.len(), 2);
        assert_eq!(resolution.results.context, None);
        assert!(resolution.auto_open.is_none());
    }
}
