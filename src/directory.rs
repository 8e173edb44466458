//! Postal directory client for `api.postalpincode.in`
//!
//! The authority answers `GET /{pincode|postoffice}/{term}` with a JSON array
//! whose first element carries a `Status` and a `PostOffice` list. Anything
//! other than `Status == "Success"` with at least one office is "no results".

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use tracing::info;
use tracing::warn;
use url::Url;

use crate::config::AppConfig;
use crate::errors::PincodeError;
use crate::errors::Result;
use crate::models::DirectoryResponse;
use crate::models::PostalRecord;
use crate::models::QueryMode;
use crate::retry::RetryPolicy;

const SUCCESS_STATUS: &str = "Success";

/// Anything that can resolve a term into post offices
#[async_trait]
pub trait PostalDirectory: Send + Sync {
    /// Look a term up. Failures of any kind come back as `success == false`.
    async fn lookup(&self, term: &str, mode: QueryMode) -> DirectoryResponse;
}

#[derive(Debug, Deserialize)]
struct DirectoryEnvelope {
    #[serde(rename = "Message", default)]
    message: Option<String>,
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "PostOffice", default)]
    post_office: Option<Vec<RawPostOffice>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawPostOffice {
    pincode: String,
    name: String,
    #[serde(default)]
    branch_type: Option<String>,
    #[serde(default)]
    delivery_status: Option<String>,
    #[serde(default)]
    division: Option<String>,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    circle: Option<String>,
    #[serde(default)]
    district: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    block: Option<String>,
}

impl From<RawPostOffice> for PostalRecord {
    fn from(raw: RawPostOffice) -> Self {
        Self {
            pincode: raw.pincode,
            office_name: raw.name,
            office_type: raw.branch_type.unwrap_or_default(),
            delivery_status: raw.delivery_status.unwrap_or_default(),
            division_name: raw.division.unwrap_or_default(),
            region_name: raw.region.unwrap_or_default(),
            circle_name: raw.circle.unwrap_or_default(),
            district: raw.district.unwrap_or_default(),
            state: raw.state.unwrap_or_default(),
            block: raw.block.unwrap_or_default(),
        }
    }
}

/// Decode a directory response body into records.
///
/// # Errors
/// - `SchemaViolation` when the body is not an array of envelopes
/// - `EmptyResult` when the status is not `Success` or the office list is empty
pub fn decode_directory_payload(body: &str) -> Result<Vec<PostalRecord>> {
    let envelopes: Vec<DirectoryEnvelope> = serde_json::from_str(body)
        .map_err(|e| PincodeError::SchemaViolation(format!("directory payload: {e}")))?;

    let first = envelopes
        .into_iter()
        .next()
        .ok_or_else(|| PincodeError::SchemaViolation("directory payload is an empty array".to_string()))?;

    if first.status != SUCCESS_STATUS {
        return Err(PincodeError::EmptyResult(format!(
            "status {}: {}",
            first.status,
            first.message.unwrap_or_default()
        )));
    }

    let offices = first.post_office.unwrap_or_default();
    if offices.is_empty() {
        return Err(PincodeError::EmptyResult(
            "success status with no offices".to_string(),
        ));
    }

    Ok(offices.into_iter().map(PostalRecord::from).collect())
}

/// Build `{endpoint}/{mode}/{term}` with the term escaped as a single path segment
pub fn lookup_url(endpoint: &str, term: &str, mode: QueryMode) -> Result<Url> {
    let mut url = Url::parse(endpoint)?;
    url.path_segments_mut()
        .map_err(|()| PincodeError::ConfigError(format!("{endpoint} cannot be a base URL")))?
        .pop_if_empty()
        .push(mode.endpoint_segment())
        .push(term);
    Ok(url)
}

/// HTTP client for the postal directory authority
pub struct DirectoryClient {
    endpoint: String,
    client: Client,
    retry: RetryPolicy,
}

impl DirectoryClient {
    /// Create a new directory client
    pub fn new(endpoint: impl Into<String>, timeout: Duration, retry: RetryPolicy) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PincodeError::ConfigError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            endpoint: endpoint.into(),
            client,
            retry,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            config.directory.endpoint.clone(),
            Duration::from_secs(config.directory.timeout_secs),
            RetryPolicy::from_config(&config.retry),
        )
    }

    pub fn into_shared(self) -> Arc<dyn PostalDirectory> {
        Arc::new(self)
    }

    /// Typed lookup that keeps the failure kind
    pub async fn fetch(&self, term: &str, mode: QueryMode) -> Result<Vec<PostalRecord>> {
        let this = self;
        self.retry
            .run("directory lookup", move || this.fetch_once(term, mode))
            .await
    }

    async fn fetch_once(&self, term: &str, mode: QueryMode) -> Result<Vec<PostalRecord>> {
        let url = lookup_url(&self.endpoint, term, mode)?;
        debug!("Calling directory API: {}", url);

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(PincodeError::Transport(format!(
                "directory returned HTTP {status}"
            )));
        }

        let body = response.text().await?;
        decode_directory_payload(&body)
    }
}

#[async_trait]
impl PostalDirectory for DirectoryClient {
    async fn lookup(&self, term: &str, mode: QueryMode) -> DirectoryResponse {
        match self.fetch(term, mode).await {
            Ok(records) => {
                info!("Directory returned {} records for {} '{}'", records.len(), mode, term);
                DirectoryResponse::found(records)
            }
            Err(e) => {
                let kind = e
                    .failure_kind()
                    .map_or_else(|| "unclassified".to_string(), |k| k.to_string());
                warn!("Directory lookup for {} '{}' failed ({}): {}", mode, term, kind, e);
                DirectoryResponse::not_found()
            }
        }
    }
}
