//! API request and response types

use serde::Deserialize;
use serde::Serialize;

use crate::links;
use crate::models::InsightReport;
use crate::models::PostalRecord;
use crate::models::QueryOrigin;
use crate::models::Resolution;
use crate::session::SessionState;
use crate::support::SupportMessage;

/// Standard API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub active_sessions: usize,
}

/// `GET /search` parameters
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub ai: bool,
}

/// `GET /insights` parameters
#[derive(Debug, Deserialize)]
pub struct InsightParams {
    pub area: String,
    pub pincode: String,
    #[serde(default)]
    pub state: String,
}

/// `GET /share-location` parameters
#[derive(Debug, Deserialize)]
pub struct LocationParams {
    pub lat: f64,
    pub lon: f64,
}

/// Outbound links for one record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordLinks {
    pub directions: String,
    pub share: String,
    pub nearby_pincodes: Vec<String>,
}

impl RecordLinks {
    #[must_use]
    pub fn for_record(record: &PostalRecord) -> Option<Self> {
        Some(Self {
            directions: links::directions_url(record).ok()?.to_string(),
            share: links::share_url(record).ok()?.to_string(),
            nearby_pincodes: links::nearby_pincodes(&record.pincode),
        })
    }
}

/// Stateless search result
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(flatten)]
    pub resolution: Resolution,
    /// Links for the auto-opened record
    pub links: Option<RecordLinks>,
}

impl From<Resolution> for SearchResponse {
    fn from(resolution: Resolution) -> Self {
        let links = resolution.auto_open.as_ref().and_then(RecordLinks::for_record);
        Self { resolution, links }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InsightResponse {
    pub area: String,
    pub pincode: String,
    pub report: Option<InsightReport>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DistrictsResponse {
    pub state: String,
    pub districts: Vec<String>,
}

/// Session snapshot plus links for the open detail view
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub state: SessionState,
    pub links: Option<RecordLinks>,
}

impl SessionResponse {
    #[must_use]
    pub fn new(session_id: impl Into<String>, state: SessionState) -> Self {
        let links = state.selected().and_then(RecordLinks::for_record);
        Self {
            session_id: session_id.into(),
            state,
            links,
        }
    }
}

/// `POST /sessions/:id/search`
#[derive(Debug, Deserialize)]
pub struct SessionSearchRequest {
    pub query: String,
    #[serde(default)]
    pub ai: bool,
    #[serde(default)]
    pub origin: QueryOrigin,
}

/// `POST /sessions/:id/near`
#[derive(Debug, Deserialize)]
pub struct NearRequest {
    pub lat: f64,
    pub lon: f64,
}

/// `POST /sessions/:id/select`
#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub index: usize,
}

/// `POST /support`
#[derive(Debug, Deserialize)]
pub struct SupportRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SupportResponse {
    pub session_id: String,
    pub reply: String,
    pub messages: Vec<SupportMessage>,
}
