use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::errors::PincodeError;
use crate::errors::Result;

/// Where a raw query came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QueryOrigin {
    /// Typed into the search box
    #[default]
    Typed,
    /// Transcribed speech
    Voice,
    /// Locality token from the reverse geocoder
    Geolocation,
}

impl QueryOrigin {
    /// Voice and geolocation input is free text and always goes through the normalizer
    #[must_use]
    pub const fn forces_ai(self) -> bool {
        matches!(self, Self::Voice | Self::Geolocation)
    }
}

/// User input that has been trimmed and checked for emptiness
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawQuery {
    text: String,
    origin: QueryOrigin,
}

impl RawQuery {
    pub fn new(text: &str, origin: QueryOrigin) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(PincodeError::EmptyQuery);
        }
        Ok(Self {
            text: trimmed.to_string(),
            origin,
        })
    }

    pub fn typed(text: &str) -> Result<Self> {
        Self::new(text, QueryOrigin::Typed)
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn origin(&self) -> QueryOrigin {
        self.origin
    }
}

impl fmt::Display for RawQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Which directory endpoint a term is looked up against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMode {
    Pincode,
    PostOffice,
}

impl QueryMode {
    /// Path segment used by the directory authority
    #[must_use]
    pub const fn endpoint_segment(self) -> &'static str {
        match self {
            Self::Pincode => "pincode",
            Self::PostOffice => "postoffice",
        }
    }
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint_segment())
    }
}

/// A search term ready for the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedQuery {
    pub canonical_term: String,
    pub mode: QueryMode,
    /// Display-only sentence from the normalizer; never used for control flow
    pub rationale: Option<String>,
}

impl NormalizedQuery {
    /// The query as typed, with the classifier's mode and no rationale
    #[must_use]
    pub fn passthrough(term: &str, mode: QueryMode) -> Self {
        Self {
            canonical_term: term.trim().to_string(),
            mode,
            rationale: None,
        }
    }
}

/// One post office as reported by the directory authority.
///
/// Every field is an opaque upstream string; nothing is re-validated locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalRecord {
    pub pincode: String,
    pub office_name: String,
    /// H.O, S.O, B.O, G.P.O or whatever the directory reports
    pub office_type: String,
    pub delivery_status: String,
    pub division_name: String,
    pub region_name: String,
    pub circle_name: String,
    pub district: String,
    pub state: String,
    /// Mandal / block
    pub block: String,
}

/// Ordered records plus a note on how they were derived
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    pub records: Vec<PostalRecord>,
    pub context: Option<String>,
}

impl ResultSet {
    #[must_use]
    pub fn new(records: Vec<PostalRecord>, context: Option<String>) -> Self {
        Self { records, context }
    }

    #[must_use]
    pub fn empty(context: impl Into<String>) -> Self {
        Self {
            records: Vec::new(),
            context: Some(context.into()),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Context string, empty when there is none
    #[must_use]
    pub fn context(&self) -> &str {
        self.context.as_deref().unwrap_or("")
    }

    /// The only record, if there is exactly one
    #[must_use]
    pub fn singleton(&self) -> Option<&PostalRecord> {
        match self.records.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }
}

/// Outcome of one pipeline invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub query: NormalizedQuery,
    pub results: ResultSet,
    /// Set when exactly one record came back and its detail view should open directly
    pub auto_open: Option<PostalRecord>,
}

impl Resolution {
    #[must_use]
    pub fn new(query: NormalizedQuery, results: ResultSet) -> Self {
        let auto_open = results.singleton().cloned();
        Self {
            query,
            results,
            auto_open,
        }
    }

    #[must_use]
    pub const fn should_auto_open(&self) -> bool {
        self.auto_open.is_some()
    }
}

/// Directory answer as seen by callers: a success flag and the records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryResponse {
    pub success: bool,
    pub records: Vec<PostalRecord>,
}

impl DirectoryResponse {
    #[must_use]
    pub fn found(records: Vec<PostalRecord>) -> Self {
        Self {
            success: !records.is_empty(),
            records,
        }
    }

    #[must_use]
    pub fn not_found() -> Self {
        Self::default()
    }
}

/// Grounded locality summary for one post office
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalityInsight {
    pub summary: String,
    pub key_places: Vec<String>,
    pub connectivity: String,
    pub popular_for: Vec<String>,
    pub hospitals: Vec<String>,
    pub schools: Vec<String>,
}

/// Web page the insight was grounded on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCitation {
    pub uri: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightReport {
    pub insights: LocalityInsight,
    pub sources: Vec<SourceCitation>,
    pub fetched_at: DateTime<Utc>,
}
