//! In-process collaborators for integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use pincodepro::directory::PostalDirectory;
use pincodepro::geocoder::ReverseGeocoder;
use pincodepro::llm::GenerationReply;
use pincodepro::llm::GenerationRequest;
use pincodepro::llm::GenerativeModel;
use pincodepro::llm::GroundingChunk;
use pincodepro::models::DirectoryResponse;
use pincodepro::models::PostalRecord;
use pincodepro::models::QueryMode;
use pincodepro::normalizer::NormalizationPolicy;
use pincodepro::normalizer::QueryNormalizer;
use pincodepro::pipeline::QueryPipeline;
use pincodepro::PincodeError;
use pincodepro::Result;

pub fn record(pincode: &str, name: &str) -> PostalRecord {
    PostalRecord {
        pincode: pincode.to_string(),
        office_name: name.to_string(),
        office_type: "S.O".to_string(),
        delivery_status: "Delivery".to_string(),
        division_name: "Division".to_string(),
        region_name: "Region".to_string(),
        circle_name: "Circle".to_string(),
        district: "District".to_string(),
        state: "State".to_string(),
        block: "Block".to_string(),
    }
}

/// Directory answering from a fixed table and recording every call
#[derive(Default)]
pub struct MockDirectory {
    entries: HashMap<(QueryMode, String), Vec<PostalRecord>>,
    delay: Option<Duration>,
    calls: Mutex<Vec<(QueryMode, String)>>,
}

impl MockDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, mode: QueryMode, term: &str, records: Vec<PostalRecord>) -> Self {
        self.entries.insert((mode, term.to_string()), records);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<(QueryMode, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PostalDirectory for MockDirectory {
    async fn lookup(&self, term: &str, mode: QueryMode) -> DirectoryResponse {
        self.calls.lock().unwrap().push((mode, term.to_string()));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.entries.get(&(mode, term.to_string())) {
            Some(records) => DirectoryResponse::found(records.clone()),
            None => DirectoryResponse::not_found(),
        }
    }
}

pub enum ModelBehavior {
    Reply(String),
    Grounded(String, Vec<GroundingChunk>),
    Fail(fn() -> PincodeError),
}

/// Model returning one canned behavior and counting calls
pub struct MockModel {
    behavior: ModelBehavior,
    calls: AtomicUsize,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl MockModel {
    pub fn new(behavior: ModelBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::new(ModelBehavior::Reply(text.to_string()))
    }

    pub fn failing(error: fn() -> PincodeError) -> Self {
        Self::new(ModelBehavior::Fail(error))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeModel for MockModel {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationReply> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);
        match &self.behavior {
            ModelBehavior::Reply(text) => Ok(GenerationReply {
                text: text.clone(),
                grounding: Vec::new(),
            }),
            ModelBehavior::Grounded(text, chunks) => Ok(GenerationReply {
                text: text.clone(),
                grounding: chunks.clone(),
            }),
            ModelBehavior::Fail(error) => Err(error()),
        }
    }
}

pub struct MockGeocoder {
    pub locality: Option<String>,
}

#[async_trait]
impl ReverseGeocoder for MockGeocoder {
    async fn locality_from_coordinates(&self, _lat: f64, _lon: f64) -> Option<String> {
        self.locality.clone()
    }
}

pub fn transport_error() -> PincodeError {
    PincodeError::Transport("connection reset".to_string())
}

pub fn pipeline(
    model: Arc<MockModel>,
    directory: Arc<MockDirectory>,
    locality: Option<&str>,
    deadline: Duration,
) -> QueryPipeline {
    QueryPipeline::new(
        QueryNormalizer::new(model, "test-model", NormalizationPolicy::default()),
        directory,
        Arc::new(MockGeocoder {
            locality: locality.map(str::to_string),
        }),
        deadline,
    )
}
