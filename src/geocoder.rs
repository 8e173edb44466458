//! Reverse geocoding: coordinates to a locality token the pipeline can search

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use tracing::warn;
use url::Url;

use crate::config::AppConfig;
use crate::errors::PincodeError;
use crate::errors::Result;

#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// Best locality token for a position, or `None` if nothing usable came back
    async fn locality_from_coordinates(&self, lat: f64, lon: f64) -> Option<String>;
}

#[derive(Debug, Default, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    address: Option<Address>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub postcode: Option<String>,
    #[serde(default)]
    pub suburb: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

impl Address {
    /// Postal code, then neighbourhood, then city; blank values count as absent
    #[must_use]
    pub fn locality(&self) -> Option<String> {
        [&self.postcode, &self.suburb, &self.city]
            .into_iter()
            .flatten()
            .map(|value| value.trim())
            .find(|value| !value.is_empty())
            .map(str::to_string)
    }
}

/// Decode a reverse-geocoding body and pick the locality token
pub fn decode_reverse_payload(body: &str) -> Result<Option<String>> {
    let response: ReverseResponse = serde_json::from_str(body)
        .map_err(|e| PincodeError::SchemaViolation(format!("reverse geocoder payload: {e}")))?;
    Ok(response.address.and_then(|address| address.locality()))
}

/// Latitude within ±90, longitude within ±180, both finite
#[must_use]
pub fn valid_coordinates(lat: f64, lon: f64) -> bool {
    lat.is_finite() && lon.is_finite() && (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)
}

/// Nominatim-compatible reverse geocoder
pub struct NominatimGeocoder {
    endpoint: String,
    client: Client,
}

impl NominatimGeocoder {
    pub fn new(endpoint: impl Into<String>, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| PincodeError::ConfigError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            config.geocoder.endpoint.clone(),
            &config.geocoder.user_agent,
            Duration::from_secs(config.geocoder.timeout_secs),
        )
    }

    pub fn into_shared(self) -> Arc<dyn ReverseGeocoder> {
        Arc::new(self)
    }

    fn reverse_url(&self, lat: f64, lon: f64) -> Result<Url> {
        let mut url = Url::parse(&self.endpoint)?;
        url.path_segments_mut()
            .map_err(|()| PincodeError::ConfigError(format!("{} cannot be a base URL", self.endpoint)))?
            .pop_if_empty()
            .push("reverse");
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("lat", &lat.to_string())
            .append_pair("lon", &lon.to_string())
            .append_pair("addressdetails", "1");
        Ok(url)
    }

    /// Typed reverse lookup
    pub async fn reverse(&self, lat: f64, lon: f64) -> Result<Option<String>> {
        let url = self.reverse_url(lat, lon)?;
        debug!("Calling reverse geocoder: {}", url);

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(PincodeError::Transport(format!(
                "reverse geocoder returned HTTP {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        decode_reverse_payload(&body)
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn locality_from_coordinates(&self, lat: f64, lon: f64) -> Option<String> {
        if !valid_coordinates(lat, lon) {
            warn!("Ignoring invalid coordinates ({}, {})", lat, lon);
            return None;
        }

        match self.reverse(lat, lon).await {
            Ok(Some(locality)) => {
                debug!("Coordinates ({}, {}) resolved to '{}'", lat, lon, locality);
                Some(locality)
            }
            Ok(None) => {
                warn!("Reverse geocoder had no postcode, suburb or city for ({}, {})", lat, lon);
                None
            }
            Err(e) => {
                warn!("Reverse geocoding ({}, {}) failed: {}", lat, lon, e);
                None
            }
        }
    }
}
