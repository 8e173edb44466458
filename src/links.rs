//! Outbound links for a post office: directions, sharing and neighbouring
//! pincodes

use serde::Deserialize;
use serde::Serialize;
use url::Url;

use crate::classifier::is_pincode;
use crate::errors::PincodeError;
use crate::errors::Result;
use crate::geocoder::valid_coordinates;
use crate::models::PostalRecord;

const MAPS_SEARCH_BASE: &str = "https://www.google.com/maps/search/";
const MAPS_BASE: &str = "https://www.google.com/maps";
const WHATSAPP_BASE: &str = "https://wa.me/";

/// Maps search for "{office} {pincode}"
pub fn directions_url(record: &PostalRecord) -> Result<Url> {
    let mut url = Url::parse(MAPS_SEARCH_BASE)?;
    url.path_segments_mut()
        .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .push(&format!("{} {}", record.office_name, record.pincode));
    Ok(url)
}

#[must_use]
pub fn share_text(record: &PostalRecord) -> String {
    format!(
        "Check out postal details for {}, {}. Pincode: {} - via PincodePro",
        record.office_name, record.district, record.pincode
    )
}

/// WhatsApp share link for a record
pub fn share_url(record: &PostalRecord) -> Result<Url> {
    whatsapp_url(&share_text(record))
}

/// Maps link to a coordinate pair
pub fn live_location_url(lat: f64, lon: f64) -> Result<Url> {
    Ok(Url::parse_with_params(MAPS_BASE, &[("q", format!("{lat},{lon}"))])?)
}

/// WhatsApp share link for the sender's current position
pub fn live_location_share_url(lat: f64, lon: f64) -> Result<Url> {
    let link = live_location_url(lat, lon)?;
    whatsapp_url(&format!("Check my live location on PincodePro: {link}"))
}

/// Links for sharing the sender's current position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationLinks {
    pub maps: String,
    pub share: String,
}

/// Maps and WhatsApp links for a position; rejects out-of-range coordinates
pub fn location_links(lat: f64, lon: f64) -> Result<LocationLinks> {
    if !valid_coordinates(lat, lon) {
        return Err(PincodeError::InvalidCoordinates(lat, lon));
    }
    Ok(LocationLinks {
        maps: live_location_url(lat, lon)?.to_string(),
        share: live_location_share_url(lat, lon)?.to_string(),
    })
}

fn whatsapp_url(text: &str) -> Result<Url> {
    Ok(Url::parse_with_params(WHATSAPP_BASE, &[("text", text)])?)
}

/// Numerically adjacent pincodes (one below, two above) that are still six digits
#[must_use]
pub fn nearby_pincodes(pincode: &str) -> Vec<String> {
    let pincode = pincode.trim();
    if !is_pincode(pincode) {
        return Vec::new();
    }
    let Ok(value) = pincode.parse::<i64>() else {
        return Vec::new();
    };
    [value - 1, value + 1, value + 2]
        .into_iter()
        .filter(|candidate| (100_000..=999_999).contains(candidate))
        .map(|candidate| candidate.to_string())
        .collect()
}
