//! Input classification: postal code or place name

use crate::models::QueryMode;

/// Number of digits in an Indian pincode
pub const PINCODE_LENGTH: usize = 6;

/// Decide how a raw query should be looked up.
///
/// Returns [`QueryMode::Pincode`] iff the trimmed input is exactly six ASCII
/// digits, otherwise [`QueryMode::PostOffice`].
#[must_use]
pub fn classify(raw: &str) -> QueryMode {
    if is_pincode(raw.trim()) {
        QueryMode::Pincode
    } else {
        QueryMode::PostOffice
    }
}

/// Exactly six ASCII digits, no trimming
#[must_use]
pub fn is_pincode(candidate: &str) -> bool {
    candidate.len() == PINCODE_LENGTH && candidate.bytes().all(|b| b.is_ascii_digit())
}

/// Whitespace-separated token count
#[must_use]
pub fn token_count(raw: &str) -> usize {
    raw.split_whitespace().count()
}
