use std::fmt;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PincodeError {
    #[error("Query is empty")]
    EmptyQuery,

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    #[error("No results: {0}")]
    EmptyResult(String),

    #[error("Invalid coordinates ({0}, {1})")]
    InvalidCoordinates(f64, f64),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("Configuration source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Custom(String),
}

impl From<reqwest::Error> for PincodeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::SchemaViolation(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// The three ways an external collaborator can come back without data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Network unreachable, timeout or non-2xx response
    TransportFailure,
    /// Payload parsed but did not match the expected shape
    SchemaViolation,
    /// Payload well-formed but reports no matches
    EmptyResult,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TransportFailure => "transport_failure",
            Self::SchemaViolation => "schema_violation",
            Self::EmptyResult => "empty_result",
        };
        f.write_str(name)
    }
}

impl PincodeError {
    /// Classify an adapter error for logging. Errors that are not about an
    /// external response (config, IO) have no failure kind.
    #[must_use]
    pub const fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Transport(_) => Some(FailureKind::TransportFailure),
            Self::SchemaViolation(_) | Self::Serialization(_) => Some(FailureKind::SchemaViolation),
            Self::EmptyResult(_) => Some(FailureKind::EmptyResult),
            _ => None,
        }
    }

    /// Whether retrying the same request could plausibly succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

pub type Result<T> = std::result::Result<T, PincodeError>;
