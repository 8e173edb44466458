//! Unit tests for error handling
//!
//! Tests error types, conversions, and failure classification.

#[cfg(test)]
mod tests {
    use std::io;

    use crate::errors::FailureKind;
    use crate::errors::PincodeError;

    // ====== Error Type Tests ======

    #[test]
    fn test_custom_error() {
        let error = PincodeError::Custom("Test error message".to_string());
        assert_eq!(format!("{error}"), "Test error message");
    }

    #[test]
    fn test_config_error_display() {
        let error = PincodeError::ConfigError("llm_endpoint is empty".to_string());
        let display = format!("{error}");
        assert!(display.contains("configuration"));
        assert!(display.contains("llm_endpoint"));
    }

    #[test]
    fn test_empty_query_display() {
        assert_eq!(PincodeError::EmptyQuery.to_string(), "Query is empty");
    }

    // ====== Failure Kind Tests ======

    #[test]
    fn test_transport_failure_kind() {
        let error = PincodeError::Transport("connection refused".to_string());
        assert_eq!(error.failure_kind(), Some(FailureKind::TransportFailure));
        assert!(error.is_retryable());
    }

    #[test]
    fn test_schema_violation_kind() {
        let error = PincodeError::SchemaViolation("missing PostOffice".to_string());
        assert_eq!(error.failure_kind(), Some(FailureKind::SchemaViolation));
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_empty_result_kind() {
        let error = PincodeError::EmptyResult("No records found".to_string());
        assert_eq!(error.failure_kind(), Some(FailureKind::EmptyResult));
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_non_response_errors_have_no_kind() {
        assert_eq!(PincodeError::EmptyQuery.failure_kind(), None);
        assert_eq!(
            PincodeError::ConfigError("x".to_string()).failure_kind(),
            None
        );
    }

    #[test]
    fn test_failure_kind_display() {
        assert_eq!(FailureKind::TransportFailure.to_string(), "transport_failure");
        assert_eq!(FailureKind::SchemaViolation.to_string(), "schema_violation");
        assert_eq!(FailureKind::EmptyResult.to_string(), "empty_result");
    }

    // ====== Error Conversion Tests ======

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let err: PincodeError = io_err.into();
        assert!(matches!(err, PincodeError::Io(_)));
    }

    #[test]
    fn test_error_from_serde_json_is_schema_violation() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: PincodeError = json_err.into();
        assert!(matches!(err, PincodeError::Serialization(_)));
        assert_eq!(err.failure_kind(), Some(FailureKind::SchemaViolation));
    }

    #[test]
    fn test_error_from_url_parse() {
        let url_err = url::Url::parse("not a url").unwrap_err();
        let err: PincodeError = url_err.into();
        assert!(matches!(err, PincodeError::Url(_)));
    }

    #[test]
    fn test_error_from_toml() {
        let toml_err = toml::from_str::<toml::Value>("= broken").unwrap_err();
        let err: PincodeError = toml_err.into();
        assert!(matches!(err, PincodeError::TomlParsing(_)));
    }
}
