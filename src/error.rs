//! Error types for external data sources and settings.
//!
//! Source errors never reach the user directly: the fallback search in
//! [`crate::search`] downgrades every [`SourceError`] to "no results from this
//! attempt". They exist so the attempt trail and the logs can say *why*.

use thiserror::Error;

/// Failure of a single call against an external endpoint.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("endpoint answered with HTTP {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("source misconfigured: {0}")]
    Config(String),
}

/// Failure while loading the optional YAML settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read settings file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid base URL for {field}: {source}")]
    BaseUrl {
        field: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("{field} = {value} is out of range (allowed: {allowed})")]
    OutOfRange {
        field: &'static str,
        value: u64,
        allowed: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message() {
        let e = SourceError::Status(503);
        assert_eq!(e.to_string(), "endpoint answered with HTTP 503");
    }

    #[test]
    fn test_decode_error_from_serde() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{\"dados\": [");
        let e: SourceError = parse.unwrap_err().into();
        assert!(matches!(e, SourceError::Decode(_)));
        assert!(e.to_string().starts_with("malformed response"));
    }
}
