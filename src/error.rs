//! Error kinds shared across the library
//!
//! Each failure domain gets its own enum so callers can decide, per kind,
//! whether to recover (generation), surface (extraction) or abort (persistence).

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failure of the external text-generation call
#[derive(Debug, Error)]
pub enum GenerationError {
    /// No API key in the configured environment variable
    #[error("API key not set (expected in ${0})")]
    MissingApiKey(String),

    /// Transport-level failure (DNS, TLS, connection reset)
    #[error("network error: {0}")]
    Network(String),

    /// The service did not answer within the configured bound
    #[error("generation timed out after {}s", .after.as_secs())]
    Timeout { after: Duration },

    /// The service answered with a non-success status (quota, invalid request)
    #[error("service returned {status}: {message}")]
    Service { status: u16, message: String },

    /// The service answered 2xx but without usable text
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Failure to turn an uploaded document into plain text
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("malformed PDF: {0}")]
    MalformedPdf(String),

    #[error("could not extract text from page {page}: {message}")]
    PageText { page: u32, message: String },

    #[error("document is not valid UTF-8: {0}")]
    InvalidEncoding(#[from] std::string::FromUtf8Error),
}

/// Failure of the record store. Never recovered: it aborts the triggering action.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to open record store at {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("record store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("record store error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Failure while writing or re-reading delimited-text exports
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("export is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("invalid timestamp '{0}'")]
    Timestamp(String),
}

/// Failure to load the TOML configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_error_display() {
        let err = GenerationError::Service {
            status: 429,
            message: "quota exceeded".to_string(),
        };
        assert_eq!(err.to_string(), "service returned 429: quota exceeded");

        let err = GenerationError::Timeout {
            after: Duration::from_secs(60),
        };
        assert_eq!(err.to_string(), "generation timed out after 60s");
    }

    #[test]
    fn test_extraction_error_from_utf8() {
        let bad = String::from_utf8(vec![0xff, 0xfe]).unwrap_err();
        let err: ExtractionError = bad.into();
        assert!(matches!(err, ExtractionError::InvalidEncoding(_)));
    }
}
