//! Error types for nbg-currencies

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for fetching, encoding and writing currencies
#[derive(Error, Debug)]
pub enum CurrencyError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Status code error: {code} {reason}")]
    Status { code: u16, reason: String },

    #[error("Document error: {0}")]
    Document(String),

    #[error("Invalid selector {selector:?}: {reason}")]
    Selector { selector: String, reason: String },

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Non-finite conversion rate {rate} for {index}")]
    NonFiniteRate { index: String, rate: f64 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid file name: {0}")]
    InvalidFileName(String),

    #[error("File {} already exists", .0.display())]
    FileExists(PathBuf),

    #[error("Overwrite of {} declined. No changes were made", .0.display())]
    OverwriteDeclined(PathBuf),

    #[error("Failed to write currencies to file {}: {source}", .path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for nbg-currencies operations
pub type Result<T> = std::result::Result<T, CurrencyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message() {
        let err = CurrencyError::Status {
            code: 503,
            reason: "Service Unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "Status code error: 503 Service Unavailable");
    }

    #[test]
    fn test_invalid_format_names_tag() {
        let err = CurrencyError::InvalidFormat("yaml".to_string());
        assert_eq!(err.to_string(), "Invalid format: yaml");
    }

    #[test]
    fn test_file_write_keeps_source() {
        use std::error::Error;

        let err = CurrencyError::FileWrite {
            path: PathBuf::from("out.csv"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("out.csv"));
        assert!(err.source().is_some());
    }
}
