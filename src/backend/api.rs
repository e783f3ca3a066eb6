//! DatasetApi trait for the dataset REST backend
//!
//! This module provides the seam between the backend worker and the HTTP
//! service, so the worker can run against the real server
//! ([`HttpDatasetApi`](super::http::HttpDatasetApi)) or a mock in tests.

use crate::types::{Dataset, DatasetId, RowPage, Summary, UploadReceipt};
use std::path::Path;
use thiserror::Error;

/// Why a single API request failed
///
/// Cloneable so it can travel inside [`BackendMessage`](super::BackendMessage).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The request never produced a response (DNS, refused, timeout, ...)
    #[error("Request failed: {0}")]
    Transport(String),

    /// Non-success status without a usable error message
    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The server rejected the request with an explicit error message
    #[error("{0}")]
    Rejected(String),

    /// The response body did not have the expected shape
    #[error("Invalid response: {0}")]
    Decode(String),

    /// A local file could not be read or written
    #[error("File error: {0}")]
    File(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

impl From<std::io::Error> for FetchError {
    fn from(err: std::io::Error) -> Self {
        FetchError::File(err.to_string())
    }
}

/// Operations the client needs from the dataset backend
///
/// Implementations block; the worker calls them from short-lived threads.
pub trait DatasetApi: Send + Sync {
    /// `GET datasets/`, most recent first
    fn list_datasets(&self) -> Result<Vec<Dataset>, FetchError>;

    /// `GET datasets/{id}/summary/`
    fn fetch_summary(&self, id: DatasetId) -> Result<Summary, FetchError>;

    /// `GET datasets/{id}/rows/?page_size=N`
    fn fetch_rows(&self, id: DatasetId, page_size: usize) -> Result<RowPage, FetchError>;

    /// `POST upload/` with the CSV as multipart field `file`
    fn upload_csv(&self, path: &Path, name: Option<String>) -> Result<UploadReceipt, FetchError>;

    /// `GET datasets/{id}/download/`: the stored CSV bytes
    fn download_csv(&self, id: DatasetId) -> Result<Vec<u8>, FetchError>;

    /// `DELETE datasets/{id}/`
    fn delete_dataset(&self, id: DatasetId) -> Result<(), FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        assert_eq!(
            FetchError::Rejected("No file uploaded".to_string()).to_string(),
            "No file uploaded"
        );
        assert_eq!(
            FetchError::Status {
                status: 502,
                message: "Bad Gateway".to_string()
            }
            .to_string(),
            "Server returned 502: Bad Gateway"
        );
    }

    #[test]
    fn test_io_error_becomes_file_error() {
        let err: FetchError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, FetchError::File(ref m) if m.contains("gone")));
    }
}
