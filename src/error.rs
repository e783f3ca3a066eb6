//! Error handling for the ChemVis-RS application
//!
//! This module defines the crate-level error type and a Result alias.
//! Request failures coming back from the backend worker travel as the
//! cloneable [`FetchError`](crate::backend::FetchError) inside messages
//! instead.

use thiserror::Error;

/// Main error type for ChemVis-RS operations
#[derive(Error, Debug)]
pub enum ChemVisError {
    /// The HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors related to channel communication
    #[error("Channel error: {0}")]
    Channel(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ChemVisError>,
    },
}

impl ChemVisError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ChemVisError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for ChemVis-RS operations
pub type Result<T> = std::result::Result<T, ChemVisError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}
