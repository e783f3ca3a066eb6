//! Application module
//!
//! This module re-exports the main application type from the frontend module.
//! It provides a convenient access point for the main application entry.

pub use crate::frontend::ChemVisApp;

// Re-export the view state for embedding and tests
pub use crate::frontend::{AppAction, DatasetViewState};
