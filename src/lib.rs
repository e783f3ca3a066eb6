//! # ChemVis-RS: Chemical Equipment Parameter Visualizer
//!
//! A desktop client for a dataset REST service. Users upload CSV files of
//! equipment parameters, browse the most recent datasets and inspect each one
//! as a raw table, a summary-statistics table, a grouped bar chart of those
//! statistics and a line chart of the leading parameters.
//!
//! ## Architecture
//!
//! - **Backend**: Blocking HTTP requests behind the [`backend::DatasetApi`]
//!   trait, dispatched from a worker thread
//! - **Frontend**: Renders the UI using eframe/egui with egui_plot for charts
//! - **Analysis**: Coerces loosely typed backend values into chart series
//! - **Interaction**: The click-to-inspect state of the bar chart
//! - **Communication**: Crossbeam channels for thread-safe data transfer
//!
//! ## Configuration
//!
//! Configuration is stored as TOML in the platform-appropriate data
//! directory under `dev.chemvis.chemvis-rs`:
//!
//! - **Linux**: `~/.local/share/dev.chemvis.chemvis-rs/`
//! - **macOS**: `~/Library/Application Support/dev.chemvis.chemvis-rs/`
//! - **Windows**: `%APPDATA%\dev.chemvis.chemvis-rs\`
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use chemvis_rs::{ApiBackend, AppConfig, ChemVisApp, HttpDatasetApi};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::load_or_default();
//!     let api = Arc::new(HttpDatasetApi::new(&config.api)?);
//!     let (backend, frontend) = ApiBackend::new(config.clone(), api);
//!
//!     std::thread::spawn(move || backend.run());
//!
//!     eframe::run_native(
//!         "Chemical Equipment Visualizer",
//!         eframe::NativeOptions::default(),
//!         Box::new(|cc| Ok(Box::new(ChemVisApp::new(cc, frontend, config)))),
//!     )?;
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod app;
pub mod backend;
pub mod config;
pub mod error;
pub mod frontend;
pub mod interaction;
pub mod types;

// Re-export commonly used types
pub use analysis::{
    coerce, derive_line_series, derive_summary_series, ChartData, ChartSeries, Numeric,
};
pub use app::ChemVisApp;
pub use backend::{
    ApiBackend, BackendCommand, BackendMessage, DatasetApi, FetchError, HttpDatasetApi,
    RequestToken,
};
pub use config::AppConfig;
pub use error::{ChemVisError, Result};
pub use interaction::{ChartElement, ClickSelection, InteractionEvent, InteractionState};
pub use types::{Dataset, DatasetId, Row, RowPage, StatKind, Summary, UploadReceipt};
