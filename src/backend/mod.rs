//! Backend module for talking to the dataset REST service
//!
//! This module keeps all network I/O off the UI thread. It uses crossbeam
//! channels for thread-safe communication with the frontend.
//!
//! # Architecture
//!
//! The backend runs in a separate thread from the UI, communicating via channels:
//!
//! - [`BackendCommand`] - Messages sent from UI to backend (fetch, upload, delete, ...)
//! - [`BackendMessage`] - Messages sent from backend to UI (results and errors)
//! - [`FrontendReceiver`] - UI-side handle for sending commands and receiving messages
//! - [`ApiBackend`] - Main backend entry point that runs the worker loop
//!
//! # Components
//!
//! - [`DatasetApi`] - The request seam, implemented by [`HttpDatasetApi`] and by mocks
//! - [`BackendWorker`] - Worker loop that runs each request on its own thread
//!
//! # Stale responses
//!
//! Rows and summary requests carry the [`RequestToken`] of the selection
//! that issued them. The backend echoes it back untouched; deciding whether a
//! response is still wanted is the view's job.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use chemvis_rs::backend::{ApiBackend, HttpDatasetApi};
//! use chemvis_rs::config::AppConfig;
//!
//! let config = AppConfig::default();
//! let api = Arc::new(HttpDatasetApi::new(&config.api)?);
//! let (backend, frontend) = ApiBackend::new(config, api);
//!
//! std::thread::spawn(move || backend.run());
//!
//! frontend.refresh_datasets();
//! for msg in frontend.drain() {
//!     if let BackendMessage::DatasetList(Ok(datasets)) = msg {
//!         println!("{} datasets", datasets.len());
//!     }
//! }
//! ```

pub mod api;
pub mod http;
pub mod worker;

pub use api::{DatasetApi, FetchError};
pub use http::HttpDatasetApi;
pub use worker::BackendWorker;

use crate::config::AppConfig;
use crate::error::{ChemVisError, ResultExt};
use crate::types::{Dataset, DatasetId, RowPage, Summary, UploadReceipt};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Identifies which dataset selection a rows/summary request belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RequestToken(pub u64);

/// Message sent from the UI to the backend
#[derive(Debug, Clone)]
pub enum BackendCommand {
    /// Fetch the recent dataset list
    RefreshDatasets,
    /// Fetch the rows of a dataset
    FetchRows {
        token: RequestToken,
        dataset_id: DatasetId,
        page_size: usize,
    },
    /// Fetch the summary statistics of a dataset
    FetchSummary {
        token: RequestToken,
        dataset_id: DatasetId,
    },
    /// Upload a CSV file
    Upload {
        path: PathBuf,
        /// Optional display name sent alongside the file
        name: Option<String>,
    },
    /// Download a dataset's CSV to a local file
    Download {
        dataset_id: DatasetId,
        destination: PathBuf,
    },
    /// Delete a dataset on the server
    Delete { dataset_id: DatasetId },
    /// Shutdown the backend
    Shutdown,
}

/// Message sent from the backend to the UI
#[derive(Debug, Clone)]
pub enum BackendMessage {
    /// Result of [`BackendCommand::RefreshDatasets`]
    DatasetList(Result<Vec<Dataset>, FetchError>),
    /// Result of [`BackendCommand::FetchRows`]
    Rows {
        token: RequestToken,
        dataset_id: DatasetId,
        result: Result<RowPage, FetchError>,
    },
    /// Result of [`BackendCommand::FetchSummary`]
    Summary {
        token: RequestToken,
        dataset_id: DatasetId,
        result: Result<Summary, FetchError>,
    },
    /// Result of [`BackendCommand::Upload`]
    UploadComplete(Result<UploadReceipt, FetchError>),
    /// Result of [`BackendCommand::Download`]; carries the written path
    DownloadComplete {
        dataset_id: DatasetId,
        result: Result<PathBuf, FetchError>,
    },
    /// Result of [`BackendCommand::Delete`]
    Deleted {
        dataset_id: DatasetId,
        result: Result<(), FetchError>,
    },
    /// Backend is shutting down
    Shutdown,
}

/// Channel capacity for commands (UI → backend)
const CMD_CHANNEL_CAPACITY: usize = 64;
/// Channel capacity for messages (backend → UI)
const MSG_CHANNEL_CAPACITY: usize = 256;

/// Frontend receiver for backend messages
pub struct FrontendReceiver {
    /// Receiver for backend messages
    pub receiver: Receiver<BackendMessage>,
    /// Sender for commands to the backend
    pub command_sender: Sender<BackendCommand>,
}

impl FrontendReceiver {
    /// Try to receive a message without blocking
    pub fn try_recv(&self) -> Option<BackendMessage> {
        self.receiver.try_recv().ok()
    }

    /// Receive all pending messages
    pub fn drain(&self) -> Vec<BackendMessage> {
        let mut messages = Vec::new();
        while let Ok(msg) = self.receiver.try_recv() {
            messages.push(msg);
        }
        messages
    }

    /// Send a command to the backend
    pub fn send_command(&self, cmd: BackendCommand) -> crate::error::Result<()> {
        self.command_sender
            .send(cmd)
            .map_err(|e| ChemVisError::Channel(format!("backend is not running ({:?})", e.0)))
    }

    fn dispatch(&self, cmd: BackendCommand) {
        if let Err(e) = self.send_command(cmd).context("Failed to send command") {
            tracing::warn!("{}", e);
        }
    }

    /// Request the dataset list
    pub fn refresh_datasets(&self) {
        self.dispatch(BackendCommand::RefreshDatasets);
    }

    /// Request rows and summary of a dataset as two independent fetches
    pub fn fetch_dataset(&self, token: RequestToken, dataset_id: DatasetId, page_size: usize) {
        self.dispatch(BackendCommand::FetchRows {
            token,
            dataset_id,
            page_size,
        });
        self.dispatch(BackendCommand::FetchSummary { token, dataset_id });
    }

    /// Upload a CSV file
    pub fn upload(&self, path: PathBuf, name: Option<String>) {
        self.dispatch(BackendCommand::Upload { path, name });
    }

    /// Download a dataset's CSV to `destination`
    pub fn download(&self, dataset_id: DatasetId, destination: PathBuf) {
        self.dispatch(BackendCommand::Download {
            dataset_id,
            destination,
        });
    }

    /// Delete a dataset
    pub fn delete(&self, dataset_id: DatasetId) {
        self.dispatch(BackendCommand::Delete { dataset_id });
    }

    /// Request shutdown
    pub fn shutdown(&self) {
        self.dispatch(BackendCommand::Shutdown);
    }
}

/// The API backend that runs in a separate thread
pub struct ApiBackend {
    /// Configuration
    config: AppConfig,
    /// Request implementation
    api: Arc<dyn DatasetApi>,
    /// Receiver for commands from the UI
    command_receiver: Receiver<BackendCommand>,
    /// Sender for messages to the UI
    message_sender: Sender<BackendMessage>,
    /// Running flag
    running: Arc<AtomicBool>,
}

impl ApiBackend {
    /// Create a new backend with communication channels
    pub fn new(config: AppConfig, api: Arc<dyn DatasetApi>) -> (Self, FrontendReceiver) {
        let (cmd_tx, cmd_rx) = bounded(CMD_CHANNEL_CAPACITY);
        let (msg_tx, msg_rx) = bounded(MSG_CHANNEL_CAPACITY);

        let backend = Self {
            config,
            api,
            command_receiver: cmd_rx,
            message_sender: msg_tx,
            running: Arc::new(AtomicBool::new(true)),
        };

        let frontend = FrontendReceiver {
            receiver: msg_rx,
            command_sender: cmd_tx,
        };

        (backend, frontend)
    }

    /// Run the backend loop
    pub fn run(self) {
        let mut worker = BackendWorker::new(
            self.config,
            self.api,
            self.command_receiver,
            self.message_sender,
            self.running,
        );
        worker.run();
    }

    /// Get a handle to stop the backend
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }
}
