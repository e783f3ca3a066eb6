//! Backend Worker Thread Implementation
//!
//! This module contains the main worker loop that runs in a separate thread
//! and serves all dataset requests. It communicates with the UI thread
//! through crossbeam channels.
//!
//! # Responsibilities
//!
//! - **Command processing**: Responds to UI commands (refresh, fetch, upload, ...)
//! - **Request dispatch**: Runs every request on its own short-lived thread so a
//!   slow rows fetch never holds back the summary of the same dataset
//! - **Local files**: Writes downloaded CSV bytes to the chosen destination
//!
//! Responses are forwarded in completion order, not request order.

use crate::backend::api::{DatasetApi, FetchError};
use crate::backend::{BackendCommand, BackendMessage};
use crate::config::AppConfig;
use crate::types::DatasetId;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// How long the loop waits for a command before re-checking the running flag
const COMMAND_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// The backend worker that dispatches API requests
pub struct BackendWorker {
    /// Application configuration
    config: AppConfig,
    /// Request implementation shared with request threads
    api: Arc<dyn DatasetApi>,
    /// Command receiver from the UI
    command_rx: Receiver<BackendCommand>,
    /// Message sender to the UI
    message_tx: Sender<BackendMessage>,
    /// Running flag
    running: Arc<AtomicBool>,
    /// Request threads that may still be running
    in_flight: Vec<JoinHandle<()>>,
}

impl BackendWorker {
    /// Create a new backend worker
    pub fn new(
        config: AppConfig,
        api: Arc<dyn DatasetApi>,
        command_rx: Receiver<BackendCommand>,
        message_tx: Sender<BackendMessage>,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            config,
            api,
            command_rx,
            message_tx,
            running,
            in_flight: Vec::new(),
        }
    }

    /// Run the main worker loop
    pub fn run(&mut self) {
        tracing::info!("Backend worker started (api: {})", self.config.api.base_url);

        while self.running.load(Ordering::SeqCst) {
            match self.command_rx.recv_timeout(COMMAND_POLL_INTERVAL) {
                Ok(cmd) => self.handle_command(cmd),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    self.running.store(false, Ordering::SeqCst);
                }
            }
            self.in_flight.retain(|handle| !handle.is_finished());
        }

        // Request threads are not joined: a hung request must not block exit
        if !self.in_flight.is_empty() {
            tracing::debug!("Abandoning {} in-flight request(s)", self.in_flight.len());
        }

        let _ = self.message_tx.send(BackendMessage::Shutdown);
        tracing::info!("Backend worker stopped");
    }

    /// Number of request threads that have not finished yet
    pub fn in_flight(&self) -> usize {
        self.in_flight.iter().filter(|h| !h.is_finished()).count()
    }

    /// Handle a single command
    fn handle_command(&mut self, cmd: BackendCommand) {
        match cmd {
            BackendCommand::RefreshDatasets => {
                self.spawn_request("list", |api| {
                    let result = api.list_datasets();
                    if let Err(e) = &result {
                        tracing::warn!("Failed to list datasets: {}", e);
                    }
                    BackendMessage::DatasetList(result)
                });
            }
            BackendCommand::FetchRows {
                token,
                dataset_id,
                page_size,
            } => {
                let page_size = if page_size == 0 {
                    self.config.api.rows_page_size
                } else {
                    page_size
                };
                self.spawn_request("rows", move |api| {
                    let result = api.fetch_rows(dataset_id, page_size);
                    match &result {
                        Ok(page) => tracing::debug!(
                            "Dataset {}: received {} of {} rows",
                            dataset_id,
                            page.rows.len(),
                            page.total.unwrap_or(page.rows.len() as u64)
                        ),
                        Err(e) => {
                            tracing::warn!("Dataset {}: rows request failed: {}", dataset_id, e)
                        }
                    }
                    BackendMessage::Rows {
                        token,
                        dataset_id,
                        result,
                    }
                });
            }
            BackendCommand::FetchSummary { token, dataset_id } => {
                self.spawn_request("summary", move |api| {
                    let result = api.fetch_summary(dataset_id);
                    if let Err(e) = &result {
                        tracing::warn!("Dataset {}: summary request failed: {}", dataset_id, e);
                    }
                    BackendMessage::Summary {
                        token,
                        dataset_id,
                        result,
                    }
                });
            }
            BackendCommand::Upload { path, name } => {
                self.spawn_request("upload", move |api| {
                    tracing::info!("Uploading {:?}", path);
                    let result = api.upload_csv(&path, name);
                    match &result {
                        Ok(receipt) => tracing::info!(
                            "Uploaded {} ({} rows)",
                            receipt.name,
                            receipt.row_count.unwrap_or(0)
                        ),
                        Err(e) => tracing::error!("Upload of {:?} failed: {}", path, e),
                    }
                    BackendMessage::UploadComplete(result)
                });
            }
            BackendCommand::Download {
                dataset_id,
                destination,
            } => {
                self.spawn_request("download", move |api| {
                    let result = download_to(api, dataset_id, &destination);
                    match &result {
                        Ok(path) => tracing::info!("Dataset {} saved to {:?}", dataset_id, path),
                        Err(e) => tracing::error!("Dataset {} download failed: {}", dataset_id, e),
                    }
                    BackendMessage::DownloadComplete { dataset_id, result }
                });
            }
            BackendCommand::Delete { dataset_id } => {
                self.spawn_request("delete", move |api| {
                    let result = api.delete_dataset(dataset_id);
                    match &result {
                        Ok(()) => tracing::info!("Dataset {} deleted", dataset_id),
                        Err(e) => tracing::error!("Dataset {} delete failed: {}", dataset_id, e),
                    }
                    BackendMessage::Deleted { dataset_id, result }
                });
            }
            BackendCommand::Shutdown => {
                self.running.store(false, Ordering::SeqCst);
            }
        }
    }

    /// Run `request` on a new thread and forward its message to the UI
    fn spawn_request<F>(&mut self, kind: &str, request: F)
    where
        F: FnOnce(&dyn DatasetApi) -> BackendMessage + Send + 'static,
    {
        let api = Arc::clone(&self.api);
        let tx = self.message_tx.clone();
        let spawned = std::thread::Builder::new()
            .name(format!("chemvis-{}", kind))
            .spawn(move || {
                let message = request(api.as_ref());
                // The UI may already be gone during shutdown
                let _ = tx.send(message);
            });

        match spawned {
            Ok(handle) => self.in_flight.push(handle),
            Err(e) => tracing::error!("Failed to spawn {} request thread: {}", kind, e),
        }
    }
}

/// Fetch a dataset's CSV and write it to `destination`
fn download_to(
    api: &dyn DatasetApi,
    dataset_id: DatasetId,
    destination: &Path,
) -> Result<PathBuf, FetchError> {
    let bytes = api.download_csv(dataset_id)?;
    std::fs::write(destination, bytes)?;
    Ok(destination.to_path_buf())
}
