//! View state for the frontend
//!
//! Everything here is plain data with no egui dependency. Panels read it and
//! return [`AppAction`]s instead of mutating it; the app applies backend
//! messages through the `apply_*` methods.

use std::path::PathBuf;

use crate::analysis::{
    derive_line_series, derive_summary_series, ChartData, DEFAULT_CHART_STATS, MAX_LINE_SERIES,
};
use crate::backend::{FetchError, RequestToken};
use crate::interaction::{ChartElement, InteractionEvent, InteractionState};
use crate::types::{Dataset, DatasetId, RowPage, Summary, UploadReceipt};

/// Status shown when upload is submitted without a file
pub const UPLOAD_NO_FILE: &str = "Choose a CSV file";

/// Actions that panels can emit
///
/// Panels return `Vec<AppAction>` instead of mutating state directly.
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// Re-fetch the dataset list
    RefreshDatasets,
    /// Open a dataset (fetches rows and summary)
    SelectDataset(DatasetId),
    /// Re-select the current dataset after a failed fetch
    Retry,
    /// Pick the CSV file to upload
    BrowseUploadFile,
    /// Send the chosen file
    SubmitUpload,
    /// Save a dataset's CSV to a user-chosen path
    DownloadDataset(DatasetId),
    /// Delete a dataset on the server
    DeleteDataset(DatasetId),
    /// Click on the summary bar chart; `None` when no bar was hit
    ChartClicked(Option<ChartElement>),
    /// Flip between dark and light theme
    ToggleDarkMode,
}

/// Progress of one request-backed piece of data
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FetchState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            FetchState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

impl<T> From<Result<T, FetchError>> for FetchState<T> {
    fn from(result: Result<T, FetchError>) -> Self {
        match result {
            Ok(value) => FetchState::Loaded(value),
            Err(e) => FetchState::Failed(e.to_string()),
        }
    }
}

// ==================== Dataset List ====================

/// The recent-datasets list
#[derive(Debug, Clone, Default)]
pub struct DatasetListState {
    pub datasets: Vec<Dataset>,
    pub loading: bool,
    /// Last refresh failure; the previous list stays visible
    pub error: Option<String>,
}

impl DatasetListState {
    pub fn begin_refresh(&mut self) {
        self.loading = true;
    }

    /// Apply a list response. Failures keep the current list.
    pub fn apply(&mut self, result: Result<Vec<Dataset>, FetchError>) {
        self.loading = false;
        match result {
            Ok(datasets) => {
                self.datasets = datasets;
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(
                    "Keeping {} listed datasets after refresh failure",
                    self.datasets.len()
                );
                self.error = Some(e.to_string());
            }
        }
    }

    pub fn remove(&mut self, id: DatasetId) {
        self.datasets.retain(|d| d.id != id);
    }

    pub fn get(&self, id: DatasetId) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.id == id)
    }
}

// ==================== Upload Form ====================

/// The upload form
#[derive(Debug, Clone, Default)]
pub struct UploadState {
    pub file: Option<PathBuf>,
    /// Optional display name; blank means the server picks one
    pub name: String,
    /// One-line status under the form
    pub status: Option<String>,
    pub in_flight: bool,
}

impl UploadState {
    pub fn choose_file(&mut self, path: PathBuf) {
        self.file = Some(path);
        self.status = None;
    }

    /// Start an upload. Returns what to send, or `None` when there is
    /// nothing to send (the status then says why).
    pub fn begin(&mut self) -> Option<(PathBuf, Option<String>)> {
        if self.in_flight {
            return None;
        }
        let Some(file) = self.file.clone() else {
            self.status = Some(UPLOAD_NO_FILE.to_string());
            return None;
        };
        let name = Some(self.name.trim().to_string()).filter(|n| !n.is_empty());

        self.in_flight = true;
        self.status = None;
        Some((file, name))
    }

    /// Apply an upload response; returns the new dataset's id on success
    pub fn apply(&mut self, result: Result<UploadReceipt, FetchError>) -> Option<DatasetId> {
        self.in_flight = false;
        match result {
            Ok(receipt) => {
                let name = if receipt.name.is_empty() {
                    self.file_name().unwrap_or_default()
                } else {
                    receipt.name.clone()
                };
                self.status = Some(format!("Uploaded: {}", name));
                self.file = None;
                self.name.clear();
                receipt.id
            }
            Err(e) => {
                self.status = Some(format!("Upload error: {}", e));
                None
            }
        }
    }

    /// File name of the chosen file, for display
    pub fn file_name(&self) -> Option<String> {
        self.file
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
    }
}

// ==================== Dataset View ====================

/// Rows, summary, derived charts and the bar-chart selection of the open dataset
#[derive(Debug, Clone, Default)]
pub struct DatasetViewState {
    selected: Option<DatasetId>,
    token: RequestToken,
    pub rows: FetchState<RowPage>,
    pub summary: FetchState<Summary>,
    pub interaction: InteractionState,
    line_chart: ChartData,
    bar_chart: ChartData,
}

impl DatasetViewState {
    pub fn selected(&self) -> Option<DatasetId> {
        self.selected
    }

    /// Token of the most recent selection
    pub fn token(&self) -> RequestToken {
        self.token
    }

    /// Open `id`. Returns the token both fetches must carry.
    pub fn select(&mut self, id: DatasetId) -> RequestToken {
        self.token = RequestToken(self.token.0.wrapping_add(1));
        self.selected = Some(id);
        self.rows = FetchState::Loading;
        self.summary = FetchState::Loading;
        self.line_chart = ChartData::default();
        self.bar_chart = ChartData::default();
        self.interaction = InteractionState::default()
            .transition(InteractionEvent::DatasetChanged, &self.bar_chart);
        self.token
    }

    /// Re-select the current dataset
    pub fn retry(&mut self) -> Option<(DatasetId, RequestToken)> {
        let id = self.selected?;
        Some((id, self.select(id)))
    }

    /// Close the view
    pub fn clear(&mut self) {
        self.token = RequestToken(self.token.0.wrapping_add(1));
        self.selected = None;
        self.rows = FetchState::Idle;
        self.summary = FetchState::Idle;
        self.line_chart = ChartData::default();
        self.bar_chart = ChartData::default();
        self.interaction.reset();
    }

    fn is_current(&self, token: RequestToken, dataset_id: DatasetId) -> bool {
        token == self.token && self.selected == Some(dataset_id)
    }

    /// Apply a rows response. Returns `false` for stale responses.
    pub fn apply_rows(
        &mut self,
        token: RequestToken,
        dataset_id: DatasetId,
        result: Result<RowPage, FetchError>,
    ) -> bool {
        if !self.is_current(token, dataset_id) {
            tracing::debug!("Dropping stale rows for dataset {}", dataset_id);
            return false;
        }
        self.rows = result.into();
        self.rebuild_line_chart();
        true
    }

    /// Apply a summary response. Returns `false` for stale responses.
    ///
    /// A fresh summary always clears the bar-chart selection.
    pub fn apply_summary(
        &mut self,
        token: RequestToken,
        dataset_id: DatasetId,
        result: Result<Summary, FetchError>,
    ) -> bool {
        if !self.is_current(token, dataset_id) {
            tracing::debug!("Dropping stale summary for dataset {}", dataset_id);
            return false;
        }
        self.summary = result.into();
        self.bar_chart = self
            .summary
            .loaded()
            .map(|summary| derive_summary_series(summary, &DEFAULT_CHART_STATS))
            .unwrap_or_default();
        let current = std::mem::take(&mut self.interaction);
        self.interaction = current.transition(InteractionEvent::DatasetChanged, &self.bar_chart);
        self.rebuild_line_chart();
        true
    }

    /// The line chart needs both halves: rows for values, summary for columns
    fn rebuild_line_chart(&mut self) {
        self.line_chart = match (self.rows.loaded(), self.summary.loaded()) {
            (Some(page), Some(summary)) => {
                derive_line_series(&page.rows, &summary.leading_parameters(MAX_LINE_SERIES))
            }
            _ => ChartData::default(),
        };
    }

    pub fn line_chart(&self) -> &ChartData {
        &self.line_chart
    }

    pub fn bar_chart(&self) -> &ChartData {
        &self.bar_chart
    }

    /// Feed a bar-chart click into the selection
    pub fn click(&mut self, element: Option<ChartElement>) {
        self.interaction.click(element, &self.bar_chart);
    }

    /// Whether either half is still being fetched
    pub fn is_pending(&self) -> bool {
        self.rows.is_loading() || self.summary.is_loading()
    }
}
