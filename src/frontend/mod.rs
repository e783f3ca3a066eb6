//! Frontend module for egui UI
//!
//! This module provides the main UI using eframe/egui. It talks to the
//! backend only through [`FrontendReceiver`]: commands go out, results come
//! back as [`BackendMessage`]s that are drained once per frame.
//!
//! # Layout
//!
//! - Top bar: title and theme toggle
//! - Left side panel: upload form and the recent datasets list
//! - Central panel: raw rows, summary table, bar chart and line chart of the
//!   selected dataset
//!
//! # Main Types
//!
//! - [`ChemVisApp`] - Main application state implementing [`eframe::App`]
//! - [`DatasetViewState`] - Selected dataset, fetch progress and charts
//! - [`PlotView`] - Chart rendering with egui_plot
//!
//! # Submodules
//!
//! - `panels` - Panel components
//! - `plot` - Chart rendering and bar hit testing
//! - `state` - UI state and actions, independent of egui
//! - `tables` - Table models

mod panels;
mod plot;
pub mod state;
pub mod tables;

pub use panels::*;
pub use plot::{bar_hit_test, bar_offset, PlotView, BAR_WIDTH};
pub use state::{AppAction, DatasetListState, DatasetViewState, FetchState, UploadState};

use crate::backend::{BackendMessage, FrontendReceiver};
use crate::config::AppConfig;
use crate::types::DatasetId;
use egui::Color32;
use std::time::Duration;

/// Repaint interval while requests are outstanding
const PENDING_REPAINT_INTERVAL: Duration = Duration::from_millis(100);

/// Main application state
pub struct ChemVisApp {
    /// Backend handle
    frontend: FrontendReceiver,
    /// Configuration; UI preferences are saved on exit
    config: AppConfig,
    /// Recent datasets
    datasets: DatasetListState,
    /// Upload form
    upload: UploadState,
    /// Selected dataset
    view: DatasetViewState,
    /// Chart settings
    plot: PlotView,
    /// Last download/delete outcome
    notice: Option<String>,
    /// Downloads and deletes awaiting a response
    pending_operations: usize,
}

impl ChemVisApp {
    /// Create a new application instance
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        frontend: FrontendReceiver,
        config: AppConfig,
    ) -> Self {
        let mut style = (*cc.egui_ctx.style()).clone();
        style.text_styles.iter_mut().for_each(|(_, font_id)| {
            font_id.size *= config.ui.font_scale;
        });
        cc.egui_ctx.set_style(style);
        apply_theme(&cc.egui_ctx, config.ui.dark_mode);

        Self::with_frontend(frontend, config)
    }

    /// Build the app state without an egui context and request the dataset list
    pub fn with_frontend(frontend: FrontendReceiver, config: AppConfig) -> Self {
        let plot = PlotView::new(config.ui.show_legend);
        let mut app = Self {
            frontend,
            config,
            datasets: DatasetListState::default(),
            upload: UploadState::default(),
            view: DatasetViewState::default(),
            plot,
            notice: None,
            pending_operations: 0,
        };
        app.handle_action(AppAction::RefreshDatasets);
        app
    }

    pub fn datasets(&self) -> &DatasetListState {
        &self.datasets
    }

    pub fn upload(&self) -> &UploadState {
        &self.upload
    }

    pub fn upload_mut(&mut self) -> &mut UploadState {
        &mut self.upload
    }

    pub fn view(&self) -> &DatasetViewState {
        &self.view
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Whether any request is still outstanding
    pub fn is_busy(&self) -> bool {
        self.datasets.loading
            || self.upload.in_flight
            || self.view.is_pending()
            || self.pending_operations > 0
    }

    /// Apply all pending backend messages; returns whether there were any
    pub fn process_backend_messages(&mut self) -> bool {
        let messages = self.frontend.drain();
        let had_messages = !messages.is_empty();

        for msg in messages {
            self.apply_message(msg);
        }

        had_messages
    }

    fn apply_message(&mut self, msg: BackendMessage) {
        match msg {
            BackendMessage::DatasetList(result) => {
                if let Ok(datasets) = &result {
                    tracing::debug!("Received {} datasets", datasets.len());
                }
                self.datasets.apply(result);
            }
            BackendMessage::Rows {
                token,
                dataset_id,
                result,
            } => {
                self.view.apply_rows(token, dataset_id, result);
            }
            BackendMessage::Summary {
                token,
                dataset_id,
                result,
            } => {
                self.view.apply_summary(token, dataset_id, result);
            }
            BackendMessage::UploadComplete(result) => {
                let succeeded = result.is_ok();
                let new_id = self.upload.apply(result);
                if succeeded {
                    self.handle_action(AppAction::RefreshDatasets);
                }
                if let Some(id) = new_id.filter(|_| self.config.ui.select_after_upload) {
                    self.handle_action(AppAction::SelectDataset(id));
                }
            }
            BackendMessage::DownloadComplete { dataset_id, result } => {
                self.pending_operations = self.pending_operations.saturating_sub(1);
                self.notice = Some(match result {
                    Ok(path) => format!("Saved dataset {} to {}", dataset_id, path.display()),
                    Err(e) => format!("Download failed: {}", e),
                });
            }
            BackendMessage::Deleted { dataset_id, result } => {
                self.pending_operations = self.pending_operations.saturating_sub(1);
                match result {
                    Ok(()) => {
                        self.datasets.remove(dataset_id);
                        if self.view.selected() == Some(dataset_id) {
                            self.view.clear();
                        }
                        self.notice = Some(format!("Deleted dataset {}", dataset_id));
                        self.handle_action(AppAction::RefreshDatasets);
                    }
                    Err(e) => self.notice = Some(format!("Delete failed: {}", e)),
                }
            }
            BackendMessage::Shutdown => {
                tracing::info!("Backend shutdown received");
            }
        }
    }

    /// Apply one user action
    pub fn handle_action(&mut self, action: AppAction) {
        match action {
            AppAction::RefreshDatasets => {
                self.datasets.begin_refresh();
                self.frontend.refresh_datasets();
            }
            AppAction::SelectDataset(id) => self.select(id),
            AppAction::Retry => {
                if let Some((id, token)) = self.view.retry() {
                    tracing::info!("Retrying dataset {}", id);
                    self.frontend
                        .fetch_dataset(token, id, self.config.api.rows_page_size);
                }
            }
            AppAction::BrowseUploadFile => {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("CSV", &["csv"])
                    .pick_file()
                {
                    self.upload.choose_file(path);
                }
            }
            AppAction::SubmitUpload => {
                if let Some((path, name)) = self.upload.begin() {
                    self.frontend.upload(path, name);
                }
            }
            AppAction::DownloadDataset(id) => {
                let file_name = self
                    .datasets
                    .get(id)
                    .map(|d| d.name.clone())
                    .unwrap_or_else(|| format!("dataset_{}.csv", id));
                if let Some(destination) = rfd::FileDialog::new()
                    .add_filter("CSV", &["csv"])
                    .set_file_name(file_name)
                    .save_file()
                {
                    self.pending_operations += 1;
                    self.frontend.download(id, destination);
                }
            }
            AppAction::DeleteDataset(id) => {
                self.pending_operations += 1;
                self.frontend.delete(id);
            }
            AppAction::ChartClicked(element) => self.view.click(element),
            AppAction::ToggleDarkMode => {
                self.config.ui.dark_mode = !self.config.ui.dark_mode;
            }
        }
    }

    fn select(&mut self, id: DatasetId) {
        tracing::info!("Opening dataset {}", id);
        let token = self.view.select(id);
        self.frontend
            .fetch_dataset(token, id, self.config.api.rows_page_size);
    }

    fn render_header(&mut self, ctx: &egui::Context, actions: &mut Vec<AppAction>) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Chemical Equipment Parameter Visualizer");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let icon = if self.config.ui.dark_mode { "☀" } else { "🌙" };
                    if ui.button(icon).on_hover_text("Toggle theme").clicked() {
                        actions.push(AppAction::ToggleDarkMode);
                    }
                    if self.is_busy() {
                        ui.spinner();
                    }
                    if let Some(notice) = &self.notice {
                        ui.colored_label(Color32::GRAY, notice);
                    }
                });
            });
        });
    }

    fn render_sidebar(&mut self, ctx: &egui::Context, actions: &mut Vec<AppAction>) {
        egui::SidePanel::left("datasets")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| {
                UploadPanel::render(ui, &mut self.upload, actions);
                ui.separator();
                DatasetListPanel::render(ui, &self.datasets, self.view.selected(), actions);
            });
    }

    fn render_view(&mut self, ctx: &egui::Context, actions: &mut Vec<AppAction>) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(id) = self.view.selected() else {
                ui.centered_and_justified(|ui| {
                    ui.colored_label(Color32::GRAY, "Select or upload a dataset");
                });
                return;
            };

            egui::ScrollArea::vertical()
                .id_salt("dataset_view")
                .show(ui, |ui| {
                    if let Some(dataset) = self.datasets.get(id) {
                        ui.label(egui::RichText::new(&dataset.name).size(18.0).strong());
                    }
                    RawTablePanel::render(ui, &self.view.rows, actions);
                    ui.separator();
                    SummaryPanel::render(
                        ui,
                        &self.view.summary,
                        self.view.bar_chart(),
                        &self.view.interaction,
                        &self.plot,
                        actions,
                    );
                    ui.separator();
                    LineChartPanel::render(ui, self.view.line_chart(), &self.plot);
                });
        });
    }
}

fn apply_theme(ctx: &egui::Context, dark_mode: bool) {
    ctx.set_visuals(if dark_mode {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    });
}

impl eframe::App for ChemVisApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let had_messages = self.process_backend_messages();

        if had_messages {
            ctx.request_repaint();
        } else if self.is_busy() {
            ctx.request_repaint_after(PENDING_REPAINT_INTERVAL);
        }

        let mut actions = Vec::new();
        self.render_header(ctx, &mut actions);
        self.render_sidebar(ctx, &mut actions);
        self.render_view(ctx, &mut actions);

        for action in actions {
            let theme_changed = action == AppAction::ToggleDarkMode;
            self.handle_action(action);
            if theme_changed {
                apply_theme(ctx, self.config.ui.dark_mode);
            }
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.frontend.shutdown();

        if let Err(e) = self.config.save_preferences() {
            tracing::warn!("Failed to save config: {}", e);
        }
    }
}
