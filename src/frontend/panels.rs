//! Panel components for the frontend UI
//!
//! Each panel renders one part of the window from borrowed state and pushes
//! [`AppAction`]s for anything the user asked for.
//!
//! # Panels
//!
//! - [`UploadPanel`] - CSV upload form
//! - [`DatasetListPanel`] - Recent datasets with open/download/delete
//! - [`RawTablePanel`] - The fetched rows
//! - [`SummaryPanel`] - Statistics table and bar chart with the click callout
//! - [`LineChartPanel`] - Leading parameters over row number

use crate::analysis::ChartData;
use crate::frontend::plot::{color32, PlotView};
use crate::frontend::state::{AppAction, DatasetListState, FetchState, UploadState};
use crate::frontend::tables::{
    rows_heading, summary_columns, summary_rows, RawTable, CHART_HEADING, NO_CHART, NO_ROWS,
    NO_SUMMARY, SUMMARY_HEADING,
};
use crate::interaction::InteractionState;
use crate::types::{DatasetId, RowPage, Summary};
use egui::{Color32, RichText, Ui};

/// Heading of the dataset list
pub const DATASETS_HEADING: &str = "Last 5 Datasets";

/// Renders the upload form
pub struct UploadPanel;

impl UploadPanel {
    pub fn render(ui: &mut Ui, upload: &mut UploadState, actions: &mut Vec<AppAction>) {
        ui.heading("Upload CSV");

        ui.horizontal(|ui| {
            if ui.button("Browse…").clicked() {
                actions.push(AppAction::BrowseUploadFile);
            }
            match upload.file_name() {
                Some(name) => ui.label(name),
                None => ui.colored_label(Color32::GRAY, "No file chosen"),
            };
        });

        ui.add(
            egui::TextEdit::singleline(&mut upload.name)
                .desired_width(f32::INFINITY)
                .hint_text("Dataset name (optional)"),
        );

        ui.horizontal(|ui| {
            let button = ui.add_enabled(!upload.in_flight, egui::Button::new("Upload"));
            if button.clicked() {
                actions.push(AppAction::SubmitUpload);
            }
            if upload.in_flight {
                ui.spinner();
            }
        });

        if let Some(status) = &upload.status {
            let color = if status.starts_with("Upload error") {
                Color32::LIGHT_RED
            } else {
                ui.visuals().text_color()
            };
            ui.colored_label(color, status);
        }
    }
}

/// Renders the recent datasets list
pub struct DatasetListPanel;

impl DatasetListPanel {
    pub fn render(
        ui: &mut Ui,
        list: &DatasetListState,
        selected: Option<DatasetId>,
        actions: &mut Vec<AppAction>,
    ) {
        ui.horizontal(|ui| {
            ui.heading(DATASETS_HEADING);
            if list.loading {
                ui.spinner();
            } else if ui.small_button("⟳").on_hover_text("Refresh").clicked() {
                actions.push(AppAction::RefreshDatasets);
            }
        });

        if let Some(error) = &list.error {
            ui.colored_label(Color32::GRAY, RichText::new(format!("⚠ {}", error)).small());
        }

        if list.datasets.is_empty() && !list.loading {
            ui.colored_label(Color32::GRAY, "No datasets yet");
            return;
        }

        egui::ScrollArea::vertical()
            .id_salt("dataset_list")
            .show(ui, |ui| {
                for dataset in &list.datasets {
                    ui.group(|ui| {
                        let is_selected = selected == Some(dataset.id);
                        if ui
                            .selectable_label(is_selected, dataset.display_label())
                            .clicked()
                        {
                            actions.push(AppAction::SelectDataset(dataset.id));
                        }
                        if let Some(uploaded) = dataset.uploaded_at() {
                            ui.label(
                                RichText::new(uploaded.format("%Y-%m-%d %H:%M").to_string())
                                    .small()
                                    .color(Color32::GRAY),
                            );
                        }
                        ui.horizontal(|ui| {
                            if ui.small_button("Download CSV").clicked() {
                                actions.push(AppAction::DownloadDataset(dataset.id));
                            }
                            if ui.small_button("Delete").clicked() {
                                actions.push(AppAction::DeleteDataset(dataset.id));
                            }
                        });
                    });
                }
            });
    }
}

/// Spinner or error-with-retry for a section that is not loaded.
///
/// Returns the loaded value when there is one.
fn fetch_status<'a, T>(
    ui: &mut Ui,
    state: &'a FetchState<T>,
    what: &str,
    actions: &mut Vec<AppAction>,
) -> Option<&'a T> {
    match state {
        FetchState::Idle => None,
        FetchState::Loading => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(format!("Loading {}…", what));
            });
            None
        }
        FetchState::Failed(error) => {
            ui.horizontal(|ui| {
                ui.colored_label(Color32::RED, format!("⚠ Failed to load {}: {}", what, error));
                if ui.button("Retry").clicked() {
                    actions.push(AppAction::Retry);
                }
            });
            None
        }
        FetchState::Loaded(value) => Some(value),
    }
}

/// Renders the raw rows table
pub struct RawTablePanel;

impl RawTablePanel {
    pub fn render(ui: &mut Ui, rows: &FetchState<RowPage>, actions: &mut Vec<AppAction>) {
        let Some(page) = fetch_status(ui, rows, "rows", actions) else {
            return;
        };

        ui.heading(rows_heading(page.rows.len()));
        let Some(table) = RawTable::new(&page.rows) else {
            ui.colored_label(Color32::GRAY, NO_ROWS);
            return;
        };
        let columns: Vec<&str> = table.columns().collect();
        let row_height = ui.text_style_height(&egui::TextStyle::Body);

        // Header stays put above the virtualized rows
        egui::ScrollArea::horizontal()
            .id_salt("raw_rows")
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        for column in &columns {
                            raw_cell(ui, RichText::new(*column).strong());
                        }
                    });
                    ui.separator();

                    egui::ScrollArea::vertical()
                        .id_salt("raw_rows_body")
                        .max_height(240.0)
                        .show_rows(ui, row_height, table.len(), |ui, range| {
                            for row in range {
                                ui.horizontal(|ui| {
                                    for column in &columns {
                                        raw_cell(ui, table.cell(row, column));
                                    }
                                });
                            }
                        });
                });
            });
    }
}

/// Width of one raw table column
const RAW_COLUMN_WIDTH: f32 = 90.0;

/// One fixed-width cell so header and body columns line up
fn raw_cell(ui: &mut Ui, text: impl Into<egui::WidgetText>) {
    let height = ui.text_style_height(&egui::TextStyle::Body);
    ui.add_sized([RAW_COLUMN_WIDTH, height], egui::Label::new(text).truncate());
}

/// Renders the statistics table and the grouped bar chart
pub struct SummaryPanel;

impl SummaryPanel {
    pub fn render(
        ui: &mut Ui,
        summary: &FetchState<Summary>,
        chart: &ChartData,
        interaction: &InteractionState,
        plot: &PlotView,
        actions: &mut Vec<AppAction>,
    ) {
        let Some(summary) = fetch_status(ui, summary, "summary", actions) else {
            return;
        };

        ui.heading(SUMMARY_HEADING);
        match summary_rows(summary) {
            None => {
                ui.colored_label(Color32::GRAY, NO_SUMMARY);
            }
            Some(rows) => {
                egui::Grid::new("summary_grid")
                    .striped(true)
                    .min_col_width(60.0)
                    .show(ui, |ui| {
                        for column in summary_columns() {
                            ui.label(RichText::new(column).strong());
                        }
                        ui.end_row();
                        for row in rows {
                            for cell in row {
                                ui.label(RichText::new(cell).monospace());
                            }
                            ui.end_row();
                        }
                    });
            }
        }

        ui.add_space(8.0);
        ui.heading(CHART_HEADING);
        if chart.is_empty() {
            ui.colored_label(Color32::GRAY, NO_CHART);
            return;
        }

        if let Some(action) = plot.render_bar_chart(ui, chart) {
            actions.push(action);
        }

        if !plot.show_legend {
            ui.horizontal(|ui| {
                for series in &chart.series {
                    ui.colored_label(color32(series.color), "■");
                    ui.label(&series.label);
                }
            });
        }

        if let Some(selection) = interaction.selection() {
            ui.label(RichText::new(format!("Selected: {}", selection.describe())).strong());
        }
    }
}

/// Renders the parameters-over-rows line chart
pub struct LineChartPanel;

impl LineChartPanel {
    pub fn render(ui: &mut Ui, chart: &ChartData, plot: &PlotView) {
        if chart.is_empty() || chart.series.is_empty() {
            return;
        }
        let names: Vec<&str> = chart.series.iter().map(|s| s.label.as_str()).collect();
        ui.heading(format!("{} over rows", names.join(" / ")));
        plot.render_line_chart(ui, chart);
    }
}
