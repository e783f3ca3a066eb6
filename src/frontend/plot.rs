//! Plot rendering module using egui_plot
//!
//! # Charts
//!
//! - **Line chart**: the leading parameters plotted over 1-based row number.
//!   Absent values are skipped, so the line connects the neighbouring
//!   present points.
//! - **Bar chart**: summary statistics grouped per parameter. Parameter `i`
//!   sits at `x = i`; its bars are spread symmetrically around it.
//!
//! Clicks on the bar chart are mapped back to plot coordinates and resolved
//! with [`bar_hit_test`], which does not depend on egui.

use crate::analysis::{ChartData, ChartSeries};
use crate::frontend::state::AppAction;
use crate::interaction::ChartElement;
use egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Corner, GridMark, Legend, Line, Plot, PlotPoints};
use std::ops::RangeInclusive;

/// Width of one bar in category units
pub const BAR_WIDTH: f64 = 0.18;

/// Chart height in points
const CHART_HEIGHT: f32 = 260.0;

/// Plot view configuration
#[derive(Debug, Clone)]
pub struct PlotView {
    /// Whether to show the legend
    pub show_legend: bool,
    /// Line width for the row chart
    pub line_width: f32,
}

impl Default for PlotView {
    fn default() -> Self {
        Self {
            show_legend: true,
            line_width: 1.5,
        }
    }
}

impl PlotView {
    pub fn new(show_legend: bool) -> Self {
        Self {
            show_legend,
            ..Self::default()
        }
    }

    fn legend(&self) -> Option<Legend> {
        self.show_legend
            .then(|| Legend::default().position(Corner::RightTop).background_alpha(0.8))
    }

    /// Render the parameters-over-rows line chart
    pub fn render_line_chart(&self, ui: &mut Ui, chart: &ChartData) {
        let row_count = chart.labels.len();
        let mut plot = Plot::new("row_line_chart")
            .height(CHART_HEIGHT)
            .show_axes(true)
            .x_axis_label("Row")
            .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
                row_label(mark.value, row_count)
            });
        if let Some(legend) = self.legend() {
            plot = plot.legend(legend);
        }

        plot.show(ui, |plot_ui| {
            for series in &chart.series {
                let points: Vec<[f64; 2]> = series
                    .points()
                    .map(|(i, v)| [(i + 1) as f64, v])
                    .collect();
                if points.is_empty() {
                    continue;
                }

                let line = Line::new(&series.label, PlotPoints::from(points))
                    .color(color32(series.color))
                    .width(self.line_width);
                plot_ui.line(line);
            }
        });
    }

    /// Render the grouped statistics bar chart.
    ///
    /// Returns [`AppAction::ChartClicked`] when the chart was clicked this frame.
    pub fn render_bar_chart(&self, ui: &mut Ui, chart: &ChartData) -> Option<AppAction> {
        let labels = chart.labels.clone();
        let mut plot = Plot::new("summary_bar_chart")
            .height(CHART_HEIGHT)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .show_axes(true)
            .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
                category_label(&labels, mark.value)
            });
        if let Some(legend) = self.legend() {
            plot = plot.legend(legend);
        }

        let series_count = chart.series.len();
        let response = plot.show(ui, |plot_ui| {
            for (s, series) in chart.series.iter().enumerate() {
                plot_ui.bar_chart(bar_series(series, bar_offset(s, series_count)));
            }
        });

        if !response.response.clicked() {
            return None;
        }
        let hit = response
            .response
            .interact_pointer_pos()
            .and_then(|pos| {
                let point = response.transform.value_from_position(pos);
                bar_hit_test(point.x, point.y, chart)
            });
        tracing::debug!("Bar chart clicked: {:?}", hit);
        Some(AppAction::ChartClicked(hit))
    }
}

/// One egui bar chart for a series; absent slots get no bar
fn bar_series(series: &ChartSeries, offset: f64) -> BarChart {
    let bars = series
        .points()
        .map(|(i, v)| Bar::new(i as f64 + offset, v).width(BAR_WIDTH))
        .collect();
    BarChart::new(&series.label, bars).color(color32(series.color))
}

/// Horizontal offset of series `index` out of `count` from its category center.
///
/// Four series give offsets -1.5w, -0.5w, +0.5w and +1.5w.
pub fn bar_offset(index: usize, count: usize) -> f64 {
    (index as f64 - (count as f64 - 1.0) / 2.0) * BAR_WIDTH
}

/// Find the drawn bar containing plot point `(x, y)`.
///
/// Bars span `[0, value]` vertically (or `[value, 0]` for negatives) and
/// [`BAR_WIDTH`] horizontally. Absent slots have no bar and never hit.
pub fn bar_hit_test(x: f64, y: f64, chart: &ChartData) -> Option<ChartElement> {
    if !x.is_finite() || !y.is_finite() || chart.labels.is_empty() {
        return None;
    }
    let count = chart.series.len();
    let index = x.round();
    if index < 0.0 || index >= chart.labels.len() as f64 {
        return None;
    }
    let index = index as usize;

    (0..count).find_map(|dataset_index| {
        let center = index as f64 + bar_offset(dataset_index, count);
        if (x - center).abs() > BAR_WIDTH / 2.0 {
            return None;
        }
        let value = chart.value_at(dataset_index, index)?.value()?;
        let (low, high) = if value < 0.0 { (value, 0.0) } else { (0.0, value) };
        (low..=high)
            .contains(&y)
            .then(|| ChartElement::new(dataset_index, index))
    })
}

/// Axis text for an integral category position, empty elsewhere
fn category_label(labels: &[String], position: f64) -> String {
    if position.fract().abs() > f64::EPSILON || position < 0.0 {
        return String::new();
    }
    labels.get(position as usize).cloned().unwrap_or_default()
}

/// Axis text for a 1-based row number, empty off the rows
fn row_label(position: f64, row_count: usize) -> String {
    if position.fract().abs() > f64::EPSILON || position < 1.0 || position > row_count as f64 {
        return String::new();
    }
    format!("{}", position as usize)
}

pub fn color32(rgba: [u8; 4]) -> Color32 {
    Color32::from_rgba_unmultiplied(rgba[0], rgba[1], rgba[2], rgba[3])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::derive_summary_series;
    use crate::types::{StatKind, Summary};
    use serde_json::json;

    fn chart() -> ChartData {
        let summary: Summary = serde_json::from_value(json!({
            "temperature": {"mean": 21.0, "median": 20.5, "min": 20.0, "max": 22.5},
            "pressure": {"mean": 1.3, "median": null, "min": -0.5, "max": 1.6},
        }))
        .unwrap();
        derive_summary_series(
            &summary,
            &[StatKind::Mean, StatKind::Median, StatKind::Min, StatKind::Max],
        )
    }

    #[test]
    fn test_bar_offsets_are_symmetric() {
        let offsets: Vec<f64> = (0..4).map(|i| bar_offset(i, 4)).collect();
        let expected = [-1.5 * BAR_WIDTH, -0.5 * BAR_WIDTH, 0.5 * BAR_WIDTH, 1.5 * BAR_WIDTH];
        for (got, want) in offsets.iter().zip(expected) {
            assert!((got - want).abs() < 1e-12);
        }
        assert_eq!(bar_offset(0, 1), 0.0);
    }

    #[test]
    fn test_hit_inside_bar() {
        let chart = chart();
        // max of temperature: centered at 0 + 1.5w
        let hit = bar_hit_test(1.5 * BAR_WIDTH, 10.0, &chart);
        assert_eq!(hit, Some(ChartElement::new(3, 0)));

        // mean of pressure: centered at 1 - 1.5w
        let hit = bar_hit_test(1.0 - 1.5 * BAR_WIDTH + 0.05, 1.0, &chart);
        assert_eq!(hit, Some(ChartElement::new(0, 1)));
    }

    #[test]
    fn test_hit_negative_bar() {
        let chart = chart();
        let x = 1.0 + bar_offset(2, 4);
        assert_eq!(bar_hit_test(x, -0.25, &chart), Some(ChartElement::new(2, 1)));
        assert_eq!(bar_hit_test(x, 0.25, &chart), None);
    }

    #[test]
    fn test_miss_above_bar_and_between_groups() {
        let chart = chart();
        assert_eq!(bar_hit_test(1.5 * BAR_WIDTH, 30.0, &chart), None);
        assert_eq!(bar_hit_test(0.5, 1.0, &chart), None);
        assert_eq!(bar_hit_test(-1.0, 1.0, &chart), None);
        assert_eq!(bar_hit_test(5.0, 1.0, &chart), None);
        assert_eq!(bar_hit_test(f64::NAN, 1.0, &chart), None);
    }

    #[test]
    fn test_absent_slot_has_no_bar() {
        let chart = chart();
        let x = 1.0 + bar_offset(1, 4);
        assert_eq!(bar_hit_test(x, 0.0, &chart), None);
    }

    #[test]
    fn test_empty_chart() {
        assert_eq!(bar_hit_test(0.0, 0.0, &ChartData::default()), None);
    }

    #[test]
    fn test_row_label_matches_line_labels() {
        let rows = vec![crate::types::Row::new(); 3];
        let line = crate::analysis::derive_line_series(&rows, &["a"]);
        for (i, label) in line.labels.iter().enumerate() {
            assert_eq!(&row_label((i + 1) as f64, rows.len()), label);
        }
        assert_eq!(row_label(0.0, 3), "");
        assert_eq!(row_label(2.5, 3), "");
        assert_eq!(row_label(4.0, 3), "");
    }

    #[test]
    fn test_category_label() {
        let labels = vec!["a".to_string(), "b".to_string()];
        assert_eq!(category_label(&labels, 1.0), "b");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, -1.0), "");
        assert_eq!(category_label(&labels, 7.0), "");
    }
}
