//! Chart series derived from rows and summaries
//!
//! Both derivations are total: every output series has exactly one slot per
//! label, and slots that cannot be filled are [`Numeric::Absent`]. The view
//! rebuilds them whenever a rows page or summary arrives.

use super::coerce::{coerce, Numeric};
use crate::types::{Row, StatKind, Summary};

/// Maximum number of parameters plotted over row index
pub const MAX_LINE_SERIES: usize = 2;

/// Colors of the line series, by position (blue, orange)
pub const LINE_SERIES_COLORS: [[u8; 4]; MAX_LINE_SERIES] =
    [[0x1f, 0x77, 0xb4, 255], [0xff, 0x7f, 0x0e, 255]];

/// Statistics shown in the summary bar chart
pub const DEFAULT_CHART_STATS: [StatKind; 4] =
    [StatKind::Mean, StatKind::Median, StatKind::Min, StatKind::Max];

/// One named, ordered sequence of values
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub values: Vec<Numeric>,
    /// RGBA
    pub color: [u8; 4],
}

impl ChartSeries {
    /// Present values with their slot index
    pub fn points(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.value().map(|v| (i, v)))
    }
}

/// Labels along the category axis plus the series drawn over them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub series: Vec<ChartSeries>,
}

impl ChartData {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Value of one slot, `None` if out of range
    pub fn value_at(&self, dataset_index: usize, index: usize) -> Option<Numeric> {
        self.series
            .get(dataset_index)
            .and_then(|s| s.values.get(index))
            .copied()
    }
}

/// Plot the chosen parameters over row index.
///
/// Only the first [`MAX_LINE_SERIES`] parameters are used. Labels are the
/// 1-based row numbers.
pub fn derive_line_series<S: AsRef<str>>(rows: &[Row], parameters: &[S]) -> ChartData {
    let labels = (1..=rows.len()).map(|i| i.to_string()).collect();

    let series = parameters
        .iter()
        .take(MAX_LINE_SERIES)
        .zip(LINE_SERIES_COLORS)
        .map(|(parameter, color)| {
            let parameter = parameter.as_ref();
            ChartSeries {
                label: parameter.to_string(),
                values: rows.iter().map(|row| coerce(row.get(parameter))).collect(),
                color,
            }
        })
        .collect();

    ChartData { labels, series }
}

/// One series per statistic kind, one slot per summary parameter
pub fn derive_summary_series(summary: &Summary, stats: &[StatKind]) -> ChartData {
    let labels: Vec<String> = summary.parameters().map(str::to_string).collect();

    let series = stats
        .iter()
        .map(|&kind| ChartSeries {
            label: kind.key().to_string(),
            values: labels
                .iter()
                .map(|parameter| coerce(summary.stat(parameter, kind)))
                .collect(),
            color: kind.color(),
        })
        .collect();

    ChartData { labels, series }
}
