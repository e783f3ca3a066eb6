//! Analysis module for turning fetched datasets into chart data
//!
//! This module provides the data normalization layer:
//! - Numeric coercion of inconsistently typed raw values
//! - Line series of the leading parameters over row index
//! - Grouped statistic series over all summary parameters

pub mod coerce;
pub mod series;

pub use coerce::{coerce, parse_numeric_text, Numeric};
pub use series::{
    derive_line_series, derive_summary_series, ChartData, ChartSeries, DEFAULT_CHART_STATS,
    LINE_SERIES_COLORS, MAX_LINE_SERIES,
};
