//! Table models for the raw rows and the summary statistics
//!
//! Cell text is produced on demand so that large row pages are only
//! formatted for the rows actually on screen.

use crate::types::{display_raw, Row, StatKind, Summary};

pub const NO_ROWS: &str = "No rows available";
pub const NO_SUMMARY: &str = "No numeric summary available";
pub const NO_CHART: &str = "No numeric columns to chart";
pub const SUMMARY_HEADING: &str = "Output Table (summary statistics)";
pub const CHART_HEADING: &str = "Output Chart \u{2014} mean / median / min / max per parameter";

/// Heading of the raw data table
pub fn rows_heading(count: usize) -> String {
    format!("Given Data ({} rows)", count)
}

/// Raw rows with columns taken from the first row's key order
#[derive(Debug, Clone, Copy)]
pub struct RawTable<'a> {
    rows: &'a [Row],
}

impl<'a> RawTable<'a> {
    /// `None` when there is nothing to show
    pub fn new(rows: &'a [Row]) -> Option<Self> {
        (!rows.is_empty()).then_some(Self { rows })
    }

    pub fn columns(&self) -> impl Iterator<Item = &'a str> {
        self.rows
            .first()
            .into_iter()
            .flat_map(|row| row.keys().map(String::as_str))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Display text of one cell; missing keys render empty
    pub fn cell(&self, row: usize, column: &str) -> String {
        display_raw(self.rows.get(row).and_then(|r| r.get(column)))
    }
}

/// Column headers of the summary table
pub fn summary_columns() -> Vec<&'static str> {
    std::iter::once("Parameter")
        .chain(StatKind::ALL.iter().map(|kind| kind.key()))
        .collect()
}

/// One line per parameter: name then every statistic, `None` for an empty summary
pub fn summary_rows(summary: &Summary) -> Option<Vec<Vec<String>>> {
    if summary.is_empty() {
        return None;
    }
    let rows = summary
        .parameters()
        .map(|parameter| {
            std::iter::once(parameter.to_string())
                .chain(
                    StatKind::ALL
                        .iter()
                        .map(|&kind| display_raw(summary.stat(parameter, kind))),
                )
                .collect()
        })
        .collect();
    Some(rows)
}
