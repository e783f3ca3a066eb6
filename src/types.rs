//! Core data types for ChemVis-RS
//!
//! This module contains the wire-level data structures exchanged with the
//! dataset backend.
//!
//! # Main Types
//!
//! - [`Dataset`] - Identity and metadata of one uploaded CSV
//! - [`Row`] - One CSV line as an ordered column → raw value mapping
//! - [`RowPage`] - A page of rows plus the backend's total row count
//! - [`Summary`] - Per-parameter descriptive statistics
//! - [`StatKind`] - The statistic kinds a summary record may carry
//! - [`UploadReceipt`] - What the backend returns for a successful upload
//!
//! # Raw values
//!
//! The backend is inconsistent about value types: a statistic may arrive as a
//! number, a numeric string or `null`, and row cells are whatever pandas
//! produced. Values are therefore kept as [`serde_json::Value`] and only
//! interpreted by [`crate::analysis::coerce`]. `serde_json` is built with
//! `preserve_order`, so rows and summaries keep the backend's key order.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Opaque backend identifier of a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetId(pub u64);

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One uploaded dataset as listed by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub id: DatasetId,
    pub name: String,
    #[serde(default)]
    pub row_count: u64,
    /// Upload timestamp exactly as the backend sent it
    #[serde(default)]
    pub upload_time: Option<String>,
    #[serde(default)]
    pub checksum: Option<String>,
}

impl Dataset {
    /// Create a dataset entry with only the required fields
    pub fn new(id: u64, name: impl Into<String>, row_count: u64) -> Self {
        Self {
            id: DatasetId(id),
            name: name.into(),
            row_count,
            upload_time: None,
            checksum: None,
        }
    }

    /// Parse the upload timestamp.
    ///
    /// Accepts RFC 3339 and naive ISO timestamps (the latter are taken as UTC).
    pub fn uploaded_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.upload_time.as_deref()?.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }

    /// Button text used by the dataset list
    pub fn display_label(&self) -> String {
        format!("{} ({} rows)", self.name, self.row_count)
    }
}

/// One CSV line: column name → raw value, in column order
pub type Row = Map<String, Value>;

/// A page of rows as returned by `GET datasets/{id}/rows/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub rows: Vec<Row>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// The statistics a summary record may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatKind {
    Count,
    Mean,
    Median,
    Min,
    Max,
    Std,
}

impl StatKind {
    /// All kinds in statistics-table column order
    pub const ALL: [StatKind; 6] = [
        StatKind::Count,
        StatKind::Mean,
        StatKind::Median,
        StatKind::Min,
        StatKind::Max,
        StatKind::Std,
    ];

    /// JSON key of this statistic inside a summary record
    pub fn key(self) -> &'static str {
        match self {
            StatKind::Count => "count",
            StatKind::Mean => "mean",
            StatKind::Median => "median",
            StatKind::Min => "min",
            StatKind::Max => "max",
            StatKind::Std => "std",
        }
    }

    /// Fixed chart color, stable across renders and datasets
    pub fn color(self) -> [u8; 4] {
        match self {
            StatKind::Mean => [0x1f, 0x77, 0xb4, 255],
            StatKind::Median => [0xff, 0x7f, 0x0e, 255],
            StatKind::Min => [0x2c, 0xa0, 0x2c, 255],
            StatKind::Max => [0xd6, 0x27, 0x28, 255],
            StatKind::Count => [0x94, 0x67, 0xbd, 255],
            StatKind::Std => [0x8c, 0x56, 0x4b, 255],
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Per-parameter statistics, in the order the backend listed the parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Summary(pub Map<String, Value>);

impl Summary {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Parameter names in mapping order
    pub fn parameters(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// The first `n` parameter names in mapping order
    pub fn leading_parameters(&self, n: usize) -> Vec<String> {
        self.0.keys().take(n).cloned().collect()
    }

    /// Raw value of one statistic.
    ///
    /// Returns `None` when the parameter is unknown, its record is not an
    /// object, or the record lacks the field.
    pub fn stat(&self, parameter: &str, kind: StatKind) -> Option<&Value> {
        self.0
            .get(parameter)
            .and_then(Value::as_object)
            .and_then(|record| record.get(kind.key()))
    }
}

/// Body of `GET datasets/{id}/summary/`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: Summary,
}

/// What the backend returns for a successful upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadReceipt {
    #[serde(default)]
    pub id: Option<DatasetId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub row_count: Option<u64>,
    #[serde(default)]
    pub upload_time: Option<String>,
}

impl UploadReceipt {
    /// The listed dataset this upload produced, if the backend returned an id
    pub fn to_dataset(&self) -> Option<Dataset> {
        self.id.map(|id| Dataset {
            id,
            name: self.name.clone(),
            row_count: self.row_count.unwrap_or(0),
            upload_time: self.upload_time.clone(),
            checksum: None,
        })
    }
}

/// Text shown for a raw value in a table cell.
///
/// Strings are shown verbatim, `null` as an empty cell, everything else in
/// its JSON form.
pub fn display_raw(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dataset_deserialize_minimal() {
        let ds: Dataset = serde_json::from_value(json!({"id": 7, "name": "pumps.csv"})).unwrap();
        assert_eq!(ds.id, DatasetId(7));
        assert_eq!(ds.row_count, 0);
        assert_eq!(ds.display_label(), "pumps.csv (0 rows)");
    }

    #[test]
    fn test_uploaded_at_formats() {
        let mut ds = Dataset::new(1, "a", 3);
        ds.upload_time = Some("2025-02-01T10:30:00.123456Z".to_string());
        assert!(ds.uploaded_at().is_some());

        ds.upload_time = Some("2025-02-01T10:30:00".to_string());
        let ts = ds.uploaded_at().unwrap();
        assert_eq!(ts.to_rfc3339(), "2025-02-01T10:30:00+00:00");

        ds.upload_time = Some("yesterday".to_string());
        assert!(ds.uploaded_at().is_none());
    }

    #[test]
    fn test_summary_preserves_backend_order() {
        let summary: Summary = serde_json::from_str(
            r#"{"zeta": {"mean": 1}, "alpha": {"mean": 2}, "mid": {"mean": 3}}"#,
        )
        .unwrap();
        let params: Vec<_> = summary.parameters().collect();
        assert_eq!(params, vec!["zeta", "alpha", "mid"]);
        assert_eq!(summary.leading_parameters(2), vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_summary_stat_lookup() {
        let summary: Summary =
            serde_json::from_value(json!({"a": {"mean": "1.5"}, "b": null, "c": 4})).unwrap();
        assert_eq!(summary.stat("a", StatKind::Mean), Some(&json!("1.5")));
        assert_eq!(summary.stat("a", StatKind::Max), None);
        assert_eq!(summary.stat("b", StatKind::Mean), None);
        assert_eq!(summary.stat("c", StatKind::Mean), None);
        assert_eq!(summary.stat("missing", StatKind::Mean), None);
    }

    #[test]
    fn test_null_bodies_become_empty() {
        let page: RowPage = serde_json::from_str(r#"{"rows": null}"#).unwrap();
        assert!(page.rows.is_empty());
        let resp: SummaryResponse = serde_json::from_str(r#"{"summary": null}"#).unwrap();
        assert!(resp.summary.is_empty());
        let resp: SummaryResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.summary.is_empty());
    }

    #[test]
    fn test_stat_kind_keys_and_serde() {
        assert_eq!(StatKind::Median.key(), "median");
        assert_eq!(serde_json::to_string(&StatKind::Std).unwrap(), "\"std\"");
        assert_eq!(StatKind::ALL.len(), 6);
    }

    #[test]
    fn test_display_raw() {
        assert_eq!(display_raw(Some(&json!("abc"))), "abc");
        assert_eq!(display_raw(Some(&json!(12))), "12");
        assert_eq!(display_raw(Some(&json!(1.5))), "1.5");
        assert_eq!(display_raw(Some(&Value::Null)), "");
        assert_eq!(display_raw(None), "");
    }

    #[test]
    fn test_receipt_to_dataset() {
        let receipt: UploadReceipt =
            serde_json::from_value(json!({"id": 3, "name": "r.csv", "row_count": 10})).unwrap();
        let ds = receipt.to_dataset().unwrap();
        assert_eq!(ds.id, DatasetId(3));
        assert_eq!(ds.row_count, 10);

        let receipt: UploadReceipt = serde_json::from_value(json!({"name": "r.csv"})).unwrap();
        assert!(receipt.to_dataset().is_none());
    }
}
