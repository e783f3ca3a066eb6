//! Test data builders for creating test objects

use chemvis_rs::{Dataset, Row, RowPage, StatKind, Summary, UploadReceipt};
use serde_json::{Map, Value};
use std::io::Write;
use std::path::PathBuf;

/// Builder for listed datasets
pub struct DatasetBuilder {
    id: u64,
    name: String,
    row_count: u64,
    upload_time: Option<String>,
}

impl DatasetBuilder {
    pub fn new(id: u64, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            row_count: 0,
            upload_time: None,
        }
    }

    pub fn row_count(mut self, row_count: u64) -> Self {
        self.row_count = row_count;
        self
    }

    pub fn uploaded(mut self, upload_time: &str) -> Self {
        self.upload_time = Some(upload_time.to_string());
        self
    }

    pub fn build(self) -> Dataset {
        let mut dataset = Dataset::new(self.id, self.name, self.row_count);
        dataset.upload_time = self.upload_time;
        dataset
    }

    pub fn receipt(self) -> UploadReceipt {
        let dataset = self.build();
        UploadReceipt {
            id: Some(dataset.id),
            name: dataset.name,
            row_count: Some(dataset.row_count),
            upload_time: dataset.upload_time,
        }
    }
}

/// Builder for summaries, keeping parameters in insertion order
#[derive(Default)]
pub struct SummaryBuilder {
    records: Map<String, Value>,
}

impl SummaryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stat(mut self, parameter: &str, kind: StatKind, value: f64) -> Self {
        let record = self
            .records
            .entry(parameter.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(fields) = record {
            fields.insert(kind.key().to_string(), Value::from(value));
        }
        self
    }

    /// Every statistic of a numeric column
    pub fn column(self, parameter: &str, values: &[f64]) -> Self {
        let count = values.len() as f64;
        let mean = values.iter().sum::<f64>() / count;
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let median = if sorted.len() % 2 == 1 {
            sorted[sorted.len() / 2]
        } else {
            (sorted[sorted.len() / 2 - 1] + sorted[sorted.len() / 2]) / 2.0
        };
        let variance =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1.0).max(1.0);

        self.stat(parameter, StatKind::Count, count)
            .stat(parameter, StatKind::Mean, mean)
            .stat(parameter, StatKind::Median, median)
            .stat(parameter, StatKind::Min, sorted[0])
            .stat(parameter, StatKind::Max, sorted[sorted.len() - 1])
            .stat(parameter, StatKind::Std, variance.sqrt())
    }

    pub fn build(self) -> Summary {
        Summary(self.records)
    }
}

/// Rows from CSV text; numeric cells become JSON numbers, the rest strings
pub fn rows_from_csv(csv: &str) -> Vec<Row> {
    let mut lines = csv.lines().filter(|l| !l.trim().is_empty());
    let header: Vec<&str> = lines
        .next()
        .map(|h| h.split(',').map(str::trim).collect())
        .unwrap_or_default();

    lines
        .map(|line| {
            header
                .iter()
                .zip(line.split(','))
                .map(|(column, cell)| {
                    let cell = cell.trim();
                    let value = cell
                        .parse::<f64>()
                        .map(Value::from)
                        .unwrap_or_else(|_| Value::from(cell));
                    (column.to_string(), value)
                })
                .collect()
        })
        .collect()
}

pub fn page(rows: Vec<Row>) -> RowPage {
    RowPage {
        total: Some(rows.len() as u64),
        rows,
    }
}

/// Write `contents` to a named CSV file in a fresh temp dir
pub fn csv_file(name: &str, contents: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    (dir, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_from_csv() {
        let rows = rows_from_csv("a,b\n1,x\n2.5,\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["a"], Value::from(1.0));
        assert_eq!(rows[0]["b"], Value::from("x"));
        assert_eq!(rows[1]["b"], Value::from(""));
    }
}
