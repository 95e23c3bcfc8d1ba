//! Flat tabular view of a drift report

use std::fmt;

use serde::Serialize;

use crate::version::checker::{DriftRecord, DriftStatus};

/// One package with its nested detail projected into sibling columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub package: String,
    pub version: String,
    pub latest_version: String,
    pub status: DriftStatus,
    pub mvn_link: Option<String>,
    pub error: Option<String>,
    pub required: String,
}

impl From<&DriftRecord> for ReportRow {
    fn from(record: &DriftRecord) -> Self {
        Self {
            package: record.package.clone(),
            version: record.current.version.clone(),
            latest_version: record.current.latest_version.as_str().to_string(),
            status: record.current.status,
            mvn_link: record.current.mvn_link.clone(),
            error: record.current.error.clone(),
            required: record.required.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportView {
    rows: Vec<ReportRow>,
}

impl ReportView {
    /// One row per record, in record order
    pub fn flatten(records: &[DriftRecord]) -> Self {
        Self {
            rows: records.iter().map(ReportRow::from).collect(),
        }
    }

    /// Rows whose package alias contains `needle`, ignoring case.
    /// An empty needle keeps every row.
    pub fn filter(&self, needle: &str) -> Self {
        let needle = needle.to_lowercase();
        Self {
            rows: self
                .rows
                .iter()
                .filter(|row| row.package.to_lowercase().contains(&needle))
                .cloned()
                .collect(),
        }
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

const HEADERS: [&str; 5] = ["Package", "Version", "Latest", "Status", "Link"];

impl fmt::Display for ReportView {
    /// Aligned plain-text table
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<[&str; 5]> = self
            .rows
            .iter()
            .map(|row| {
                [
                    row.package.as_str(),
                    row.version.as_str(),
                    row.latest_version.as_str(),
                    row.status.as_str(),
                    row.mvn_link.as_deref().unwrap_or("-"),
                ]
            })
            .collect();

        let mut widths = HEADERS.map(|h| h.chars().count());
        for line in &cells {
            for (width, cell) in widths.iter_mut().zip(line) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let write_line = |f: &mut fmt::Formatter<'_>, line: &[&str; 5]| -> fmt::Result {
            let padded: Vec<String> = line
                .iter()
                .zip(widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = width))
                .collect();
            writeln!(f, "{}", padded.join("  ").trim_end())
        };

        write_line(f, &HEADERS)?;
        for line in &cells {
            write_line(f, line)?;
        }
        Ok(())
    }
}
