//! Report layer
//! - store.rs: SQLite-backed persistence of drift records
//! - view.rs: Flat tabular view with alias filtering
//! - narrator.rs: One-line summaries of a report

pub mod narrator;
pub mod store;
pub mod view;

use std::path::{Path, PathBuf};

use crate::version::checker::DriftRecord;

pub use narrator::{interpret_report, summarize};
pub use store::ReportStore;
pub use view::{ReportRow, ReportView};

/// Whether an inspection found a catalog to check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestState {
    /// No catalog exists at this path; the report is empty
    Absent(PathBuf),
    /// The catalog at this path was parsed
    Parsed(PathBuf),
}

impl ManifestState {
    pub fn path(&self) -> &Path {
        match self {
            ManifestState::Absent(path) | ManifestState::Parsed(path) => path,
        }
    }
}

/// Outcome of one inspection run, in catalog declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub manifest: ManifestState,
    pub records: Vec<DriftRecord>,
}

impl Report {
    pub fn manifest_found(&self) -> bool {
        matches!(self.manifest, ManifestState::Parsed(_))
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn outdated_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_outdated()).count()
    }

    pub fn view(&self) -> ReportView {
        ReportView::flatten(&self.records)
    }
}
