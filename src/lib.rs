//! Dependency drift inspection for Gradle version catalogs.
//!
//! ```text
//! catalog ──▶ parser ──▶ registry lookups ──▶ checker ──▶ report store ──▶ view / narrator
//! ```
//!
//! [`inspector::DependencyInspector`] drives a run; [`report::ReportStore`]
//! persists the result for later filtering and summarizing.

pub mod config;
pub mod inspector;
pub mod logging;
pub mod parser;
pub mod report;
pub mod version;

pub use inspector::{DependencyInspector, InspectError};
