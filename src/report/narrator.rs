//! One-line summaries of drift reports

use crate::report::store::ReportStore;
use crate::version::checker::DriftRecord;
use crate::version::error::ReportError;

/// Summarize how many packages have a newer version on the registry
pub fn summarize(records: &[DriftRecord], registry_name: &str) -> String {
    let outdated = records.iter().filter(|r| r.is_outdated()).count();
    format!(
        "Audit complete. Found {} libraries with newer versions available on {}.",
        outdated, registry_name
    )
}

/// Load a persisted report and summarize it
pub fn interpret_report(store: &ReportStore, registry_name: &str) -> Result<String, ReportError> {
    let records = store.load()?;
    Ok(summarize(&records, registry_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::checker::{
        DriftDetail, DriftStatus, LatestVersion, REQUIRED_PLACEHOLDER,
    };
    use tempfile::TempDir;

    fn record(package: &str, status: DriftStatus) -> DriftRecord {
        DriftRecord {
            package: package.to_string(),
            current: DriftDetail {
                version: "1.0.0".to_string(),
                latest_version: LatestVersion::Found("1.0.0".to_string()),
                status,
                mvn_link: None,
                error: None,
            },
            required: REQUIRED_PLACEHOLDER.to_string(),
        }
    }

    #[test]
    fn summarize_counts_only_outdated_records() {
        let mut records: Vec<_> = (0..7)
            .map(|i| record(&format!("lib-{}", i), DriftStatus::UpToDate))
            .collect();
        records.push(record("a", DriftStatus::Outdated));
        records.push(record("b", DriftStatus::Outdated));
        records.push(record("c", DriftStatus::Outdated));
        records[0].current.status = DriftStatus::Unknown;

        assert_eq!(records.len(), 10);
        assert_eq!(
            summarize(&records, "Maven Central"),
            "Audit complete. Found 3 libraries with newer versions available on Maven Central."
        );
    }

    #[test]
    fn summarize_handles_empty_report() {
        assert_eq!(
            summarize(&[], "Maven Central"),
            "Audit complete. Found 0 libraries with newer versions available on Maven Central."
        );
    }

    #[test]
    fn interpret_report_reads_from_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = ReportStore::new(temp_dir.path().join("dependency_report.db"));
        store
            .save(&[
                record("junit", DriftStatus::UpToDate),
                record("slf4j-api", DriftStatus::Outdated),
            ])
            .unwrap();

        let summary = interpret_report(&store, "Maven Central").unwrap();

        assert_eq!(
            summary,
            "Audit complete. Found 1 libraries with newer versions available on Maven Central."
        );
    }

    #[test]
    fn interpret_report_fails_for_missing_report() {
        let temp_dir = TempDir::new().unwrap();
        let store = ReportStore::new(temp_dir.path().join("missing.db"));

        let result = interpret_report(&store, "Maven Central");

        assert!(matches!(result, Err(ReportError::NotFound(_))));
    }
}
