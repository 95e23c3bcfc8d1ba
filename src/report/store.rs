use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, ErrorCode, OpenFlags};
use tracing::{debug, info, warn};

use crate::version::checker::{DriftDetail, DriftRecord, DriftStatus, LatestVersion};
use crate::version::error::ReportError;

/// Schema version stored in `PRAGMA user_version`
const SCHEMA_VERSION: i32 = 2;

/// One row per package. The nested `Current` record is spread over typed
/// `current_*` columns; `current_latest_kind` disambiguates a registry version
/// that happens to equal a sentinel string.
const CREATE_REPORT_TABLE: &str = r#"
    CREATE TABLE report (
        position INTEGER PRIMARY KEY,
        package TEXT NOT NULL,
        current_version TEXT NOT NULL,
        current_latest_version TEXT NOT NULL,
        current_latest_kind TEXT NOT NULL,
        current_status TEXT NOT NULL,
        current_mvn_link TEXT,
        current_error TEXT,
        required TEXT NOT NULL
    )
"#;

const INSERT_RECORD: &str = r#"
    INSERT INTO report (
        position, package,
        current_version, current_latest_version, current_latest_kind,
        current_status, current_mvn_link, current_error,
        required
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
"#;

const SELECT_RECORDS: &str = r#"
    SELECT package,
        current_version, current_latest_version, current_latest_kind,
        current_status, current_mvn_link, current_error,
        required
    FROM report
    ORDER BY position
"#;

/// Columns of one stored row, before validation
struct StoredRow {
    package: String,
    version: String,
    latest_version: String,
    latest_kind: String,
    status: String,
    mvn_link: Option<String>,
    error: Option<String>,
    required: String,
}

impl StoredRow {
    fn into_record(self) -> Result<DriftRecord, ReportError> {
        let package = self.package;
        let latest_version = LatestVersion::from_kind(&self.latest_kind, self.latest_version)
            .ok_or_else(|| {
                ReportError::Corrupt(format!(
                    "invalid latest version kind '{}' for '{}'",
                    self.latest_kind, package
                ))
            })?;
        let status: DriftStatus = self.status.parse().map_err(|e| {
            ReportError::Corrupt(format!("invalid record for '{}': {}", package, e))
        })?;

        Ok(DriftRecord {
            package,
            current: DriftDetail {
                version: self.version,
                latest_version,
                status,
                mvn_link: self.mvn_link,
                error: self.error,
            },
            required: self.required,
        })
    }
}

/// A drift report persisted as a single SQLite file.
///
/// Every save replaces the previous report as a whole: records are written to a
/// sibling temp file which is then renamed over the target.
pub struct ReportStore {
    path: PathBuf,
}

impl ReportStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn temp_path(&self) -> PathBuf {
        let mut file_name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        file_name.push(".tmp");
        self.path.with_file_name(file_name)
    }

    pub fn save(&self, records: &[DriftRecord]) -> Result<(), ReportError> {
        info!("Saving {} records to {:?}", records.len(), self.path);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.temp_path();
        if temp_path.exists() {
            fs::remove_file(&temp_path)?;
        }

        let result = Self::write_records(&temp_path, records)
            .and_then(|()| fs::rename(&temp_path, &self.path).map_err(ReportError::from));

        if result.is_err() {
            let _ = fs::remove_file(&temp_path)
                .inspect_err(|e| warn!("Failed to remove {:?}: {}", temp_path, e));
        }

        result
    }

    fn write_records(path: &Path, records: &[DriftRecord]) -> Result<(), ReportError> {
        let mut conn = Connection::open(path)?;

        conn.execute(CREATE_REPORT_TABLE, [])?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;

        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(INSERT_RECORD)?;
            for (position, record) in records.iter().enumerate() {
                let current = &record.current;
                stmt.execute((
                    position as i64,
                    &record.package,
                    &current.version,
                    current.latest_version.as_str(),
                    current.latest_version.kind(),
                    current.status.as_str(),
                    &current.mvn_link,
                    &current.error,
                    &record.required,
                ))?;
            }
        }
        tx.commit()?;

        debug!("Wrote {} records to {:?}", records.len(), path);
        Ok(())
    }

    pub fn load(&self) -> Result<Vec<DriftRecord>, ReportError> {
        if !self.path.exists() {
            return Err(ReportError::NotFound(self.path.clone()));
        }

        let conn = Connection::open_with_flags(&self.path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;

        let version: i32 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .map_err(Self::corrupt_or_database)?;
        if version != SCHEMA_VERSION {
            return Err(ReportError::Corrupt(format!(
                "unsupported schema version {}",
                version
            )));
        }

        let has_table: bool = conn.query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = 'table' AND name = 'report'",
            [],
            |row| row.get(0),
        )?;
        if !has_table {
            return Err(ReportError::Corrupt("missing report table".to_string()));
        }

        let mut stmt = conn.prepare(SELECT_RECORDS).map_err(Self::corrupt_or_database)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(StoredRow {
                    package: row.get(0)?,
                    version: row.get(1)?,
                    latest_version: row.get(2)?,
                    latest_kind: row.get(3)?,
                    status: row.get(4)?,
                    mvn_link: row.get(5)?,
                    error: row.get(6)?,
                    required: row.get(7)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()
            .map_err(Self::corrupt_or_database)?;

        let records = rows
            .into_iter()
            .map(StoredRow::into_record)
            .collect::<Result<Vec<_>, ReportError>>()?;

        debug!("Loaded {} records from {:?}", records.len(), self.path);
        Ok(records)
    }

    fn corrupt_or_database(e: rusqlite::Error) -> ReportError {
        if matches!(e, rusqlite::Error::InvalidColumnType(..)) {
            return ReportError::Corrupt(format!("unexpected column type: {}", e));
        }
        match e.sqlite_error_code() {
            Some(ErrorCode::NotADatabase) => ReportError::Corrupt("not a report file".to_string()),
            _ => ReportError::Database(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::checker::REQUIRED_PLACEHOLDER;
    use rstest::rstest;
    use tempfile::TempDir;

    fn record(
        package: &str,
        version: &str,
        latest: LatestVersion,
        status: DriftStatus,
        link: Option<&str>,
    ) -> DriftRecord {
        DriftRecord {
            package: package.to_string(),
            current: DriftDetail {
                version: version.to_string(),
                latest_version: latest,
                status,
                mvn_link: link.map(|l| l.to_string()),
                error: None,
            },
            required: REQUIRED_PLACEHOLDER.to_string(),
        }
    }

    fn sample_records() -> Vec<DriftRecord> {
        vec![
            record(
                "slf4j-api",
                "1.7.30",
                LatestVersion::Found("2.0.9".to_string()),
                DriftStatus::Outdated,
                Some("https://mvnrepository.com/artifact/org.slf4j/slf4j-api"),
            ),
            record(
                "junit",
                "4.13.2",
                LatestVersion::Found("4.13.2".to_string()),
                DriftStatus::UpToDate,
                Some("https://mvnrepository.com/artifact/junit/junit"),
            ),
            record(
                "offline",
                "1.0",
                LatestVersion::ConnectionError,
                DriftStatus::UpToDate,
                Some("https://mvnrepository.com/artifact/com.example/offline"),
            ),
            record(
                "missing",
                "1.0",
                LatestVersion::NotFound,
                DriftStatus::UpToDate,
                Some("https://mvnrepository.com/artifact/com.example/missing"),
            ),
            record(
                "broken",
                "unknown",
                LatestVersion::Unresolved,
                DriftStatus::Unknown,
                None,
            ),
        ]
    }

    fn create_test_store() -> (TempDir, ReportStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = ReportStore::new(temp_dir.path().join("dependency_report.db"));
        (temp_dir, store)
    }

    #[test]
    fn save_then_load_round_trips_every_field() {
        let (_temp_dir, store) = create_test_store();
        let records = sample_records();

        store.save(&records).unwrap();

        assert_eq!(store.load().unwrap(), records);
    }

    #[test]
    fn save_round_trips_error_detail() {
        let (_temp_dir, store) = create_test_store();
        let mut records = sample_records();
        records[0].current.error = Some("registry timeout".to_string());

        store.save(&records).unwrap();

        assert_eq!(
            store.load().unwrap()[0].current.error.as_deref(),
            Some("registry timeout")
        );
    }

    #[test]
    fn save_replaces_previous_report() {
        let (_temp_dir, store) = create_test_store();
        store.save(&sample_records()).unwrap();

        let replacement = vec![sample_records().remove(1)];
        store.save(&replacement).unwrap();

        assert_eq!(store.load().unwrap(), replacement);
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn save_and_load_empty_report() {
        let (_temp_dir, store) = create_test_store();

        store.save(&[]).unwrap();

        assert!(store.exists());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_creates_missing_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let store = ReportStore::new(temp_dir.path().join("reports/nested/report.db"));

        store.save(&sample_records()).unwrap();

        assert_eq!(store.load().unwrap().len(), 5);
    }

    #[test]
    fn save_fails_when_target_is_a_directory() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("report.db");
        fs::create_dir(&target).unwrap();
        let store = ReportStore::new(&target);

        let result = store.save(&sample_records());

        assert!(result.is_err());
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn load_fails_with_not_found_for_missing_file() {
        let (_temp_dir, store) = create_test_store();

        let result = store.load();

        assert!(matches!(result, Err(ReportError::NotFound(_))));
    }

    #[test]
    fn load_fails_with_corrupt_for_non_database_file() {
        let (_temp_dir, store) = create_test_store();
        fs::write(store.path(), b"this is definitely not a sqlite database file").unwrap();

        let result = store.load();

        assert!(matches!(
            result,
            Err(ReportError::Corrupt(_)) | Err(ReportError::Database(_))
        ));
    }

    #[test]
    fn load_fails_with_corrupt_for_foreign_database() {
        let (_temp_dir, store) = create_test_store();
        {
            let conn = Connection::open(store.path()).unwrap();
            conn.execute("CREATE TABLE other (id INTEGER)", []).unwrap();
        }

        let result = store.load();

        assert!(matches!(result, Err(ReportError::Corrupt(_))));
    }

    #[rstest]
    #[case("UPDATE report SET current_status = 'stale'")]
    #[case("UPDATE report SET current_latest_kind = 'guessed'")]
    #[case("UPDATE report SET current_version = x'00ff'")]
    fn load_fails_with_corrupt_for_undecodable_record(#[case] tamper: &str) {
        let (_temp_dir, store) = create_test_store();
        store.save(&sample_records()).unwrap();
        {
            let conn = Connection::open(store.path()).unwrap();
            conn.execute(tamper, []).unwrap();
        }

        let result = store.load();

        assert!(matches!(result, Err(ReportError::Corrupt(_))));
    }

    #[test]
    fn save_then_load_keeps_versions_that_look_like_sentinels() {
        let (_temp_dir, store) = create_test_store();
        let records = vec![
            record(
                "odd-unknown",
                "1.0",
                LatestVersion::Found("unknown".to_string()),
                DriftStatus::Outdated,
                Some("https://mvnrepository.com/artifact/com.example/odd-unknown"),
            ),
            record(
                "odd-missing",
                "1.0",
                LatestVersion::Found("Not Found".to_string()),
                DriftStatus::Outdated,
                Some("https://mvnrepository.com/artifact/com.example/odd-missing"),
            ),
        ];

        store.save(&records).unwrap();

        assert_eq!(store.load().unwrap(), records);
    }

    #[test]
    fn stored_nested_record_uses_typed_columns() {
        let (_temp_dir, store) = create_test_store();
        store.save(&sample_records()).unwrap();

        let conn = Connection::open(store.path()).unwrap();
        let columns: Vec<(String, String, bool)> = conn
            .prepare("PRAGMA table_info(report)")
            .unwrap()
            .query_map([], |row| Ok((row.get(1)?, row.get(2)?, row.get(3)?)))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        let columns: Vec<(&str, &str, bool)> = columns
            .iter()
            .map(|(name, ty, not_null)| (name.as_str(), ty.as_str(), *not_null))
            .collect();
        assert_eq!(
            columns,
            vec![
                ("position", "INTEGER", false),
                ("package", "TEXT", true),
                ("current_version", "TEXT", true),
                ("current_latest_version", "TEXT", true),
                ("current_latest_kind", "TEXT", true),
                ("current_status", "TEXT", true),
                ("current_mvn_link", "TEXT", false),
                ("current_error", "TEXT", false),
                ("required", "TEXT", true),
            ]
        );

        let missing: (String, String, Option<String>) = conn
            .query_row(
                "SELECT current_latest_version, current_status, current_error \
                 FROM report WHERE package = 'missing'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();
        assert_eq!(
            missing,
            ("Not Found".to_string(), "up-to-date".to_string(), None)
        );
    }
}
