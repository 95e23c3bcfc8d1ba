use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::version::checker::UnresolvedPolicy;

// =============================================================================
// Registry-related constants
// =============================================================================

/// Default Maven Central search API
pub const DEFAULT_SEARCH_BASE_URL: &str = "https://search.maven.org";

/// Default base for human-browsable artifact pages
pub const DEFAULT_LINK_BASE_URL: &str = "https://mvnrepository.com/artifact";

/// Timeout for a single registry request in milliseconds (5 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 5_000;

/// Initial delay before retrying a failed registry request (200ms)
pub const RETRY_BACKOFF_MS: u64 = 200;

/// Upper bound for the exponential retry delay (5 seconds)
pub const MAX_RETRY_BACKOFF_MS: u64 = 5_000;

/// Number of registry lookups allowed in flight at once
pub const DEFAULT_MAX_CONCURRENT_LOOKUPS: usize = 8;

// =============================================================================
// File-related constants
// =============================================================================

/// Version catalog location relative to the project root
pub const DEFAULT_MANIFEST_PATH: &str = "gradle/libs.versions.toml";

/// File name of the persisted report
pub const DEFAULT_REPORT_FILE_NAME: &str = "dependency_report.db";

/// Inspector configuration structure
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct InspectorConfig {
    /// Catalog path relative to the project root
    pub manifest_path: PathBuf,
    pub registry: RegistryConfig,
    /// Upper bound on concurrent registry lookups
    pub max_concurrent_lookups: usize,
    /// Status assigned when a lookup was attempted but produced no version
    pub unresolved_status: UnresolvedPolicy,
    pub report_file_name: String,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            manifest_path: PathBuf::from(DEFAULT_MANIFEST_PATH),
            registry: RegistryConfig::default(),
            max_concurrent_lookups: DEFAULT_MAX_CONCURRENT_LOOKUPS,
            unresolved_status: UnresolvedPolicy::default(),
            report_file_name: DEFAULT_REPORT_FILE_NAME.to_string(),
        }
    }
}

impl InspectorConfig {
    /// Reads a JSON configuration file. Missing fields fall back to defaults.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Concurrency bound, never below one
    pub fn concurrency(&self) -> usize {
        self.max_concurrent_lookups.max(1)
    }

    /// Catalog location for the given project root
    pub fn manifest_location(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.manifest_path)
    }

    /// Default report location for the given directory
    pub fn report_location(&self, dir: &Path) -> PathBuf {
        dir.join(&self.report_file_name)
    }
}

/// Registry client configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RegistryConfig {
    pub base_url: String,
    pub link_base_url: String,
    pub timeout_ms: u64,
    /// Extra attempts after a connection failure
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SEARCH_BASE_URL.to_string(),
            link_base_url: DEFAULT_LINK_BASE_URL.to_string(),
            timeout_ms: FETCH_TIMEOUT_MS,
            max_retries: 0,
            retry_backoff_ms: RETRY_BACKOFF_MS,
        }
    }
}

/// Returns the path to the data directory for catalog-drift.
/// Uses $XDG_DATA_HOME/catalog-drift if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/catalog-drift,
/// or ./catalog-drift if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("catalog-drift.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("catalog-drift")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn inspector_config_from_partial_object_uses_defaults_for_missing_fields() {
        let result = serde_json::from_value::<InspectorConfig>(json!({
            "registry": {
                "timeoutMs": 1000
            }
        }))
        .unwrap();

        assert_eq!(result.registry.timeout_ms, 1000);
        assert_eq!(result.registry.base_url, DEFAULT_SEARCH_BASE_URL);
        assert_eq!(result.max_concurrent_lookups, DEFAULT_MAX_CONCURRENT_LOOKUPS);
        assert_eq!(result.unresolved_status, UnresolvedPolicy::UpToDate);
    }

    #[test]
    fn inspector_config_from_full_object_parses_all_fields() {
        let result = serde_json::from_value::<InspectorConfig>(json!({
            "manifestPath": "catalog/deps.toml",
            "registry": {
                "baseUrl": "http://localhost:8080",
                "linkBaseUrl": "http://localhost:8080/artifact",
                "timeoutMs": 2000,
                "maxRetries": 3,
                "retryBackoffMs": 50
            },
            "maxConcurrentLookups": 16,
            "unresolvedStatus": "unknown",
            "reportFileName": "drift.db"
        }))
        .unwrap();

        assert_eq!(
            result,
            InspectorConfig {
                manifest_path: PathBuf::from("catalog/deps.toml"),
                registry: RegistryConfig {
                    base_url: "http://localhost:8080".to_string(),
                    link_base_url: "http://localhost:8080/artifact".to_string(),
                    timeout_ms: 2000,
                    max_retries: 3,
                    retry_backoff_ms: 50,
                },
                max_concurrent_lookups: 16,
                unresolved_status: UnresolvedPolicy::Unknown,
                report_file_name: "drift.db".to_string(),
            }
        );
    }

    #[test]
    fn concurrency_is_clamped_to_one() {
        let config = InspectorConfig {
            max_concurrent_lookups: 0,
            ..Default::default()
        };

        assert_eq!(config.concurrency(), 1);
    }

    #[test]
    fn manifest_location_joins_catalog_path_under_root() {
        let config = InspectorConfig::default();

        assert_eq!(
            config.manifest_location(Path::new("/work/app")),
            PathBuf::from("/work/app/gradle/libs.versions.toml")
        );
        assert_eq!(
            config.report_location(Path::new("/work/app")),
            PathBuf::from("/work/app/dependency_report.db")
        );
    }

    #[test]
    fn data_dir_with_env_uses_xdg_data_home_when_set() {
        let path = data_dir_with_env(
            Some("/tmp/test-data".to_string()),
            Some(PathBuf::from("/home/user")),
        );

        assert_eq!(path, PathBuf::from("/tmp/test-data/catalog-drift"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_home_local_share() {
        let path = data_dir_with_env(None, Some(PathBuf::from("/home/user")));

        assert_eq!(path, PathBuf::from("/home/user/.local/share/catalog-drift"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_current_dir_when_no_dirs_available() {
        let path = data_dir_with_env(None, None);
        assert_eq!(path, PathBuf::from("./catalog-drift"));
    }
}
