//! Drift classification for declared package versions

use serde::{Deserialize, Serialize};

use crate::parser::types::{Coordinates, PackageDeclaration};
use crate::version::types::VersionQueryResult;

/// Placeholder stored in the `Required` column of every record
pub const REQUIRED_PLACEHOLDER: &str = "Catalog defined";

const NOT_FOUND_SENTINEL: &str = "Not Found";
const CONNECTION_ERROR_SENTINEL: &str = "Connection Error";
const UNRESOLVED_SENTINEL: &str = "unknown";

/// Drift status of a package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DriftStatus {
    /// Declared version equals the latest published version, or the lookup
    /// produced no version and the policy treats that as up to date
    UpToDate,
    /// The registry published a different version
    Outdated,
    /// Nothing could be compared
    Unknown,
}

impl DriftStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DriftStatus::UpToDate => "up-to-date",
            DriftStatus::Outdated => "outdated",
            DriftStatus::Unknown => "unknown",
        }
    }
}

impl std::str::FromStr for DriftStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "up-to-date" => Ok(DriftStatus::UpToDate),
            "outdated" => Ok(DriftStatus::Outdated),
            "unknown" => Ok(DriftStatus::Unknown),
            other => Err(format!("unknown drift status '{}'", other)),
        }
    }
}

impl std::fmt::Display for DriftStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How to classify lookups that were attempted but yielded no version
/// (package not found, connection error).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnresolvedPolicy {
    /// Report as up to date, matching the historical report format
    #[default]
    UpToDate,
    /// Report as unknown
    Unknown,
}

impl UnresolvedPolicy {
    fn status(self) -> DriftStatus {
        match self {
            UnresolvedPolicy::UpToDate => DriftStatus::UpToDate,
            UnresolvedPolicy::Unknown => DriftStatus::Unknown,
        }
    }
}

/// Latest version as recorded in a report.
///
/// The sentinel strings only exist in serialized form. A registry version that
/// equals a sentinel is ambiguous there; the report store keeps [`kind`](Self::kind)
/// alongside the string so it survives a reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum LatestVersion {
    Found(String),
    NotFound,
    ConnectionError,
    /// No lookup was attempted
    Unresolved,
}

impl LatestVersion {
    pub fn as_str(&self) -> &str {
        match self {
            LatestVersion::Found(version) => version.as_str(),
            LatestVersion::NotFound => NOT_FOUND_SENTINEL,
            LatestVersion::ConnectionError => CONNECTION_ERROR_SENTINEL,
            LatestVersion::Unresolved => UNRESOLVED_SENTINEL,
        }
    }

    /// Which variant this is, independent of the version string
    pub fn kind(&self) -> &'static str {
        match self {
            LatestVersion::Found(_) => "found",
            LatestVersion::NotFound => "not-found",
            LatestVersion::ConnectionError => "connection-error",
            LatestVersion::Unresolved => "unresolved",
        }
    }

    /// Rebuild from a [`kind`](Self::kind) and the serialized string
    pub fn from_kind(kind: &str, value: String) -> Option<Self> {
        match kind {
            "found" => Some(LatestVersion::Found(value)),
            "not-found" => Some(LatestVersion::NotFound),
            "connection-error" => Some(LatestVersion::ConnectionError),
            "unresolved" => Some(LatestVersion::Unresolved),
            _ => None,
        }
    }
}

impl From<Option<&VersionQueryResult>> for LatestVersion {
    fn from(query: Option<&VersionQueryResult>) -> Self {
        match query {
            Some(VersionQueryResult::Found(version)) => LatestVersion::Found(version.clone()),
            Some(VersionQueryResult::NotFound) => LatestVersion::NotFound,
            Some(VersionQueryResult::ConnectionError) => LatestVersion::ConnectionError,
            None => LatestVersion::Unresolved,
        }
    }
}

impl From<LatestVersion> for String {
    fn from(latest: LatestVersion) -> Self {
        match latest {
            LatestVersion::Found(version) => version,
            other => other.as_str().to_string(),
        }
    }
}

impl From<String> for LatestVersion {
    fn from(value: String) -> Self {
        match value.as_str() {
            NOT_FOUND_SENTINEL => LatestVersion::NotFound,
            CONNECTION_ERROR_SENTINEL => LatestVersion::ConnectionError,
            UNRESOLVED_SENTINEL => LatestVersion::Unresolved,
            _ => LatestVersion::Found(value),
        }
    }
}

/// Per-package detail, persisted as the nested `Current` record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftDetail {
    pub version: String,
    pub latest_version: LatestVersion,
    pub status: DriftStatus,
    pub mvn_link: Option<String>,
    /// Reserved for per-record error detail; currently always absent
    pub error: Option<String>,
}

/// Evaluation of one package declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriftRecord {
    /// Catalog alias
    pub package: String,
    pub current: DriftDetail,
    pub required: String,
}

impl DriftRecord {
    pub fn status(&self) -> DriftStatus {
        self.current.status
    }

    pub fn is_outdated(&self) -> bool {
        self.current.status == DriftStatus::Outdated
    }
}

/// Classify a declaration against its lookup outcome.
///
/// `query` is `None` when no lookup was attempted (missing coordinates).
/// Versions are compared by exact string equality only.
pub fn classify(
    declared_version: &str,
    query: Option<&VersionQueryResult>,
    policy: UnresolvedPolicy,
) -> DriftStatus {
    match query {
        None => DriftStatus::Unknown,
        Some(VersionQueryResult::Found(latest)) if latest != declared_version => {
            DriftStatus::Outdated
        }
        Some(VersionQueryResult::Found(_)) => DriftStatus::UpToDate,
        Some(VersionQueryResult::NotFound) | Some(VersionQueryResult::ConnectionError) => {
            policy.status()
        }
    }
}

/// Builds drift records from declarations and lookup outcomes
#[derive(Debug, Clone)]
pub struct DriftEvaluator {
    policy: UnresolvedPolicy,
    link_base_url: String,
}

impl DriftEvaluator {
    pub fn new(policy: UnresolvedPolicy, link_base_url: &str) -> Self {
        Self {
            policy,
            link_base_url: link_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Browsable registry page for a package
    pub fn registry_link(&self, coordinates: &Coordinates) -> String {
        format!(
            "{}/{}/{}",
            self.link_base_url, coordinates.group, coordinates.artifact
        )
    }

    pub fn evaluate(
        &self,
        declaration: &PackageDeclaration,
        query: Option<&VersionQueryResult>,
    ) -> DriftRecord {
        let status = classify(&declaration.declared_version, query, self.policy);

        DriftRecord {
            package: declaration.alias.clone(),
            current: DriftDetail {
                version: declaration.declared_version.clone(),
                latest_version: LatestVersion::from(query),
                status,
                mvn_link: declaration
                    .coordinates
                    .as_ref()
                    .map(|coordinates| self.registry_link(coordinates)),
                error: None,
            },
            required: REQUIRED_PLACEHOLDER.to_string(),
        }
    }
}
