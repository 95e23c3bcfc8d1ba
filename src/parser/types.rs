//! Common types for parsers

/// Declared version used when an entry cannot be resolved
pub const UNKNOWN_VERSION: &str = "unknown";

/// Registry coordinates of a package
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinates {
    /// Registry namespace (e.g., "org.slf4j")
    pub group: String,
    /// Package name within the namespace (e.g., "slf4j-api")
    pub artifact: String,
}

impl Coordinates {
    /// Builds coordinates when both parts are present and non-empty
    pub fn from_parts(group: Option<&str>, artifact: Option<&str>) -> Option<Self> {
        match (group, artifact) {
            (Some(group), Some(artifact)) if !group.is_empty() && !artifact.is_empty() => {
                Some(Self {
                    group: group.to_string(),
                    artifact: artifact.to_string(),
                })
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.group, self.artifact)
    }
}

/// One library entry from a version catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDeclaration {
    /// Catalog-local alias (unique per manifest)
    pub alias: String,
    /// Registry coordinates, absent when the entry is malformed
    pub coordinates: Option<Coordinates>,
    /// Declared version, `"unknown"` when it cannot be resolved
    pub declared_version: String,
}

impl PackageDeclaration {
    pub fn new(alias: &str, coordinates: Option<Coordinates>, declared_version: &str) -> Self {
        Self {
            alias: alias.to_string(),
            coordinates,
            declared_version: declared_version.to_string(),
        }
    }

    /// Declaration for an entry that could not be interpreted
    pub fn unresolved(alias: &str) -> Self {
        Self::new(alias, None, UNKNOWN_VERSION)
    }

    pub fn group(&self) -> Option<&str> {
        self.coordinates.as_ref().map(|c| c.group.as_str())
    }

    pub fn artifact(&self) -> Option<&str> {
        self.coordinates.as_ref().map(|c| c.artifact.as_str())
    }
}
