//! Gradle version catalog (libs.versions.toml) parser

use std::io::ErrorKind;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use serde::de::IgnoredAny;
use tracing::{debug, info, warn};

use crate::parser::traits::{ManifestError, ParseError, Parser};
use crate::parser::types::{Coordinates, PackageDeclaration, UNKNOWN_VERSION};

/// Parser for Gradle version catalogs
pub struct VersionCatalogParser;

impl VersionCatalogParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for VersionCatalogParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Top-level tables of a version catalog. Other tables (plugins, bundles) are ignored.
#[derive(Debug, Default, Deserialize)]
struct VersionCatalog {
    #[serde(default)]
    versions: IndexMap<String, toml::Value>,
    #[serde(default)]
    libraries: IndexMap<String, toml::Value>,
}

/// A `[libraries]` entry in one of its two declaration shapes
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LibraryEntry {
    /// `junit = "junit:junit:4.13.2"`
    Compact(String),
    /// `junit = { module = "junit:junit", version.ref = "junit" }`
    Structured(StructuredLibrary),
}

#[derive(Debug, Deserialize)]
struct StructuredLibrary {
    module: Option<String>,
    group: Option<String>,
    name: Option<String>,
    version: Option<VersionSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum VersionSpec {
    Reference {
        #[serde(rename = "ref")]
        reference: String,
    },
    Literal(String),
    /// Rich versions (strictly/require/prefer) are not interpreted
    Other(IgnoredAny),
}

impl Parser for VersionCatalogParser {
    fn parse(&self, content: &str) -> Result<Vec<PackageDeclaration>, ParseError> {
        let table: toml::Table = content.parse().map_err(|e: toml::de::Error| {
            warn!("Failed to parse version catalog: {}", e);
            ParseError::InvalidSyntax(e.message().to_string())
        })?;

        let catalog: VersionCatalog = toml::Value::Table(table).try_into().map_err(
            |e: toml::de::Error| {
                warn!("Unexpected version catalog structure: {}", e);
                ParseError::InvalidStructure(e.message().to_string())
            },
        )?;

        let declarations = catalog
            .libraries
            .iter()
            .map(|(alias, value)| Self::declaration(alias, value, &catalog.versions))
            .collect::<Vec<_>>();

        debug!("Parsed {} library declarations", declarations.len());
        Ok(declarations)
    }
}

impl VersionCatalogParser {
    /// Interpret a single library entry. Never fails: malformed entries degrade to
    /// a declaration without coordinates and with an unknown version.
    fn declaration(
        alias: &str,
        value: &toml::Value,
        versions: &IndexMap<String, toml::Value>,
    ) -> PackageDeclaration {
        let entry = match value.clone().try_into::<LibraryEntry>() {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Library '{}' has an unsupported shape: {}", alias, e.message());
                return PackageDeclaration::unresolved(alias);
            }
        };

        match entry {
            LibraryEntry::Compact(notation) => Self::from_compact(alias, &notation),
            LibraryEntry::Structured(library) => Self::from_structured(alias, library, versions),
        }
    }

    /// `group:artifact:version` must split into exactly three parts. The
    /// version is kept even when the coordinates are unusable.
    fn from_compact(alias: &str, notation: &str) -> PackageDeclaration {
        let parts: Vec<&str> = notation.split(':').collect();
        let [group, artifact, version] = parts.as_slice() else {
            warn!("Library '{}' has malformed notation '{}'", alias, notation);
            return PackageDeclaration::unresolved(alias);
        };

        let coordinates = Coordinates::from_parts(Some(*group), Some(*artifact));
        if coordinates.is_none() {
            warn!("Library '{}' has empty coordinates in '{}'", alias, notation);
        }
        PackageDeclaration::new(alias, coordinates, version)
    }

    fn from_structured(
        alias: &str,
        library: StructuredLibrary,
        versions: &IndexMap<String, toml::Value>,
    ) -> PackageDeclaration {
        // An empty module falls back to group/name like a missing one
        let coordinates = match library.module.as_deref().filter(|m| !m.is_empty()) {
            Some(module) => module
                .split_once(':')
                .and_then(|(group, artifact)| Coordinates::from_parts(Some(group), Some(artifact))),
            None => Coordinates::from_parts(library.group.as_deref(), library.name.as_deref()),
        };
        let Some(coordinates) = coordinates else {
            warn!("Library '{}' has no usable module or group/name", alias);
            return PackageDeclaration::unresolved(alias);
        };

        let declared_version = match library.version {
            Some(VersionSpec::Reference { reference }) => {
                match versions.get(&reference).and_then(toml::Value::as_str) {
                    Some(version) => version.to_string(),
                    None => {
                        warn!(
                            "Library '{}' references missing version '{}'",
                            alias, reference
                        );
                        UNKNOWN_VERSION.to_string()
                    }
                }
            }
            Some(VersionSpec::Literal(version)) if !version.is_empty() => version,
            Some(VersionSpec::Literal(_)) | Some(VersionSpec::Other(_)) | None => {
                UNKNOWN_VERSION.to_string()
            }
        };

        PackageDeclaration {
            alias: alias.to_string(),
            coordinates: Some(coordinates),
            declared_version,
        }
    }
}

/// Read and parse the catalog at `path`.
///
/// Returns `Ok(None)` when the file does not exist, which callers treat as
/// "nothing to check" rather than a failure.
pub fn load_manifest(
    parser: &dyn Parser,
    path: &Path,
) -> Result<Option<Vec<PackageDeclaration>>, ManifestError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("No version catalog found at {:?}", path);
            return Ok(None);
        }
        Err(source) => {
            return Err(ManifestError::Unreadable {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    parser
        .parse(&content)
        .map(Some)
        .map_err(|source| ManifestError::Malformed {
            path: path.to_path_buf(),
            source,
        })
}

/// Parse the catalog at `path`, yielding an empty list when it is absent
pub fn parse_manifest(path: &Path) -> Result<Vec<PackageDeclaration>, ManifestError> {
    Ok(load_manifest(&VersionCatalogParser::new(), path)?.unwrap_or_default())
}
