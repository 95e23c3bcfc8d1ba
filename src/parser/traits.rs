//! Parser trait definition

use std::path::PathBuf;

use crate::parser::types::PackageDeclaration;

/// Trait for parsing manifest files
pub trait Parser: Send + Sync {
    /// Parse the content and extract package declarations
    fn parse(&self, content: &str) -> Result<Vec<PackageDeclaration>, ParseError>;
}

/// Error type for parsing operations
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The file is not valid TOML
    #[error("Invalid syntax: {0}")]
    InvalidSyntax(String),

    /// A top-level table has the wrong shape
    #[error("Invalid structure: {0}")]
    InvalidStructure(String),
}

/// Error type for reading a manifest from disk.
///
/// A missing manifest is not an error; see [`crate::parser::parse_manifest`].
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Manifest {path} exists but could not be read: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Manifest {path} is corrupt: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}
