//! Parser layer
//! - traits.rs: Parser trait definition and parse errors
//! - types.rs: Common types (PackageDeclaration, Coordinates)
//! - version_catalog.rs: Gradle version catalog (libs.versions.toml) parser

pub mod traits;
pub mod types;
pub mod version_catalog;

pub use traits::{ManifestError, ParseError, Parser};
pub use types::{Coordinates, PackageDeclaration, UNKNOWN_VERSION};
pub use version_catalog::{VersionCatalogParser, parse_manifest};
