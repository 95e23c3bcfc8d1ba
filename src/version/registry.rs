//! Registry trait for looking up the latest published version of a package

#[cfg(test)]
use mockall::automock;

use crate::parser::types::Coordinates;
use crate::version::types::VersionQueryResult;

/// Trait for looking up package versions in a remote registry
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Registry: Send + Sync {
    /// Human-readable registry name used in summaries (e.g., "Maven Central")
    fn display_name(&self) -> &'static str;

    /// Looks up the latest published version of a package.
    ///
    /// Never fails: transport problems and unexpected responses are reported as
    /// [`VersionQueryResult::ConnectionError`], missing packages as
    /// [`VersionQueryResult::NotFound`].
    async fn lookup_latest_version(&self, coordinates: &Coordinates) -> VersionQueryResult;
}
