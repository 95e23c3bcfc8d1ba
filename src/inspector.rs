//! Dependency inspection runs
//!
//! Parses the version catalog, looks up every declared package in the registry
//! and evaluates drift. Lookups run concurrently up to the configured bound;
//! records keep catalog declaration order.

use std::path::Path;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::InspectorConfig;
use crate::parser::traits::{ManifestError, Parser};
use crate::parser::types::PackageDeclaration;
use crate::parser::version_catalog::{VersionCatalogParser, load_manifest};
use crate::report::{ManifestState, Report, summarize};
use crate::version::checker::{DriftEvaluator, DriftRecord};
use crate::version::error::RegistryError;
use crate::version::registries::MavenCentralRegistry;
use crate::version::registry::Registry;

#[derive(Debug, Error)]
pub enum InspectError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("Inspection cancelled")]
    Cancelled,
}

/// Groups the parser, registry and evaluator used by an inspection run
pub struct DependencyInspector {
    parser: Arc<dyn Parser>,
    registry: Arc<dyn Registry>,
    evaluator: DriftEvaluator,
    config: InspectorConfig,
}

impl DependencyInspector {
    pub fn new(
        parser: Arc<dyn Parser>,
        registry: Arc<dyn Registry>,
        config: InspectorConfig,
    ) -> Self {
        let evaluator =
            DriftEvaluator::new(config.unresolved_status, &config.registry.link_base_url);
        Self {
            parser,
            registry,
            evaluator,
            config,
        }
    }

    /// Inspector for Gradle version catalogs backed by Maven Central
    pub fn from_config(config: InspectorConfig) -> Result<Self, RegistryError> {
        let registry = MavenCentralRegistry::new(&config.registry)?;
        Ok(Self::new(
            Arc::new(VersionCatalogParser::new()),
            Arc::new(registry),
            config,
        ))
    }

    pub fn config(&self) -> &InspectorConfig {
        &self.config
    }

    pub fn registry_name(&self) -> &'static str {
        self.registry.display_name()
    }

    /// One-line summary of a report using this inspector's registry name
    pub fn summarize(&self, report: &Report) -> String {
        summarize(&report.records, self.registry_name())
    }

    /// Check every catalog entry under `project_root` against the registry.
    ///
    /// A missing catalog yields an empty report. Per-package lookup failures are
    /// recorded on the affected record and never abort the run.
    pub async fn check_dependencies(&self, project_root: &Path) -> Result<Report, InspectError> {
        self.check_dependencies_with_cancel(project_root, CancellationToken::new())
            .await
    }

    /// Like [`check_dependencies`](Self::check_dependencies), abandoning in-flight
    /// lookups and returning [`InspectError::Cancelled`] once `cancel` fires.
    pub async fn check_dependencies_with_cancel(
        &self,
        project_root: &Path,
        cancel: CancellationToken,
    ) -> Result<Report, InspectError> {
        let manifest_path = self.config.manifest_location(project_root);

        let Some(declarations) = load_manifest(self.parser.as_ref(), &manifest_path)? else {
            return Ok(Report {
                manifest: ManifestState::Absent(manifest_path),
                records: Vec::new(),
            });
        };

        info!(
            "Checking {} libraries from {:?} against {}",
            declarations.len(),
            manifest_path,
            self.registry_name()
        );

        let records = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("Inspection of {:?} cancelled", manifest_path);
                return Err(InspectError::Cancelled);
            }
            records = self.evaluate_all(&declarations) => records,
        };

        let report = Report {
            manifest: ManifestState::Parsed(manifest_path),
            records,
        };
        info!(
            "Inspection finished: {} libraries, {} outdated",
            report.records.len(),
            report.outdated_count()
        );

        Ok(report)
    }

    async fn evaluate_all(&self, declarations: &[PackageDeclaration]) -> Vec<DriftRecord> {
        stream::iter(declarations)
            .map(|declaration| self.evaluate_one(declaration))
            .buffered(self.config.concurrency())
            .collect()
            .await
    }

    async fn evaluate_one(&self, declaration: &PackageDeclaration) -> DriftRecord {
        let query = match &declaration.coordinates {
            Some(coordinates) => Some(self.registry.lookup_latest_version(coordinates).await),
            None => {
                debug!("Skipping lookup for '{}': no coordinates", declaration.alias);
                None
            }
        };

        self.evaluator.evaluate(declaration, query.as_ref())
    }
}
