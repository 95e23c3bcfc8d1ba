//! Maven Central search API implementation

use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::{MAX_RETRY_BACKOFF_MS, RegistryConfig};
use crate::parser::types::Coordinates;
use crate::version::error::RegistryError;
use crate::version::registry::Registry;
use crate::version::types::VersionQueryResult;

pub const DISPLAY_NAME: &str = "Maven Central";

/// Response from the Solr search endpoint
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    response: SearchResults,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResults {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Deserialize)]
struct SearchDoc {
    #[serde(rename = "latestVersion")]
    latest_version: Option<String>,
}

/// Registry implementation for the Maven Central search API
pub struct MavenCentralRegistry {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
    retry_backoff: Duration,
}

impl MavenCentralRegistry {
    pub fn new(config: &RegistryConfig) -> Result<Self, RegistryError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("catalog-drift/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_retries: config.max_retries,
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        })
    }

    fn search_url(&self, coordinates: &Coordinates) -> Result<Url, RegistryError> {
        let query = format!("g:{} AND a:{}", coordinates.group, coordinates.artifact);
        Url::parse_with_params(
            &format!("{}/solrsearch/select", self.base_url),
            &[("q", query.as_str()), ("rows", "1"), ("wt", "json")],
        )
        .map_err(|e| RegistryError::InvalidResponse(format!("Invalid search URL: {}", e)))
    }

    /// Single search request without retries
    async fn fetch_latest_version(&self, coordinates: &Coordinates) -> Result<String, RegistryError> {
        let url = self.search_url(coordinates)?;
        debug!("Searching Maven Central: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound(coordinates.to_string()));
        }

        if !status.is_success() {
            warn!("Maven Central returned status {} for {}", status, coordinates);
            return Err(RegistryError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let search: SearchResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse Maven Central response: {}", e);
            RegistryError::InvalidResponse(e.to_string())
        })?;

        let Some(doc) = search.response.docs.into_iter().next() else {
            return Err(RegistryError::NotFound(coordinates.to_string()));
        };

        doc.latest_version.ok_or_else(|| {
            RegistryError::InvalidResponse(format!("No latestVersion for {}", coordinates))
        })
    }
}

/// Exponential delay before retry `attempt` (1-based), capped
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(16);
    base.saturating_mul(1u32 << exponent)
        .min(Duration::from_millis(MAX_RETRY_BACKOFF_MS))
}

#[async_trait::async_trait]
impl Registry for MavenCentralRegistry {
    fn display_name(&self) -> &'static str {
        DISPLAY_NAME
    }

    async fn lookup_latest_version(&self, coordinates: &Coordinates) -> VersionQueryResult {
        let mut attempt = 0;
        loop {
            match self.fetch_latest_version(coordinates).await {
                Ok(version) => return VersionQueryResult::Found(version),
                Err(RegistryError::NotFound(_)) => {
                    debug!("No Maven Central match for {}", coordinates);
                    return VersionQueryResult::NotFound;
                }
                Err(e) if attempt >= self.max_retries => {
                    warn!("Lookup failed for {}: {}", coordinates, e);
                    return VersionQueryResult::ConnectionError;
                }
                Err(e) => {
                    attempt += 1;
                    let delay = backoff_delay(self.retry_backoff, attempt);
                    debug!(
                        "Lookup failed for {} ({}), retry {} in {:?}",
                        coordinates, e, attempt, delay
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}
