/// Outcome of a single registry lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionQueryResult {
    /// The registry published this version as latest
    Found(String),
    /// The registry has no matching package
    NotFound,
    /// The lookup failed (timeout, transport error, unexpected response)
    ConnectionError,
}
