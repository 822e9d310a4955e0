//! Data-source boundary
//!
//! Everything the engine knows about the outside world comes through the
//! `DataSource` trait: the backend's model listing, host resource telemetry,
//! and per-model log streams. The engine never performs I/O of its own, so
//! any implementation (HTTP client, fixture, test double) plugs in here.

use async_trait::async_trait;
use std::fmt;

use crate::model::{ModelId, RawEntity, ResourceUsage};

/// Errors a data-source operation can produce
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchError {
    /// Network/timeout/IO problem; retrying may help
    Transient { message: String },
    /// The payload could not be interpreted; retrying the same fetch won't help
    Malformed { message: String },
}

impl FetchError {
    pub fn transient(message: impl Into<String>) -> Self {
        FetchError::Transient {
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        FetchError::Malformed {
            message: message.into(),
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Transient { .. })
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transient { message } => write!(f, "transient fetch error: {}", message),
            FetchError::Malformed { message } => write!(f, "malformed payload: {}", message),
        }
    }
}

impl std::error::Error for FetchError {}

/// Terminal result of a guarded fetch that ran out of retries
#[derive(Clone, Debug)]
pub struct FetchFailure {
    pub error: FetchError,
    pub attempts: u32,
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (after {} attempts)", self.error, self.attempts)
    }
}

impl std::error::Error for FetchFailure {}

/// The five logical sources the scheduler polls. Also the cache key and the
/// tag on every fan-out event.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum SourceKind {
    Models,
    System,
    Performance,
    Details(ModelId),
    Logs(ModelId),
}

impl SourceKind {
    /// The entity this source is scoped to, if any
    pub fn entity(&self) -> Option<&str> {
        match self {
            SourceKind::Details(id) | SourceKind::Logs(id) => Some(id),
            _ => None,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Models => write!(f, "models"),
            SourceKind::System => write!(f, "system"),
            SourceKind::Performance => write!(f, "performance"),
            SourceKind::Details(id) => write!(f, "details({})", id),
            SourceKind::Logs(id) => write!(f, "logs({})", id),
        }
    }
}

/// What one fetch of a source yields; the value the cache stores and compares.
#[derive(Clone, Debug)]
pub enum SourcePayload {
    /// Full model listing (models and performance sources)
    Listing(Vec<RawEntity>),
    /// Host gauge readings (system source)
    Usage(ResourceUsage),
    /// The listing filtered to one id; None when the id is gone
    Entity(Option<RawEntity>),
    /// Raw log lines for one id, in backend order
    LogLines(Vec<String>),
}

/// The boundary the engine consumes. Implementations must be cheap to share
/// behind an `Arc`; every fetch is spawned as its own task.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Human-readable name for diagnostics
    fn name(&self) -> &str;

    /// List the models the backend currently serves
    async fn list_entities(&self) -> Result<Vec<RawEntity>, FetchError>;

    /// Sample host resource usage
    async fn resource_usage(&self) -> Result<ResourceUsage, FetchError>;

    /// Fetch raw log lines for one model. An empty Vec is a successful
    /// fetch with no data, not an error.
    async fn entity_logs(&self, id: &str) -> Result<Vec<String>, FetchError>;
}

/// Map a source to the boundary operation that feeds it. `Details` rides on
/// the listing: the backend has no per-model endpoint the engine relies on.
pub async fn fetch_payload(
    source: &dyn DataSource,
    kind: &SourceKind,
) -> Result<SourcePayload, FetchError> {
    match kind {
        SourceKind::Models | SourceKind::Performance => {
            source.list_entities().await.map(SourcePayload::Listing)
        }
        SourceKind::System => source.resource_usage().await.map(SourcePayload::Usage),
        SourceKind::Details(id) => source.list_entities().await.map(|entities| {
            SourcePayload::Entity(entities.into_iter().find(|e| e.name == *id))
        }),
        SourceKind::Logs(id) => source.entity_logs(id).await.map(SourcePayload::LogLines),
    }
}
