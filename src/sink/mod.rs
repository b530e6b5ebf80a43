//! Result sink: the persistence boundary for crawl artifacts
//!
//! The crawler writes two kinds of artifacts through this interface:
//! per-page extraction records under `<run_id>/successes` and per-seed
//! failure records under `<run_id>/failures`. Persistence is a best-effort
//! side channel — a sink write failure is logged and swallowed, never
//! escalated into the crawl.

mod fs;
mod memory;

pub use fs::FsSink;
pub use memory::{MemorySink, StoredArtifact};

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during sink operations
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid artifact path component: {0}")]
    InvalidPath(String),
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Append-only artifact storage
///
/// Implementations must be safe for concurrent writers; callers guarantee
/// unique `name`s, so there is nothing to coordinate beyond the write itself.
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Stores a payload under `container/sub_path/name`
    ///
    /// An empty `sub_path` stores directly under the container.
    async fn store(
        &self,
        container: &str,
        sub_path: &str,
        name: &str,
        payload: &[u8],
    ) -> SinkResult<()>;
}

/// Stores an artifact, logging and swallowing any failure
pub async fn store_best_effort(
    sink: &dyn ResultSink,
    container: &str,
    sub_path: &str,
    name: &str,
    payload: &[u8],
) {
    if let Err(e) = sink.store(container, sub_path, name, payload).await {
        tracing::warn!(
            "Failed to persist artifact {}/{}/{}: {}",
            container,
            sub_path,
            name,
            e
        );
    }
}

/// Rejects path components that would escape the sink root
pub(crate) fn check_component(component: &str) -> SinkResult<()> {
    if component.contains("..") || component.contains('\\') || component.starts_with('/') {
        return Err(SinkError::InvalidPath(component.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_component() {
        assert!(check_component("2024-01-01/successes").is_ok());
        assert!(check_component("page_abc.json").is_ok());
        assert!(check_component("../escape").is_err());
        assert!(check_component("/absolute").is_err());
        assert!(check_component("back\\slash").is_err());
    }

    #[tokio::test]
    async fn test_store_best_effort_swallows_errors() {
        struct FailingSink;

        #[async_trait]
        impl ResultSink for FailingSink {
            async fn store(&self, _: &str, _: &str, _: &str, _: &[u8]) -> SinkResult<()> {
                Err(SinkError::InvalidPath("always fails".to_string()))
            }
        }

        // Must not panic or propagate
        store_best_effort(&FailingSink, "c", "p", "n", b"payload").await;
    }
}
