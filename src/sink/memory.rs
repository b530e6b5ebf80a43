use crate::sink::{ResultSink, SinkResult};
use async_trait::async_trait;
use std::sync::Mutex;

/// One artifact captured by [`MemorySink`]
#[derive(Debug, Clone)]
pub struct StoredArtifact {
    pub container: String,
    pub sub_path: String,
    pub name: String,
    pub payload: Vec<u8>,
}

/// In-memory result sink for tests and dry runs
#[derive(Default)]
pub struct MemorySink {
    entries: Mutex<Vec<StoredArtifact>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of everything stored so far
    pub fn entries(&self) -> Vec<StoredArtifact> {
        self.entries.lock().unwrap().clone()
    }

    /// Returns the artifacts stored under a given sub path
    pub fn entries_under(&self, sub_path: &str) -> Vec<StoredArtifact> {
        self.entries()
            .into_iter()
            .filter(|a| a.sub_path == sub_path)
            .collect()
    }
}

#[async_trait]
impl ResultSink for MemorySink {
    async fn store(
        &self,
        container: &str,
        sub_path: &str,
        name: &str,
        payload: &[u8],
    ) -> SinkResult<()> {
        self.entries.lock().unwrap().push(StoredArtifact {
            container: container.to_string(),
            sub_path: sub_path.to_string(),
            name: name.to_string(),
            payload: payload.to_vec(),
        });
        Ok(())
    }
}
