use crate::sink::{check_component, ResultSink, SinkResult};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;

/// Filesystem-backed result sink
///
/// Artifacts land at `<root>/<container>/<sub_path>/<name>`. Directories are
/// created on demand; writes to distinct names never contend.
pub struct FsSink {
    root: PathBuf,
}

impl FsSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ResultSink for FsSink {
    async fn store(
        &self,
        container: &str,
        sub_path: &str,
        name: &str,
        payload: &[u8],
    ) -> SinkResult<()> {
        check_component(container)?;
        check_component(sub_path)?;
        check_component(name)?;

        let mut dir = self.root.join(container);
        if !sub_path.is_empty() {
            dir = dir.join(sub_path);
        }

        fs::create_dir_all(&dir).await?;
        fs::write(dir.join(name), payload).await?;

        tracing::trace!("Stored artifact {}/{}/{}", container, sub_path, name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::SinkError;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_store_creates_directories() {
        let dir = TempDir::new().unwrap();
        let sink = FsSink::new(dir.path());

        sink.store("crawls", "run-1/successes", "page.json", b"{}")
            .await
            .unwrap();

        let written = std::fs::read(dir.path().join("crawls/run-1/successes/page.json")).unwrap();
        assert_eq!(written, b"{}");
    }

    #[tokio::test]
    async fn test_store_with_empty_sub_path() {
        let dir = TempDir::new().unwrap();
        let sink = FsSink::new(dir.path());

        sink.store("crawls", "", "top.json", b"x").await.unwrap();

        assert!(dir.path().join("crawls/top.json").exists());
    }

    #[tokio::test]
    async fn test_store_rejects_traversal() {
        let dir = TempDir::new().unwrap();
        let sink = FsSink::new(dir.path());

        let result = sink.store("crawls", "../outside", "f.json", b"x").await;
        assert!(matches!(result, Err(SinkError::InvalidPath(_))));
    }

    #[tokio::test]
    async fn test_concurrent_writers() {
        let dir = TempDir::new().unwrap();
        let sink = std::sync::Arc::new(FsSink::new(dir.path()));

        let mut handles = Vec::new();
        for i in 0..8 {
            let sink = sink.clone();
            handles.push(tokio::spawn(async move {
                sink.store("crawls", "run/successes", &format!("{}.json", i), b"x")
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let count = std::fs::read_dir(dir.path().join("crawls/run/successes"))
            .unwrap()
            .count();
        assert_eq!(count, 8);
    }
}
