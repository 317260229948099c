//! Where lesson scripts come from
//!
//! The loader only needs to read a script by key, check for one and list
//! what is there. Keys are file stems such as `lesson007`.

use super::LoaderError;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

#[async_trait]
pub trait ScriptSource: Send + Sync {
    /// Raw script text for `key`, or `None` if the source has no such script.
    async fn fetch(&self, key: &str) -> Result<Option<String>, LoaderError>;

    async fn contains(&self, key: &str) -> bool {
        matches!(self.fetch(key).await, Ok(Some(_)))
    }

    /// Every key the source can provide, in no particular order.
    async fn keys(&self) -> Result<Vec<String>, LoaderError>;
}

/// Scripts held in memory, e.g. bundled with the binary or built in tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    scripts: BTreeMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(key, text);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.scripts.insert(key.into(), text.into());
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }
}

#[async_trait]
impl ScriptSource for MemorySource {
    async fn fetch(&self, key: &str) -> Result<Option<String>, LoaderError> {
        Ok(self.scripts.get(key).cloned())
    }

    async fn contains(&self, key: &str) -> bool {
        self.scripts.contains_key(key)
    }

    async fn keys(&self) -> Result<Vec<String>, LoaderError> {
        Ok(self.scripts.keys().cloned().collect())
    }
}

/// Scripts stored as `<dir>/<key>.<extension>` files.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
    extension: String,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        Self {
            dir: dir.into(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", key, self.extension))
    }
}

#[async_trait]
impl ScriptSource for DirectorySource {
    async fn fetch(&self, key: &str) -> Result<Option<String>, LoaderError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn contains(&self, key: &str) -> bool {
        tokio::fs::try_exists(self.path_for(key))
            .await
            .unwrap_or(false)
    }

    async fn keys(&self) -> Result<Vec<String>, LoaderError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut keys = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(self.extension.as_str()) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                keys.push(stem.to_string());
            }
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_source_fetches_by_key() {
        let source = MemorySource::new().with_script("lesson001", "# TITLE");
        assert_eq!(
            source.fetch("lesson001").await.unwrap().as_deref(),
            Some("# TITLE")
        );
        assert_eq!(source.fetch("lesson002").await.unwrap(), None);
        assert!(source.contains("lesson001").await);
        assert!(!source.contains("lesson002").await);
    }

    #[tokio::test]
    async fn directory_source_reads_files_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("lesson001.md"), "# TITLE\n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let source = DirectorySource::new(dir.path(), ".md");
        assert_eq!(
            source.fetch("lesson001").await.unwrap().as_deref(),
            Some("# TITLE\n")
        );
        assert_eq!(source.fetch("lesson002").await.unwrap(), None);
        assert!(source.contains("lesson001").await);
        assert_eq!(source.keys().await.unwrap(), vec!["lesson001".to_string()]);
    }

    #[tokio::test]
    async fn missing_directory_lists_nothing() {
        let source = DirectorySource::new("/definitely/not/here", "md");
        assert!(source.keys().await.unwrap().is_empty());
        assert!(!source.contains("lesson001").await);
    }
}
