// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::{
    collections::{BTreeSet, HashMap},
    io::ErrorKind as IoErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use bytes::Bytes;
use ohno::EnrichableExt;
use storage_backend::{Backend, Entry, Error, Result};

use crate::path::{child_name, entry_path, prefix_dir};

/// Configuration key naming the root directory.
const PATH_CONFIG_KEY: &str = "path";

/// A durable backend that stores each entry in its own file.
///
/// Cloning is cheap; clones refer to the same root directory.
///
/// # Examples
///
/// ```no_run
/// use storage_backend::{Backend, Entry};
/// use storage_backend_file::FileBackend;
///
/// # async fn example() -> Result<(), storage_backend::Error> {
/// let backend = FileBackend::new("/var/lib/replica");
/// backend.put(Entry::new("sys/token", "secret")).await?;
/// assert_eq!(backend.list("sys/").await?, vec!["token"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FileBackend {
    root: Arc<Path>,
}

impl FileBackend {
    /// Creates a backend rooted at `root`.
    ///
    /// Nothing is touched on disk until the first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root: PathBuf = root.into();
        Self { root: Arc::from(root) }
    }

    /// Creates a backend from a flat configuration map.
    ///
    /// # Errors
    ///
    /// Returns an error of kind [`MissingConfig`](storage_backend::ErrorKind::MissingConfig)
    /// if the `path` key is absent.
    pub fn from_config(config: &HashMap<String, String>) -> Result<Self> {
        let root = config
            .get(PATH_CONFIG_KEY)
            .ok_or_else(|| Error::missing_config(PATH_CONFIG_KEY))?;
        Ok(Self::new(root))
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Removes directories left empty by a delete, walking up to (but never
    /// removing) the root.
    async fn prune_empty_parents(&self, file: &Path) {
        let mut current = file.parent();
        while let Some(dir) = current {
            if dir == &*self.root || !dir.starts_with(&self.root) {
                break;
            }
            // Fails on non-empty directories, which ends the walk.
            if tokio::fs::remove_dir(dir).await.is_err() {
                break;
            }
            current = dir.parent();
        }
    }
}

fn io_error(action: &str, path: &Path, e: std::io::Error) -> Error {
    Error::backend(e).enrich(format!("failed to {action} {}", path.display()))
}

impl Backend for FileBackend {
    async fn put(&self, entry: Entry) -> Result<()> {
        let path = entry_path(&self.root, entry.key())?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error("create directory", parent, e))?;
        }

        let (_, value) = entry.into_parts();
        tokio::fs::write(&path, &value)
            .await
            .map_err(|e| io_error("write", &path, e))
    }

    async fn get(&self, key: &str) -> Result<Option<Entry>> {
        let path = entry_path(&self.root, key)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Some(Entry::new(key, Bytes::from(data)))),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error("read", &path, e)),
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let path = entry_path(&self.root, key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                self.prune_empty_parents(&path).await;
                Ok(())
            }
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error("remove", &path, e)),
        }
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let dir = prefix_dir(&self.root, prefix)?;
        let mut read_dir = match tokio::fs::read_dir(&dir).await {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == IoErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error("list", &dir, e)),
        };

        let mut children = BTreeSet::new();
        while let Some(dir_entry) = read_dir.next_entry().await.map_err(|e| io_error("list", &dir, e))? {
            let is_dir = dir_entry
                .file_type()
                .await
                .map_err(|e| io_error("inspect", &dir_entry.path(), e))?
                .is_dir();

            // Names that are not valid UTF-8 cannot have been written through a key.
            let Ok(file_name) = dir_entry.file_name().into_string() else {
                continue;
            };
            if let Some(child) = child_name(&file_name, is_dir) {
                children.insert(child);
            }
        }

        Ok(children.into_iter().collect())
    }
}
