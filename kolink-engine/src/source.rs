//! Where serialized automata come from

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};

use crate::error::{LoadError, Result};

/// Asynchronous provider of serialized automaton bytes
///
/// The returned future must own everything it needs so that the cache can
/// share it between concurrent callers.
pub trait AutomatonSource: Send + Sync + fmt::Debug {
    /// Fetch the full payload
    fn fetch(&self) -> BoxFuture<'static, Result<Vec<u8>>>;

    /// Short human-readable description, used in logs
    fn describe(&self) -> String;
}

/// Reads a file with tokio
///
/// Requires a running tokio runtime when fetched.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Source for `path`
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AutomatonSource for FileSource {
    fn fetch(&self) -> BoxFuture<'static, Result<Vec<u8>>> {
        let path = self.path.clone();
        async move {
            tokio::fs::read(&path)
                .await
                .map_err(|source| LoadError::Io { path, source })
        }
        .boxed()
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Bytes already in memory
#[derive(Debug, Clone)]
pub struct MemorySource {
    bytes: Arc<[u8]>,
}

impl MemorySource {
    /// Source serving a copy of `bytes` on every fetch
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }
}

impl AutomatonSource for MemorySource {
    fn fetch(&self) -> BoxFuture<'static, Result<Vec<u8>>> {
        let bytes = Arc::clone(&self.bytes);
        async move { Ok(bytes.to_vec()) }.boxed()
    }

    fn describe(&self) -> String {
        format!("<memory: {} bytes>", self.bytes.len())
    }
}
