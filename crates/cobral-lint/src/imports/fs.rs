//! File access used by import resolution

use std::collections::HashMap;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

/// Read-only view of the files an import statement may name
///
/// Paths are passed exactly as written in the `importe` statement.
pub trait FileSystem: Send + Sync {
    /// Whether a file exists at `path`
    fn exists(&self, path: &Path) -> impl Future<Output = bool> + Send;

    /// Full text of the file at `path`
    fn read_text(&self, path: &Path) -> impl Future<Output = io::Result<String>> + Send;
}

/// Disk access through `tokio::fs`, relative paths resolved against a root
#[derive(Debug, Clone)]
pub struct NativeFileSystem {
    root: PathBuf,
}

impl NativeFileSystem {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl Default for NativeFileSystem {
    fn default() -> Self {
        Self::new(".")
    }
}

impl FileSystem for NativeFileSystem {
    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(self.resolve(path)).await.unwrap_or(false)
    }

    async fn read_text(&self, path: &Path) -> io::Result<String> {
        tokio::fs::read_to_string(self.resolve(path)).await
    }
}

/// In-memory files keyed by path
///
/// A path registered with [`MemoryFileSystem::with_unreadable`] exists but
/// fails to read.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    files: HashMap<PathBuf, Option<String>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.files.insert(path.into(), Some(contents.into()));
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }

    pub fn with_unreadable(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.insert(path.into(), None);
        self
    }
}

impl FileSystem for MemoryFileSystem {
    async fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    async fn read_text(&self, path: &Path) -> io::Result<String> {
        match self.files.get(path) {
            Some(Some(contents)) => Ok(contents.clone()),
            Some(None) => Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("permission denied: {}", path.display()),
            )),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {}", path.display()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_file_system() {
        let fs = MemoryFileSystem::new()
            .with_file("lib.cl", "declare x = 1;")
            .with_unreadable("secreto.cl");

        assert!(fs.exists(Path::new("lib.cl")).await);
        assert!(fs.exists(Path::new("secreto.cl")).await);
        assert!(!fs.exists(Path::new("outro.cl")).await);
        assert_eq!(fs.read_text(Path::new("lib.cl")).await.unwrap(), "declare x = 1;");

        let denied = fs.read_text(Path::new("secreto.cl")).await.unwrap_err();
        assert_eq!(denied.kind(), io::ErrorKind::PermissionDenied);
        let missing = fs.read_text(Path::new("outro.cl")).await.unwrap_err();
        assert_eq!(missing.kind(), io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_native_file_system_resolves_against_root() {
        let fs = NativeFileSystem::new(env!("CARGO_MANIFEST_DIR"));

        assert!(fs.exists(Path::new("Cargo.toml")).await);
        assert!(!fs.exists(Path::new("nao-existe.cl")).await);
        assert!(fs.read_text(Path::new("Cargo.toml")).await.unwrap().contains("cobral-lint"));
    }
}
