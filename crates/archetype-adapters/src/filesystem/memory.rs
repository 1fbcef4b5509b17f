//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet, HashSet},
    io,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use archetype_core::{
    application::ports::{Filesystem, PathProbe, TreeEntry},
    domain::RelativePath,
};

/// In-memory filesystem for testing.
///
/// Clones share the same tree, so a test can keep one handle for assertions
/// while the reifier owns another. Writes under a path registered with
/// [`fail_writes_under`](Self::fail_writes_under) fail with
/// `PermissionDenied`.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, Vec<u8>>,
    directories: BTreeSet<PathBuf>,
    read_only: HashSet<PathBuf>,
    mutations: usize,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file, creating its ancestors (testing helper).
    pub fn with_file(self, path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Self {
        self.add_file(path, contents);
        self
    }

    /// Seed an empty directory and its ancestors (testing helper).
    pub fn with_dir(self, path: impl AsRef<Path>) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            inner.insert_ancestors(path.as_ref());
        }
        self
    }

    /// Seed a file without counting it as a mutation.
    pub fn add_file(&self, path: impl AsRef<Path>, contents: impl AsRef<[u8]>) {
        let path = path.as_ref();
        if let Ok(mut inner) = self.inner.write() {
            if let Some(parent) = path.parent() {
                inner.insert_ancestors(parent);
            }
            inner
                .files
                .insert(path.to_path_buf(), contents.as_ref().to_vec());
        }
    }

    /// Make every write, copy, or directory creation at or below `path` fail.
    pub fn fail_writes_under(&self, path: impl AsRef<Path>) {
        if let Ok(mut inner) = self.inner.write() {
            inner.read_only.insert(path.as_ref().to_path_buf());
        }
    }

    /// Read a file's bytes (testing helper).
    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path.as_ref()).cloned()
    }

    /// Read a file as UTF-8 text (testing helper).
    pub fn read_text(&self, path: impl AsRef<Path>) -> Option<String> {
        self.read_file(path)
            .and_then(|bytes| String::from_utf8(bytes).ok())
    }

    /// List all files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of successful mutating calls made through the port.
    pub fn mutations(&self) -> usize {
        self.inner.read().map(|inner| inner.mutations).unwrap_or(0)
    }

    fn read_inner(&self) -> io::Result<std::sync::RwLockReadGuard<'_, MemoryFilesystemInner>> {
        self.inner.read().map_err(|_| lock_poisoned())
    }

    fn write_inner(&self) -> io::Result<std::sync::RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner.write().map_err(|_| lock_poisoned())
    }
}

impl MemoryFilesystemInner {
    fn insert_ancestors(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.directories.insert(current.clone());
        }
    }

    fn ensure_writable(&self, path: &Path) -> io::Result<()> {
        if self.read_only.iter().any(|denied| path.starts_with(denied)) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{}: permission denied", path.display()),
            ));
        }
        Ok(())
    }

    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !self.directories.contains(parent) => {
                Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("{}: parent directory does not exist", path.display()),
                ))
            }
            _ => Ok(()),
        }
    }

    fn store(&mut self, path: &Path, contents: Vec<u8>) -> io::Result<()> {
        self.ensure_writable(path)?;
        self.ensure_parent(path)?;
        if self.directories.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::IsADirectory,
                format!("{}: is a directory", path.display()),
            ));
        }
        self.files.insert(path.to_path_buf(), contents);
        self.mutations += 1;
        Ok(())
    }
}

impl Filesystem for MemoryFilesystem {
    fn probe(&self, path: &Path) -> io::Result<PathProbe> {
        let inner = self.read_inner()?;
        Ok(if inner.directories.contains(path) {
            PathProbe::Directory
        } else if inner.files.contains_key(path) {
            PathProbe::File
        } else {
            PathProbe::Absent
        })
    }

    fn walk(&self, root: &Path) -> io::Result<Vec<TreeEntry>> {
        let inner = self.read_inner()?;
        if !inner.directories.contains(root) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{}: no such directory", root.display()),
            ));
        }

        let relative = |path: &PathBuf| {
            RelativePath::below(root, path).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
        };

        let mut entries = Vec::new();
        for dir in inner.directories.iter().filter(|d| d.starts_with(root) && d.as_path() != root) {
            entries.push(TreeEntry::directory(relative(dir)?));
        }
        for file in inner.files.keys().filter(|f| f.starts_with(root)) {
            entries.push(TreeEntry::file(relative(file)?));
        }
        Ok(entries)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut inner = self.write_inner()?;
        if inner.directories.contains(path) {
            return Ok(());
        }
        inner.ensure_writable(path)?;
        if let Some(file) = path.ancestors().find(|a| inner.files.contains_key(*a)) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{}: a file exists at {}", path.display(), file.display()),
            ));
        }
        inner.insert_ancestors(path);
        inner.mutations += 1;
        Ok(())
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        let inner = self.read_inner()?;
        inner.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{}: no such file", path.display()),
            )
        })
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        self.write_inner()?.store(path, contents.to_vec())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        let contents = self.read(from)?;
        self.write_inner()?.store(to, contents)
    }
}

fn lock_poisoned() -> io::Error {
    io::Error::other("memory filesystem lock poisoned")
}
