//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `archetype-adapters` crate provides implementations.

use std::io;
use std::path::Path;

use crate::domain::{Metadata, RelativePath, TemplateError};

/// Result of probing a path: the tri-state existence query.
///
/// `Err` from [`Filesystem::probe`] is the third state. Callers branch to a
/// no-op only on [`PathProbe::Absent`] and propagate errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathProbe {
    Absent,
    File,
    Directory,
}

/// Kind of an entry found while walking a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EntryKind {
    Directory,
    File,
}

/// One entry below a walked root, hidden entries included.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TreeEntry {
    pub path: RelativePath,
    pub kind: EntryKind,
}

impl TreeEntry {
    pub fn file(path: RelativePath) -> Self {
        Self {
            path,
            kind: EntryKind::File,
        }
    }

    pub fn directory(path: RelativePath) -> Self {
        Self {
            path,
            kind: EntryKind::Directory,
        }
    }
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `archetype_adapters::filesystem::LocalFilesystem` (production)
/// - `archetype_adapters::filesystem::MemoryFilesystem` (testing)
///
/// ## Design Notes
///
/// - Methods return raw `io::Result`; the reifier decides which taxonomy
///   error a failure becomes (copy, template, bootstrap)
/// - Implementations must be callable from several worker threads at once
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Tri-state existence check.
    fn probe(&self, path: &Path) -> io::Result<PathProbe>;

    /// Every entry below `root` at any depth, dot-prefixed names included.
    ///
    /// Paths are relative to `root`; `root` itself is not listed. Symbolic
    /// links are followed, so a linked file is reported as a file.
    fn walk(&self, root: &Path) -> io::Result<Vec<TreeEntry>>;

    /// Create a directory and all parent directories. No error if it exists.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Read a whole file.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Replace the file at `path` with `contents` in one complete write.
    ///
    /// Readers observe either the previous content or the new content.
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Copy a file's content to `to`, overwriting it.
    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// Port for template rendering.
///
/// Implemented by:
/// - `archetype_adapters::renderer::TagRenderer` (`<%= %>` tags)
///
/// Rendering must be pure: the same text and metadata always produce the
/// same output.
#[cfg_attr(test, mockall::automock)]
pub trait TemplateRenderer: Send + Sync {
    /// Render `template` against `metadata`.
    fn render(&self, template: &str, metadata: &Metadata) -> Result<String, TemplateError>;
}
