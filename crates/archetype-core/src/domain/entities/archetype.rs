//! The archetype: a reusable source tree materialized into target directories.

use std::path::{Path, PathBuf};

/// Fixed names of the two subtrees under an archetype's source directory.
///
/// The layout is not configurable: `<source>/static/**` is copied verbatim,
/// `<source>/templates/**` is rendered. Both are optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchetypeLayout;

impl ArchetypeLayout {
    /// Subtree copied byte-for-byte.
    pub const STATIC_DIR: &'static str = "static";
    /// Subtree rendered against the request metadata.
    pub const TEMPLATES_DIR: &'static str = "templates";
}

/// An archetype rooted at a source directory.
///
/// Constructing one performs no I/O; the source directory is only checked
/// when a reification starts. The value is immutable and can be reified
/// any number of times against different targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Archetype {
    source_directory: PathBuf,
}

impl Archetype {
    pub fn new(source_directory: impl Into<PathBuf>) -> Self {
        Self {
            source_directory: source_directory.into(),
        }
    }

    pub fn source_directory(&self) -> &Path {
        &self.source_directory
    }

    /// `<source>/static`
    pub fn static_root(&self) -> PathBuf {
        self.source_directory.join(ArchetypeLayout::STATIC_DIR)
    }

    /// `<source>/templates`
    pub fn template_root(&self) -> PathBuf {
        self.source_directory.join(ArchetypeLayout::TEMPLATES_DIR)
    }
}
