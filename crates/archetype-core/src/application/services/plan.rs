//! Discovery of the two archetype subtrees.

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{
    application::ports::{EntryKind, Filesystem, PathProbe, TreeEntry},
    domain::{Archetype, RelativePath},
    error::{ReifyError, ReifyResult},
};

/// Everything a reification will write, computed before any write happens.
///
/// Entries are sorted, so parents precede their children and two plans of
/// the same archetype compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReificationPlan {
    pub static_root: PathBuf,
    pub template_root: PathBuf,
    /// Static directories, mirrored even when empty.
    pub static_directories: Vec<RelativePath>,
    /// Static files to copy. Excludes collisions.
    pub static_files: Vec<RelativePath>,
    /// Template files to render.
    pub template_files: Vec<RelativePath>,
    /// Files present in both subtrees. The template wins.
    pub collisions: Vec<RelativePath>,
}

impl ReificationPlan {
    /// Walk both subtrees of `archetype`. Absent subtrees contribute nothing.
    pub(crate) fn discover(fs: &dyn Filesystem, archetype: &Archetype) -> ReifyResult<Self> {
        let static_root = archetype.static_root();
        let template_root = archetype.template_root();

        let static_entries = discover_subtree(fs, &static_root)?;
        let template_files: BTreeSet<RelativePath> = discover_subtree(fs, &template_root)?
            .into_iter()
            .filter(|entry| entry.kind == EntryKind::File)
            .map(|entry| entry.path)
            .collect();

        let mut static_directories = BTreeSet::new();
        let mut static_files = BTreeSet::new();
        let mut collisions = Vec::new();

        for entry in static_entries {
            match entry.kind {
                EntryKind::Directory => {
                    static_directories.insert(entry.path);
                }
                EntryKind::File if template_files.contains(&entry.path) => {
                    warn!(
                        path = %entry.path,
                        "Path exists in both static and templates; keeping the template"
                    );
                    collisions.push(entry.path);
                }
                EntryKind::File => {
                    static_files.insert(entry.path);
                }
            }
        }
        collisions.sort();

        let plan = Self {
            static_root,
            template_root,
            static_directories: static_directories.into_iter().collect(),
            static_files: static_files.into_iter().collect(),
            template_files: template_files.into_iter().collect(),
            collisions,
        };

        debug!(
            static_directories = plan.static_directories.len(),
            static_files = plan.static_files.len(),
            templates = plan.template_files.len(),
            collisions = plan.collisions.len(),
            "Archetype discovered"
        );

        Ok(plan)
    }

    /// Number of files the plan writes.
    pub fn file_count(&self) -> usize {
        self.static_files.len() + self.template_files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.static_directories.is_empty() && self.file_count() == 0
    }
}

/// List a subtree, or nothing when it does not exist.
///
/// Probe errors are propagated rather than treated as absence.
fn discover_subtree(fs: &dyn Filesystem, root: &Path) -> ReifyResult<Vec<TreeEntry>> {
    let walk_error = |source: io::Error| ReifyError::Discover {
        root: root.to_path_buf(),
        source,
    };

    match fs.probe(root).map_err(walk_error)? {
        PathProbe::Absent => {
            debug!(root = %root.display(), "Subtree absent");
            Ok(Vec::new())
        }
        PathProbe::File => Err(walk_error(io::Error::new(
            io::ErrorKind::NotADirectory,
            "archetype subtree is not a directory",
        ))),
        PathProbe::Directory => fs.walk(root).map_err(walk_error),
    }
}
