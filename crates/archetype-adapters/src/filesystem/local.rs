//! Local filesystem adapter using std::fs.

use std::fs;
use std::io::{self, Write as _};
use std::path::Path;

use archetype_core::{
    application::ports::{EntryKind, Filesystem, PathProbe, TreeEntry},
    domain::RelativePath,
};
use tempfile::NamedTempFile;
use tracing::warn;
use walkdir::WalkDir;

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn probe(&self, path: &Path) -> io::Result<PathProbe> {
        match fs::metadata(path) {
            Ok(meta) if meta.is_dir() => Ok(PathProbe::Directory),
            Ok(_) => Ok(PathProbe::File),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(PathProbe::Absent),
            Err(e) => Err(e),
        }
    }

    fn walk(&self, root: &Path) -> io::Result<Vec<TreeEntry>> {
        let mut entries = Vec::new();

        for entry in WalkDir::new(root)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(map_walk_error)?;
            let file_type = entry.file_type();

            let kind = if file_type.is_dir() {
                EntryKind::Directory
            } else if file_type.is_file() {
                EntryKind::File
            } else {
                warn!(path = %entry.path().display(), "Special file skipped");
                continue;
            };

            let path = RelativePath::below(root, entry.path())
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            entries.push(TreeEntry { path, kind });
        }

        Ok(entries)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    /// Written to a sibling temp file, then renamed over `path`, so readers
    /// never observe a partially written file.
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut staged = NamedTempFile::new_in(parent)?;
        staged.write_all(contents)?;
        staged.as_file().sync_all()?;
        set_default_permissions(staged.as_file())?;
        staged.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::copy(from, to).map(|_| ())
    }
}

/// Temp files are created owner-only; rendered files get ordinary permissions.
fn set_default_permissions(file: &fs::File) -> io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o644))?;
    }
    #[cfg(not(unix))]
    {
        let _ = file;
    }
    Ok(())
}

fn map_walk_error(err: walkdir::Error) -> io::Error {
    let kind = err.io_error().map_or(io::ErrorKind::Other, io::Error::kind);
    match err.path() {
        Some(path) => io::Error::new(kind, format!("{}: {err}", path.display())),
        None => io::Error::new(kind, err.to_string()),
    }
}
