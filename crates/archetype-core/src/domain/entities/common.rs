use super::DomainError;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A filesystem path guaranteed to be relative to an archetype subtree.
///
/// Invariant: never absolute, never contains `..`. Enforced at construction,
/// so joining it onto a target root always stays inside that root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelativePath(PathBuf);

impl RelativePath {
    /// Fallible constructor.
    pub fn try_new(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();
        if path.is_absolute() || path.has_root() {
            return Err(DomainError::AbsolutePathNotAllowed {
                path: path.display().to_string(),
            });
        }
        if path.components().any(|c| matches!(c, Component::ParentDir)) {
            return Err(DomainError::PathEscapesRoot {
                path: path.display().to_string(),
            });
        }
        Ok(Self(path))
    }

    /// Relative path of `entry` below `root`.
    ///
    /// Used by discovery: every walked entry is re-expressed relative to the
    /// subtree it was found in.
    pub fn below(root: &Path, entry: &Path) -> Result<Self, DomainError> {
        let relative = entry
            .strip_prefix(root)
            .map_err(|_| DomainError::PathEscapesRoot {
                path: entry.display().to_string(),
            })?;
        Self::try_new(relative)
    }

    /// Resolve this path under `root`.
    pub fn under(&self, root: &Path) -> PathBuf {
        root.join(&self.0)
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}
