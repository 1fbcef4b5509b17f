//! Unified error handling for archetype reification.
//!
//! [`ReifyError`] is the single failure type surfaced by
//! [`Reifier::reify`](crate::application::Reifier::reify). Each variant names
//! the stage that raised it and carries the offending path, so callers can
//! report precisely what went wrong without inspecting strings.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::domain::{CodecError, ReificationState, RelativePath, TemplateError};

/// Root error type for a reification.
#[derive(Debug, Error)]
pub enum ReifyError {
    /// The archetype's source directory is missing or cannot be accessed.
    ///
    /// Raised before anything is written to the target.
    #[error("The source directory does not exist: '{}'", .path.display())]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: Option<io::Error>,
    },

    /// The target directory (or one of its ancestors) could not be created.
    #[error("Target directory cannot be created: '{}'", .path.display())]
    TargetUnwritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An archetype subtree exists but could not be listed.
    #[error("Cannot list archetype subtree '{}'", .root.display())]
    Discover {
        root: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A static entry could not be created or copied.
    #[error("Failed to copy '{}' to '{}'", .from.display(), .path.display())]
    Copy {
        from: PathBuf,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A template could not be read, rendered, or written.
    #[error("Template '{path}' failed: {cause}")]
    TemplateRender {
        path: RelativePath,
        #[source]
        cause: RenderFailure,
    },
}

/// Why a single template failed.
#[derive(Debug, Error)]
pub enum RenderFailure {
    #[error("cannot read template: {0}")]
    Read(#[source] io::Error),

    #[error("cannot decode template: {0}")]
    Decode(#[source] CodecError),

    #[error("{0}")]
    Syntax(#[source] TemplateError),

    #[error("{0}")]
    UndefinedReference(#[source] TemplateError),

    #[error("renderer failed: {0}")]
    Evaluation(#[source] TemplateError),

    #[error("cannot encode rendered text: {0}")]
    Encode(#[source] CodecError),

    #[error("cannot write rendered file: {0}")]
    Write(#[source] io::Error),
}

impl From<TemplateError> for RenderFailure {
    fn from(err: TemplateError) -> Self {
        match err {
            TemplateError::Syntax { .. } => Self::Syntax(err),
            TemplateError::UndefinedReference { .. } => Self::UndefinedReference(err),
            TemplateError::Evaluation { .. } => Self::Evaluation(err),
        }
    }
}

impl RenderFailure {
    /// `true` when the failure came from the filesystem rather than the
    /// template text.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Read(_) | Self::Write(_))
    }
}

impl ReifyError {
    /// The state the reification was in when this error was raised.
    pub fn stage(&self) -> ReificationState {
        match self {
            Self::SourceNotFound { .. } => ReificationState::Validating,
            Self::TargetUnwritable { .. } => ReificationState::Bootstrapping,
            Self::Discover { .. } | Self::Copy { .. } | Self::TemplateRender { .. } => {
                ReificationState::Copying
            }
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::SourceNotFound { path, .. } => vec![
                format!("Check that '{}' exists and is readable", path.display()),
                "An archetype is a directory containing 'static/' and/or 'templates/'".into(),
            ],
            Self::TargetUnwritable { path, .. } => vec![
                format!("Failed to create: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure no file exists where a directory is expected".into(),
            ],
            Self::Discover { root, .. } => vec![
                format!("Check that '{}' is a readable directory", root.display()),
                "'static' and 'templates' must be directories when present".into(),
            ],
            Self::Copy { path, .. } => vec![
                format!("Failed at: {}", path.display()),
                "Check permissions and available disk space".into(),
                "Files copied before the failure are left in place".into(),
            ],
            Self::TemplateRender { path, cause } => {
                let mut hints = vec![format!("Template: {}", path)];
                match cause {
                    RenderFailure::UndefinedReference(_) => {
                        hints.push("Provide the missing value in the metadata".into())
                    }
                    RenderFailure::Syntax(_) => hints.push(
                        "Files with literal '<%' text belong in the 'static/' subtree".into(),
                    ),
                    RenderFailure::Decode(_) | RenderFailure::Encode(_) => {
                        hints.push("Try a different --encoding".into())
                    }
                    _ => hints.push("Check permissions and available disk space".into()),
                }
                hints
            }
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::SourceNotFound { .. } => ErrorCategory::NotFound,
            Self::TargetUnwritable { .. } | Self::Discover { .. } | Self::Copy { .. } => {
                ErrorCategory::Filesystem
            }
            Self::TemplateRender { cause, .. } if cause.is_io() => ErrorCategory::Filesystem,
            Self::TemplateRender { .. } => ErrorCategory::Template,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    NotFound,
    Template,
    Filesystem,
}

/// Convenient result type alias.
pub type ReifyResult<T> = Result<T, ReifyError>;
