// ============================================================================
// domain/error.rs - DOMAIN AND TEMPLATE ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// Domain errors are raised while constructing values (paths, metadata,
/// encodings), never while touching the filesystem.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Path Errors
    // ========================================================================
    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Path escapes its root: {path}")]
    PathEscapesRoot { path: String },

    // ========================================================================
    // Value Errors
    // ========================================================================
    #[error("Metadata must be a mapping of names to values, got {found}")]
    MetadataNotMapping { found: &'static str },

    #[error("Unsupported text encoding '{label}'")]
    UnsupportedEncoding { label: String },
}

/// Failure raised by a [`TemplateRenderer`](crate::application::ports::TemplateRenderer).
///
/// Distinguishes a malformed template from a template that references a
/// name the metadata does not define.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// The template text is not valid template syntax.
    #[error("syntax error at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    /// An expression names something absent from the metadata.
    #[error("'{name}' is not defined")]
    UndefinedReference { name: String },

    /// Any other evaluation failure reported by a renderer implementation.
    #[error("evaluation failed: {message}")]
    Evaluation { message: String },
}
