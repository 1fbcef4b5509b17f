//! Application layer for archetype reification.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (Reifier)
//! - **Ports**: Interface definitions (traits) for external dependencies
//!
//! The application layer coordinates the domain layer: it decides ordering,
//! concurrency, and which error a failure becomes. Values and their rules
//! live in `crate::domain`.

pub mod ports;
pub mod services;

// Re-export main services
pub use services::{ReificationPlan, ReificationReport, Reifier};

// Re-export port traits (for adapter implementation)
pub use ports::{EntryKind, Filesystem, PathProbe, TemplateRenderer, TreeEntry};
