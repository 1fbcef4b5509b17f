//! Infrastructure adapters for archetype.
//!
//! This crate implements the ports defined in `archetype-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod renderer;

use archetype_core::application::Reifier;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use renderer::TagRenderer;

/// A reifier wired to the local disk and the tag renderer.
pub fn local_reifier() -> Reifier {
    Reifier::new(Box::new(LocalFilesystem::new()), Box::new(TagRenderer::new()))
}
