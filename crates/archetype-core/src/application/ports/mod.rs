//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `archetype-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: Tree discovery and file operations
//!   - `TemplateRenderer`: Template evaluation against metadata
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{EntryKind, Filesystem, PathProbe, TemplateRenderer, TreeEntry};

#[cfg(test)]
pub use output::{MockFilesystem, MockTemplateRenderer};
