//! Archetype Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for materializing
//! project archetypes: a source directory holding a `static/` subtree (copied
//! verbatim) and a `templates/` subtree (rendered against metadata), both
//! mirrored into one target directory.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          archetype-cli (CLI)            │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │               (Reifier)                 │
//! │   validate → bootstrap → copy ∥ render  │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │     (Driven: Filesystem, Renderer)      │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    archetype-adapters (Infrastructure)  │
//! │ (LocalFilesystem, TagRenderer, Memory)  │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (Archetype, ReificationRequest, Metadata)│
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use archetype_core::prelude::*;
//!
//! let archetype = Archetype::new("skeletons/service");
//! let request = ReificationRequest::new("./my-service")
//!     .with_metadata(Metadata::new().with("name", "Yogi").with("age", 36));
//!
//! // `reifier` is built with injected adapters (see archetype-adapters)
//! let report = archetype.reify(&reifier, &request)?;
//! println!("{} files written", report.files_written());
//! ```
//!
//! ## Collisions
//!
//! A relative path present in both `static/` and `templates/` is a
//! collision. The rendered template is written and the static file is
//! skipped; each collision is logged and listed in the report.

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ReificationPlan, ReificationReport, Reifier,
        ports::{Filesystem, TemplateRenderer},
    };
    pub use crate::domain::{
        Archetype, ArchetypeLayout, Encoding, Metadata, ReificationRequest, ReificationState,
        RelativePath, TemplateError,
    };
    pub use crate::error::{ReifyError, ReifyResult, RenderFailure};
}
