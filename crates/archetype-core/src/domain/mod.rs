//! Core domain layer for archetype reification.
//!
//! Pure values with no I/O: the archetype itself, the request describing one
//! reification, the metadata exposed to templates, text encodings, and the
//! reification state machine. Filesystem access and template evaluation are
//! reached through the ports in [`crate::application::ports`].
//!
//! ## Rules
//!
//! - **No I/O**: nothing here touches the filesystem
//! - **Immutable values**: everything is `Clone + PartialEq`
//! - **Fallible construction**: invalid paths and metadata shapes are
//!   rejected with [`DomainError`] when built, not when used

pub mod entities;
pub mod error;
pub mod value_objects;

pub use entities::{
    archetype::{Archetype, ArchetypeLayout},
    common::RelativePath,
    metadata::Metadata,
    request::ReificationRequest,
};

pub use error::{DomainError, TemplateError};

pub use value_objects::{CodecError, Encoding, ReificationState};
