pub mod archetype;
pub mod common;
pub mod metadata;
pub mod request;

pub use crate::domain::DomainError;
pub use archetype::Archetype;
pub use metadata::Metadata;
pub use request::ReificationRequest;
