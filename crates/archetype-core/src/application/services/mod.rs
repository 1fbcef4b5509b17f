//! Application services - orchestrate use cases.
//!
//! The [`Reifier`] coordinates the domain layer and ports to accomplish the
//! single use case "materialize an archetype into a target directory". The
//! static and template phases are private to it.

pub mod outcome;
pub mod plan;
pub mod reifier;

mod static_copier;
mod template_phase;

pub use outcome::ReificationReport;
pub use plan::ReificationPlan;
pub use reifier::Reifier;
