//! Template renderer adapters.

mod tag;

pub use tag::TagRenderer;
