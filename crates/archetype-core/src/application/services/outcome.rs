//! What a reification produced, and how concurrent failures are collected.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::warn;

use crate::domain::RelativePath;
use crate::error::ReifyError;

/// Summary of a successful reification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReificationReport {
    /// Static directories created (or already present) in the target.
    pub directories_ensured: usize,
    /// Static files copied verbatim.
    pub files_copied: usize,
    /// Templates rendered and written.
    pub templates_rendered: usize,
    /// Paths present in both subtrees; the rendered template was kept.
    pub collisions: Vec<RelativePath>,
}

impl ReificationReport {
    /// Files written to the target, static and rendered.
    pub fn files_written(&self) -> usize {
        self.files_copied + self.templates_rendered
    }
}

/// Shared across both phases and every worker.
///
/// The first failure recorded wins; later ones are logged and counted. Nothing
/// is cancelled: siblings keep running and their writes stay on disk.
#[derive(Debug, Default)]
pub(crate) struct FailureLog {
    first: OnceLock<ReifyError>,
    count: AtomicUsize,
}

impl FailureLog {
    pub(crate) fn record(&self, err: ReifyError) {
        self.count.fetch_add(1, Ordering::Relaxed);
        if let Err(later) = self.first.set(err) {
            warn!(error = %later, "Additional reification failure");
        }
    }

    pub(crate) fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }

    /// The first recorded failure, if any.
    pub(crate) fn into_first(self) -> Option<ReifyError> {
        self.first.into_inner()
    }
}
