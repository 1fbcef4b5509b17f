//! Reifier - main application orchestrator.
//!
//! This service drives one reification through its states:
//! 1. Validate the archetype's source directory
//! 2. Ensure the target directory exists
//! 3. Discover both subtrees, then copy the static tree and render the
//!    templates concurrently
//! 4. Report success, or the first failure observed
//!
//! It implements the driving port (incoming) and uses driven ports (outgoing).

use std::path::Path;

use rayon::ThreadPoolBuilder;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ports::{Filesystem, PathProbe, TemplateRenderer},
        services::{
            outcome::{FailureLog, ReificationReport},
            plan::ReificationPlan,
            static_copier::copy_static,
            template_phase::TemplateJob,
        },
    },
    domain::{Archetype, ReificationRequest, ReificationState},
    error::{ReifyError, ReifyResult},
};

/// Main reification service.
///
/// Holds the injected adapters and, optionally, a worker count. Stateless
/// between calls: one `Reifier` can serve any number of reifications.
///
/// Concurrent calls against the *same* target directory are not
/// coordinated and may race.
pub struct Reifier {
    filesystem: Box<dyn Filesystem>,
    renderer: Box<dyn TemplateRenderer>,
    workers: Option<usize>,
}

impl Reifier {
    /// Create a new reifier with the given adapters.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use archetype_core::application::Reifier;
    ///
    /// let reifier = Reifier::new(
    ///     filesystem, // impl Filesystem
    ///     renderer,   // impl TemplateRenderer
    /// );
    /// ```
    pub fn new(filesystem: Box<dyn Filesystem>, renderer: Box<dyn TemplateRenderer>) -> Self {
        Self {
            filesystem,
            renderer,
            workers: None,
        }
    }

    /// Run reifications on a dedicated pool of `workers` threads instead of
    /// rayon's global pool.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers.max(1));
        self
    }

    pub fn workers(&self) -> Option<usize> {
        self.workers
    }

    /// Materialize `archetype` into the request's target directory.
    ///
    /// Fails fast with [`ReifyError::SourceNotFound`] before touching the
    /// target, and with [`ReifyError::TargetUnwritable`] before copying.
    /// Once copying starts, both phases run to completion; the first failure
    /// observed is returned and files already written stay on disk.
    #[instrument(
        skip_all,
        fields(
            source = %archetype.source_directory().display(),
            target = %request.target_directory().display(),
            encoding = %request.encoding()
        )
    )]
    pub fn reify(
        &self,
        archetype: &Archetype,
        request: &ReificationRequest,
    ) -> ReifyResult<ReificationReport> {
        let mut state = StateTracker::default();

        match self.drive(&mut state, archetype, request) {
            Ok(report) => {
                state.advance(ReificationState::Done);
                info!(
                    files = report.files_written(),
                    collisions = report.collisions.len(),
                    "Reification completed"
                );
                Ok(report)
            }
            Err(err) => {
                warn!(stage = %state.current(), error = %err, "Reification failed");
                state.advance(ReificationState::Failed);
                Err(err)
            }
        }
    }

    /// Validate the archetype and discover what a reification would write,
    /// without writing anything.
    pub fn plan(&self, archetype: &Archetype) -> ReifyResult<ReificationPlan> {
        self.validate_source(archetype)?;
        ReificationPlan::discover(self.filesystem.as_ref(), archetype)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn drive(
        &self,
        state: &mut StateTracker,
        archetype: &Archetype,
        request: &ReificationRequest,
    ) -> ReifyResult<ReificationReport> {
        state.advance(ReificationState::Validating);
        self.validate_source(archetype)?;

        state.advance(ReificationState::Bootstrapping);
        self.bootstrap_target(request.target_directory())?;

        state.advance(ReificationState::Copying);
        let plan = ReificationPlan::discover(self.filesystem.as_ref(), archetype)?;
        self.in_pool(|| self.run_phases(&plan, request))
    }

    fn validate_source(&self, archetype: &Archetype) -> ReifyResult<()> {
        let path = archetype.source_directory();
        match self.filesystem.probe(path) {
            Ok(PathProbe::Directory) => Ok(()),
            Ok(PathProbe::Absent | PathProbe::File) => Err(ReifyError::SourceNotFound {
                path: path.to_path_buf(),
                source: None,
            }),
            Err(source) => Err(ReifyError::SourceNotFound {
                path: path.to_path_buf(),
                source: Some(source),
            }),
        }
    }

    fn bootstrap_target(&self, target: &Path) -> ReifyResult<()> {
        self.filesystem
            .create_dir_all(target)
            .map_err(|source| ReifyError::TargetUnwritable {
                path: target.to_path_buf(),
                source,
            })
    }

    /// Both phases write to disjoint paths (collisions were removed from the
    /// static side during discovery), so they share no lock.
    fn run_phases(
        &self,
        plan: &ReificationPlan,
        request: &ReificationRequest,
    ) -> ReifyResult<ReificationReport> {
        let failures = FailureLog::default();
        let target = request.target_directory();
        let templates = TemplateJob {
            fs: self.filesystem.as_ref(),
            renderer: self.renderer.as_ref(),
            target,
            metadata: request.metadata(),
            encoding: request.encoding(),
        };

        let (copied, templates_rendered) = rayon::join(
            || copy_static(self.filesystem.as_ref(), plan, target, &failures),
            || templates.run(plan, &failures),
        );

        let failed = failures.count();
        if let Some(err) = failures.into_first() {
            if failed > 1 {
                warn!(failures = failed, "Several entries failed; reporting the first");
            }
            return Err(err);
        }

        Ok(ReificationReport {
            directories_ensured: copied.directories_ensured,
            files_copied: copied.files_copied,
            templates_rendered,
            collisions: plan.collisions.clone(),
        })
    }

    fn in_pool<R, F>(&self, op: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        let Some(workers) = self.workers else {
            return op();
        };

        match ThreadPoolBuilder::new().num_threads(workers).build() {
            Ok(pool) => pool.install(op),
            Err(e) => {
                warn!(workers, error = %e, "Failed to build worker pool; using the global pool");
                op()
            }
        }
    }
}

impl Archetype {
    /// Reify this archetype with `reifier`.
    ///
    /// Shorthand for [`Reifier::reify`].
    pub fn reify(
        &self,
        reifier: &Reifier,
        request: &ReificationRequest,
    ) -> ReifyResult<ReificationReport> {
        reifier.reify(self, request)
    }
}

/// Tracks and logs the state of one reification.
#[derive(Debug, Default)]
struct StateTracker {
    current: ReificationState,
}

impl StateTracker {
    fn current(&self) -> ReificationState {
        self.current
    }

    fn advance(&mut self, next: ReificationState) {
        debug_assert!(
            self.current.can_transition_to(next),
            "invalid transition {} -> {}",
            self.current,
            next
        );
        debug!(from = %self.current, to = %next, "Reification state changed");
        self.current = next;
    }
}
