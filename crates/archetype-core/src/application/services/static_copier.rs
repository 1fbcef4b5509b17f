//! Static phase: mirror `<source>/static` into the target byte-for-byte.

use std::path::Path;

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::{
    application::{
        ports::Filesystem,
        services::{outcome::FailureLog, plan::ReificationPlan},
    },
    error::ReifyError,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct StaticOutcome {
    pub directories_ensured: usize,
    pub files_copied: usize,
}

/// Copy every planned static entry into `target`.
///
/// Directories are created first, parents before children, then files are
/// copied in parallel. Each failure is recorded and the remaining entries are
/// still attempted; nothing already copied is rolled back.
pub(crate) fn copy_static(
    fs: &dyn Filesystem,
    plan: &ReificationPlan,
    target: &Path,
    failures: &FailureLog,
) -> StaticOutcome {
    let mut directories_ensured = 0;
    for directory in &plan.static_directories {
        let to = directory.under(target);
        match fs.create_dir_all(&to) {
            Ok(()) => directories_ensured += 1,
            Err(source) => failures.record(ReifyError::Copy {
                from: directory.under(&plan.static_root),
                path: to,
                source,
            }),
        }
    }

    let files_copied = plan
        .static_files
        .par_iter()
        .filter(|file| {
            let from = file.under(&plan.static_root);
            let to = file.under(target);
            trace!(path = %file, "Copying static file");
            match fs.copy_file(&from, &to) {
                Ok(()) => true,
                Err(source) => {
                    failures.record(ReifyError::Copy {
                        from,
                        path: to,
                        source,
                    });
                    false
                }
            }
        })
        .count();

    debug!(directories_ensured, files_copied, "Static phase settled");

    StaticOutcome {
        directories_ensured,
        files_copied,
    }
}
