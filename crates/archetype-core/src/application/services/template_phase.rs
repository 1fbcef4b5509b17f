//! Template phase: render `<source>/templates` into the target.

use std::path::Path;

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::{
    application::{
        ports::{Filesystem, TemplateRenderer},
        services::{outcome::FailureLog, plan::ReificationPlan},
    },
    domain::{Encoding, Metadata, RelativePath},
    error::{ReifyError, RenderFailure},
};

/// Inputs shared by every template of one reification.
pub(crate) struct TemplateJob<'a> {
    pub fs: &'a dyn Filesystem,
    pub renderer: &'a dyn TemplateRenderer,
    pub target: &'a Path,
    pub metadata: &'a Metadata,
    pub encoding: Encoding,
}

impl TemplateJob<'_> {
    /// Render every planned template, independently and in parallel.
    ///
    /// Returns how many were written. Failures are recorded per file and do
    /// not stop the others.
    pub(crate) fn run(&self, plan: &ReificationPlan, failures: &FailureLog) -> usize {
        let rendered = plan
            .template_files
            .par_iter()
            .filter(|path| match self.render_one(&plan.template_root, path) {
                Ok(()) => true,
                Err(cause) => {
                    failures.record(ReifyError::TemplateRender {
                        path: (*path).clone(),
                        cause,
                    });
                    false
                }
            })
            .count();

        debug!(templates_rendered = rendered, "Template phase settled");
        rendered
    }

    fn render_one(&self, template_root: &Path, path: &RelativePath) -> Result<(), RenderFailure> {
        trace!(path = %path, "Rendering template");

        let raw = self
            .fs
            .read(&path.under(template_root))
            .map_err(RenderFailure::Read)?;
        let text = self.encoding.decode(&raw).map_err(RenderFailure::Decode)?;
        let rendered = self.renderer.render(&text, self.metadata)?;
        let bytes = self
            .encoding
            .encode(&rendered)
            .map_err(RenderFailure::Encode)?;

        let destination = path.under(self.target);
        if let Some(parent) = destination.parent() {
            self.fs
                .create_dir_all(parent)
                .map_err(RenderFailure::Write)?;
        }
        self.fs
            .write(&destination, &bytes)
            .map_err(RenderFailure::Write)
    }
}
