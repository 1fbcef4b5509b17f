//! Implementation of the `archetype reify` command.
//!
//! Responsibility: turn CLI arguments and configuration into an
//! `Archetype` and a `ReificationRequest`, call the core reifier, and
//! display results. No business logic lives here.

use std::error::Error;
use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info, instrument};

use archetype_adapters::local_reifier;
use archetype_core::{
    application::{ReificationPlan, ReificationReport},
    domain::{Archetype, Metadata, ReificationRequest},
};

use crate::{
    cli::ReifyArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `archetype reify` command.
///
/// 1. Assemble metadata from `--metadata` and `--set`
/// 2. Resolve encoding and worker count (flags over config)
/// 3. `--dry-run`: validate and list the plan, write nothing
/// 4. Otherwise reify and print a summary
#[instrument(skip_all, fields(source = %args.source.display(), target = %args.target.display()))]
pub fn execute(args: ReifyArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let metadata = build_metadata(args.metadata.as_deref(), &args.set)?;

    let encoding = match args.encoding {
        Some(encoding) => encoding,
        None => config.encoding().map_err(|e| CliError::ConfigError {
            message: format!("{e:#}"),
            source: None,
        })?,
    };
    let workers = args.workers.map(usize::from).or(config.reify.workers);

    debug!(
        %encoding,
        workers = workers.unwrap_or(0),
        metadata_keys = metadata.len(),
        "Request resolved"
    );

    let mut reifier = local_reifier();
    if let Some(workers) = workers {
        reifier = reifier.with_workers(workers);
    }
    let archetype = Archetype::new(&args.source);

    if args.dry_run {
        let plan = reifier.plan(&archetype)?;
        return show_plan(&plan, &args.target, &output);
    }

    let request = ReificationRequest::new(&args.target)
        .with_metadata(metadata)
        .with_encoding(encoding);

    output.header(&format!(
        "Reifying '{}' into '{}'...",
        args.source.display(),
        args.target.display()
    ))?;

    let spinner = output.spinner("Copying static files and rendering templates");
    let result = archetype.reify(&reifier, &request);
    spinner.finish_and_clear();
    let report = result?;
    info!(files = report.files_written(), "Reify command completed");

    show_report(&report, &output)?;
    Ok(())
}

// ── Metadata ──────────────────────────────────────────────────────────────────

/// Metadata from an optional JSON file, overlaid with `--set` pairs.
///
/// Dotted `--set` keys address nested objects, matching how templates
/// resolve `<%= owner.name %>`.
fn build_metadata(file: Option<&Path>, overrides: &[(String, String)]) -> CliResult<Metadata> {
    let mut metadata = match file {
        Some(path) => load_metadata_file(path)?,
        None => Metadata::new(),
    };
    for (key, raw) in overrides {
        metadata.insert_path(key.split('.'), parse_value(raw));
    }
    Ok(metadata)
}

fn load_metadata_file(path: &Path) -> CliResult<Metadata> {
    let fail = |source: Box<dyn Error + Send + Sync>| CliError::Metadata {
        path: path.to_path_buf(),
        source,
    };

    let text = fs::read_to_string(path).map_err(|e| fail(e.into()))?;
    let value: Value = serde_json::from_str(&text).map_err(|e| fail(e.into()))?;
    Metadata::from_value(value).map_err(|e| fail(e.into()))
}

/// `36` and `true` stay typed; anything that is not JSON is a string.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

// ── Display ───────────────────────────────────────────────────────────────────

fn show_plan(plan: &ReificationPlan, target: &Path, output: &OutputManager) -> CliResult<()> {
    output.info(&format!(
        "Dry run: would write {} files into {}",
        plan.file_count(),
        target.display()
    ))?;

    for dir in &plan.static_directories {
        output.print(&format!("  mkdir   {dir}/"))?;
    }
    for file in &plan.static_files {
        output.print(&format!("  copy    {file}"))?;
    }
    for file in &plan.template_files {
        output.print(&format!("  render  {file}"))?;
    }
    for path in &plan.collisions {
        output.warning(&format!(
            "'{path}' is in both static/ and templates/; the template would win"
        ))?;
    }
    Ok(())
}

fn show_report(report: &ReificationReport, output: &OutputManager) -> CliResult<()> {
    for path in &report.collisions {
        output.warning(&format!(
            "'{path}' is in both static/ and templates/; the rendered template was kept"
        ))?;
    }
    output.success(&format!(
        "{} files written ({} copied, {} rendered)",
        report.files_written(),
        report.files_copied,
        report.templates_rendered
    ))?;
    Ok(())
}

// ── tests ─────────────────────────────────────────────────────────────────────
