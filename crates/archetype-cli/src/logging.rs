//! Diagnostics for a reification run, written to stderr.
//!
//! What each verbosity shows:
//!
//! | Flag(s)   | Level | A reification logs                               |
//! |-----------|-------|--------------------------------------------------|
//! | `--quiet` | ERROR | nothing beyond the final error                   |
//! | (none)    | WARN  | collisions, failed entries, pool fallbacks       |
//! | `-v`      | INFO  | start and completion of each reification         |
//! | `-vv`     | DEBUG | state changes, discovery counts, phase summaries |
//! | `-vvv`    | TRACE | every file copied or rendered                    |
//!
//! A valid `RUST_LOG` replaces the table entirely. A malformed one is
//! reported and the flags apply.

use std::io::IsTerminal as _;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::GlobalArgs;

/// Crates whose events follow the verbosity flags. Everything else is
/// limited to errors.
const OWN_TARGETS: [&str; 3] = ["archetype", "archetype_core", "archetype_adapters"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Verbosity {
    Quiet,
    Normal,
    Info,
    Debug,
    Trace,
}

impl Verbosity {
    fn from_args(args: &GlobalArgs) -> Self {
        if args.quiet {
            return Self::Quiet;
        }
        match args.verbose {
            0 => Self::Normal,
            1 => Self::Info,
            2 => Self::Debug,
            _ => Self::Trace,
        }
    }

    fn level(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    fn filter(self) -> EnvFilter {
        let level = self.level();
        let directives: Vec<String> = OWN_TARGETS
            .iter()
            .map(|target| format!("{target}={level}"))
            .collect();
        EnvFilter::new(format!("error,{}", directives.join(",")))
    }

    /// Module targets only help once the output names per-entry work.
    fn shows_targets(self) -> bool {
        self >= Self::Debug
    }
}

/// Pick the filter: `rust_log` when it parses, otherwise the one for
/// `verbosity`. The second value explains why `rust_log` was ignored.
fn select_filter(rust_log: Option<&str>, verbosity: Verbosity) -> (EnvFilter, Option<String>) {
    match rust_log.map(str::trim).filter(|raw| !raw.is_empty()) {
        None => (verbosity.filter(), None),
        Some(raw) => match EnvFilter::try_new(raw) {
            Ok(filter) => (filter, None),
            Err(e) => (
                verbosity.filter(),
                Some(format!("Ignoring malformed RUST_LOG '{raw}': {e}")),
            ),
        },
    }
}

/// Install the stderr subscriber.
///
/// Called once from `main`; a second call in the same process fails.
pub fn init_logging(args: &GlobalArgs) -> anyhow::Result<()> {
    let verbosity = Verbosity::from_args(args);
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let (filter, rejected) = select_filter(rust_log.as_deref(), verbosity);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(verbosity.shows_targets())
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(!args.no_color && std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise tracing: {e}"))?;

    if let Some(reason) = rejected {
        tracing::warn!("{reason}");
    }
    Ok(())
}
