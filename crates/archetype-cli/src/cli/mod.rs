//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! and help text. No business logic lives here.

use std::path::PathBuf;

use archetype_core::domain::Encoding;
use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::GlobalArgs;

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "archetype",
    bin_name = "archetype",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Materialize archetype directories into projects",
    long_about = "An archetype is a directory with a 'static/' subtree, copied \
                  verbatim, and a 'templates/' subtree, rendered against \
                  metadata. Both are written into the target directory.",
    after_help = "EXAMPLES:\n\
        \x20 archetype reify ./archetypes/bear ./out --set name=Yogi --set age=36\n\
        \x20 archetype reify ./archetypes/bear ./out --metadata bear.json --dry-run\n\
        \x20 archetype completions bash > /usr/share/bash-completion/completions/archetype",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Reify an archetype into a target directory.
    #[command(
        visible_alias = "r",
        about = "Reify an archetype into a target directory",
        after_help = "EXAMPLES:\n\
            \x20 archetype reify ./bear ./out --set name=Yogi --set age=36\n\
            \x20 archetype reify ./bear ./out --metadata bear.json --set age=37\n\
            \x20 archetype reify ./bear ./out --encoding latin1 --workers 4"
    )]
    Reify(ReifyArgs),

    /// Show the effective configuration.
    #[command(
        about = "Show configuration",
        after_help = "EXAMPLES:\n\
            \x20 archetype config          # effective configuration as TOML\n\
            \x20 archetype config --path   # default config file location"
    )]
    Config(ConfigArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 archetype completions bash > ~/.local/share/bash-completion/completions/archetype\n\
            \x20 archetype completions zsh  > ~/.zfunc/_archetype\n\
            \x20 archetype completions fish > ~/.config/fish/completions/archetype.fish"
    )]
    Completions(CompletionsArgs),
}

// ── reify ─────────────────────────────────────────────────────────────────────

/// Arguments for `archetype reify`.
#[derive(Debug, Args)]
pub struct ReifyArgs {
    /// Archetype directory containing `static/` and/or `templates/`.
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Directory to write into; created if missing.
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// JSON file holding a metadata object.
    #[arg(
        short = 'm',
        long = "metadata",
        value_name = "FILE",
        help = "Metadata JSON file"
    )]
    pub metadata: Option<PathBuf>,

    /// Single metadata value; JSON when it parses as JSON, else a string.
    ///
    /// A dotted key such as `owner.name` sets a field of a nested object.
    #[arg(
        short = 's',
        long = "set",
        value_name = "KEY=VALUE",
        value_parser = parse_key_value,
        help = "Set a metadata value (repeatable, overrides --metadata)"
    )]
    pub set: Vec<(String, String)>,

    /// Text encoding for templates and rendered files.
    #[arg(
        short = 'e',
        long = "encoding",
        value_name = "ENCODING",
        value_parser = parse_encoding,
        help = "Template encoding (utf8, utf16le, latin1, ascii)"
    )]
    pub encoding: Option<Encoding>,

    /// Size of the worker pool.
    #[arg(
        short = 'j',
        long = "workers",
        value_name = "N",
        value_parser = clap::value_parser!(u16).range(1..),
        help = "Number of worker threads"
    )]
    pub workers: Option<u16>,

    /// Preview what would be written without writing any files.
    #[arg(long = "dry-run", help = "Show what would be written without writing")]
    pub dry_run: bool,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    if key.split('.').any(str::is_empty) {
        return Err(format!("empty segment in dotted key '{key}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn parse_encoding(raw: &str) -> Result<Encoding, String> {
    raw.parse::<Encoding>().map_err(|e| e.to_string())
}

// ── config ────────────────────────────────────────────────────────────────────

/// Arguments for `archetype config`.
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Print the default configuration file location instead.
    #[arg(long = "path", help = "Print the default config file path")]
    pub path: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `archetype completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── tests ─────────────────────────────────────────────────────────────────────
