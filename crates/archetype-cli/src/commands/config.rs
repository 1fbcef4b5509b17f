//! `archetype config`: show the effective configuration.

use crate::{
    cli::ConfigArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(args: ConfigArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    if args.path {
        output.emit(&AppConfig::config_path().display().to_string())?;
        return Ok(());
    }

    output.emit(render(&config)?.trim_end())?;
    Ok(())
}

fn render(config: &AppConfig) -> CliResult<String> {
    toml::to_string_pretty(config).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise config: {e}"),
        source: Some(Box::new(e)),
    })
}
