pub mod commands;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

use std::process::ExitCode;

use clap::Parser;
use tracing::info;

use crate::commands::{AppContext, Cli, CommandError, CommandResult};

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    match try_run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

pub fn try_run(cli: Cli) -> CommandResult<()> {
    let config = crate::services::config_service::resolve_config(
        cli.config.as_deref(),
        &cli.overrides(),
    )?;

    crate::utils::logger::init_logging(&config.log_dir).map_err(CommandError::from)?;
    info!(
        target: "app::command",
        data_dir = %config.data_dir.display(),
        output_dir = %config.output_dir.display(),
        format = config.export_format.file_extension(),
        "starting"
    );

    let context = AppContext::new(config);
    context.execute(&cli.command)?;
    Ok(())
}
