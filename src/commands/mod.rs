pub mod dashboard;
pub mod data;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, warn};

use crate::error::{AppError, AppResult};
use crate::models::config::AppConfig;
use crate::models::dashboard::{DashboardKind, ExportFormat};
use crate::services::config_service::ConfigOverrides;
use crate::services::dashboards::DashboardService;
use crate::services::export_service::ExportService;
use crate::services::loader_service::{DataSource, LoaderService};

#[derive(Debug, Parser)]
#[command(name = "support-dashboards")]
#[command(about = "Build customer-support analytics dashboards from cleaned exports")]
pub struct Cli {
    /// YAML configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory holding the `*_cleaned.json` sources.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Directory exported dashboards are written to.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub format: Option<ExportFormat>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build and export one dashboard.
    Dashboard {
        #[arg(value_enum)]
        kind: DashboardKind,
    },
    /// Build and export all four dashboards.
    Dashboards,
    /// Load one dataset and print a column summary.
    Inspect {
        /// Dataset name, e.g. `conversation_metric`.
        dataset: String,
    },
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            data_dir: self.data_dir.clone(),
            output_dir: self.output_dir.clone(),
            export_format: self.format,
        }
    }
}

/// Services wired from a resolved configuration.
#[derive(Clone)]
pub struct AppContext {
    config: Arc<AppConfig>,
    loader: Arc<LoaderService>,
    dashboard_service: Arc<DashboardService>,
    export_service: Arc<ExportService>,
}

impl AppContext {
    pub fn new(config: AppConfig) -> Self {
        let loader = Arc::new(LoaderService::new(DataSource::new(config.data_dir.clone())));
        let dashboard_service = Arc::new(DashboardService::new(
            LoaderService::new(DataSource::new(config.data_dir.clone())),
            config.dashboards,
        ));
        let export_service = Arc::new(ExportService::new(config.output_dir.clone()));

        Self {
            config: Arc::new(config),
            loader,
            dashboard_service,
            export_service,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn loader(&self) -> Arc<LoaderService> {
        Arc::clone(&self.loader)
    }

    pub fn dashboards(&self) -> Arc<DashboardService> {
        Arc::clone(&self.dashboard_service)
    }

    pub fn exports(&self) -> Arc<ExportService> {
        Arc::clone(&self.export_service)
    }

    pub fn execute(&self, command: &Command) -> AppResult<()> {
        match command {
            Command::Dashboard { kind } => dashboard::export_dashboard(self, *kind),
            Command::Dashboards => dashboard::export_all(self),
            Command::Inspect { dataset } => data::inspect_dataset(self, dataset),
        }
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

/// Error as reported to the terminal.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
    pub code: String,
    pub message: String,
}

impl CommandError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "error[{}]: {}", self.code, self.message)
    }
}

impl From<AppError> for CommandError {
    fn from(error: AppError) -> Self {
        let code = match &error {
            AppError::MissingColumn { .. } => "MISSING_COLUMN",
            AppError::ColumnType { .. } => "COLUMN_TYPE",
            AppError::MalformedSource { .. } => "MALFORMED_SOURCE",
            AppError::Config { .. } => "CONFIG_ERROR",
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
            AppError::Io(_) => "IO_ERROR",
            AppError::Other(_) => "UNKNOWN",
        };

        match &error {
            AppError::Validation { .. } | AppError::Config { .. } => {
                warn!(target: "app::command", code, error = %error, "command rejected");
            }
            _ => {
                error!(target: "app::command", code, error = %error, "command failed");
            }
        }

        CommandError::new(code, error.to_string())
    }
}
