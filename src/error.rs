use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{error, warn};

use crate::models::table::ColumnKind;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("column `{column}` not found in {dataset}")]
    MissingColumn { dataset: String, column: String },

    #[error("column `{column}` is {found}, expected {expected}")]
    ColumnType {
        column: String,
        expected: ColumnKind,
        found: ColumnKind,
    },

    #[error("malformed source {}: {message}", path.display())]
    MalformedSource { path: PathBuf, message: String },

    #[error("configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("validation failed: {message}")]
    Validation { message: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl AppError {
    pub fn missing_column(dataset: impl Into<String>, column: impl Into<String>) -> Self {
        let dataset = dataset.into();
        let column = column.into();
        warn!(target: "app::schema", %dataset, %column, "expected column is missing");
        AppError::MissingColumn { dataset, column }
    }

    pub fn column_type(column: impl Into<String>, expected: ColumnKind, found: ColumnKind) -> Self {
        let column = column.into();
        warn!(target: "app::schema", %column, %expected, %found, "column has unexpected type");
        AppError::ColumnType {
            column,
            expected,
            found,
        }
    }

    pub fn malformed_source(path: &Path, message: impl Into<String>) -> Self {
        let message = message.into();
        error!(target: "app::loader", path = %path.display(), %message, "malformed source file");
        AppError::MalformedSource {
            path: path.to_path_buf(),
            message,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        let message = message.into();
        warn!(target: "app::config", %message, "configuration error");
        AppError::Config {
            message,
            source: None,
        }
    }

    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        let message = message.into();
        warn!(target: "app::config", %message, error = %source, "configuration error");
        AppError::Config {
            message,
            source: Some(Box::new(source)),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        let message = message.into();
        warn!(target: "app::validation", %message, "validation error");
        AppError::Validation { message }
    }

    pub fn other(message: impl Into<String>) -> Self {
        let message = message.into();
        error!(target: "app::other", %message, "other error");
        AppError::Other(message)
    }

    pub fn is_missing_column(&self) -> bool {
        matches!(self, AppError::MissingColumn { .. })
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(error: serde_yaml::Error) -> Self {
        AppError::config_with_source("invalid YAML configuration", error)
    }
}
