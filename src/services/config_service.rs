use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::models::config::AppConfig;
use crate::models::dashboard::ExportFormat;

pub const ENV_DATA_DIR: &str = "SUPPORT_DASHBOARDS_DATA_DIR";
pub const ENV_OUTPUT_DIR: &str = "SUPPORT_DASHBOARDS_OUTPUT_DIR";
pub const ENV_LOG_DIR: &str = "SUPPORT_DASHBOARDS_LOG_DIR";

/// Values supplied on the command line; they win over file and environment.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub data_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub export_format: Option<ExportFormat>,
}

/// Defaults, then the YAML file, then environment, then overrides.
pub fn resolve_config(path: Option<&Path>, overrides: &ConfigOverrides) -> AppResult<AppConfig> {
    let mut config = match path {
        Some(path) => load_config_file(path)?,
        None => AppConfig::default(),
    };

    apply_env(&mut config, |key| std::env::var(key).ok());
    apply_overrides(&mut config, overrides);
    validate(&config)?;

    debug!(target: "app::config", ?config, "configuration resolved");
    Ok(config)
}

pub fn load_config_file(path: &Path) -> AppResult<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|err| {
        AppError::config_with_source(format!("cannot read {}", path.display()), err)
    })?;
    let config = parse_config(&content)?;
    info!(target: "app::config", path = %path.display(), "configuration file loaded");
    Ok(config)
}

pub fn parse_config(content: &str) -> AppResult<AppConfig> {
    if content.trim().is_empty() {
        return Ok(AppConfig::default());
    }
    Ok(serde_yaml::from_str(content)?)
}

pub fn apply_env<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(dir) = non_empty(ENV_DATA_DIR) {
        config.data_dir = PathBuf::from(dir);
    }
    if let Some(dir) = non_empty(ENV_OUTPUT_DIR) {
        config.output_dir = PathBuf::from(dir);
    }
    if let Some(dir) = non_empty(ENV_LOG_DIR) {
        config.log_dir = PathBuf::from(dir);
    }
}

pub fn apply_overrides(config: &mut AppConfig, overrides: &ConfigOverrides) {
    if let Some(dir) = overrides.data_dir.as_ref() {
        config.data_dir = dir.clone();
    }
    if let Some(dir) = overrides.output_dir.as_ref() {
        config.output_dir = dir.clone();
    }
    if let Some(format) = overrides.export_format {
        config.export_format = format;
    }
}

pub fn validate(config: &AppConfig) -> AppResult<()> {
    let window = config.dashboards.response_time_window;
    if !window.min.is_finite() || !window.max.is_finite() {
        return Err(AppError::config("response time window bounds must be finite"));
    }
    if window.min >= window.max {
        return Err(AppError::config(format!(
            "response time window is empty: min {} >= max {}",
            window.min, window.max
        )));
    }
    if config.data_dir.as_os_str().is_empty() {
        return Err(AppError::config("data_dir must not be empty"));
    }
    Ok(())
}
