use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::models::dashboard::ExportFormat;

pub const DEFAULT_DATA_DIR: &str = "assets/data";
pub const DEFAULT_OUTPUT_DIR: &str = "reports";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_SYNTHETIC_SEED: u64 = 42;

/// What the review-metrics dashboard shows when no review has a recorded time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReviewTimeFallback {
    /// Leave the indicator empty and note the gap.
    #[default]
    Gap,
    /// Draw placeholder times in `[100, 400)` seconds from a seeded RNG.
    Synthetic,
}

/// Flag column counted by the disputed-rate panel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DisputedRateSource {
    /// `critical` on manual review metrics, one row per rated category.
    #[default]
    Critical,
    /// `disputed` on manual review details, one row per review event.
    Disputed,
}

/// Open interval of daily mean response times kept on the response chart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ResponseTimeWindow {
    pub min: f64,
    pub max: f64,
}

impl Default for ResponseTimeWindow {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 5000.0,
        }
    }
}

impl ResponseTimeWindow {
    pub fn contains(&self, value: f64) -> bool {
        value > self.min && value < self.max
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(default, rename_all = "snake_case")]
pub struct DashboardSettings {
    pub response_time_window: ResponseTimeWindow,
    pub review_time_fallback: ReviewTimeFallback,
    pub synthetic_seed: Option<u64>,
    pub disputed_rate_source: DisputedRateSource,
}

impl DashboardSettings {
    pub fn seed(&self) -> u64 {
        self.synthetic_seed.unwrap_or(DEFAULT_SYNTHETIC_SEED)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "snake_case")]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub log_dir: PathBuf,
    pub export_format: ExportFormat,
    pub dashboards: DashboardSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            export_format: ExportFormat::default(),
            dashboards: DashboardSettings::default(),
        }
    }
}
