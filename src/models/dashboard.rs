use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DashboardKind {
    ConversationMetrics,
    CustomerSatisfaction,
    ReviewMetrics,
    TrendAnalysis,
}

impl DashboardKind {
    pub const ALL: [DashboardKind; 4] = [
        DashboardKind::ConversationMetrics,
        DashboardKind::CustomerSatisfaction,
        DashboardKind::ReviewMetrics,
        DashboardKind::TrendAnalysis,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DashboardKind::ConversationMetrics => "conversation-metrics",
            DashboardKind::CustomerSatisfaction => "customer-satisfaction",
            DashboardKind::ReviewMetrics => "review-metrics",
            DashboardKind::TrendAnalysis => "trend-analysis",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DashboardKind::ConversationMetrics => "Customer Conversation Metrics Dashboard",
            DashboardKind::CustomerSatisfaction => "Customer Satisfaction Dashboard",
            DashboardKind::ReviewMetrics => "Review Metrics Dashboard",
            DashboardKind::TrendAnalysis => "Trend Analysis Dashboard",
        }
    }
}

impl fmt::Display for DashboardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Html,
    Markdown,
}

impl ExportFormat {
    pub fn file_extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Html => "html",
            ExportFormat::Markdown => "md",
        }
    }
}

impl Default for ExportFormat {
    fn default() -> Self {
        ExportFormat::Html
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PanelKind {
    Xy,
    XyDualAxis,
    Pie,
    Indicator,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineTrace {
    pub name: String,
    pub x: Vec<String>,
    pub y: Vec<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub secondary_y: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BarTrace {
    pub name: String,
    pub x: Vec<String>,
    pub y: Vec<Option<f64>>,
    pub colors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    pub secondary_y: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PieTrace {
    pub name: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub hole: f64,
}

impl PieTrace {
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorTrace {
    pub title: String,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Line(LineTrace),
    Bar(BarTrace),
    Pie(PieTrace),
    Indicator(IndicatorTrace),
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    pub title: String,
    pub kind: PanelKind,
    pub traces: Vec<Trace>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_y_title: Option<String>,
}

impl Panel {
    pub fn new(title: impl Into<String>, kind: PanelKind) -> Self {
        Self {
            title: title.into(),
            kind,
            traces: Vec::new(),
            y_title: None,
            secondary_y_title: None,
        }
    }

    pub fn with_trace(mut self, trace: Trace) -> Self {
        self.traces.push(trace);
        self
    }

    pub fn pie(&self) -> Option<&PieTrace> {
        self.traces.iter().find_map(|trace| match trace {
            Trace::Pie(pie) => Some(pie),
            _ => None,
        })
    }

    pub fn indicator(&self) -> Option<&IndicatorTrace> {
        self.traces.iter().find_map(|trace| match trace {
            Trace::Indicator(indicator) => Some(indicator),
            _ => None,
        })
    }
}

/// Four panels laid out row-major in a 2x2 grid.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub kind: DashboardKind,
    pub title: String,
    pub panels: [Panel; 4],
    pub notes: Vec<String>,
    pub generated_at: String,
}

impl Dashboard {
    pub const ROWS: usize = 2;
    pub const COLUMNS: usize = 2;

    /// `row` and `column` are zero-based.
    pub fn panel(&self, row: usize, column: usize) -> Option<&Panel> {
        if row >= Self::ROWS || column >= Self::COLUMNS {
            return None;
        }
        self.panels.get(row * Self::COLUMNS + column)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResult {
    pub file_path: String,
    pub format: ExportFormat,
    pub dashboard: DashboardKind,
    pub generated_at: String,
}
