pub mod conversation_metrics;
pub mod customer_satisfaction;
pub mod review_metrics;
pub mod trend_analysis;

use chrono::Utc;
use tracing::{debug, info};

use crate::error::AppResult;
use crate::models::config::DashboardSettings;
use crate::models::dashboard::{
    BarTrace, Dashboard, DashboardKind, IndicatorTrace, LineTrace, Panel, PieTrace, Trace,
};
use crate::services::loader_service::LoaderService;

pub const SENTIMENT_COLUMN: &str = "klaus_sentiment";
pub const DONUT_HOLE: f64 = 0.4;

pub struct DashboardService {
    loader: LoaderService,
    settings: DashboardSettings,
}

impl DashboardService {
    pub fn new(loader: LoaderService, settings: DashboardSettings) -> Self {
        Self { loader, settings }
    }

    pub fn build(&self, kind: DashboardKind) -> AppResult<Dashboard> {
        debug!(target: "app::dashboard", dashboard = %kind, "building dashboard");
        let dashboard = match kind {
            DashboardKind::ConversationMetrics => {
                let metrics = self.loader.load_conversation_metric()?;
                conversation_metrics::build(&metrics, &self.settings)?
            }
            DashboardKind::CustomerSatisfaction => {
                let reviews = self.loader.load_manual_review_metric()?;
                let metrics = self.loader.load_conversation_metric()?;
                let details = self.loader.load_conversation_detail()?;
                customer_satisfaction::build(&reviews, &metrics, &details)?
            }
            DashboardKind::ReviewMetrics => {
                let reviews = self.loader.load_manual_review_metric()?;
                let review_details = self.loader.load_manual_review_detail()?;
                review_metrics::build(&reviews, &review_details, &self.settings)?
            }
            DashboardKind::TrendAnalysis => {
                let metrics = self.loader.load_conversation_metric()?;
                let details = self.loader.load_conversation_detail()?;
                trend_analysis::build(&metrics, &details)?
            }
        };

        info!(
            target: "app::dashboard",
            dashboard = %kind,
            notes = dashboard.notes.len(),
            "dashboard built"
        );
        Ok(dashboard)
    }

    pub fn build_all(&self) -> AppResult<Vec<Dashboard>> {
        DashboardKind::ALL
            .into_iter()
            .map(|kind| self.build(kind))
            .collect()
    }
}

pub(crate) fn assemble(kind: DashboardKind, panels: [Panel; 4], notes: Vec<String>) -> Dashboard {
    Dashboard {
        kind,
        title: kind.title().to_string(),
        panels,
        notes,
        generated_at: Utc::now().to_rfc3339(),
    }
}

pub(crate) fn line(name: impl Into<String>, x: Vec<String>, y: Vec<Option<f64>>, color: Option<&str>) -> Trace {
    Trace::Line(LineTrace {
        name: name.into(),
        x,
        y,
        color: color.map(str::to_string),
        secondary_y: false,
    })
}

pub(crate) fn bar(name: impl Into<String>, x: Vec<String>, y: Vec<Option<f64>>, colors: &[&str]) -> Trace {
    Trace::Bar(BarTrace {
        name: name.into(),
        x,
        y,
        colors: colors.iter().map(|color| color.to_string()).collect(),
        opacity: None,
        secondary_y: false,
    })
}

pub(crate) fn pie(name: impl Into<String>, labels: Vec<String>, values: Vec<f64>) -> Trace {
    Trace::Pie(PieTrace {
        name: name.into(),
        labels,
        values,
        hole: DONUT_HOLE,
    })
}

pub(crate) fn indicator(title: impl Into<String>, value: Option<f64>) -> Trace {
    Trace::Indicator(IndicatorTrace {
        title: title.into(),
        value,
    })
}

pub(crate) fn counts_as_values(counts: &[usize]) -> Vec<Option<f64>> {
    counts.iter().map(|count| Some(*count as f64)).collect()
}
