use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::warn;

use crate::error::AppResult;
use crate::models::config::{DashboardSettings, DisputedRateSource, ReviewTimeFallback};
use crate::models::dashboard::{Dashboard, DashboardKind, Panel, PanelKind};
use crate::models::table::Table;
use crate::services::aggregate::{group_mean, mean};

use super::{assemble, bar, indicator, pie};

const SCORE_COLOR: &str = "#636EFA";
const WEIGHT_COLOR: &str = "#EF553B";
const SYNTHETIC_REVIEW_SECONDS: std::ops::Range<u32> = 100..400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewTimeSource {
    Recorded,
    Synthetic,
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReviewTime {
    pub seconds: Option<f64>,
    pub source: ReviewTimeSource,
}

pub fn category_means(reviews: &Table, column: &str) -> AppResult<Vec<(String, Option<f64>)>> {
    Ok(group_mean(
        &reviews.text("category_name")?,
        reviews.numeric(column)?,
    ))
}

/// Mean review time, or the configured fallback when no row has one.
pub fn review_time(details: &Table, settings: &DashboardSettings) -> AppResult<ReviewTime> {
    let recorded = details.numeric("review_time_seconds")?;
    if let Some(seconds) = mean(recorded) {
        return Ok(ReviewTime {
            seconds: Some(seconds),
            source: ReviewTimeSource::Recorded,
        });
    }

    match settings.review_time_fallback {
        ReviewTimeFallback::Gap => Ok(ReviewTime {
            seconds: None,
            source: ReviewTimeSource::Missing,
        }),
        ReviewTimeFallback::Synthetic => {
            warn!(
                target: "app::dashboard",
                rows = recorded.len(),
                seed = settings.seed(),
                "review times missing, substituting synthetic values"
            );
            let mut rng = StdRng::seed_from_u64(settings.seed());
            let synthetic: Vec<Option<f64>> = (0..recorded.len())
                .map(|_| Some(f64::from(rng.gen_range(SYNTHETIC_REVIEW_SECONDS))))
                .collect();
            Ok(ReviewTime {
                seconds: mean(&synthetic),
                source: ReviewTimeSource::Synthetic,
            })
        }
    }
}

/// Percentage of rows whose configured flag is set; `None` without rows.
pub fn disputed_rate(
    reviews: &Table,
    details: &Table,
    source: DisputedRateSource,
) -> AppResult<Option<f64>> {
    let flags = match source {
        DisputedRateSource::Critical => reviews.boolean("critical")?,
        DisputedRateSource::Disputed => details.boolean("disputed")?,
    };
    if flags.is_empty() {
        return Ok(None);
    }
    let flagged = flags.iter().filter(|flag| **flag).count();
    Ok(Some(flagged as f64 / flags.len() as f64 * 100.0))
}

pub fn build(reviews: &Table, details: &Table, settings: &DashboardSettings) -> AppResult<Dashboard> {
    let mut notes = Vec::new();

    let scores = category_means(reviews, "score")?;
    let score_panel = Panel::new("Score Distribution by Category", PanelKind::Xy).with_trace(bar(
        "Score Distribution",
        scores.iter().map(|(category, _)| category.clone()).collect(),
        scores.iter().map(|(_, value)| *value).collect(),
        &[SCORE_COLOR],
    ));

    let weights = category_means(reviews, "weight")?;
    let weight_panel = Panel::new("Average Weight by Category", PanelKind::Xy).with_trace(bar(
        "Average Weight",
        weights.iter().map(|(category, _)| category.clone()).collect(),
        weights.iter().map(|(_, value)| *value).collect(),
        &[WEIGHT_COLOR],
    ));

    let time = review_time(details, settings)?;
    match time.source {
        ReviewTimeSource::Recorded => {}
        ReviewTimeSource::Missing => {
            notes.push("review_time_seconds is empty for every review; average review time unavailable".to_string())
        }
        ReviewTimeSource::Synthetic => notes.push(format!(
            "review_time_seconds is empty for every review; showing synthetic values (seed {})",
            settings.seed()
        )),
    }
    let time_panel = Panel::new("Average Review Time", PanelKind::Indicator)
        .with_trace(indicator("Average Review Time (seconds)", time.seconds));

    let disputed_panel = match disputed_rate(reviews, details, settings.disputed_rate_source)? {
        Some(rate) => Panel::new("Disputed Review Rate", PanelKind::Pie).with_trace(pie(
            "Disputed Rate",
            vec!["Disputed".to_string(), "Non-Disputed".to_string()],
            vec![rate, 100.0 - rate],
        )),
        None => {
            notes.push("no review rows to compute a disputed rate".to_string());
            Panel::new("Disputed Review Rate", PanelKind::Pie).with_trace(pie(
                "Disputed Rate",
                Vec::new(),
                Vec::new(),
            ))
        }
    };

    Ok(assemble(
        DashboardKind::ReviewMetrics,
        [score_panel, weight_panel, time_panel, disputed_panel],
        notes,
    ))
}
