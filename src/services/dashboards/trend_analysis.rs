use chrono::NaiveDate;

use crate::error::AppResult;
use crate::models::dashboard::{Dashboard, DashboardKind, Panel, PanelKind};
use crate::models::table::Table;
use crate::services::aggregate::{crosstab, date_label, group_mean, to_dates, Crosstab};

use super::{assemble, bar, counts_as_values, line, pie, SENTIMENT_COLUMN};

const RESOLUTION_COLOR: &str = "#EF553B";

/// Conversations per creation day and sentiment label.
pub fn sentiment_trends(metrics: &Table) -> AppResult<Crosstab<NaiveDate, String>> {
    Ok(crosstab(
        &to_dates(metrics.datetime("created_at")?),
        &metrics.text(SENTIMENT_COLUMN)?,
    ))
}

/// Mean full resolution time per creation day; days without data are dropped.
pub fn resolution_time_trend(metrics: &Table) -> AppResult<Vec<(NaiveDate, f64)>> {
    Ok(group_mean(
        &to_dates(metrics.datetime("created_at")?),
        metrics.numeric("full_resolution_time_seconds")?,
    )
    .into_iter()
    .filter_map(|(date, avg)| Some((date, avg?)))
    .collect())
}

/// Tickets per update day and channel.
pub fn channel_volume(details: &Table) -> AppResult<Crosstab<NaiveDate, String>> {
    Ok(crosstab(
        &to_dates(details.datetime("updated_at")?),
        &details.text("channel")?,
    ))
}

pub fn build(metrics: &Table, details: &Table) -> AppResult<Dashboard> {
    let mut notes = Vec::new();

    let sentiments = sentiment_trends(metrics)?;
    let sentiment_days: Vec<String> = sentiments.rows.iter().copied().map(date_label).collect();
    let mut sentiment_panel = Panel::new("Sentiment Trends Over Time", PanelKind::Xy);
    for (index, sentiment) in sentiments.columns.iter().enumerate() {
        sentiment_panel = sentiment_panel.with_trace(line(
            format!("Sentiment: {sentiment}"),
            sentiment_days.clone(),
            counts_as_values(&sentiments.column_series(index)),
            None,
        ));
    }
    if sentiments.is_empty() {
        notes.push("no dated sentiment labels available".to_string());
    }

    let resolution = resolution_time_trend(metrics)?;
    let resolution_panel = Panel::new("Resolution Time Trends", PanelKind::Xy).with_trace(line(
        "Resolution Time",
        resolution.iter().map(|(date, _)| date_label(*date)).collect(),
        resolution.iter().map(|(_, avg)| Some(*avg)).collect(),
        Some(RESOLUTION_COLOR),
    ));

    let volume = channel_volume(details)?;
    let volume_days: Vec<String> = volume.rows.iter().copied().map(date_label).collect();
    let mut volume_panel = Panel::new("Conversation Volume by Channel", PanelKind::Xy);
    for (index, channel) in volume.columns.iter().enumerate() {
        volume_panel = volume_panel.with_trace(bar(
            format!("Channel: {channel}"),
            volume_days.clone(),
            counts_as_values(&volume.column_series(index)),
            &[],
        ));
    }
    if volume.is_empty() {
        notes.push("no dated channel activity available".to_string());
    }

    let distribution_panel = Panel::new("Channel Performance Distribution", PanelKind::Pie)
        .with_trace(pie(
            "Channel Distribution",
            volume.columns.clone(),
            volume
                .column_totals()
                .into_iter()
                .map(|total| total as f64)
                .collect(),
        ));

    Ok(assemble(
        DashboardKind::TrendAnalysis,
        [sentiment_panel, resolution_panel, volume_panel, distribution_panel],
        notes,
    ))
}
