use chrono::NaiveDate;

use crate::error::AppResult;
use crate::models::config::{DashboardSettings, ResponseTimeWindow};
use crate::models::dashboard::{BarTrace, Dashboard, DashboardKind, Panel, PanelKind, Trace};
use crate::models::table::Table;
use crate::services::aggregate::{
    date_label, group_count, group_mean, mean, to_dates, value_counts_normalized,
};

use super::{assemble, bar, line, pie, SENTIMENT_COLUMN};

const RESPONSE_COLOR: &str = "#1f77b4";
const COUNT_COLOR: &str = "#ff7f0e";
const LENGTH_COLORS: [&str; 3] = ["#2ca02c", "#d62728", "#9467bd"];
const COUNT_OPACITY: f64 = 0.7;

/// Columns averaged on the conversation length chart, with their labels.
const LENGTH_COLUMNS: [(&str, &str); 3] = [
    ("Public Messages", "public_message_count"),
    ("Private Messages", "private_message_count"),
    ("Public Characters", "public_mean_character_count"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct DailyResponse {
    pub date: NaiveDate,
    pub avg_response_time: f64,
    pub conversation_count: usize,
}

/// Mean first response time and conversation count per creation day, keeping
/// only days whose mean falls inside `window`.
pub fn daily_response_times(metrics: &Table, window: ResponseTimeWindow) -> AppResult<Vec<DailyResponse>> {
    let dates = to_dates(metrics.datetime("created_at")?);
    let response_times = metrics.numeric("first_response_time")?;
    let conversation_ids = metrics.text("conversation_id")?;

    let means = group_mean(&dates, response_times);
    let counts = group_count(&dates, &conversation_ids);

    Ok(means
        .into_iter()
        .zip(counts)
        .filter_map(|((date, avg), (_, conversation_count))| {
            let avg = avg?;
            window.contains(avg).then_some(DailyResponse {
                date,
                avg_response_time: avg,
                conversation_count,
            })
        })
        .collect())
}

pub fn average_lengths(metrics: &Table) -> AppResult<Vec<(&'static str, Option<f64>)>> {
    LENGTH_COLUMNS
        .iter()
        .map(|(label, column)| Ok((*label, mean(metrics.numeric(column)?))))
        .collect()
}

pub fn sentiment_shares(metrics: &Table) -> AppResult<Vec<(String, f64)>> {
    Ok(value_counts_normalized(&metrics.text(SENTIMENT_COLUMN)?))
}

pub fn closed_shares(metrics: &Table) -> AppResult<Vec<(String, f64)>> {
    let flags: Vec<Option<bool>> = metrics
        .boolean("is_closed")?
        .iter()
        .map(|flag| Some(*flag))
        .collect();

    Ok(value_counts_normalized(&flags)
        .into_iter()
        .map(|(closed, share)| {
            let label = if closed { "Closed" } else { "Open" };
            (label.to_string(), share)
        })
        .collect())
}

pub fn build(metrics: &Table, settings: &DashboardSettings) -> AppResult<Dashboard> {
    let mut notes = Vec::new();
    let window = settings.response_time_window;

    let daily = daily_response_times(metrics, window)?;
    let total_days = group_count(
        &to_dates(metrics.datetime("created_at")?),
        metrics.numeric("first_response_time")?,
    )
    .len();
    if daily.len() < total_days {
        notes.push(format!(
            "{} of {total_days} days omitted from the response chart: mean outside ({}, {}) seconds or no response times",
            total_days - daily.len(),
            window.min,
            window.max
        ));
    }

    let days: Vec<String> = daily.iter().map(|day| date_label(day.date)).collect();
    let mut response_panel = Panel::new(
        "Average Response Time and Conversation Count",
        PanelKind::XyDualAxis,
    )
    .with_trace(line(
        "Avg Response Time (s)",
        days.clone(),
        daily.iter().map(|day| Some(day.avg_response_time)).collect(),
        Some(RESPONSE_COLOR),
    ))
    .with_trace(Trace::Bar(BarTrace {
        name: "Conversation Count".to_string(),
        x: days,
        y: daily
            .iter()
            .map(|day| Some(day.conversation_count as f64))
            .collect(),
        colors: vec![COUNT_COLOR.to_string()],
        opacity: Some(COUNT_OPACITY),
        secondary_y: true,
    }));
    response_panel.y_title = Some("Avg Response Time (s)".to_string());
    response_panel.secondary_y_title = Some("Conversation Count".to_string());

    let lengths = average_lengths(metrics)?;
    let length_panel = Panel::new("Average Conversation Length", PanelKind::Xy).with_trace(bar(
        "Average Length",
        lengths.iter().map(|(label, _)| label.to_string()).collect(),
        lengths.iter().map(|(_, value)| *value).collect(),
        &LENGTH_COLORS,
    ));

    let sentiment = sentiment_shares(metrics)?;
    if sentiment.is_empty() {
        notes.push("no sentiment labels available".to_string());
    }
    let sentiment_panel = Panel::new("Sentiment Analysis", PanelKind::Pie).with_trace(pie(
        "Sentiment",
        sentiment.iter().map(|(label, _)| label.clone()).collect(),
        sentiment.iter().map(|(_, share)| *share).collect(),
    ));

    let closed = closed_shares(metrics)?;
    let closed_panel = Panel::new("Closed vs Open Conversations", PanelKind::Pie).with_trace(pie(
        "Closed vs Open",
        closed.iter().map(|(label, _)| label.clone()).collect(),
        closed.iter().map(|(_, share)| *share).collect(),
    ));

    Ok(assemble(
        DashboardKind::ConversationMetrics,
        [response_panel, length_panel, sentiment_panel, closed_panel],
        notes,
    ))
}
