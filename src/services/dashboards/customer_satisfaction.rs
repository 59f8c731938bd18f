use crate::error::AppResult;
use crate::models::dashboard::{Dashboard, DashboardKind, Panel, PanelKind};
use crate::models::table::Table;
use crate::services::aggregate::{group_count, group_mean, mean, numeric_keys};

use super::{assemble, bar, counts_as_values, indicator, line, pie, SENTIMENT_COLUMN};

const CORRELATION_COLOR: &str = "#636EFA";
const RESOLUTION_COLOR: &str = "#EF553B";

#[derive(Debug, Clone, PartialEq)]
pub struct SentimentScore {
    pub sentiment: String,
    pub avg_public_messages: Option<f64>,
    pub avg_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentimentPairing {
    pub pairs: Vec<SentimentScore>,
    pub sentiment_groups: usize,
    pub review_groups: usize,
}

/// Pairs sentiment groups with per-review mean scores by position. The two
/// tables share no key, so the shorter side bounds the result.
pub fn sentiment_review_pairs(metrics: &Table, reviews: &Table) -> AppResult<SentimentPairing> {
    let sentiments = group_mean(
        &metrics.text(SENTIMENT_COLUMN)?,
        metrics.numeric("public_message_count")?,
    );
    let review_scores = group_mean(
        &numeric_keys(reviews.numeric("review_id")?),
        reviews.numeric("score")?,
    );

    let sentiment_groups = sentiments.len();
    let review_groups = review_scores.len();
    let pairs = sentiments
        .into_iter()
        .zip(review_scores)
        .map(|((sentiment, avg_public_messages), (_, avg_score))| SentimentScore {
            sentiment,
            avg_public_messages,
            avg_score,
        })
        .collect();

    Ok(SentimentPairing {
        pairs,
        sentiment_groups,
        review_groups,
    })
}

/// Tickets with an external id, per channel.
pub fn channel_ticket_counts(details: &Table) -> AppResult<Vec<(String, usize)>> {
    Ok(group_count(
        &details.text("channel")?,
        details.numeric("external_ticket_id")?,
    ))
}

pub fn average_resolution_time(metrics: &Table) -> AppResult<Option<f64>> {
    Ok(mean(metrics.numeric("full_resolution_time_seconds")?))
}

pub fn build(reviews: &Table, metrics: &Table, details: &Table) -> AppResult<Dashboard> {
    let mut notes = Vec::new();

    let pairing = sentiment_review_pairs(metrics, reviews)?;
    if pairing.sentiment_groups != pairing.review_groups {
        notes.push(format!(
            "sentiment groups ({}) and reviews ({}) paired by position; {} unmatched",
            pairing.sentiment_groups,
            pairing.review_groups,
            pairing.sentiment_groups.abs_diff(pairing.review_groups)
        ));
    }
    let correlation_panel = Panel::new("Sentiment Correlation with Review Scores", PanelKind::Xy)
        .with_trace(line(
            "Sentiment Correlation",
            pairing.pairs.iter().map(|pair| pair.sentiment.clone()).collect(),
            pairing.pairs.iter().map(|pair| pair.avg_score).collect(),
            Some(CORRELATION_COLOR),
        ));

    let channels = channel_ticket_counts(details)?;
    let channel_labels: Vec<String> = channels.iter().map(|(channel, _)| channel.clone()).collect();
    let channel_counts: Vec<usize> = channels.iter().map(|(_, count)| *count).collect();

    let rates_panel = Panel::new("Resolution Rates by Channel", PanelKind::Xy).with_trace(bar(
        "Resolution Rates",
        channel_labels.clone(),
        counts_as_values(&channel_counts),
        &[RESOLUTION_COLOR],
    ));

    let resolution_time = average_resolution_time(metrics)?;
    if resolution_time.is_none() {
        notes.push("no full resolution times recorded".to_string());
    }
    let resolution_panel = Panel::new("Average Resolution Time", PanelKind::Indicator)
        .with_trace(indicator("Avg Resolution Time (seconds)", resolution_time));

    let efficiency_panel = Panel::new("Resolution Efficiency by Channel", PanelKind::Pie)
        .with_trace(pie(
            "Resolution Efficiency",
            channel_labels,
            channel_counts.iter().map(|count| *count as f64).collect(),
        ));

    Ok(assemble(
        DashboardKind::CustomerSatisfaction,
        [correlation_panel, rates_panel, resolution_panel, efficiency_panel],
        notes,
    ))
}
