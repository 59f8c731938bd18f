use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::table::Table;

pub const SOURCE_FILE_SUFFIX: &str = "_cleaned.json";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    AutoqaReviewMetric,
    ConversationDetail,
    ConversationMetric,
    ManualReviewDetail,
    ManualReviewMetric,
}

/// Columns coerced to a semantic type on load. Anything not listed stays raw.
#[derive(Debug, Clone, Copy)]
pub struct DatasetSchema {
    pub numeric: &'static [&'static str],
    pub datetime: &'static [&'static str],
    pub boolean: &'static [&'static str],
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 5] = [
        DatasetKind::AutoqaReviewMetric,
        DatasetKind::ConversationDetail,
        DatasetKind::ConversationMetric,
        DatasetKind::ManualReviewDetail,
        DatasetKind::ManualReviewMetric,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::AutoqaReviewMetric => "autoqa_review_metric",
            DatasetKind::ConversationDetail => "conversation_detail",
            DatasetKind::ConversationMetric => "conversation_metric",
            DatasetKind::ManualReviewDetail => "manual_review_detail",
            DatasetKind::ManualReviewMetric => "manual_review_metric",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}{SOURCE_FILE_SUFFIX}", self.as_str())
    }

    pub fn schema(&self) -> DatasetSchema {
        match self {
            DatasetKind::AutoqaReviewMetric => DatasetSchema {
                numeric: &["team_id", "rating_scale_score", "score"],
                datetime: &["created_at", "updated_at"],
                boolean: &[],
            },
            DatasetKind::ConversationDetail => DatasetSchema {
                numeric: &[
                    "external_ticket_id",
                    "assignee_id",
                    "payment_id",
                    "payment_token_id",
                ],
                datetime: &["last_reply_at", "updated_at", "deleted_at"],
                boolean: &[],
            },
            DatasetKind::ConversationMetric => DatasetSchema {
                numeric: &[
                    "unique_public_agent_count",
                    "agent_most_public_messages",
                    "message_count",
                    "private_message_count",
                    "public_message_count",
                    "public_mean_character_count",
                    "public_mean_word_count",
                    "first_response_time",
                    "first_resolution_time_seconds",
                    "full_resolution_time_seconds",
                ],
                datetime: &["created_at", "closed_at"],
                boolean: &["is_closed"],
            },
            DatasetKind::ManualReviewDetail => DatasetSchema {
                numeric: &[
                    "review_id",
                    "team_id",
                    "comment_id",
                    "updated_by",
                    "review_time_seconds",
                ],
                datetime: &["created", "updated_at", "imported_at"],
                boolean: &["assignment_review", "seen", "disputed"],
            },
            DatasetKind::ManualReviewMetric => DatasetSchema {
                numeric: &[
                    "review_id",
                    "category_id",
                    "rating",
                    "rating_max",
                    "weight",
                    "score",
                    "reviewer_id",
                    "reviewee_id",
                ],
                datetime: &[],
                boolean: &["critical"],
            },
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatasetKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase().replace('-', "_");
        DatasetKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| AppError::validation(format!("unknown dataset `{value}`")))
    }
}

/// The five normalized tables, loaded together.
#[derive(Debug, Clone)]
pub struct LoadedDatasets {
    pub autoqa_review_metric: Table,
    pub conversation_detail: Table,
    pub conversation_metric: Table,
    pub manual_review_detail: Table,
    pub manual_review_metric: Table,
}

impl LoadedDatasets {
    pub fn get(&self, kind: DatasetKind) -> &Table {
        match kind {
            DatasetKind::AutoqaReviewMetric => &self.autoqa_review_metric,
            DatasetKind::ConversationDetail => &self.conversation_detail,
            DatasetKind::ConversationMetric => &self.conversation_metric,
            DatasetKind::ManualReviewDetail => &self.manual_review_detail,
            DatasetKind::ManualReviewMetric => &self.manual_review_metric,
        }
    }
}
