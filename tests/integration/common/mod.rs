#![allow(dead_code)]

use std::fs;
use std::path::Path;

use serde_json::{json, Value as JsonValue};
use support_dashboards_lib::models::dataset::DatasetKind;
use support_dashboards_lib::services::loader_service::{DataSource, LoaderService};
use tempfile::{tempdir, TempDir};

pub fn write_source(dir: &Path, kind: DatasetKind, document: &JsonValue) {
    let path = dir.join(kind.file_name());
    fs::write(&path, serde_json::to_string_pretty(document).expect("serialize fixture"))
        .expect("write fixture");
}

/// Writes all five cleaned sources into a fresh directory.
pub fn fixture_dir() -> TempDir {
    let dir = tempdir().expect("temp dir");
    write_source(dir.path(), DatasetKind::ConversationMetric, &conversation_metric());
    write_source(dir.path(), DatasetKind::ConversationDetail, &conversation_detail());
    write_source(dir.path(), DatasetKind::ManualReviewMetric, &manual_review_metric());
    write_source(dir.path(), DatasetKind::ManualReviewDetail, &manual_review_detail());
    write_source(dir.path(), DatasetKind::AutoqaReviewMetric, &autoqa_review_metric());
    dir
}

pub fn loader_for(dir: &Path) -> LoaderService {
    LoaderService::new(DataSource::new(dir))
}

pub fn conversation_metric() -> JsonValue {
    json!([
        {
            "conversation_id": "c1",
            "created_at": "2024-05-01T09:00:00Z",
            "closed_at": "2024-05-01T12:00:00Z",
            "is_closed": true,
            "klaus_sentiment": "positive",
            "unique_public_agent_count": 1,
            "agent_most_public_messages": 3,
            "message_count": 5,
            "private_message_count": 1,
            "public_message_count": 4,
            "public_mean_character_count": 80.5,
            "public_mean_word_count": 14,
            "first_response_time": 120,
            "first_resolution_time_seconds": 3000,
            "full_resolution_time_seconds": 3600
        },
        {
            "conversation_id": "c2",
            "created_at": "2024-05-01 17:30:00",
            "closed_at": null,
            "is_closed": "False",
            "klaus_sentiment": "negative",
            "unique_public_agent_count": 2,
            "agent_most_public_messages": 4,
            "message_count": 9,
            "private_message_count": 3,
            "public_message_count": 6,
            "public_mean_character_count": 120,
            "public_mean_word_count": 20,
            "first_response_time": "240",
            "first_resolution_time_seconds": 7000,
            "full_resolution_time_seconds": 7200
        },
        {
            "conversation_id": "c3",
            "created_at": 1714636800000_i64,
            "closed_at": "2024-05-02T10:00:00Z",
            "is_closed": true,
            "klaus_sentiment": "positive",
            "unique_public_agent_count": 1,
            "agent_most_public_messages": 2,
            "message_count": 2,
            "private_message_count": 0,
            "public_message_count": 2,
            "public_mean_character_count": "n/a",
            "public_mean_word_count": 5,
            "first_response_time": 9000,
            "first_resolution_time_seconds": null,
            "full_resolution_time_seconds": null
        },
        {
            "conversation_id": "c4",
            "created_at": "not a date",
            "closed_at": "2024-05-03T08:00:00Z",
            "is_closed": "TRUE",
            "klaus_sentiment": null,
            "unique_public_agent_count": 1,
            "agent_most_public_messages": 8,
            "message_count": 10,
            "private_message_count": 2,
            "public_message_count": 8,
            "public_mean_character_count": 40,
            "public_mean_word_count": 7,
            "first_response_time": 60,
            "first_resolution_time_seconds": 1500,
            "full_resolution_time_seconds": 1800
        }
    ])
}

pub fn conversation_detail() -> JsonValue {
    json!([
        {
            "external_ticket_id": 1001,
            "assignee_id": 7,
            "payment_id": null,
            "payment_token_id": null,
            "channel": "email",
            "last_reply_at": "2024-05-01T09:45:00Z",
            "updated_at": "2024-05-01T10:00:00Z",
            "deleted_at": null
        },
        {
            "external_ticket_id": null,
            "assignee_id": 8,
            "payment_id": null,
            "payment_token_id": null,
            "channel": "chat",
            "last_reply_at": null,
            "updated_at": "2024-05-01T11:00:00Z",
            "deleted_at": null
        },
        {
            "external_ticket_id": "1003",
            "assignee_id": 7,
            "payment_id": 55,
            "payment_token_id": 56,
            "channel": "email",
            "last_reply_at": "2024-05-02T08:30:00Z",
            "updated_at": "2024-05-02T09:00:00Z",
            "deleted_at": null
        }
    ])
}

pub fn manual_review_metric() -> JsonValue {
    json!([
        {
            "review_id": 10,
            "category_id": 1,
            "category_name": "Tone",
            "rating": 4,
            "rating_max": 5,
            "weight": 1.0,
            "score": 80,
            "critical": false,
            "reviewer_id": 3,
            "reviewee_id": 7
        },
        {
            "review_id": 10,
            "category_id": 2,
            "category_name": "Accuracy",
            "rating": 3,
            "rating_max": 5,
            "weight": 2.0,
            "score": 60,
            "critical": "true",
            "reviewer_id": 3,
            "reviewee_id": 7
        },
        {
            "review_id": 11,
            "category_id": 1,
            "category_name": "Tone",
            "rating": 5,
            "rating_max": 5,
            "weight": 1.0,
            "score": 100,
            "critical": null,
            "reviewer_id": 4,
            "reviewee_id": 8
        }
    ])
}

/// Column-oriented, the other layout the loader accepts.
pub fn manual_review_detail() -> JsonValue {
    json!({
        "review_id": {"0": 10, "1": 10, "2": 11, "3": 11},
        "team_id": {"0": 1, "1": 1, "2": 1, "3": 2},
        "comment_id": {"0": null, "1": null, "2": 900, "3": null},
        "updated_by": {"0": 3, "1": 3, "2": 4, "3": 4},
        "review_time_seconds": {"0": null, "1": null, "2": null, "3": null},
        "created": {"0": "2024-05-01T13:00:00Z", "1": "2024-05-01T13:05:00Z", "2": "2024-05-02T09:00:00Z", "3": null},
        "updated_at": {"0": "2024-05-01T13:10:00Z", "1": null, "2": null, "3": null},
        "imported_at": {"0": null, "1": null, "2": null, "3": null},
        "assignment_review": {"0": false, "1": true, "2": false, "3": false},
        "seen": {"0": true, "1": "yes", "2": true, "3": null},
        "disputed": {"0": true, "1": false, "2": "true", "3": null}
    })
}

pub fn autoqa_review_metric() -> JsonValue {
    json!([
        {
            "team_id": 1,
            "rating_scale_score": 4.5,
            "score": 90,
            "created_at": "2024-05-01T14:00:00Z",
            "updated_at": "2024-05-01T14:00:00Z"
        },
        {
            "team_id": 2,
            "rating_scale_score": null,
            "score": "75",
            "created_at": "2024-05-02",
            "updated_at": null
        }
    ])
}
