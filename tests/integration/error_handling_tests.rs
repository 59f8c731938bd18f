mod common;

use std::fs;

use serde_json::json;
use support_dashboards_lib::error::AppError;
use support_dashboards_lib::models::config::DashboardSettings;
use support_dashboards_lib::models::dashboard::DashboardKind;
use support_dashboards_lib::models::dataset::DatasetKind;
use support_dashboards_lib::models::table::Table;
use support_dashboards_lib::services::aggregate::{crosstab, group_mean, mean, value_counts_normalized};
use support_dashboards_lib::services::config_service::{
    parse_config, resolve_config, validate, ConfigOverrides,
};
use support_dashboards_lib::services::dashboards::DashboardService;
use tempfile::tempdir;

use common::{fixture_dir, loader_for, write_source};

#[test]
fn missing_source_file_is_an_io_error() {
    let dir = tempdir().expect("temp dir");
    let result = loader_for(dir.path()).load(DatasetKind::ConversationMetric);
    assert!(matches!(result, Err(AppError::Io(_))));
}

#[test]
fn invalid_json_is_a_malformed_source() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join(DatasetKind::ConversationDetail.file_name());
    fs::write(&path, "[{\"channel\": \"email\"").expect("write source");

    let result = loader_for(dir.path()).load(DatasetKind::ConversationDetail);
    match result {
        Err(AppError::MalformedSource { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected malformed source, got {other:?}"),
    }
}

#[test]
fn scalar_document_is_a_malformed_source() {
    let dir = tempdir().expect("temp dir");
    write_source(dir.path(), DatasetKind::AutoqaReviewMetric, &json!(42));

    let result = loader_for(dir.path()).load(DatasetKind::AutoqaReviewMetric);
    assert!(matches!(result, Err(AppError::MalformedSource { .. })));
}

#[test]
fn missing_declared_column_is_reported_by_name() {
    let dir = tempdir().expect("temp dir");
    write_source(
        dir.path(),
        DatasetKind::AutoqaReviewMetric,
        &json!([
            {"team_id": 1, "rating_scale_score": 3, "created_at": null, "updated_at": null}
        ]),
    );

    let error = loader_for(dir.path())
        .load(DatasetKind::AutoqaReviewMetric)
        .expect_err("score column is absent");
    assert!(error.is_missing_column());
    match error {
        AppError::MissingColumn { dataset, column } => {
            assert_eq!(dataset, "autoqa_review_metric");
            assert_eq!(column, "score");
        }
        other => panic!("expected missing column, got {other:?}"),
    }
}

#[test]
fn dashboard_fails_when_a_source_is_missing() {
    let dir = fixture_dir();
    fs::remove_file(dir.path().join(DatasetKind::ConversationDetail.file_name()))
        .expect("remove source");

    let service = DashboardService::new(loader_for(dir.path()), DashboardSettings::default());
    assert!(service.build(DashboardKind::ConversationMetrics).is_ok());
    assert!(matches!(
        service.build(DashboardKind::TrendAnalysis),
        Err(AppError::Io(_))
    ));
    assert!(service.build_all().is_err());
}

#[test]
fn empty_inputs_aggregate_to_empty_results() {
    let keys: Vec<Option<String>> = Vec::new();
    let values: Vec<Option<f64>> = Vec::new();

    assert_eq!(mean(&values), None);
    assert!(group_mean(&keys, &values).is_empty());
    assert!(value_counts_normalized(&keys).is_empty());
    assert!(crosstab(&keys, &keys).is_empty());
    assert_eq!(Table::empty("nothing").row_count(), 0);
}

#[test]
fn dashboards_build_from_sources_without_rows() {
    let dir = fixture_dir();
    write_source(
        dir.path(),
        DatasetKind::ConversationMetric,
        &json!({
            "conversation_id": {},
            "created_at": {},
            "closed_at": {},
            "is_closed": {},
            "klaus_sentiment": {},
            "unique_public_agent_count": {},
            "agent_most_public_messages": {},
            "message_count": {},
            "private_message_count": {},
            "public_message_count": {},
            "public_mean_character_count": {},
            "public_mean_word_count": {},
            "first_response_time": {},
            "first_resolution_time_seconds": {},
            "full_resolution_time_seconds": {}
        }),
    );

    let service = DashboardService::new(loader_for(dir.path()), DashboardSettings::default());
    let dashboard = service
        .build(DashboardKind::ConversationMetrics)
        .expect("empty table still builds");
    assert!(dashboard.panels[2].pie().map(|pie| pie.values.is_empty()).unwrap_or(false));
    assert!(dashboard.notes.iter().any(|note| note.contains("no sentiment labels")));
}

#[test]
fn invalid_configuration_is_rejected() {
    let config = parse_config("dashboards:\n  response_time_window:\n    min: 10\n    max: 5\n")
        .expect("window parses");
    assert!(matches!(validate(&config), Err(AppError::Config { .. })));

    let result = parse_config("data_dir: [unclosed");
    assert!(matches!(result, Err(AppError::Config { .. })));

    let dir = tempdir().expect("temp dir");
    let missing = dir.path().join("absent.yaml");
    let result = resolve_config(Some(&missing), &ConfigOverrides::default());
    assert!(matches!(result, Err(AppError::Config { .. })));
}
