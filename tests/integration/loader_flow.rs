mod common;

use chrono::{TimeZone, Utc};
use support_dashboards_lib::models::dataset::DatasetKind;
use support_dashboards_lib::models::table::{Column, ColumnKind};

use common::{fixture_dir, loader_for};

#[test]
fn conversation_metric_is_coerced_on_load() {
    let dir = fixture_dir();
    let loader = loader_for(dir.path());

    let metrics = loader
        .load_conversation_metric()
        .expect("load conversation metric");
    assert_eq!(metrics.row_count(), 4);

    assert_eq!(
        metrics.numeric("first_response_time").expect("numeric column"),
        &[Some(120.0), Some(240.0), Some(9000.0), Some(60.0)]
    );
    assert_eq!(
        metrics
            .numeric("public_mean_character_count")
            .expect("numeric column"),
        &[Some(80.5), Some(120.0), None, Some(40.0)]
    );

    let created = metrics.datetime("created_at").expect("datetime column");
    assert_eq!(
        created[0],
        Some(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap())
    );
    assert_eq!(
        created[1],
        Some(Utc.with_ymd_and_hms(2024, 5, 1, 17, 30, 0).unwrap())
    );
    assert_eq!(
        created[2],
        Some(Utc.with_ymd_and_hms(2024, 5, 2, 8, 0, 0).unwrap())
    );
    assert_eq!(created[3], None);

    assert_eq!(
        metrics.boolean("is_closed").expect("boolean column"),
        &[true, false, true, true]
    );

    // Undeclared columns stay as loaded.
    let sentiment = metrics.require("klaus_sentiment").expect("sentiment column");
    assert_eq!(sentiment.kind(), ColumnKind::Raw);
}

#[test]
fn every_declared_column_has_its_kind_after_load() {
    let dir = fixture_dir();
    let loaded = loader_for(dir.path()).load_all().expect("load all datasets");

    for kind in DatasetKind::ALL {
        let table = loaded.get(kind);
        assert_eq!(table.name(), kind.as_str());

        let schema = kind.schema();
        for column in schema.numeric {
            let values = table.numeric(column).expect("numeric column");
            assert!(values.iter().flatten().all(|value| value.is_finite()));
        }
        for column in schema.datetime {
            assert_eq!(
                table.require(column).expect("datetime column").kind(),
                ColumnKind::Datetime
            );
        }
        for column in schema.boolean {
            assert!(matches!(
                table.require(column).expect("boolean column"),
                Column::Boolean(values) if values.len() == table.row_count()
            ));
        }
    }
}

#[test]
fn column_oriented_source_is_read_in_label_order() {
    let dir = fixture_dir();
    let details = loader_for(dir.path())
        .load_manual_review_detail()
        .expect("load review details");

    assert_eq!(details.row_count(), 4);
    assert_eq!(
        details.numeric("review_id").expect("review ids"),
        &[Some(10.0), Some(10.0), Some(11.0), Some(11.0)]
    );
    assert_eq!(
        details.boolean("disputed").expect("disputed flags"),
        &[true, false, true, false]
    );
    assert_eq!(
        details.boolean("seen").expect("seen flags"),
        &[true, false, true, false]
    );
    assert!(details
        .numeric("review_time_seconds")
        .expect("review times")
        .iter()
        .all(Option::is_none));
}

#[test]
fn loads_reread_the_source_each_time() {
    let dir = fixture_dir();
    let loader = loader_for(dir.path());

    let first = loader.load(DatasetKind::AutoqaReviewMetric).expect("first load");
    assert_eq!(
        first.numeric("score").expect("scores"),
        &[Some(90.0), Some(75.0)]
    );

    common::write_source(
        dir.path(),
        DatasetKind::AutoqaReviewMetric,
        &serde_json::json!([
            {
                "team_id": 1,
                "rating_scale_score": 1,
                "score": 10,
                "created_at": null,
                "updated_at": null
            }
        ]),
    );

    let second = loader.load(DatasetKind::AutoqaReviewMetric).expect("second load");
    assert_eq!(second.row_count(), 1);
    assert_eq!(second.numeric("score").expect("scores"), &[Some(10.0)]);
}
