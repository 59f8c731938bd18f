mod common;

use std::fs;
use std::path::Path;

use serde_json::Value as JsonValue;
use support_dashboards_lib::models::config::DashboardSettings;
use support_dashboards_lib::models::dashboard::{Dashboard, DashboardKind, ExportFormat};
use support_dashboards_lib::services::dashboards::DashboardService;
use support_dashboards_lib::services::export_service::ExportService;
use tempfile::tempdir;

use common::{fixture_dir, loader_for};

fn build(kind: DashboardKind) -> Dashboard {
    let dir = fixture_dir();
    DashboardService::new(loader_for(dir.path()), DashboardSettings::default())
        .build(kind)
        .expect("build dashboard")
}

#[test]
fn json_export_is_a_plotly_figure_with_four_domains() {
    let dashboard = build(DashboardKind::ConversationMetrics);
    let out = tempdir().expect("temp dir");
    let exports = ExportService::new(out.path().join("reports"));

    let result = exports
        .export(&dashboard, ExportFormat::Json)
        .expect("export json");
    let path = Path::new(&result.file_path);
    assert!(path.exists());
    assert_eq!(path.extension().and_then(|ext| ext.to_str()), Some("json"));
    assert!(path
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with("conversation-metrics-"))
        .unwrap_or(false));

    let figure: JsonValue =
        serde_json::from_str(&fs::read_to_string(path).expect("read export")).expect("parse figure");
    let layout = &figure["layout"];
    assert_eq!(layout["title"]["text"], dashboard.title.as_str());
    assert_eq!(layout["annotations"].as_array().map(Vec::len), Some(4));
    assert_eq!(layout["yaxis5"]["overlaying"], "y");
    assert_eq!(layout["yaxis5"]["side"], "right");

    let data = figure["data"].as_array().expect("trace list");
    let secondary = data
        .iter()
        .find(|trace| trace["yaxis"] == "y5")
        .expect("secondary-axis trace");
    assert_eq!(secondary["type"], "bar");

    let pies: Vec<&JsonValue> = data.iter().filter(|trace| trace["type"] == "pie").collect();
    assert_eq!(pies.len(), 2);
    assert!(pies.iter().all(|pie| pie["hole"] == 0.4));
}

#[test]
fn html_export_embeds_the_figure() {
    let dashboard = build(DashboardKind::TrendAnalysis);
    let out = tempdir().expect("temp dir");

    let result = ExportService::new(out.path())
        .export(&dashboard, ExportFormat::Html)
        .expect("export html");
    assert_eq!(result.format, ExportFormat::Html);
    assert_eq!(result.dashboard, DashboardKind::TrendAnalysis);

    let html = fs::read_to_string(&result.file_path).expect("read export");
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>Trend Analysis Dashboard</title>"));
    assert!(html.contains("cdn.plot.ly"));
    assert!(html.contains("Plotly.newPlot"));
    assert!(html.contains("Channel Performance Distribution"));
}

#[test]
fn markdown_export_lists_panels_and_notes() {
    let dashboard = build(DashboardKind::ReviewMetrics);
    let out = tempdir().expect("temp dir");

    let result = ExportService::new(out.path())
        .export(&dashboard, ExportFormat::Markdown)
        .expect("export markdown");
    assert!(result.file_path.ends_with(".md"));

    let markdown = fs::read_to_string(&result.file_path).expect("read export");
    assert!(markdown.starts_with("# Review Metrics Dashboard"));
    for panel in &dashboard.panels {
        assert!(markdown.contains(&format!("## {}", panel.title)));
    }
    assert!(markdown.contains("| Tone | 90.00 |"));
    assert!(markdown.contains("| Disputed | 33.3% |"));
    assert!(markdown.contains("**Average Review Time (seconds)**: n/a"));
    assert!(markdown.contains("## Notes"));
}
