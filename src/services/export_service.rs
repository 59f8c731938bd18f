use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::{json, Map as JsonMap, Value as JsonValue};
use tracing::info;

use crate::error::AppResult;
use crate::models::dashboard::{Dashboard, ExportFormat, ExportResult, PanelKind, Trace};

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
const FIGURE_HEIGHT: u32 = 800;
const HORIZONTAL_SPACING: f64 = 0.15;
const VERTICAL_SPACING: f64 = 0.2;

pub struct ExportService {
    output_dir: PathBuf,
}

impl ExportService {
    pub fn new<P: Into<PathBuf>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn export(&self, dashboard: &Dashboard, format: ExportFormat) -> AppResult<ExportResult> {
        std::fs::create_dir_all(&self.output_dir)?;

        let timestamp = Utc::now().format("%Y%m%dT%H%M%S%.3fZ");
        let filename = format!(
            "{}-{}.{}",
            dashboard.kind.as_str(),
            timestamp,
            format.file_extension()
        );
        let path = self.output_dir.join(filename);

        let content = match format {
            ExportFormat::Json => serde_json::to_string_pretty(&render_figure(dashboard))?,
            ExportFormat::Html => render_html(dashboard)?,
            ExportFormat::Markdown => render_markdown(dashboard),
        };
        std::fs::write(&path, content)?;

        info!(
            target: "app::export",
            dashboard = %dashboard.kind,
            format = format.file_extension(),
            path = %path.display(),
            "dashboard exported"
        );

        Ok(ExportResult {
            file_path: path.display().to_string(),
            format,
            dashboard: dashboard.kind,
            generated_at: dashboard.generated_at.clone(),
        })
    }
}

/// Paper-coordinate domain of the panel at `index` (row-major, 2x2).
pub fn panel_domain(index: usize) -> ([f64; 2], [f64; 2]) {
    let row = index / Dashboard::COLUMNS;
    let column = index % Dashboard::COLUMNS;
    let width = (1.0 - HORIZONTAL_SPACING) / Dashboard::COLUMNS as f64;
    let height = (1.0 - VERTICAL_SPACING) / Dashboard::ROWS as f64;

    let x0 = column as f64 * (width + HORIZONTAL_SPACING);
    // Row 0 sits at the top of the page.
    let y1 = 1.0 - row as f64 * (height + VERTICAL_SPACING);
    ([x0, x0 + width], [y1 - height, y1])
}

/// Axis name as Plotly spells it: the first axis carries no number, both as
/// a trace reference (`x`, `y2`) and with the layout prefix (`xaxis`, `yaxis2`).
fn axis_ref(prefix: &str, axis: usize) -> String {
    if axis == 1 {
        prefix.to_string()
    } else {
        format!("{prefix}{axis}")
    }
}

/// Builds a Plotly figure (`data` + `layout`) for the dashboard.
pub fn render_figure(dashboard: &Dashboard) -> JsonValue {
    let mut data = Vec::new();
    let mut layout = JsonMap::new();
    let mut annotations = Vec::new();

    for (index, panel) in dashboard.panels.iter().enumerate() {
        let (x_domain, y_domain) = panel_domain(index);
        annotations.push(json!({
            "text": panel.title,
            "x": (x_domain[0] + x_domain[1]) / 2.0,
            "y": y_domain[1],
            "xref": "paper",
            "yref": "paper",
            "xanchor": "center",
            "yanchor": "bottom",
            "showarrow": false,
            "font": {"size": 16}
        }));

        let axis = index + 1;
        let secondary_axis = Dashboard::ROWS * Dashboard::COLUMNS + axis;
        if matches!(panel.kind, PanelKind::Xy | PanelKind::XyDualAxis) {
            layout.insert(
                axis_ref("xaxis", axis),
                json!({"domain": x_domain, "anchor": axis_ref("y", axis)}),
            );
            let mut y_axis = json!({"domain": y_domain, "anchor": axis_ref("x", axis)});
            if let Some(title) = panel.y_title.as_ref() {
                y_axis["title"] = json!({"text": title});
            }
            layout.insert(axis_ref("yaxis", axis), y_axis);

            if panel.kind == PanelKind::XyDualAxis {
                let mut secondary = json!({
                    "overlaying": axis_ref("y", axis),
                    "anchor": axis_ref("x", axis),
                    "side": "right"
                });
                if let Some(title) = panel.secondary_y_title.as_ref() {
                    secondary["title"] = json!({"text": title});
                }
                layout.insert(axis_ref("yaxis", secondary_axis), secondary);
            }
        }

        for trace in &panel.traces {
            data.push(render_trace(trace, axis, secondary_axis, x_domain, y_domain));
        }
    }

    layout.insert("height".to_string(), json!(FIGURE_HEIGHT));
    layout.insert(
        "title".to_string(),
        json!({"text": dashboard.title, "x": 0.5}),
    );
    layout.insert("showlegend".to_string(), json!(true));
    layout.insert("plot_bgcolor".to_string(), json!("white"));
    layout.insert("annotations".to_string(), JsonValue::Array(annotations));

    json!({"data": data, "layout": layout})
}

fn render_trace(
    trace: &Trace,
    axis: usize,
    secondary_axis: usize,
    x_domain: [f64; 2],
    y_domain: [f64; 2],
) -> JsonValue {
    match trace {
        Trace::Line(line) => {
            let mut value = json!({
                "type": "scatter",
                "mode": "lines+markers",
                "name": line.name,
                "x": line.x,
                "y": line.y,
                "xaxis": axis_ref("x", axis),
                "yaxis": axis_ref("y", if line.secondary_y { secondary_axis } else { axis })
            });
            if let Some(color) = line.color.as_ref() {
                value["line"] = json!({"color": color});
            }
            value
        }
        Trace::Bar(bar) => {
            let mut marker = JsonMap::new();
            match bar.colors.as_slice() {
                [] => {}
                [single] => {
                    marker.insert("color".to_string(), json!(single));
                }
                many => {
                    marker.insert("color".to_string(), json!(many));
                }
            }
            if let Some(opacity) = bar.opacity {
                marker.insert("opacity".to_string(), json!(opacity));
            }
            json!({
                "type": "bar",
                "name": bar.name,
                "x": bar.x,
                "y": bar.y,
                "marker": marker,
                "xaxis": axis_ref("x", axis),
                "yaxis": axis_ref("y", if bar.secondary_y { secondary_axis } else { axis })
            })
        }
        Trace::Pie(pie) => json!({
            "type": "pie",
            "name": pie.name,
            "labels": pie.labels,
            "values": pie.values,
            "hole": pie.hole,
            "domain": {"x": x_domain, "y": y_domain}
        }),
        Trace::Indicator(indicator) => json!({
            "type": "indicator",
            "mode": "number",
            "value": indicator.value,
            "title": {"text": indicator.title},
            "domain": {"x": x_domain, "y": y_domain}
        }),
    }
}

pub fn render_html(dashboard: &Dashboard) -> AppResult<String> {
    let figure = serde_json::to_string(&render_figure(dashboard))?;
    // Keep `</script>` inside string values from closing the script element.
    let figure = figure.replace("</", "<\\/");
    let title = escape_html(&dashboard.title);

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{PLOTLY_CDN}"></script>
</head>
<body>
<div id="dashboard" style="width:100%;height:{FIGURE_HEIGHT}px;"></div>
<script>
const figure = {figure};
Plotly.newPlot("dashboard", figure.data, figure.layout, {{responsive: true}});
</script>
</body>
</html>
"#
    ))
}

pub fn render_markdown(dashboard: &Dashboard) -> String {
    let mut content = String::new();
    content.push_str(&format!("# {}\n\n", dashboard.title));
    content.push_str(&format!("Generated: {}\n\n", dashboard.generated_at));

    for panel in &dashboard.panels {
        content.push_str(&format!("## {}\n\n", panel.title));
        if panel.traces.is_empty() {
            content.push_str("_No data._\n\n");
            continue;
        }
        for trace in &panel.traces {
            render_markdown_trace(&mut content, trace);
        }
    }

    if !dashboard.notes.is_empty() {
        content.push_str("## Notes\n\n");
        for note in &dashboard.notes {
            content.push_str(&format!("- {note}\n"));
        }
        content.push('\n');
    }

    content
}

fn render_markdown_trace(content: &mut String, trace: &Trace) {
    match trace {
        Trace::Line(line) => render_series(content, &line.name, &line.x, &line.y),
        Trace::Bar(bar) => render_series(content, &bar.name, &bar.x, &bar.y),
        Trace::Pie(pie) => {
            content.push_str(&format!("**{}**\n\n| Label | Share |\n|---|---|\n", pie.name));
            let total = pie.total();
            for (label, value) in pie.labels.iter().zip(&pie.values) {
                let share = if total > 0.0 { value / total * 100.0 } else { 0.0 };
                content.push_str(&format!("| {label} | {share:.1}% |\n"));
            }
            content.push('\n');
        }
        Trace::Indicator(indicator) => {
            let value = indicator
                .value
                .map(|value| format!("{value:.1}"))
                .unwrap_or_else(|| "n/a".to_string());
            content.push_str(&format!("**{}**: {value}\n\n", indicator.title));
        }
    }
}

fn render_series(content: &mut String, name: &str, x: &[String], y: &[Option<f64>]) {
    content.push_str(&format!("**{name}**\n\n| Label | Value |\n|---|---|\n"));
    for (label, value) in x.iter().zip(y) {
        let value = value
            .map(|value| format!("{value:.2}"))
            .unwrap_or_else(|| "n/a".to_string());
        content.push_str(&format!("| {label} | {value} |\n"));
    }
    content.push('\n');
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
