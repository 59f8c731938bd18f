use tracing::info;

use crate::error::AppResult;
use crate::models::dashboard::{DashboardKind, ExportResult};

use super::AppContext;

pub fn export_dashboard(context: &AppContext, kind: DashboardKind) -> AppResult<()> {
    let result = build_and_export(context, kind)?;
    println!("{}", result.file_path);
    Ok(())
}

/// Builds every dashboard before writing any of them.
pub fn export_all(context: &AppContext) -> AppResult<()> {
    let dashboards = context.dashboards().build_all()?;
    let format = context.config().export_format;
    let exports = context.exports();

    for dashboard in &dashboards {
        let result = exports.export(dashboard, format)?;
        print_notes(&dashboard.notes);
        println!("{}", result.file_path);
    }

    info!(
        target: "app::command",
        count = dashboards.len(),
        output_dir = %exports.output_dir().display(),
        "all dashboards exported"
    );
    Ok(())
}

fn build_and_export(context: &AppContext, kind: DashboardKind) -> AppResult<ExportResult> {
    let dashboard = context.dashboards().build(kind)?;
    let result = context
        .exports()
        .export(&dashboard, context.config().export_format)?;
    print_notes(&dashboard.notes);
    Ok(result)
}

fn print_notes(notes: &[String]) {
    for note in notes {
        eprintln!("note: {note}");
    }
}
