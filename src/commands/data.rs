use crate::error::AppResult;
use crate::models::dataset::DatasetKind;
use crate::models::table::{ColumnSummary, Table};

use super::AppContext;

pub fn inspect_dataset(context: &AppContext, dataset: &str) -> AppResult<()> {
    let kind: DatasetKind = dataset.parse()?;
    let table = context.loader().load(kind)?;
    print!("{}", render_summary(&table));
    Ok(())
}

/// Fixed-width column summary: name, kind, non-missing and missing counts.
pub fn render_summary(table: &Table) -> String {
    let summary = table.summary();
    let width = summary
        .iter()
        .map(|column| column.name.len())
        .max()
        .unwrap_or(0)
        .max("column".len());

    let mut out = format!("{} ({} rows)\n", table.name(), table.row_count());
    out.push_str(&format!(
        "{:<width$}  {:<8}  {:>8}  {:>8}\n",
        "column", "type", "present", "missing"
    ));
    for ColumnSummary {
        name,
        kind,
        present,
        missing,
    } in &summary
    {
        out.push_str(&format!(
            "{name:<width$}  {:<8}  {present:>8}  {missing:>8}\n",
            kind.as_str()
        ));
    }
    out
}
