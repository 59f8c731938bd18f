use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Datetime,
    Boolean,
    Raw,
}

impl ColumnKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Datetime => "datetime",
            ColumnKind::Boolean => "boolean",
            ColumnKind::Raw => "raw",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single column. Numeric and datetime cells use `None` as the missing
/// marker, raw cells use `Value::Null`. Boolean cells are never missing.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Numeric(Vec<Option<f64>>),
    Datetime(Vec<Option<DateTime<Utc>>>),
    Boolean(Vec<bool>),
    Raw(Vec<JsonValue>),
}

impl Column {
    pub fn kind(&self) -> ColumnKind {
        match self {
            Column::Numeric(_) => ColumnKind::Numeric,
            Column::Datetime(_) => ColumnKind::Datetime,
            Column::Boolean(_) => ColumnKind::Boolean,
            Column::Raw(_) => ColumnKind::Raw,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(values) => values.len(),
            Column::Datetime(values) => values.len(),
            Column::Boolean(values) => values.len(),
            Column::Raw(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn missing_count(&self) -> usize {
        match self {
            Column::Numeric(values) => values.iter().filter(|value| value.is_none()).count(),
            Column::Datetime(values) => values.iter().filter(|value| value.is_none()).count(),
            Column::Boolean(_) => 0,
            Column::Raw(values) => values.iter().filter(|value| value.is_null()).count(),
        }
    }

    /// Renders every cell as a grouping label.
    pub fn labels(&self) -> Vec<Option<String>> {
        match self {
            Column::Numeric(values) => values
                .iter()
                .map(|value| value.map(format_number))
                .collect(),
            Column::Datetime(values) => values
                .iter()
                .map(|value| value.map(|ts| ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)))
                .collect(),
            Column::Boolean(values) => values.iter().map(|value| Some(value.to_string())).collect(),
            Column::Raw(values) => values.iter().map(cell_text).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSummary {
    pub name: String,
    pub kind: ColumnKind,
    pub present: usize,
    pub missing: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    name: String,
    columns: Vec<(String, Column)>,
    rows: usize,
}

impl Table {
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            rows: 0,
        }
    }

    pub fn from_columns(name: impl Into<String>, columns: Vec<(String, Column)>) -> AppResult<Self> {
        let name = name.into();
        let rows = columns.first().map(|(_, column)| column.len()).unwrap_or(0);
        if let Some((column, values)) = columns.iter().find(|(_, values)| values.len() != rows) {
            return Err(AppError::validation(format!(
                "column `{column}` in {name} has {} rows, expected {rows}",
                values.len()
            )));
        }
        Ok(Self {
            name,
            columns,
            rows,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, values)| values)
    }

    pub fn require(&self, name: &str) -> AppResult<&Column> {
        self.column(name)
            .ok_or_else(|| AppError::missing_column(&self.name, name))
    }

    /// Swaps the column stored under `name`; the row count must not change.
    pub fn replace(&mut self, name: &str, column: Column) -> AppResult<()> {
        if column.len() != self.rows {
            return Err(AppError::validation(format!(
                "replacement for `{name}` has {} rows, expected {}",
                column.len(),
                self.rows
            )));
        }
        let table_name = self.name.clone();
        let slot = self
            .columns
            .iter_mut()
            .find(|(column, _)| column == name)
            .ok_or_else(|| AppError::missing_column(table_name, name))?;
        slot.1 = column;
        Ok(())
    }

    pub fn numeric(&self, name: &str) -> AppResult<&[Option<f64>]> {
        match self.require(name)? {
            Column::Numeric(values) => Ok(values),
            other => Err(AppError::column_type(name, ColumnKind::Numeric, other.kind())),
        }
    }

    pub fn datetime(&self, name: &str) -> AppResult<&[Option<DateTime<Utc>>]> {
        match self.require(name)? {
            Column::Datetime(values) => Ok(values),
            other => Err(AppError::column_type(name, ColumnKind::Datetime, other.kind())),
        }
    }

    pub fn boolean(&self, name: &str) -> AppResult<&[bool]> {
        match self.require(name)? {
            Column::Boolean(values) => Ok(values),
            other => Err(AppError::column_type(name, ColumnKind::Boolean, other.kind())),
        }
    }

    pub fn raw(&self, name: &str) -> AppResult<&[JsonValue]> {
        match self.require(name)? {
            Column::Raw(values) => Ok(values),
            other => Err(AppError::column_type(name, ColumnKind::Raw, other.kind())),
        }
    }

    pub fn text(&self, name: &str) -> AppResult<Vec<Option<String>>> {
        Ok(self.require(name)?.labels())
    }

    pub fn summary(&self) -> Vec<ColumnSummary> {
        self.columns
            .iter()
            .map(|(name, column)| {
                let missing = column.missing_count();
                ColumnSummary {
                    name: name.clone(),
                    kind: column.kind(),
                    present: column.len() - missing,
                    missing,
                }
            })
            .collect()
    }
}

pub fn cell_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(text) => Some(text.clone()),
        JsonValue::Bool(flag) => Some(flag.to_string()),
        other => Some(other.to_string()),
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
