use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde_json::{Map as JsonMap, Value as JsonValue};
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::models::dataset::{DatasetKind, LoadedDatasets};
use crate::models::table::{Column, Table};
use crate::services::coercion::{boolean_column, datetime_column, numeric_column};

/// Resolves dataset kinds to files under one data directory.
#[derive(Debug, Clone)]
pub struct DataSource {
    data_dir: PathBuf,
}

impl DataSource {
    pub fn new<P: Into<PathBuf>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn path_for(&self, kind: DatasetKind) -> PathBuf {
        self.data_dir.join(kind.file_name())
    }
}

/// Stateless loader; every call re-reads the source file.
#[derive(Debug, Clone)]
pub struct LoaderService {
    source: DataSource,
}

impl LoaderService {
    pub fn new(source: DataSource) -> Self {
        Self { source }
    }

    pub fn load(&self, kind: DatasetKind) -> AppResult<Table> {
        let path = self.source.path_for(kind);
        debug!(target: "app::loader", dataset = %kind, path = %path.display(), "loading dataset");
        let raw = read_table(&path, kind.as_str())?;
        let table = normalize(kind, raw)?;
        info!(
            target: "app::loader",
            dataset = %kind,
            rows = table.row_count(),
            "dataset loaded"
        );
        Ok(table)
    }

    pub fn load_autoqa_review_metric(&self) -> AppResult<Table> {
        self.load(DatasetKind::AutoqaReviewMetric)
    }

    pub fn load_conversation_detail(&self) -> AppResult<Table> {
        self.load(DatasetKind::ConversationDetail)
    }

    pub fn load_conversation_metric(&self) -> AppResult<Table> {
        self.load(DatasetKind::ConversationMetric)
    }

    pub fn load_manual_review_detail(&self) -> AppResult<Table> {
        self.load(DatasetKind::ManualReviewDetail)
    }

    pub fn load_manual_review_metric(&self) -> AppResult<Table> {
        self.load(DatasetKind::ManualReviewMetric)
    }

    pub fn load_all(&self) -> AppResult<LoadedDatasets> {
        Ok(LoadedDatasets {
            autoqa_review_metric: self.load_autoqa_review_metric()?,
            conversation_detail: self.load_conversation_detail()?,
            conversation_metric: self.load_conversation_metric()?,
            manual_review_detail: self.load_manual_review_detail()?,
            manual_review_metric: self.load_manual_review_metric()?,
        })
    }
}

/// Reads a JSON export into a table of raw columns.
pub fn read_table(path: &Path, name: &str) -> AppResult<Table> {
    let content = std::fs::read_to_string(path)?;
    let document: JsonValue = serde_json::from_str(&content)
        .map_err(|err| AppError::malformed_source(path, err.to_string()))?;

    let columns = match document {
        JsonValue::Array(records) => records_to_columns(path, records)?,
        JsonValue::Object(columns) => column_map_to_columns(path, columns)?,
        other => {
            return Err(AppError::malformed_source(
                path,
                format!("expected an array of records or an object of columns, found {}", json_type(&other)),
            ))
        }
    };

    Table::from_columns(
        name,
        columns
            .into_iter()
            .map(|(column, values)| (column, Column::Raw(values)))
            .collect(),
    )
}

/// Applies the dataset's declared coercions to a raw table.
pub fn normalize(kind: DatasetKind, mut table: Table) -> AppResult<Table> {
    let schema = kind.schema();

    for column in schema.numeric {
        let coerced = numeric_column(table.raw(column)?);
        report_coercion(kind, column, table.raw(column)?, &coerced);
        table.replace(column, coerced)?;
    }

    for column in schema.datetime {
        let coerced = datetime_column(table.raw(column)?);
        report_coercion(kind, column, table.raw(column)?, &coerced);
        table.replace(column, coerced)?;
    }

    for column in schema.boolean {
        let coerced = boolean_column(table.raw(column)?);
        table.replace(column, coerced)?;
    }

    Ok(table)
}

fn report_coercion(kind: DatasetKind, column: &str, raw: &[JsonValue], coerced: &Column) {
    let present = raw.iter().filter(|value| !value.is_null()).count();
    let kept = coerced.len() - coerced.missing_count();
    let rejected = present.saturating_sub(kept);
    if rejected > 0 {
        warn!(
            target: "app::loader",
            dataset = %kind,
            %column,
            rejected,
            "values coerced to missing"
        );
    }
}

fn records_to_columns(
    path: &Path,
    records: Vec<JsonValue>,
) -> AppResult<Vec<(String, Vec<JsonValue>)>> {
    let mut columns: Vec<(String, Vec<JsonValue>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (row, record) in records.into_iter().enumerate() {
        let fields = match record {
            JsonValue::Object(fields) => fields,
            other => {
                return Err(AppError::malformed_source(
                    path,
                    format!("record {row} is {}, expected an object", json_type(&other)),
                ))
            }
        };

        for (name, value) in fields {
            let slot = *index.entry(name.clone()).or_insert_with(|| {
                columns.push((name, vec![JsonValue::Null; row]));
                columns.len() - 1
            });
            columns[slot].1.push(value);
        }

        for (_, values) in columns.iter_mut() {
            if values.len() <= row {
                values.push(JsonValue::Null);
            }
        }
    }

    Ok(columns)
}

fn column_map_to_columns(
    path: &Path,
    columns: JsonMap<String, JsonValue>,
) -> AppResult<Vec<(String, Vec<JsonValue>)>> {
    let mut labels: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut keyed: Vec<(String, HashMap<String, JsonValue>)> = Vec::with_capacity(columns.len());

    for (name, cells) in columns {
        let cells: Vec<(String, JsonValue)> = match cells {
            JsonValue::Object(map) => map.into_iter().collect(),
            JsonValue::Array(values) => values
                .into_iter()
                .enumerate()
                .map(|(position, value)| (position.to_string(), value))
                .collect(),
            other => {
                return Err(AppError::malformed_source(
                    path,
                    format!("column `{name}` is {}, expected an object or array", json_type(&other)),
                ))
            }
        };

        for (label, _) in &cells {
            if seen.insert(label.clone()) {
                labels.push(label.clone());
            }
        }
        keyed.push((name, cells.into_iter().collect()));
    }

    let numeric_labels: Option<Vec<i64>> = labels.iter().map(|label| label.parse().ok()).collect();
    if let Some(numbers) = numeric_labels {
        let mut paired: Vec<(i64, String)> = numbers.into_iter().zip(labels).collect();
        paired.sort_by_key(|(number, _)| *number);
        labels = paired.into_iter().map(|(_, label)| label).collect();
    }

    Ok(keyed
        .into_iter()
        .map(|(name, mut cells)| {
            let values = labels
                .iter()
                .map(|label| cells.remove(label).unwrap_or(JsonValue::Null))
                .collect();
            (name, values)
        })
        .collect())
}

fn json_type(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
