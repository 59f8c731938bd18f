use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value as JsonValue;

use crate::models::table::{cell_text, Column};

const ZONED_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"];
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];
const DATE_FORMAT: &str = "%Y-%m-%d";

// Largest magnitude representable per epoch unit inside the nanosecond range.
// Units overlap at the low end: epoch milliseconds below about 9.2e9, dates
// before mid April 1970, fall under MAX_EPOCH_SECONDS and are read as seconds.
const MAX_EPOCH_SECONDS: f64 = 9.223_372_036e9;
const MAX_EPOCH_MILLIS: f64 = 9.223_372_036e12;
const MAX_EPOCH_MICROS: f64 = 9.223_372_036e15;

pub fn coerce_numeric(value: &JsonValue) -> Option<f64> {
    let number = match value {
        JsonValue::Number(number) => number.as_f64(),
        JsonValue::String(text) => text.trim().parse::<f64>().ok(),
        JsonValue::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

pub fn coerce_datetime(value: &JsonValue) -> Option<DateTime<Utc>> {
    match value {
        JsonValue::String(text) => parse_datetime_text(text.trim()),
        JsonValue::Number(number) => number.as_f64().and_then(epoch_to_datetime),
        _ => None,
    }
}

/// `true` only for a JSON `true` or text equal to "true" ignoring case.
pub fn coerce_boolean(value: &JsonValue) -> bool {
    match value {
        JsonValue::Bool(flag) => *flag,
        other => cell_text(other)
            .map(|text| text.to_lowercase() == "true")
            .unwrap_or(false),
    }
}

pub fn numeric_column(values: &[JsonValue]) -> Column {
    Column::Numeric(values.iter().map(coerce_numeric).collect())
}

pub fn datetime_column(values: &[JsonValue]) -> Column {
    Column::Datetime(values.iter().map(coerce_datetime).collect())
}

pub fn boolean_column(values: &[JsonValue]) -> Column {
    Column::Boolean(values.iter().map(coerce_boolean).collect())
}

fn parse_datetime_text(text: &str) -> Option<DateTime<Utc>> {
    if text.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in ZONED_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(text, format) {
            return Some(parsed.with_timezone(&Utc));
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Some(parsed.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn epoch_to_datetime(value: f64) -> Option<DateTime<Utc>> {
    if !value.is_finite() {
        return None;
    }

    let magnitude = value.abs();
    let nanos = if magnitude < MAX_EPOCH_SECONDS {
        value * 1e9
    } else if magnitude < MAX_EPOCH_MILLIS {
        value * 1e6
    } else if magnitude < MAX_EPOCH_MICROS {
        value * 1e3
    } else {
        value
    };

    if nanos.abs() >= i64::MAX as f64 {
        return None;
    }
    Some(DateTime::from_timestamp_nanos(nanos.round() as i64))
}
