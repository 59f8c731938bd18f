//! Grouped aggregates over table columns.
//!
//! Missing keys are dropped before grouping and missing values are skipped
//! by every statistic, so an empty or all-missing input yields an empty (or
//! `None`) result instead of an error.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::Hash;

use chrono::{DateTime, NaiveDate, Utc};

/// Float usable as a grouping key; ordered with `f64::total_cmp`.
#[derive(Debug, Clone, Copy)]
pub struct NumericKey(pub f64);

impl PartialEq for NumericKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NumericKey {}

impl PartialOrd for NumericKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NumericKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

pub fn numeric_keys(values: &[Option<f64>]) -> Vec<Option<NumericKey>> {
    values.iter().map(|value| value.map(NumericKey)).collect()
}

pub fn mean(values: &[Option<f64>]) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Mean of `values` per key, keys ascending. A group whose values are all
/// missing reports `None`.
pub fn group_mean<K: Ord + Clone>(keys: &[Option<K>], values: &[Option<f64>]) -> Vec<(K, Option<f64>)> {
    let mut groups: BTreeMap<K, (f64, usize)> = BTreeMap::new();
    for (key, value) in keys.iter().zip(values) {
        let Some(key) = key else { continue };
        let entry = groups.entry(key.clone()).or_insert((0.0, 0));
        if let Some(value) = value {
            entry.0 += value;
            entry.1 += 1;
        }
    }

    groups
        .into_iter()
        .map(|(key, (sum, count))| {
            let mean = if count == 0 {
                None
            } else {
                Some(sum / count as f64)
            };
            (key, mean)
        })
        .collect()
}

/// Count of non-missing `values` per key, keys ascending.
pub fn group_count<K: Ord + Clone, V>(keys: &[Option<K>], values: &[Option<V>]) -> Vec<(K, usize)> {
    let mut groups: BTreeMap<K, usize> = BTreeMap::new();
    for (key, value) in keys.iter().zip(values) {
        let Some(key) = key else { continue };
        let count = groups.entry(key.clone()).or_insert(0);
        if value.is_some() {
            *count += 1;
        }
    }
    groups.into_iter().collect()
}

/// Share of each distinct value in percent, most frequent first. Ties keep
/// first-appearance order.
pub fn value_counts_normalized<K: Eq + Hash + Clone>(values: &[Option<K>]) -> Vec<(K, f64)> {
    let mut order: Vec<K> = Vec::new();
    let mut counts: HashMap<K, usize> = HashMap::new();
    for value in values.iter().flatten() {
        let count = counts.entry(value.clone()).or_insert_with(|| {
            order.push(value.clone());
            0
        });
        *count += 1;
    }

    let total: usize = counts.values().sum();
    if total == 0 {
        return Vec::new();
    }

    let mut tallies: Vec<(K, usize)> = order
        .into_iter()
        .map(|key| {
            let count = counts.get(&key).copied().unwrap_or(0);
            (key, count)
        })
        .collect();
    tallies.sort_by(|left, right| right.1.cmp(&left.1));

    tallies
        .into_iter()
        .map(|(key, count)| (key, count as f64 / total as f64 * 100.0))
        .collect()
}

/// Two-way frequency table; absent combinations count as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Crosstab<R, C> {
    pub rows: Vec<R>,
    pub columns: Vec<C>,
    pub counts: Vec<Vec<usize>>,
}

impl<R, C> Crosstab<R, C> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_series(&self, column: usize) -> Vec<usize> {
        self.counts.iter().map(|row| row[column]).collect()
    }

    pub fn column_totals(&self) -> Vec<usize> {
        (0..self.columns.len())
            .map(|column| self.counts.iter().map(|row| row[column]).sum())
            .collect()
    }
}

pub fn crosstab<R: Ord + Clone, C: Ord + Clone>(row_keys: &[Option<R>], column_keys: &[Option<C>]) -> Crosstab<R, C> {
    let pairs: Vec<(&R, &C)> = row_keys
        .iter()
        .zip(column_keys)
        .filter_map(|(row, column)| Some((row.as_ref()?, column.as_ref()?)))
        .collect();

    let rows: Vec<R> = pairs
        .iter()
        .map(|(row, _)| (*row).clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let columns: Vec<C> = pairs
        .iter()
        .map(|(_, column)| (*column).clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut counts = vec![vec![0usize; columns.len()]; rows.len()];
    for (row, column) in pairs {
        if let (Ok(r), Ok(c)) = (rows.binary_search(row), columns.binary_search(column)) {
            counts[r][c] += 1;
        }
    }

    Crosstab {
        rows,
        columns,
        counts,
    }
}

/// Calendar day (UTC) of each timestamp.
pub fn to_dates(values: &[Option<DateTime<Utc>>]) -> Vec<Option<NaiveDate>> {
    values.iter().map(|value| value.map(|ts| ts.date_naive())).collect()
}

pub fn date_label(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
