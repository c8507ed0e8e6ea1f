//! Column resolution: canonical field name to actual dataset column.
//!
//! For each field in schema order, its aliases are tried in declared order and
//! the first alias that matches any column wins, scanning columns in dataset
//! order. Ignoring case, an alias matches a column that equals it or contains
//! it. A non-ASCII alias also matches a column it contains, so `u` binds
//! through `u风`. ASCII aliases never match a shorter column, which keeps
//! columns like `id` or `u` away from `relative_humidity` and `temperature`.
//! There is no scoring, so an ambiguous column such as `温度highalt` binds to
//! `temperature` through the `温度` alias.

use crate::record::Record;
use crate::schema::FieldSchema;
use std::collections::HashSet;

/// Mapping from canonical field to the dataset column holding it.
///
/// Built per call and kept in schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    entries: Vec<(String, String)>,
}

impl ColumnMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `canonical` lives in `column`, replacing any earlier binding.
    pub fn insert(&mut self, canonical: impl Into<String>, column: impl Into<String>) {
        let canonical = canonical.into();
        let column = column.into();
        match self.entries.iter_mut().find(|(c, _)| *c == canonical) {
            Some(entry) => entry.1 = column,
            None => self.entries.push((canonical, column)),
        }
    }

    /// Column bound to a canonical field.
    pub fn get(&self, canonical: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(c, _)| c == canonical)
            .map(|(_, column)| column.as_str())
    }

    pub fn contains(&self, canonical: &str) -> bool {
        self.get(canonical).is_some()
    }

    /// `(canonical, column)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(canonical, column)| (canonical.as_str(), column.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Union of the keys of all records, in order of first appearance.
pub fn dataset_columns(records: &[Record]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut columns = Vec::new();
    for key in records.iter().flat_map(|record| record.keys()) {
        if seen.insert(key.as_str()) {
            columns.push(key.clone());
        }
    }
    columns
}

/// Both arguments are already lowercased.
fn alias_matches(alias: &str, column: &str) -> bool {
    column.contains(alias) || (!alias.is_ascii() && alias.contains(column))
}

/// Binds canonical fields of `schema` to entries of `columns`.
///
/// Fields with no matching column are left out. Blank column names and blank
/// aliases never match.
pub fn build_column_map<S: AsRef<str>>(columns: &[S], schema: &FieldSchema) -> ColumnMap {
    let lowered: Vec<(String, &str)> = columns
        .iter()
        .map(AsRef::as_ref)
        .filter(|column| !column.trim().is_empty())
        .map(|column| (column.to_lowercase(), column))
        .collect();

    let mut map = ColumnMap::new();
    for spec in schema.iter() {
        let found = spec
            .aliases
            .iter()
            .filter(|alias| !alias.trim().is_empty())
            .find_map(|alias| {
                let alias = alias.to_lowercase();
                lowered
                    .iter()
                    .find(|(column, _)| alias_matches(&alias, column))
                    .map(|(_, original)| *original)
            });
        if let Some(column) = found {
            map.insert(spec.name.as_str(), column);
        }
    }
    map
}
