// src/model/record.rs

use crate::model::amenities;
use crate::model::schema::{AMENITIES_COLUMN, DROPPED_COLUMNS};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// A single cell. Booleans and percentages arrive pre-serialized as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
}

/// One listing: column name to value. Absent columns are missing values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    values: BTreeMap<String, Value>,
}

impl ListingRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or clear a column. `None` marks the value as missing.
    pub fn set(&mut self, column: impl Into<String>, value: Option<Value>) {
        let column = column.into();
        match value {
            Some(v) => {
                self.values.insert(column, v);
            }
            None => {
                self.values.remove(&column);
            }
        }
    }

    /// Non-finite numbers count as missing.
    pub fn set_number(&mut self, column: impl Into<String>, value: Option<f64>) {
        self.set(column, value.filter(|v| v.is_finite()).map(Value::Number));
    }

    pub fn set_text(&mut self, column: impl Into<String>, value: Option<String>) {
        self.set(column, value.map(Value::Text));
    }

    pub fn with_number(mut self, column: &str, value: f64) -> Self {
        self.set_number(column, Some(value));
        self
    }

    pub fn with_text(mut self, column: &str, value: &str) -> Self {
        self.set_text(column, Some(value.to_string()));
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    pub fn remove(&mut self, column: &str) -> Option<Value> {
        self.values.remove(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Numeric view of a column. Text that does not parse is missing.
    pub fn number(&self, column: &str) -> Option<f64> {
        let value = match self.values.get(column)? {
            Value::Number(n) => Some(*n),
            Value::Text(s) => s.trim().parse::<f64>().ok(),
        };
        value.filter(|n| n.is_finite())
    }

    /// Categorical view of a column. Numbers are rendered as text.
    pub fn category(&self, column: &str) -> Option<Cow<'_, str>> {
        match self.values.get(column)? {
            Value::Text(s) => Some(Cow::Borrowed(s.as_str())),
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
        }
    }

    /// Replace the amenities value with its canonical form.
    ///
    /// Anything that is not text is not a usable amenities list and is
    /// treated as missing.
    pub fn normalize_amenities(&mut self) {
        let normalized = match self.values.get(AMENITIES_COLUMN) {
            Some(Value::Text(raw)) => Some(Value::Text(amenities::normalize_str(raw))),
            _ => None,
        };
        self.set(AMENITIES_COLUMN, normalized);
    }

    /// Remove identifier, free-text, URL and date columns.
    pub fn drop_non_predictive(&mut self) {
        for column in DROPPED_COLUMNS {
            self.values.remove(column);
        }
    }
}
