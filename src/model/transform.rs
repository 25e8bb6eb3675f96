// src/model/transform.rs

//! Column-wise feature transform.
//!
//! Numeric columns: median imputation, then standardization.
//! Categorical columns: most-frequent imputation, then one-hot encoding
//! against the fit-time vocabulary. Categories never seen at fit time encode
//! as an all-zero group instead of failing the request.
//!
//! Output layout: numeric columns in schema order, then one one-hot group per
//! categorical column in schema order, each group in sorted vocabulary order.
//!
//! A vocabulary keeps at most `max_categories` values, the most frequent
//! ones. Rarer values encode like unseen ones. Free-form columns such as the
//! canonical amenities string have close to one distinct value per row, and
//! this keeps the feature width independent of the row count.

use crate::model::error::ModelError;
use crate::model::record::ListingRecord;
use crate::model::schema::ColumnSchema;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use tracing::debug;

/// Default cap on one-hot indicators per categorical column.
pub const DEFAULT_MAX_CATEGORIES: usize = 64;

/// Unfitted transform: only knows which columns to look at.
#[derive(Debug, Clone)]
pub struct FeatureTransform {
    schema: ColumnSchema,
    max_categories: usize,
}

impl FeatureTransform {
    pub fn new(schema: ColumnSchema) -> Self {
        Self {
            schema,
            max_categories: DEFAULT_MAX_CATEGORIES,
        }
    }

    /// At least one category per column is always kept.
    pub fn with_max_categories(mut self, max_categories: usize) -> Self {
        self.max_categories = max_categories.max(1);
        self
    }

    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    /// Learn imputation statistics, scaling and vocabularies.
    ///
    /// Fails with `SchemaMismatch` when a declared column has no observed
    /// value in any record.
    pub fn fit(&self, records: &[ListingRecord]) -> Result<FittedTransform, ModelError> {
        if records.is_empty() {
            return Err(ModelError::EmptyDataset);
        }

        let numeric = self
            .schema
            .numeric()
            .iter()
            .map(|name| NumericColumn::fit(name, records))
            .collect::<Result<Vec<_>, _>>()?;

        let categorical = self
            .schema
            .categorical()
            .iter()
            .map(|name| CategoricalColumn::fit(name, records, self.max_categories))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FittedTransform {
            schema: self.schema.clone(),
            numeric,
            categorical,
        })
    }
}

/// Learned state for one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericColumn {
    pub name: String,
    pub median: f64,
    pub mean: f64,
    pub std: f64,
}

impl NumericColumn {
    fn fit(name: &str, records: &[ListingRecord]) -> Result<Self, ModelError> {
        let mut observed: Vec<f64> = records.iter().filter_map(|r| r.number(name)).collect();
        if observed.is_empty() {
            return Err(ModelError::SchemaMismatch {
                column: name.to_string(),
            });
        }
        let median = median(&mut observed);

        // The scaler sees the imputed column, not just the observed values.
        let imputed: Vec<f64> = records
            .iter()
            .map(|r| r.number(name).unwrap_or(median))
            .collect();
        let n = imputed.len() as f64;
        let mean = imputed.iter().sum::<f64>() / n;
        let variance = imputed.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        Ok(Self {
            name: name.to_string(),
            median,
            mean,
            std: variance.sqrt(),
        })
    }

    fn encode(&self, record: &ListingRecord) -> f64 {
        let value = record.number(&self.name).unwrap_or(self.median);
        if self.is_constant() {
            0.0
        } else {
            (value - self.mean) / self.std
        }
    }

    /// Rounding noise on a constant column must not turn into unit variance.
    fn is_constant(&self) -> bool {
        self.std <= 10.0 * f64::EPSILON * self.mean.abs().max(1.0)
    }
}

/// Learned state for one categorical column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalColumn {
    pub name: String,
    pub most_frequent: String,
    /// Sorted, distinct.
    pub vocabulary: Vec<String>,
}

impl CategoricalColumn {
    fn fit(name: &str, records: &[ListingRecord], max_categories: usize) -> Result<Self, ModelError> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for value in records.iter().filter_map(|r| r.category(name)) {
            *counts.entry(value.into_owned()).or_default() += 1;
        }
        if counts.is_empty() {
            return Err(ModelError::SchemaMismatch {
                column: name.to_string(),
            });
        }

        // Most frequent first; ties go to the smallest value.
        let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        let most_frequent = ranked[0].0.clone();

        let distinct = ranked.len();
        let mut vocabulary: Vec<String> = ranked
            .into_iter()
            .take(max_categories)
            .map(|(value, _)| value)
            .collect();
        vocabulary.sort_unstable();

        if distinct > vocabulary.len() {
            debug!(
                column = name,
                distinct,
                kept = vocabulary.len(),
                "rare categories folded into the absent indicator"
            );
        }

        Ok(Self {
            name: name.to_string(),
            most_frequent,
            vocabulary,
        })
    }

    fn resolve<'a>(&'a self, record: &'a ListingRecord) -> Cow<'a, str> {
        record
            .category(&self.name)
            .unwrap_or(Cow::Borrowed(self.most_frequent.as_str()))
    }

    fn position(&self, value: &str) -> Option<usize> {
        self.vocabulary
            .binary_search_by(|c| c.as_str().cmp(value))
            .ok()
    }

    fn encode_into(&self, record: &ListingRecord, out: &mut Vec<f64>) {
        let start = out.len();
        out.resize(start + self.vocabulary.len(), 0.0);
        if let Some(i) = self.position(&self.resolve(record)) {
            out[start + i] = 1.0;
        }
    }
}

/// Fitted transform state. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedTransform {
    schema: ColumnSchema,
    numeric: Vec<NumericColumn>,
    categorical: Vec<CategoricalColumn>,
}

impl FittedTransform {
    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    pub fn numeric_columns(&self) -> &[NumericColumn] {
        &self.numeric
    }

    pub fn categorical_columns(&self) -> &[CategoricalColumn] {
        &self.categorical
    }

    /// Number of output features per record.
    pub fn width(&self) -> usize {
        self.numeric.len()
            + self
                .categorical
                .iter()
                .map(|c| c.vocabulary.len())
                .sum::<usize>()
    }

    /// Output column names, `column=category` for one-hot indicators.
    pub fn feature_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.numeric.iter().map(|c| c.name.clone()).collect();
        for column in &self.categorical {
            for category in &column.vocabulary {
                names.push(format!("{}={}", column.name, category));
            }
        }
        names
    }

    pub fn transform_one(&self, record: &ListingRecord) -> Vec<f64> {
        let mut row = Vec::with_capacity(self.width());
        row.extend(self.numeric.iter().map(|c| c.encode(record)));
        for column in &self.categorical {
            column.encode_into(record, &mut row);
        }
        row
    }

    /// Row-major feature matrix, one row per record in input order.
    pub fn apply(&self, records: &[ListingRecord]) -> Vec<Vec<f64>> {
        records.iter().map(|r| self.transform_one(r)).collect()
    }

    /// Categorical columns whose value in `record` was never seen at fit time.
    pub fn unseen_columns<'a>(&'a self, record: &ListingRecord) -> Vec<&'a str> {
        self.categorical
            .iter()
            .filter(|c| c.position(&c.resolve(record)).is_none())
            .map(|c| c.name.as_str())
            .collect()
    }
}

/// Median of a non-empty slice; averages the middle pair for even lengths.
fn median(values: &mut [f64]) -> f64 {
    values.sort_unstable_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}
