// src/model/predictor.rs

use crate::model::boosting::{BoostingParams, FittedRegressor, GradientBoostingRegressor, Regressor};
use crate::model::error::ModelError;
use crate::model::record::ListingRecord;
use crate::model::schema::ColumnSchema;
use crate::model::transform::{FeatureTransform, FittedTransform, DEFAULT_MAX_CATEGORIES};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Fitted transform and model, produced together by one `fit`.
#[derive(Debug, Serialize, Deserialize)]
struct Fitted<M> {
    transform: FittedTransform,
    model: M,
}

fn default_max_categories() -> usize {
    DEFAULT_MAX_CATEGORIES
}

/// Feature transform + regression estimator behind one fit/predict contract.
///
/// `estimator` only carries configuration. Every `fit` trains a new model
/// and swaps the fitted pair in only when both stages succeed.
#[derive(Debug, Serialize, Deserialize)]
pub struct PricePredictor<R: Regressor = GradientBoostingRegressor> {
    schema: ColumnSchema,
    estimator: R,
    #[serde(default = "default_max_categories")]
    max_categories: usize,
    fitted: Option<Fitted<R::Model>>,
}

impl PricePredictor<GradientBoostingRegressor> {
    /// Listing schema with the default boosted ensemble.
    pub fn new() -> Self {
        Self::with_params(BoostingParams::default())
    }

    pub fn with_params(params: BoostingParams) -> Self {
        Self::with_estimator(
            ColumnSchema::listing(),
            GradientBoostingRegressor::with_params(params),
        )
    }
}

impl Default for PricePredictor<GradientBoostingRegressor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Regressor> PricePredictor<R> {
    pub fn with_estimator(schema: ColumnSchema, estimator: R) -> Self {
        Self {
            schema,
            estimator,
            max_categories: DEFAULT_MAX_CATEGORIES,
            fitted: None,
        }
    }

    /// Cap on one-hot indicators per categorical column; applies from the
    /// next `fit`.
    pub fn with_max_categories(mut self, max_categories: usize) -> Self {
        self.max_categories = max_categories;
        self
    }

    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Learned transform state, once fitted.
    pub fn transform(&self) -> Option<&FittedTransform> {
        self.fitted.as_ref().map(|f| &f.transform)
    }

    pub fn feature_width(&self) -> Option<usize> {
        self.transform().map(FittedTransform::width)
    }

    pub fn fit(&mut self, records: &[ListingRecord], targets: &[f64]) -> Result<(), ModelError> {
        if records.len() != targets.len() {
            return Err(ModelError::LengthMismatch {
                records: records.len(),
                targets: targets.len(),
            });
        }
        if records.is_empty() {
            return Err(ModelError::EmptyDataset);
        }

        let transform = FeatureTransform::new(self.schema.clone())
            .with_max_categories(self.max_categories)
            .fit(records)?;
        let x = transform.apply(records);
        let model = self.estimator.fit(&x, targets)?;

        info!(
            rows = records.len(),
            features = transform.width(),
            "price predictor fitted"
        );
        self.fitted = Some(Fitted { transform, model });
        Ok(())
    }

    /// One estimate per record, in input order.
    pub fn predict(&self, records: &[ListingRecord]) -> Result<Vec<f64>, ModelError> {
        let fitted = self.fitted.as_ref().ok_or(ModelError::NotFitted)?;

        for (row, record) in records.iter().enumerate() {
            let unseen = fitted.transform.unseen_columns(record);
            if !unseen.is_empty() {
                debug!(row, ?unseen, "categories outside the vocabulary encoded as absent");
            }
        }

        let x = fitted.transform.apply(records);
        fitted.model.predict(&x)
    }
}

/// Root mean squared error between targets and estimates.
pub fn rmse(targets: &[f64], estimates: &[f64]) -> Option<f64> {
    if targets.is_empty() || targets.len() != estimates.len() {
        return None;
    }
    let mse = targets
        .iter()
        .zip(estimates)
        .map(|(t, p)| (t - p).powi(2))
        .sum::<f64>()
        / targets.len() as f64;
    Some(mse.sqrt())
}
