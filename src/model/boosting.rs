// src/model/boosting.rs

//! Gradient-boosted regression trees, backed by the `gbdt` crate.
//!
//! `BoostingParams` maps onto a squared-error `gbdt::config::Config`. The
//! crate's own per-tree row and feature sampling is switched off because it
//! draws from an unseeded RNG; `subsample` instead picks the training rows
//! once from a seeded RNG, so a fixed seed always reproduces the same model.

use crate::model::error::ModelError;
use gbdt::config::Config;
use gbdt::decision_tree::{Data, DataVec, ValueType};
use gbdt::gradient_boost::GBDT;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// A learner: trains on a dense feature matrix and hands back a model.
///
/// The learner itself holds only configuration, so one instance can be
/// fitted any number of times.
pub trait Regressor {
    type Model: FittedRegressor + fmt::Debug + Serialize + DeserializeOwned;

    fn fit(&self, x: &[Vec<f64>], y: &[f64]) -> Result<Self::Model, ModelError>;
}

/// A trained model.
pub trait FittedRegressor {
    fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>, ModelError>;
}

/// Boosting hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostingParams {
    /// Number of boosting stages (trees)
    pub n_estimators: usize,
    /// Shrinkage applied to every tree's contribution
    pub learning_rate: f64,
    /// Maximum depth of each tree
    pub max_depth: usize,
    /// Minimum samples required in a leaf node
    pub min_samples_leaf: usize,
    /// Fraction of rows used for training, drawn once
    pub subsample: f64,
    /// Random seed for reproducibility
    pub seed: u64,
}

impl Default for BoostingParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            learning_rate: 0.1,
            max_depth: 3,
            min_samples_leaf: 1,
            subsample: 1.0,
            seed: 42,
        }
    }
}

/// Squared-error gradient boosting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GradientBoostingRegressor {
    params: BoostingParams,
}

impl GradientBoostingRegressor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: BoostingParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &BoostingParams {
        &self.params
    }

    fn config(&self, n_features: usize) -> Config {
        let mut cfg = Config::new();
        cfg.set_feature_size(n_features);
        cfg.set_max_depth(self.params.max_depth as _);
        cfg.set_iterations(self.params.n_estimators);
        cfg.set_shrinkage(self.params.learning_rate as _);
        cfg.set_min_leaf_size(self.params.min_samples_leaf.max(1));
        cfg.set_loss("SquaredError");
        cfg.set_data_sample_ratio(1.0);
        cfg.set_feature_sample_ratio(1.0);
        cfg.set_training_optimization_level(2);
        cfg.set_debug(false);
        cfg
    }

    fn sample_rows(&self, n: usize) -> Vec<usize> {
        if self.params.subsample >= 1.0 {
            return (0..n).collect();
        }
        let k = ((n as f64 * self.params.subsample).round() as usize).clamp(1, n);
        let mut rng = StdRng::seed_from_u64(self.params.seed);
        let mut rows = rand::seq::index::sample(&mut rng, n, k).into_vec();
        rows.sort_unstable();
        rows
    }
}

fn to_features(row: &[f64]) -> Vec<ValueType> {
    row.iter().map(|&v| v as ValueType).collect()
}

fn check_width(x: &[Vec<f64>], expected: usize) -> Result<(), ModelError> {
    match x.iter().find(|row| row.len() != expected) {
        Some(row) => Err(ModelError::FeatureWidth {
            expected,
            actual: row.len(),
        }),
        None => Ok(()),
    }
}

impl Regressor for GradientBoostingRegressor {
    type Model = BoostedTrees;

    fn fit(&self, x: &[Vec<f64>], y: &[f64]) -> Result<BoostedTrees, ModelError> {
        if x.len() != y.len() {
            return Err(ModelError::LengthMismatch {
                records: x.len(),
                targets: y.len(),
            });
        }
        if x.is_empty() {
            return Err(ModelError::EmptyDataset);
        }
        let n_features = x[0].len();
        if n_features == 0 {
            return Err(ModelError::FeatureWidth {
                expected: 1,
                actual: 0,
            });
        }
        check_width(x, n_features)?;

        let rows = self.sample_rows(x.len());
        let mut training: DataVec = rows
            .iter()
            .map(|&i| Data::new_training_data(to_features(&x[i]), 1.0, y[i] as ValueType, None))
            .collect();

        debug!(
            rows = training.len(),
            n_features,
            n_estimators = self.params.n_estimators,
            "boosting started"
        );
        let mut model = GBDT::new(&self.config(n_features));
        model.fit(&mut training);

        Ok(BoostedTrees {
            n_features,
            n_estimators: self.params.n_estimators,
            model,
        })
    }
}

/// A fitted ensemble plus the feature width it was trained on.
#[derive(Serialize, Deserialize)]
pub struct BoostedTrees {
    n_features: usize,
    n_estimators: usize,
    model: GBDT,
}

impl BoostedTrees {
    pub fn n_features(&self) -> usize {
        self.n_features
    }
}

impl fmt::Debug for BoostedTrees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoostedTrees")
            .field("n_features", &self.n_features)
            .field("n_estimators", &self.n_estimators)
            .finish_non_exhaustive()
    }
}

impl FittedRegressor for BoostedTrees {
    fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>, ModelError> {
        check_width(x, self.n_features)?;
        if x.is_empty() {
            return Ok(Vec::new());
        }

        let rows: DataVec = x
            .iter()
            .map(|row| Data::new_test_data(to_features(row), None))
            .collect();
        Ok(self
            .model
            .predict(&rows)
            .into_iter()
            .map(f64::from)
            .collect())
    }
}
