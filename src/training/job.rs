// src/training/job.rs
use crate::db::ModelStore;
use crate::model::{rmse, BoostingParams, ListingRecord, PricePredictor, DEFAULT_MAX_CATEGORIES};
use crate::training::{Dataset, TrainingError};
use std::path::Path;
use tracing::{info, warn};

/// Outcome of one training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    pub artifact_id: i64,
    pub rows: usize,
    pub features: usize,
    /// Labels that were missing and filled with the median.
    pub imputed_targets: usize,
    pub train_rmse: f64,
}

/// Historical data -> cleaned labels -> fitted predictor -> model store.
#[derive(Debug, Clone)]
pub struct TrainingJob {
    params: BoostingParams,
    max_categories: usize,
}

impl Default for TrainingJob {
    fn default() -> Self {
        Self::new(BoostingParams::default())
    }
}

impl TrainingJob {
    pub fn new(params: BoostingParams) -> Self {
        Self {
            params,
            max_categories: DEFAULT_MAX_CATEGORIES,
        }
    }

    pub fn with_max_categories(mut self, max_categories: usize) -> Self {
        self.max_categories = max_categories;
        self
    }

    fn predictor(&self) -> PricePredictor {
        PricePredictor::with_params(self.params.clone()).with_max_categories(self.max_categories)
    }

    pub fn run_from_path(
        &self,
        path: &Path,
        store: &ModelStore,
    ) -> Result<(PricePredictor, TrainingReport), TrainingError> {
        let predictor = self.predictor();
        let dataset = Dataset::from_path(path, predictor.schema())?;
        self.run(dataset, store)
    }

    /// Fit on `dataset` and persist the result. Nothing is stored unless the
    /// fit succeeds.
    pub fn run(
        &self,
        dataset: Dataset,
        store: &ModelStore,
    ) -> Result<(PricePredictor, TrainingReport), TrainingError> {
        let (targets, imputed_targets) = impute_targets(&dataset.targets)?;
        let records = prepare_records(dataset.records);

        info!(
            rows = records.len(),
            imputed_targets,
            n_estimators = self.params.n_estimators,
            "training started"
        );

        let mut predictor = self.predictor();
        predictor.fit(&records, &targets)?;

        let estimates = predictor.predict(&records)?;
        let train_rmse = rmse(&targets, &estimates).unwrap_or(f64::NAN);
        let features = predictor.feature_width().unwrap_or_default();

        let artifact_id = store.save(&predictor, records.len())?;

        let report = TrainingReport {
            artifact_id,
            rows: records.len(),
            features,
            imputed_targets,
            train_rmse,
        };
        info!(?report, "training finished");
        Ok((predictor, report))
    }
}

/// Drop non-predictive columns and canonicalize amenities.
pub fn prepare_records(records: Vec<ListingRecord>) -> Vec<ListingRecord> {
    records
        .into_iter()
        .map(|mut record| {
            record.drop_non_predictive();
            record.normalize_amenities();
            record
        })
        .collect()
}

/// Fill missing labels with the median of the observed labels.
///
/// The median is taken over every observed label before anything is
/// dropped. This keeps every row but changes the supervision signal for the
/// rows it fills, and nothing here guards against that leaking into
/// evaluation.
pub fn impute_targets(targets: &[Option<f64>]) -> Result<(Vec<f64>, usize), TrainingError> {
    let mut observed: Vec<f64> = targets.iter().flatten().copied().collect();
    if observed.is_empty() {
        return Err(TrainingError::NoTargets);
    }

    observed.sort_unstable_by(f64::total_cmp);
    let mid = observed.len() / 2;
    let median = if observed.len() % 2 == 0 {
        (observed[mid - 1] + observed[mid]) / 2.0
    } else {
        observed[mid]
    };

    let missing = targets.len() - observed.len();
    if missing > 0 {
        warn!(missing, median, "missing targets filled with median");
    }

    let filled = targets.iter().map(|t| t.unwrap_or(median)).collect();
    Ok((filled, missing))
}
