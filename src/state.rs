// src/state.rs
use crate::config::{ReadinessPolicy, ServiceConfig};
use crate::db::{init_db, Database, ModelStore};
use crate::errors::ServerError;
use crate::handle::ModelHandle;
use crate::model::{BoostingParams, PricePredictor};
use crate::training::TrainingJob;
use std::sync::Arc;
use tracing::{info, warn};

/// Everything a request handler needs, built once at startup.
pub struct AppState {
    pub config: ServiceConfig,
    pub store: ModelStore,
    pub model: ModelHandle,
    pub params: BoostingParams,
}

impl AppState {
    /// Open the database and load the latest artifact, if one exists.
    pub fn new(config: ServiceConfig) -> Result<Self, ServerError> {
        let db = Database::new(config.db_path.clone());
        init_db(&db)?;
        let store = ModelStore::new(db);

        let model = match store.load_latest()? {
            Some(predictor) => {
                info!("model artifact loaded at startup");
                ModelHandle::with_model(predictor)
            }
            None => {
                warn!(policy = ?config.readiness_policy, "no model artifact found at startup");
                ModelHandle::empty()
            }
        };

        Ok(Self {
            config,
            store,
            model,
            params: BoostingParams::default(),
        })
    }

    /// The serving model, applying the readiness policy when none is loaded.
    pub fn predictor(&self) -> Result<Arc<PricePredictor>, ServerError> {
        if let Some(model) = self.model.current()? {
            return Ok(model);
        }

        match self.config.readiness_policy {
            ReadinessPolicy::Reject => self.model.get_or_load(|| self.load_stored()),
            ReadinessPolicy::Train => self.model.get_or_load(|| self.load_or_train()),
        }
    }

    /// Pick up an artifact written since startup, e.g. by the `train` binary.
    /// Never trains.
    fn load_stored(&self) -> Result<PricePredictor, ServerError> {
        self.store
            .load_latest()?
            .ok_or_else(|| ServerError::ModelNotReady("no model has been trained yet".into()))
    }

    /// Prefer an artifact stored by another process; otherwise train now.
    fn load_or_train(&self) -> Result<PricePredictor, ServerError> {
        if let Some(predictor) = self.store.load_latest()? {
            return Ok(predictor);
        }

        warn!(data = %self.config.data_path.display(), "training model on demand");
        let job = TrainingJob::new(self.params.clone());
        let (predictor, _report) = job.run_from_path(&self.config.data_path, &self.store)?;
        Ok(predictor)
    }
}
