// src/handle.rs

//! Shared handle to the serving model.
//!
//! Readers clone an `Arc` out of the slot and predict without holding any
//! lock. Loading or training a missing model is single-flight: the first
//! caller runs the loader under `reload`, and everyone else queued on that
//! mutex finds the slot filled when they get in.

use crate::errors::ServerError;
use crate::model::PricePredictor;
use std::sync::{Arc, Mutex, RwLock};
use tracing::info;

#[derive(Debug, Default)]
pub struct ModelHandle {
    current: RwLock<Option<Arc<PricePredictor>>>,
    reload: Mutex<()>,
}

impl ModelHandle {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_model(model: PricePredictor) -> Self {
        Self {
            current: RwLock::new(Some(Arc::new(model))),
            reload: Mutex::new(()),
        }
    }

    pub fn current(&self) -> Result<Option<Arc<PricePredictor>>, ServerError> {
        let slot = self.current.read().map_err(|_| ServerError::InternalError)?;
        Ok(slot.clone())
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.current(), Ok(Some(_)))
    }

    /// Swap in a new model wholesale. In-flight predictions keep the old one.
    pub fn replace(&self, model: PricePredictor) -> Result<(), ServerError> {
        let mut slot = self
            .current
            .write()
            .map_err(|_| ServerError::InternalError)?;
        *slot = Some(Arc::new(model));
        info!("serving model replaced");
        Ok(())
    }

    /// Return the loaded model, running `loader` once if there is none.
    ///
    /// A loader failure leaves the slot empty; the next caller retries.
    pub fn get_or_load<F>(&self, loader: F) -> Result<Arc<PricePredictor>, ServerError>
    where
        F: FnOnce() -> Result<PricePredictor, ServerError>,
    {
        if let Some(model) = self.current()? {
            return Ok(model);
        }

        let _guard = self.reload.lock().map_err(|_| ServerError::InternalError)?;

        // Another caller may have finished loading while we waited.
        if let Some(model) = self.current()? {
            return Ok(model);
        }

        let model = Arc::new(loader()?);
        let mut slot = self
            .current
            .write()
            .map_err(|_| ServerError::InternalError)?;
        *slot = Some(Arc::clone(&model));
        info!("serving model loaded");
        Ok(model)
    }
}
