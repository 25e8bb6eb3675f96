pub mod batch;
pub mod form;

pub use batch::{PredictRequest, PredictResponse};
pub use form::ListingForm;
