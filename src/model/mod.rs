//! Listing price model: amenities normalization, column schema, feature
//! transform and the boosted regressor behind `PricePredictor`.

pub mod amenities;
pub mod boosting;
pub mod error;
pub mod predictor;
pub mod record;
pub mod schema;
pub mod transform;

pub use boosting::{BoostedTrees, BoostingParams, FittedRegressor, GradientBoostingRegressor, Regressor};
pub use error::ModelError;
pub use predictor::{rmse, PricePredictor};
pub use record::{ListingRecord, Value};
pub use schema::ColumnSchema;
pub use transform::{FeatureTransform, FittedTransform, DEFAULT_MAX_CATEGORIES};
