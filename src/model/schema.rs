// src/model/schema.rs

use crate::model::error::ModelError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const NUMERIC_COLUMNS: [&str; 8] = [
    "accommodates",
    "bathrooms",
    "latitude",
    "longitude",
    "number_of_reviews",
    "review_scores_rating",
    "bedrooms",
    "beds",
];

pub const CATEGORICAL_COLUMNS: [&str; 11] = [
    "property_type",
    "room_type",
    "amenities",
    "bed_type",
    "cancellation_policy",
    "cleaning_fee",
    "city",
    "host_has_profile_pic",
    "host_identity_verified",
    "host_response_rate",
    "instant_bookable",
];

pub const AMENITIES_COLUMN: &str = "amenities";

/// Label column in the historical data (natural log of the nightly price).
pub const TARGET_COLUMN: &str = "log_price";

/// Identifiers, free text, URLs, dates and raw neighbourhood text.
/// Removed before records reach the predictor.
pub const DROPPED_COLUMNS: [&str; 10] = [
    "id",
    "name",
    "log_price",
    "description",
    "first_review",
    "host_since",
    "last_review",
    "neighbourhood",
    "thumbnail_url",
    "zipcode",
];

/// Ordered declaration of the feature columns.
///
/// Travels inside the fitted model so inference always encodes against the
/// exact column list the model was trained with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    numeric: Vec<String>,
    categorical: Vec<String>,
}

impl ColumnSchema {
    pub fn new<N, C>(numeric: N, categorical: C) -> Result<Self, ModelError>
    where
        N: IntoIterator,
        N::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let numeric: Vec<String> = numeric.into_iter().map(Into::into).collect();
        let categorical: Vec<String> = categorical.into_iter().map(Into::into).collect();

        if numeric.is_empty() {
            return Err(ModelError::InvalidSchema("no numeric columns".into()));
        }
        if categorical.is_empty() {
            return Err(ModelError::InvalidSchema("no categorical columns".into()));
        }

        let mut seen = HashSet::new();
        for name in numeric.iter().chain(categorical.iter()) {
            if !seen.insert(name.as_str()) {
                return Err(ModelError::InvalidSchema(format!(
                    "column `{name}` declared more than once"
                )));
            }
        }

        Ok(Self {
            numeric,
            categorical,
        })
    }

    /// The listing feature set.
    pub fn listing() -> Self {
        Self {
            numeric: NUMERIC_COLUMNS.iter().map(|c| c.to_string()).collect(),
            categorical: CATEGORICAL_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn numeric(&self) -> &[String] {
        &self.numeric
    }

    pub fn categorical(&self) -> &[String] {
        &self.categorical
    }

    pub fn is_numeric(&self, column: &str) -> bool {
        self.numeric.iter().any(|c| c == column)
    }

    pub fn is_declared(&self, column: &str) -> bool {
        self.is_numeric(column) || self.categorical.iter().any(|c| c == column)
    }
}

impl Default for ColumnSchema {
    fn default() -> Self {
        Self::listing()
    }
}
