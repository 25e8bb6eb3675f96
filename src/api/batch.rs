// src/api/batch.rs

//! JSON batch accepted by `POST /predict`.
//!
//! Column-oriented: every declared column maps to a list of optional values,
//! one per row. Absent or `null` columns are missing for every row. Lists of
//! different lengths are rejected here, before any record is built.

use crate::errors::ServerError;
use crate::model::ListingRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictRequest {
    pub accommodates: Option<Vec<Option<f64>>>,
    pub bathrooms: Option<Vec<Option<f64>>>,
    pub latitude: Option<Vec<Option<f64>>>,
    pub longitude: Option<Vec<Option<f64>>>,
    pub number_of_reviews: Option<Vec<Option<f64>>>,
    pub review_scores_rating: Option<Vec<Option<f64>>>,
    pub bedrooms: Option<Vec<Option<f64>>>,
    pub beds: Option<Vec<Option<f64>>>,

    pub property_type: Option<Vec<Option<String>>>,
    pub room_type: Option<Vec<Option<String>>>,
    /// Raw JSON: anything other than a string is treated as missing.
    pub amenities: Option<Vec<serde_json::Value>>,
    pub bed_type: Option<Vec<Option<String>>>,
    pub cancellation_policy: Option<Vec<Option<String>>>,
    pub cleaning_fee: Option<Vec<Option<String>>>,
    pub city: Option<Vec<Option<String>>>,
    pub host_has_profile_pic: Option<Vec<Option<String>>>,
    pub host_identity_verified: Option<Vec<Option<String>>>,
    pub host_response_rate: Option<Vec<Option<String>>>,
    #[serde(alias = "instant_bookabl")]
    pub instant_bookable: Option<Vec<Option<String>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub predictions: Vec<f64>,
}

// Invokes `$m!(field)` for every numeric and categorical text column.
macro_rules! numeric_columns {
    ($m:ident) => {
        $m!(accommodates);
        $m!(bathrooms);
        $m!(latitude);
        $m!(longitude);
        $m!(number_of_reviews);
        $m!(review_scores_rating);
        $m!(bedrooms);
        $m!(beds);
    };
}

macro_rules! text_columns {
    ($m:ident) => {
        $m!(property_type);
        $m!(room_type);
        $m!(bed_type);
        $m!(cancellation_policy);
        $m!(cleaning_fee);
        $m!(city);
        $m!(host_has_profile_pic);
        $m!(host_identity_verified);
        $m!(host_response_rate);
        $m!(instant_bookable);
    };
}

impl PredictRequest {
    /// Common row count of the supplied columns.
    pub fn row_count(&self) -> Result<usize, ServerError> {
        let mut lengths: Vec<(&'static str, usize)> = Vec::new();

        macro_rules! record_len {
            ($field:ident) => {
                if let Some(values) = &self.$field {
                    lengths.push((stringify!($field), values.len()));
                }
            };
        }
        numeric_columns!(record_len);
        text_columns!(record_len);
        record_len!(amenities);

        let Some(&(_, rows)) = lengths.first() else {
            return Err(ServerError::BadRequest("batch has no columns".into()));
        };

        if let Some((column, len)) = lengths.iter().find(|(_, len)| *len != rows) {
            return Err(ServerError::BadRequest(format!(
                "batch shape mismatch: `{}` has {} values, `{}` has {}",
                lengths[0].0, rows, column, len
            )));
        }
        Ok(rows)
    }

    /// Validate the shape and build one record per row, amenities normalized.
    pub fn into_records(self) -> Result<Vec<ListingRecord>, ServerError> {
        let rows = self.row_count()?;
        let mut records = vec![ListingRecord::new(); rows];

        macro_rules! fill_numeric {
            ($field:ident) => {
                if let Some(values) = self.$field {
                    for (record, value) in records.iter_mut().zip(values) {
                        record.set_number(stringify!($field), value);
                    }
                }
            };
        }
        macro_rules! fill_text {
            ($field:ident) => {
                if let Some(values) = self.$field {
                    for (record, value) in records.iter_mut().zip(values) {
                        record.set_text(stringify!($field), value);
                    }
                }
            };
        }
        numeric_columns!(fill_numeric);
        text_columns!(fill_text);

        if let Some(values) = self.amenities {
            for (record, value) in records.iter_mut().zip(values) {
                let text = match value {
                    serde_json::Value::String(s) => Some(s),
                    _ => None,
                };
                record.set_text("amenities", text);
            }
        }

        for record in &mut records {
            record.normalize_amenities();
        }
        Ok(records)
    }
}
