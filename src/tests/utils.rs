use crate::config::{ReadinessPolicy, ServiceConfig};
use crate::model::{BoostingParams, ListingRecord};
use crate::state::AppState;
use astra::Response;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::TempDir;

const CITIES: [&str; 3] = ["NYC", "LA", "Boston"];
const ROOMS: [&str; 3] = ["Entire home/apt", "Private room", "Shared room"];

/// Small, fast boosting parameters for tests.
pub fn test_params() -> BoostingParams {
    BoostingParams {
        n_estimators: 20,
        ..BoostingParams::default()
    }
}

/// Deterministic listings whose log price grows with capacity and drops
/// for shared rooms. Every declared column is observed at least once.
pub fn sample_records(n: usize) -> (Vec<ListingRecord>, Vec<f64>) {
    let mut records = Vec::with_capacity(n);
    let mut targets = Vec::with_capacity(n);

    for i in 0..n {
        let accommodates = (i % 6 + 1) as f64;
        let room = ROOMS[i % ROOMS.len()];
        let record = ListingRecord::new()
            .with_number("accommodates", accommodates)
            .with_number("bathrooms", (i % 3 + 1) as f64 * 0.5)
            .with_number("latitude", 40.0 + (i % 10) as f64 * 0.01)
            .with_number("longitude", -73.9 - (i % 7) as f64 * 0.01)
            .with_number("number_of_reviews", (i * 3 % 50) as f64)
            .with_number("review_scores_rating", 80.0 + (i % 20) as f64)
            .with_number("bedrooms", (i % 4) as f64)
            .with_number("beds", (i % 4 + 1) as f64)
            .with_text("property_type", if i % 2 == 0 { "Apartment" } else { "House" })
            .with_text("room_type", room)
            .with_text("amenities", if i % 2 == 0 { "Kitchen;Wifi" } else { "Wifi" })
            .with_text("bed_type", "Real Bed")
            .with_text("cancellation_policy", if i % 3 == 0 { "strict" } else { "flexible" })
            .with_text("cleaning_fee", if i % 2 == 0 { "True" } else { "False" })
            .with_text("city", CITIES[i % CITIES.len()])
            .with_text("host_has_profile_pic", "t")
            .with_text("host_identity_verified", if i % 4 == 0 { "f" } else { "t" })
            .with_text("host_response_rate", "100%")
            .with_text("instant_bookable", if i % 5 == 0 { "t" } else { "f" });

        let shared_discount = if room == "Shared room" { 0.8 } else { 0.0 };
        records.push(record);
        targets.push(4.0 + 0.25 * accommodates - shared_discount);
    }
    (records, targets)
}

/// The same listings as a headered CSV, as the training job reads them.
pub fn write_sample_csv(path: &Path, n: usize) {
    let mut file = std::fs::File::create(path).unwrap();
    writeln!(
        file,
        "id,log_price,accommodates,bathrooms,latitude,longitude,number_of_reviews,\
review_scores_rating,bedrooms,beds,property_type,room_type,amenities,bed_type,\
cancellation_policy,cleaning_fee,city,host_has_profile_pic,host_identity_verified,\
host_response_rate,instant_bookable,description"
    )
    .unwrap();

    let (records, targets) = sample_records(n);
    for (i, (record, target)) in records.iter().zip(&targets).enumerate() {
        let cell = |col: &str| record.category(col).map(|c| c.into_owned()).unwrap_or_default();
        writeln!(
            file,
            "{i},{target},{},{},{},{},{},{},{},{},{},{},\"{{{}}}\",{},{},{},{},{},{},{},{},\"free text, with a comma\"",
            cell("accommodates"),
            cell("bathrooms"),
            cell("latitude"),
            cell("longitude"),
            cell("number_of_reviews"),
            cell("review_scores_rating"),
            cell("bedrooms"),
            cell("beds"),
            cell("property_type"),
            cell("room_type"),
            cell("amenities").replace(';', ","),
            cell("bed_type"),
            cell("cancellation_policy"),
            cell("cleaning_fee"),
            cell("city"),
            cell("host_has_profile_pic"),
            cell("host_identity_verified"),
            cell("host_response_rate"),
            cell("instant_bookable"),
        )
        .unwrap();
    }
}

/// App state backed by a fresh database in its own temp directory. Keep the
/// `TempDir` alive for the duration of the test.
pub fn test_state(policy: ReadinessPolicy) -> (TempDir, AppState) {
    let dir = TempDir::new().unwrap();
    let config = ServiceConfig {
        db_path: dir.path().join("test.sqlite3").to_string_lossy().into_owned(),
        data_path: dir.path().join("raw_data.csv"),
        readiness_policy: policy,
        ..ServiceConfig::default()
    };
    let mut state = AppState::new(config).unwrap_or_else(|e| panic!("state setup failed: {e}"));
    state.params = test_params();
    (dir, state)
}

/// A state whose model has already been trained and stored.
pub fn trained_state() -> (TempDir, AppState) {
    let (dir, state) = test_state(ReadinessPolicy::Reject);
    write_sample_csv(&state.config.data_path, 60);

    let (predictor, _) = crate::training::TrainingJob::new(test_params())
        .run_from_path(&state.config.data_path, &state.store)
        .unwrap();
    state.model.replace(predictor).unwrap();
    (dir, state)
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}
