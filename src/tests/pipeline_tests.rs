// End-to-end checks of the model pipeline: fit, predict, store, retrain.

use crate::config::ReadinessPolicy;
use crate::db::{Database, ModelStore};
use crate::model::{ListingRecord, ModelError, PricePredictor, DEFAULT_MAX_CATEGORIES};
use crate::tests::utils::{sample_records, test_params, test_state, write_sample_csv};
use crate::training::{TrainingError, TrainingJob};
use std::time::{Duration, Instant};

fn fitted() -> PricePredictor {
    let (records, targets) = sample_records(60);
    let mut predictor = PricePredictor::with_params(test_params());
    predictor.fit(&records, &targets).unwrap();
    predictor
}

#[test]
fn same_seed_gives_identical_predictions() {
    let (records, _) = sample_records(60);
    let first = fitted().predict(&records).unwrap();
    let second = fitted().predict(&records).unwrap();
    assert_eq!(first, second);
}

#[test]
fn unseen_categories_still_predict() {
    let predictor = fitted();
    let (records, _) = sample_records(1);
    let odd = records[0]
        .clone()
        .with_text("city", "Atlantis")
        .with_text("property_type", "Treehouse")
        .with_text("amenities", "Moat");

    let out = predictor.predict(&[odd]).unwrap();
    assert_eq!(out.len(), 1);
    assert!(out[0].is_finite());
}

#[test]
fn all_missing_record_predicts_from_imputed_values() {
    let predictor = fitted();
    let out = predictor.predict(&[ListingRecord::new()]).unwrap();
    assert!(out[0].is_finite());
}

#[test]
fn batch_predictions_keep_row_order() {
    let predictor = fitted();
    let (records, _) = sample_records(3);

    let batch = predictor.predict(&records).unwrap();
    let singles: Vec<f64> = records
        .iter()
        .map(|r| predictor.predict(std::slice::from_ref(r)).unwrap()[0])
        .collect();
    assert_eq!(batch, singles);
}

#[test]
fn larger_listings_are_predicted_pricier() {
    let predictor = fitted();
    let (records, _) = sample_records(6);
    // Row 0 sleeps one, row 3 sleeps four; neither is a shared room.
    let out = predictor.predict(&[records[0].clone(), records[3].clone()]).unwrap();
    assert!(out[1] > out[0], "{out:?}");
}

#[test]
fn column_never_observed_fails_and_stores_nothing() {
    let (_dir, state) = test_state(ReadinessPolicy::Reject);
    let (mut records, targets) = sample_records(30);
    for record in &mut records {
        record.remove("beds");
    }

    let dataset = crate::training::Dataset {
        records,
        targets: targets.into_iter().map(Some).collect(),
    };
    let err = TrainingJob::new(test_params())
        .run(dataset, &state.store)
        .unwrap_err();

    assert!(matches!(
        err,
        TrainingError::Model(ModelError::SchemaMismatch { ref column }) if column == "beds"
    ));
    assert!(state.store.latest_meta().unwrap().is_none());
}

#[test]
fn stored_model_predicts_like_the_trained_one() {
    let (_dir, state) = test_state(ReadinessPolicy::Reject);
    write_sample_csv(&state.config.data_path, 60);

    let (trained, report) = TrainingJob::new(test_params())
        .run_from_path(&state.config.data_path, &state.store)
        .unwrap();
    assert_eq!(report.rows, 60);
    assert!(report.train_rmse.is_finite());

    let loaded = state.store.load_latest().unwrap().expect("artifact stored");
    assert_eq!(trained.transform(), loaded.transform());

    let (records, _) = sample_records(60);
    assert_eq!(
        trained.predict(&records).unwrap(),
        loaded.predict(&records).unwrap()
    );
}

#[test]
fn retraining_replaces_the_artifact() {
    let (_dir, state) = test_state(ReadinessPolicy::Reject);
    write_sample_csv(&state.config.data_path, 40);
    let job = TrainingJob::new(test_params());

    let (_, first) = job.run_from_path(&state.config.data_path, &state.store).unwrap();
    let (_, second) = job.run_from_path(&state.config.data_path, &state.store).unwrap();

    let meta = state.store.latest_meta().unwrap().unwrap();
    assert_eq!(meta.id, second.artifact_id);
    assert!(matches!(
        state.store.load(first.artifact_id),
        Err(crate::errors::ServerError::NotFound)
    ));
}

#[test]
fn on_demand_training_runs_once_and_serves() {
    let (_dir, state) = test_state(ReadinessPolicy::Train);
    write_sample_csv(&state.config.data_path, 40);
    assert!(!state.model.is_loaded());

    let first = state.predictor().unwrap();
    let second = state.predictor().unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert!(state.store.latest_meta().unwrap().is_some());
}

#[test]
fn reject_policy_picks_up_a_model_stored_after_startup() {
    let (_dir, state) = test_state(ReadinessPolicy::Reject);
    assert!(state.predictor().is_err());

    // A separate training run writes to the same database file.
    write_sample_csv(&state.config.data_path, 40);
    let other = ModelStore::new(Database::new(state.config.db_path.clone()));
    TrainingJob::new(test_params())
        .run_from_path(&state.config.data_path, &other)
        .unwrap();

    let model = state.predictor().unwrap();
    assert!(model.is_fitted());
    assert!(state.model.is_loaded());
}

#[test]
fn unique_amenities_keep_training_bounded() {
    let (mut records, targets) = sample_records(2_000);
    for (i, record) in records.iter_mut().enumerate() {
        record.set_text("amenities", Some(format!("Kitchen;Wifi;Extra {i}")));
    }

    let started = Instant::now();
    let mut predictor = PricePredictor::with_params(crate::model::BoostingParams {
        n_estimators: 10,
        ..test_params()
    });
    predictor.fit(&records, &targets).unwrap();
    let elapsed = started.elapsed();

    let transform = predictor.transform().unwrap();
    let amenities = transform
        .categorical_columns()
        .iter()
        .find(|c| c.name == "amenities")
        .unwrap();
    assert_eq!(amenities.vocabulary.len(), DEFAULT_MAX_CATEGORIES);
    // Width no longer grows with the number of rows.
    assert!(transform.width() <= 8 + 11 * DEFAULT_MAX_CATEGORIES);
    assert!(elapsed < Duration::from_secs(60), "training took {elapsed:?}");

    let out = predictor.predict(&records[..5]).unwrap();
    assert!(out.iter().all(|p| p.is_finite()));
}

#[test]
fn reject_policy_reports_not_ready() {
    let (_dir, state) = test_state(ReadinessPolicy::Reject);
    let err = state.predictor().unwrap_err();
    assert_eq!(err.status(), 503);
}
