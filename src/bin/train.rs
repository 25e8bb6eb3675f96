//! Offline training: fit the listing price model on a CSV and store it.

use anyhow::Context;
use clap::Parser;
use listing_price::db::{init_db, Database, ModelStore};
use listing_price::model::{BoostingParams, DEFAULT_MAX_CATEGORIES};
use listing_price::training::TrainingJob;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "train", about = "Train the listing price model")]
struct Args {
    /// Historical listings CSV with a `log_price` column.
    #[arg(long, default_value = "data/raw_data.csv")]
    data: PathBuf,

    /// SQLite file the model artifact is written to.
    #[arg(long, default_value = "listing_price.sqlite3")]
    db: String,

    #[arg(long, default_value_t = 100)]
    n_estimators: usize,

    #[arg(long, default_value_t = 0.1)]
    learning_rate: f64,

    #[arg(long, default_value_t = 3)]
    max_depth: usize,

    #[arg(long, default_value_t = 1.0)]
    subsample: f64,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// One-hot indicators kept per categorical column.
    #[arg(long, default_value_t = DEFAULT_MAX_CATEGORIES)]
    max_categories: usize,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let db = Database::new(args.db.clone());
    init_db(&db).context("database initialization failed")?;
    let store = ModelStore::new(db);

    let params = BoostingParams {
        n_estimators: args.n_estimators,
        learning_rate: args.learning_rate,
        max_depth: args.max_depth,
        subsample: args.subsample,
        seed: args.seed,
        ..BoostingParams::default()
    };

    let (_, report) = TrainingJob::new(params)
        .with_max_categories(args.max_categories)
        .run_from_path(&args.data, &store)
        .with_context(|| format!("training on {} failed", args.data.display()))?;

    info!(
        artifact_id = report.artifact_id,
        rows = report.rows,
        features = report.features,
        imputed_targets = report.imputed_targets,
        train_rmse = report.train_rmse,
        db = %args.db,
        "model stored"
    );
    Ok(())
}
