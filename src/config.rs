// src/config.rs
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

/// What to do when a prediction arrives and no model is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessPolicy {
    /// Train synchronously from `data_path` (single-flight), then predict.
    Train,
    /// Load a stored model on demand but never train; answer 503 while
    /// the store is empty.
    Reject,
}

impl FromStr for ReadinessPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "train" => Ok(ReadinessPolicy::Train),
            "reject" => Ok(ReadinessPolicy::Reject),
            other => Err(format!("unknown readiness policy `{other}`")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address the HTTP server binds to.
    pub addr: String,
    /// SQLite file holding the model artifact.
    pub db_path: String,
    /// Historical listings CSV used by training.
    pub data_path: PathBuf,
    pub max_workers: usize,
    pub readiness_policy: ReadinessPolicy,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8000".to_string(),
            db_path: "listing_price.sqlite3".to_string(),
            data_path: PathBuf::from("data/raw_data.csv"),
            max_workers: 8,
            readiness_policy: ReadinessPolicy::Train,
        }
    }
}

impl ServiceConfig {
    /// Defaults overridden by `LISTING_PRICE_*` environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(addr) = env::var("LISTING_PRICE_ADDR") {
            cfg.addr = addr;
        }
        if let Ok(path) = env::var("LISTING_PRICE_DB") {
            cfg.db_path = path;
        }
        if let Ok(path) = env::var("LISTING_PRICE_DATA") {
            cfg.data_path = PathBuf::from(path);
        }
        if let Some(workers) = parsed_var("LISTING_PRICE_WORKERS") {
            cfg.max_workers = workers;
        }
        if let Some(policy) = parsed_var("LISTING_PRICE_ON_MISSING_MODEL") {
            cfg.readiness_policy = policy;
        }

        cfg
    }
}

/// Unparsable values are ignored with a warning, keeping the default.
fn parsed_var<T>(key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env::var(key).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, value = %raw, "ignoring invalid setting: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_train_on_missing_model() {
        let cfg = ServiceConfig::default();
        assert_eq!(cfg.readiness_policy, ReadinessPolicy::Train);
        assert_eq!(cfg.max_workers, 8);
    }

    #[test]
    fn parses_readiness_policy() {
        assert_eq!("train".parse(), Ok(ReadinessPolicy::Train));
        assert_eq!(" Reject ".parse(), Ok(ReadinessPolicy::Reject));
        assert!("maybe".parse::<ReadinessPolicy>().is_err());
    }
}
