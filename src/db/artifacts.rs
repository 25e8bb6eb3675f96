// src/db/artifacts.rs
use crate::db::connection::Database;
use crate::errors::ServerError;
use crate::model::{ModelError, PricePredictor};
use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use sha2::{Digest, Sha256};
use tracing::info;

/// Bookkeeping for a stored predictor, without the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactMeta {
    pub id: i64,
    pub created_at: i64,
    pub rows: i64,
    pub features: i64,
    pub checksum: String,
}

/// Durable storage for fitted predictors.
///
/// Each `save` replaces every earlier artifact in one transaction, so a
/// reader sees either the previous model or the new one, never a mix.
#[derive(Debug, Clone)]
pub struct ModelStore {
    db: Database,
}

impl ModelStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Serialize and store a fitted predictor. Returns the artifact id.
    pub fn save(&self, predictor: &PricePredictor, rows: usize) -> Result<i64, ServerError> {
        let features = predictor.feature_width().ok_or(ModelError::NotFitted)?;
        let payload = serde_json::to_vec(predictor)
            .map_err(|e| ModelError::Artifact(format!("serialize failed: {e}")))?;
        let checksum = checksum_hex(&payload);
        let now = Utc::now().timestamp();

        let id = self.db.with_conn(|conn| {
            let tx = conn
                .transaction()
                .map_err(|e| ServerError::DbError(e.to_string()))?;

            tx.execute("DELETE FROM model_artifacts", [])
                .map_err(|e| ServerError::DbError(format!("clear artifacts failed: {e}")))?;

            tx.execute(
                "INSERT INTO model_artifacts (created_at, rows, features, checksum, payload) VALUES (?, ?, ?, ?, ?)",
                params![now, rows as i64, features as i64, checksum, payload],
            )
            .map_err(|e| ServerError::DbError(format!("insert artifact failed: {e}")))?;
            let id = tx.last_insert_rowid();

            tx.commit()
                .map_err(|e| ServerError::DbError(e.to_string()))?;
            Ok(id)
        })?;

        info!(id, rows, features, checksum = %checksum, "model artifact saved");
        Ok(id)
    }

    /// Load a specific artifact by id.
    pub fn load(&self, id: i64) -> Result<PricePredictor, ServerError> {
        let row = self.db.with_conn(|conn| {
            conn.query_row(
                "SELECT checksum, payload FROM model_artifacts WHERE id = ?",
                params![id],
                |r| Ok((r.get::<_, String>(0)?, r.get::<_, Vec<u8>>(1)?)),
            )
            .optional()
            .map_err(|e| ServerError::DbError(format!("load artifact failed: {e}")))
        })?;

        let (checksum, payload) = row.ok_or(ServerError::NotFound)?;
        decode(&checksum, &payload)
    }

    /// The current artifact, if any training run has completed.
    pub fn load_latest(&self) -> Result<Option<PricePredictor>, ServerError> {
        match self.latest_meta()? {
            Some(meta) => self.load(meta.id).map(Some),
            None => Ok(None),
        }
    }

    pub fn latest_meta(&self) -> Result<Option<ArtifactMeta>, ServerError> {
        self.db.with_conn(|conn| {
            conn.query_row(
                "SELECT id, created_at, rows, features, checksum FROM model_artifacts ORDER BY id DESC LIMIT 1",
                [],
                |r| {
                    Ok(ArtifactMeta {
                        id: r.get(0)?,
                        created_at: r.get(1)?,
                        rows: r.get(2)?,
                        features: r.get(3)?,
                        checksum: r.get(4)?,
                    })
                },
            )
            .optional()
            .map_err(|e| ServerError::DbError(format!("artifact lookup failed: {e}")))
        })
    }
}

fn decode(checksum: &str, payload: &[u8]) -> Result<PricePredictor, ServerError> {
    if checksum_hex(payload) != checksum {
        return Err(ModelError::Artifact("checksum mismatch".into()).into());
    }

    let predictor: PricePredictor = serde_json::from_slice(payload)
        .map_err(|e| ModelError::Artifact(format!("deserialize failed: {e}")))?;
    if !predictor.is_fitted() {
        return Err(ModelError::Artifact("stored predictor is not fitted".into()).into());
    }
    Ok(predictor)
}

fn checksum_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_is_lowercase_hex_sha256() {
        assert_eq!(
            checksum_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn unfitted_payload_is_rejected() {
        let payload = serde_json::to_vec(&PricePredictor::new()).unwrap();
        let err = decode(&checksum_hex(&payload), &payload).unwrap_err();
        assert!(matches!(err, ServerError::ModelError(_)));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let payload = serde_json::to_vec(&PricePredictor::new()).unwrap();
        let err = decode("0000", &payload).unwrap_err();
        assert!(err.to_string().contains("checksum mismatch"));
    }
}
