pub mod artifacts;
pub mod connection;

pub use artifacts::{ArtifactMeta, ModelStore};
pub use connection::{init_db, Database};
