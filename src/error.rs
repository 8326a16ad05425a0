//! Error types for ScriptureFlow

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScriptureError {
    #[error("Asset load error: {0}")]
    AssetLoad(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("No verses loaded")]
    EmptyCorpus,

    #[error("Lock error: {0}")]
    Lock(String),

    #[error("Task error: {0}")]
    Task(String),
}

impl From<rusqlite::Error> for ScriptureError {
    fn from(e: rusqlite::Error) -> Self {
        ScriptureError::Database(e.to_string())
    }
}

impl serde::Serialize for ScriptureError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
