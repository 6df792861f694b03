// ─── Error ──────────────────────────────────────────────────────────────────
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Can't build a record from a non-object value")]
    NotAnObject,
    #[error("Record payload has no `attributes` block")]
    MissingAttributes,
    #[error("Record `attributes` must be an object")]
    InvalidAttributes,
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CBOR error: {0}")]
    CborError(String),
}
