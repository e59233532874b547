use thiserror::Error;

/// Errors surfaced by a [`Core`](crate::sink::Core).
#[derive(Error, Debug)]
pub enum SinkError {
    /// The bound fields could not be encoded; the entry was dropped.
    #[error("Unable to parse json for coreFields: {0}")]
    Serialization(#[from] serde_json::Error),
}
