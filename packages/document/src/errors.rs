//! Error types for the document store

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid resume JSON: {0}")]
    Json(#[from] serde_json::Error),
}
