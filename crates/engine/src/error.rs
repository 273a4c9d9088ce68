//! Errors surfaced to callers of the recommender.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EngineError {
    /// The query title is not in the catalog
    #[error("Title '{title}' not found in catalog")]
    NotFound { title: String },

    /// Asked for zero recommendations
    #[error("top_k must be at least 1, got {0}")]
    InvalidTopK(usize),
}

pub type Result<T> = std::result::Result<T, EngineError>;
