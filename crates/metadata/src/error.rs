//! Errors raised while talking to a metadata service.
//!
//! These never escape a `MetadataProvider`: the trait methods log them and
//! return `None`, so one failed lookup only blanks that item's metadata.

use data_loader::ItemId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    /// The service does not know this id
    #[error("No metadata for item {id}")]
    NotFound { id: ItemId },

    /// Network error, timeout or non-success status
    #[error("Metadata provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The service answered but the body could not be decoded
    #[error("Invalid response from metadata provider: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for MetadataError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            MetadataError::InvalidResponse(err.to_string())
        } else {
            MetadataError::ProviderUnavailable(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, MetadataError>;
