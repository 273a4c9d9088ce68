//! Metadata client for enriching catalog items.
//!
//! The recommendation engine only knows ids, titles and similarity scores.
//! Everything it says about *why* an item was recommended comes from an
//! external metadata service, reached through the `MetadataProvider` trait:
//! - `TmdbProvider` talks to The Movie Database over HTTP
//! - `CachedProvider` wraps any provider and memoizes successful lookups
//!
//! Providers absorb their own failures. A timeout, a 404 or a garbled body
//! is logged and surfaces as `None`, never as an error.

pub mod cache;
pub mod error;
pub mod tmdb;

use async_trait::async_trait;
use data_loader::ItemId;
use serde::{Deserialize, Serialize};

pub use cache::CachedProvider;
pub use error::{MetadataError, Result};
pub use tmdb::{ProviderConfig, TmdbProvider};

/// Maximum number of cast members kept per item
pub const MAX_CAST: usize = 5;

/// Enriched, per-item descriptive data.
///
/// Every field may be empty. Explanation signals check for presence
/// themselves, so partial metadata degrades one signal at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemMetadata {
    pub id: ItemId,
    pub title: String,
    /// Genres, in provider order
    pub categories: Vec<String>,
    /// Free-text overview
    pub description: String,
    /// Director
    pub lead_contributor: Option<String>,
    /// Top-billed cast, at most `MAX_CAST` names
    pub cast: Vec<String>,
}

impl ItemMetadata {
    pub fn new(id: ItemId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_lead_contributor(mut self, name: impl Into<String>) -> Self {
        self.lead_contributor = Some(name.into());
        self
    }

    /// Set the cast, keeping only the first `MAX_CAST` names
    pub fn with_cast<I, S>(mut self, cast: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cast = cast.into_iter().take(MAX_CAST).map(Into::into).collect();
        self
    }
}

/// Source of per-item metadata and artwork.
///
/// ## Design Note
/// - `Send + Sync` so one provider can be shared by concurrent lookups
/// - Methods return `Option`: absence means "no metadata available",
///   whatever the underlying reason
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch descriptive metadata for an item
    async fn get_details(&self, id: ItemId) -> Option<ItemMetadata>;

    /// Fetch a displayable poster URL for an item
    async fn get_poster_url(&self, id: ItemId) -> Option<String>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}
