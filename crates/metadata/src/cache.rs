//! Memoizing wrapper around a `MetadataProvider`.
//!
//! Only successful lookups are remembered. A failed lookup returns `None`
//! and is retried on the next request.

use std::collections::HashMap;

use async_trait::async_trait;
use data_loader::ItemId;
use tokio::sync::RwLock;
use tracing::debug;

use crate::{ItemMetadata, MetadataProvider};

pub struct CachedProvider<P> {
    inner: P,
    details: RwLock<HashMap<ItemId, ItemMetadata>>,
    posters: RwLock<HashMap<ItemId, String>>,
}

impl<P: MetadataProvider> CachedProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            details: RwLock::new(HashMap::new()),
            posters: RwLock::new(HashMap::new()),
        }
    }

    /// Borrow the wrapped provider
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Number of cached (details, posters)
    pub async fn cached_counts(&self) -> (usize, usize) {
        (self.details.read().await.len(), self.posters.read().await.len())
    }
}

#[async_trait]
impl<P: MetadataProvider> MetadataProvider for CachedProvider<P> {
    async fn get_details(&self, id: ItemId) -> Option<ItemMetadata> {
        if let Some(hit) = self.details.read().await.get(&id) {
            debug!(item_id = id, "Metadata cache hit");
            return Some(hit.clone());
        }

        // Concurrent misses for the same id may both fetch; last write wins
        let metadata = self.inner.get_details(id).await?;
        self.details.write().await.insert(id, metadata.clone());
        Some(metadata)
    }

    async fn get_poster_url(&self, id: ItemId) -> Option<String> {
        if let Some(hit) = self.posters.read().await.get(&id) {
            return Some(hit.clone());
        }

        let url = self.inner.get_poster_url(id).await?;
        self.posters.write().await.insert(id, url.clone());
        Some(url)
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
