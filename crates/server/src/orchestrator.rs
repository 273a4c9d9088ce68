//! # Recommendation Orchestrator
//!
//! This module wires the engine to the metadata provider:
//! 1. Rank neighbors of the selected item (in memory)
//! 2. Fetch metadata for the base item once
//! 3. Fetch metadata and posters for every neighbor concurrently
//! 4. Explain each neighbor against the base item
//!
//! Metadata lookups are isolated per item. A failed, slow or panicking
//! lookup blanks that one item's explanation or poster and nothing else.
//! Only structural problems (unknown title, `top_k == 0`) are errors.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use data_loader::{Dataset, Item, ItemId};
use engine::{EngineError, ExplanationGenerator, Neighbor, Recommender};
use metadata::{ItemMetadata, MetadataProvider};

/// Default bound on concurrent metadata lookups per request
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Default per-lookup timeout
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Final recommendation returned to the presentation layer
#[derive(Debug, Clone)]
pub struct Recommendation {
    pub item: Item,
    /// 1-based position in the ranking
    pub rank: usize,
    pub score: f32,
    /// Empty when metadata for either item was unavailable
    pub explanation: String,
    pub poster_url: Option<String>,
}

/// Everything shown for the currently selected item
#[derive(Debug, Clone)]
pub struct ItemPreview {
    pub item: Item,
    pub poster_url: Option<String>,
    pub metadata: Option<ItemMetadata>,
}

/// Main orchestrator that coordinates recommendation and explanation
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    dataset: Arc<Dataset>,
    recommender: Recommender,
    generator: ExplanationGenerator,
    provider: Arc<dyn MetadataProvider>,
    limiter: Arc<Semaphore>,
    lookup_timeout: Duration,
}

impl RecommendationOrchestrator {
    /// Create an orchestrator over a loaded dataset and a metadata provider
    pub fn new(dataset: Arc<Dataset>, provider: Arc<dyn MetadataProvider>) -> Self {
        Self {
            recommender: Recommender::new(dataset.clone()),
            dataset,
            generator: ExplanationGenerator::new(),
            provider,
            limiter: Arc::new(Semaphore::new(DEFAULT_CONCURRENCY)),
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    /// Bound the number of metadata lookups in flight (default: 8, minimum 1)
    pub fn with_concurrency(mut self, max_in_flight: usize) -> Self {
        self.limiter = Arc::new(Semaphore::new(max_in_flight.max(1)));
        self
    }

    /// Give up on a single lookup after `timeout` (default: 10s)
    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    pub fn with_generator(mut self, generator: ExplanationGenerator) -> Self {
        self.generator = generator;
        self
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Rank the `top_k` items most similar to `title`
    pub fn recommend(&self, title: &str, top_k: usize) -> Result<Vec<Neighbor>> {
        Ok(self.recommender.recommend(title, top_k)?)
    }

    /// Explain each candidate against the base item.
    ///
    /// Always returns one string per candidate, in input order. A string is
    /// empty when the base item or that candidate has no metadata.
    pub async fn explain_batch(&self, base_title: &str, candidate_titles: &[String]) -> Vec<String> {
        let start = Instant::now();
        let empty = || vec![String::new(); candidate_titles.len()];

        let Some(base_item) = self.dataset.catalog.get_by_title(base_title) else {
            warn!("Base title '{}' not in catalog, skipping explanations", base_title);
            return empty();
        };
        let Some(base_metadata) = self.lookup(self.provider.get_details(base_item.id)).await else {
            warn!("No metadata for base item {}, skipping explanations", base_item.id);
            return empty();
        };

        let ids: Vec<Option<ItemId>> = candidate_titles
            .iter()
            .map(|title| {
                let id = self.dataset.catalog.get_by_title(title).map(|item| item.id);
                if id.is_none() {
                    debug!("Candidate title '{}' not in catalog", title);
                }
                id
            })
            .collect();

        let details = self
            .fan_out(ids, |provider, id| async move { provider.get_details(id).await })
            .await;

        let explanations: Vec<String> = details
            .iter()
            .map(|candidate| match candidate {
                Some(candidate) => self.generator.explain(&base_metadata, candidate),
                None => String::new(),
            })
            .collect();

        info!(
            "Explained {} of {} candidates for '{}' in {:.2?}",
            explanations.iter().filter(|e| !e.is_empty()).count(),
            explanations.len(),
            base_title,
            start.elapsed()
        );
        explanations
    }

    /// Rank, explain and attach posters in one request
    pub async fn recommend_with_explanations(
        &self,
        title: &str,
        top_k: usize,
    ) -> Result<Vec<Recommendation>> {
        let start = Instant::now();

        let neighbors = self.recommend(title, top_k)?;
        info!("Ranked {} neighbors for '{}'", neighbors.len(), title);

        let titles: Vec<String> = neighbors.iter().map(|n| n.title.clone()).collect();
        let ids: Vec<Option<ItemId>> = neighbors.iter().map(|n| Some(n.item_id)).collect();

        let (explanations, posters) = tokio::join!(
            self.explain_batch(title, &titles),
            self.fan_out(ids, |provider, id| async move { provider.get_poster_url(id).await }),
        );

        let recommendations: Vec<Recommendation> = neighbors
            .into_iter()
            .zip(explanations)
            .zip(posters)
            .enumerate()
            .map(|(idx, ((neighbor, explanation), poster_url))| Recommendation {
                item: Item {
                    id: neighbor.item_id,
                    title: neighbor.title,
                    row_index: neighbor.row_index,
                },
                rank: idx + 1,
                score: neighbor.score,
                explanation,
                poster_url,
            })
            .collect();

        info!(
            "Total time to recommend for '{}': {:.2?}",
            title,
            start.elapsed()
        );
        Ok(recommendations)
    }

    /// Poster and metadata for a single catalog item
    pub async fn item_preview(&self, title: &str) -> Result<ItemPreview> {
        let item = self
            .dataset
            .catalog
            .get_by_title(title)
            .cloned()
            .ok_or_else(|| EngineError::NotFound {
                title: title.to_string(),
            })?;

        let (poster_url, metadata) = tokio::join!(
            self.lookup(self.provider.get_poster_url(item.id)),
            self.lookup(self.provider.get_details(item.id)),
        );

        Ok(ItemPreview {
            item,
            poster_url,
            metadata,
        })
    }

    /// Await one lookup, treating a timeout as a missing result
    async fn lookup<T>(&self, fut: impl Future<Output = Option<T>>) -> Option<T> {
        match tokio::time::timeout(self.lookup_timeout, fut).await {
            Ok(value) => value,
            Err(_) => {
                warn!("Metadata lookup timed out after {:?}", self.lookup_timeout);
                None
            }
        }
    }

    /// Run one lookup per id concurrently, bounded by the limiter.
    ///
    /// `None` ids are skipped. Output order matches input order; a task that
    /// fails, panics or times out yields `None` at its position.
    async fn fan_out<T, F, Fut>(&self, ids: Vec<Option<ItemId>>, fetch: F) -> Vec<Option<T>>
    where
        T: Send + 'static,
        F: Fn(Arc<dyn MetadataProvider>, ItemId) -> Fut,
        Fut: Future<Output = Option<T>> + Send + 'static,
    {
        let handles: Vec<_> = ids
            .into_iter()
            .map(|id| {
                id.map(|id| {
                    let limiter = self.limiter.clone();
                    let timeout = self.lookup_timeout;
                    let fut = fetch(self.provider.clone(), id);
                    tokio::spawn(async move {
                        let _permit = limiter.acquire_owned().await.ok()?;
                        match tokio::time::timeout(timeout, fut).await {
                            Ok(value) => value,
                            Err(_) => {
                                warn!(item_id = id, "Metadata lookup timed out after {:?}", timeout);
                                None
                            }
                        }
                    })
                })
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            let value = match handle {
                Some(handle) => handle.await.unwrap_or_else(|e| {
                    warn!(error = %e, "Metadata task failed");
                    None
                }),
                None => None,
            };
            results.push(value);
        }
        results
    }
}
