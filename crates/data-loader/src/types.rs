//! Core domain types for the recommendation dataset.
//!
//! The dataset is two pieces of read-only data that must line up row for row:
//! - `Catalog`: the recommendable items, in file order
//! - `SimilarityMatrix`: precomputed pairwise scores, indexed by catalog row
//!
//! Both are wrapped in a `Dataset`, which is built once at startup and then
//! shared behind an `Arc` by every request handler.

use crate::error::{DataLoadError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// External identifier of an item (the metadata provider's id, e.g. a TMDB movie id)
pub type ItemId = u32;

// =============================================================================
// Items
// =============================================================================

/// A single recommendable item.
///
/// `row_index` is the item's position in the catalog and therefore also its
/// row and column in the similarity matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    pub row_index: usize,
}

/// The fixed table of recommendable items.
///
/// Lookups by title and by id are O(1) through secondary indices built at
/// construction time.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<Item>,
    title_index: HashMap<String, usize>,
    id_index: HashMap<ItemId, usize>,
}

impl Catalog {
    /// Build a catalog from `(id, title)` pairs, assigning row indices in order.
    ///
    /// Titles are the lookup key for `recommend`, so duplicates are rejected
    /// here instead of silently resolving to the first match.
    pub fn new(entries: Vec<(ItemId, String)>) -> Result<Self> {
        let mut items = Vec::with_capacity(entries.len());
        let mut title_index = HashMap::with_capacity(entries.len());
        let mut id_index = HashMap::with_capacity(entries.len());

        for (row_index, (id, title)) in entries.into_iter().enumerate() {
            if let Some(&first_row) = title_index.get(&title) {
                return Err(DataLoadError::DuplicateTitle {
                    title,
                    first_row,
                    second_row: row_index,
                });
            }
            title_index.insert(title.clone(), row_index);
            // Ids are not the lookup key, first occurrence wins
            id_index.entry(id).or_insert(row_index);
            items.push(Item {
                id,
                title,
                row_index,
            });
        }

        Ok(Self {
            items,
            title_index,
            id_index,
        })
    }

    /// Exact, case-sensitive title lookup
    pub fn get_by_title(&self, title: &str) -> Option<&Item> {
        self.title_index.get(title).map(|&row| &self.items[row])
    }

    /// Get the item stored at a catalog row
    pub fn get_by_row(&self, row_index: usize) -> Option<&Item> {
        self.items.get(row_index)
    }

    /// Get an item by its external id
    pub fn get_by_id(&self, id: ItemId) -> Option<&Item> {
        self.id_index.get(&id).map(|&row| &self.items[row])
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate items in row order
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    /// Case-insensitive title search.
    ///
    /// Exact matches come first, then substring matches, each group in
    /// catalog order. An empty query returns the first `limit` items.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Item> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.items.iter().take(limit).collect();
        }

        let mut exact = Vec::new();
        let mut partial = Vec::new();
        for item in &self.items {
            let title = item.title.to_lowercase();
            if title == query {
                exact.push(item);
            } else if title.contains(&query) {
                partial.push(item);
            }
        }

        exact.into_iter().chain(partial).take(limit).collect()
    }
}

// =============================================================================
// Similarity Matrix
// =============================================================================

/// Square matrix of precomputed similarity scores.
///
/// Stored row-major in a single allocation; `score(i, j)` is the similarity
/// between catalog rows `i` and `j`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimilarityMatrix {
    size: usize,
    scores: Vec<f32>,
}

impl SimilarityMatrix {
    /// Build a matrix from its rows. Every row must have exactly `rows.len()` scores.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let size = rows.len();
        let mut scores = Vec::with_capacity(size * size);

        for (row_index, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(DataLoadError::InconsistentDataset {
                    reason: format!(
                        "similarity row {} has {} columns, expected {}",
                        row_index,
                        row.len(),
                        size
                    ),
                });
            }
            scores.extend(row);
        }

        Ok(Self { size, scores })
    }

    /// Number of rows (and columns)
    pub fn size(&self) -> usize {
        self.size
    }

    /// Borrow one row of scores
    pub fn row(&self, row_index: usize) -> Option<&[f32]> {
        if row_index >= self.size {
            return None;
        }
        let start = row_index * self.size;
        Some(&self.scores[start..start + self.size])
    }

    /// Similarity between rows `i` and `j`
    pub fn score(&self, i: usize, j: usize) -> Option<f32> {
        self.row(i).and_then(|row| row.get(j).copied())
    }
}

// =============================================================================
// Dataset - catalog and matrix, validated together
// =============================================================================

/// The loaded, immutable dataset shared by all requests.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub catalog: Catalog,
    pub similarity: SimilarityMatrix,
}

impl Dataset {
    /// Pair a catalog with its matrix, checking that they line up.
    pub fn new(catalog: Catalog, similarity: SimilarityMatrix) -> Result<Self> {
        if catalog.len() != similarity.size() {
            return Err(DataLoadError::InconsistentDataset {
                reason: format!(
                    "catalog has {} rows but similarity matrix is {}x{}",
                    catalog.len(),
                    similarity.size(),
                    similarity.size()
                ),
            });
        }
        Ok(Self {
            catalog,
            similarity,
        })
    }

    /// Get counts for debugging/validation: (items, matrix size)
    pub fn counts(&self) -> (usize, usize) {
        (self.catalog.len(), self.similarity.size())
    }
}
