//! Similarity-based recommender.
//!
//! ## Algorithm
//! 1. Resolve the query title to its catalog row
//! 2. Read that row of the similarity matrix as `(row, score)` pairs
//! 3. Drop the query's own row
//! 4. Stable-sort by score descending, so equal scores keep ascending row order
//! 5. Keep the first `top_k`
//!
//! Self-exclusion matches on row index rather than dropping the top-ranked
//! entry. If another item ties the self-score, it is still recommended.

use crate::error::{EngineError, Result};
use data_loader::{Dataset, ItemId};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, instrument};

/// One ranked neighbor of the query item
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    pub item_id: ItemId,
    pub title: String,
    pub row_index: usize,
    pub score: f32,
}

/// Ranks catalog items by precomputed similarity to a query item
#[derive(Debug, Clone)]
pub struct Recommender {
    /// Shared, read-only dataset (no Mutex needed)
    dataset: Arc<Dataset>,
}

impl Recommender {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Return the `top_k` items most similar to `query_title`, best first.
    ///
    /// Fails with `NotFound` for a title outside the catalog and with
    /// `InvalidTopK` for `top_k == 0`. Asking for more items than the catalog
    /// holds returns every other item.
    #[instrument(skip(self))]
    pub fn recommend(&self, query_title: &str, top_k: usize) -> Result<Vec<Neighbor>> {
        if top_k == 0 {
            return Err(EngineError::InvalidTopK(top_k));
        }

        let not_found = || EngineError::NotFound {
            title: query_title.to_string(),
        };
        let query = self.dataset.catalog.get_by_title(query_title).ok_or_else(not_found)?;
        // Dataset::new guarantees a row per catalog item
        let scores = self.dataset.similarity.row(query.row_index).ok_or_else(not_found)?;

        let mut ranked: Vec<(usize, f32)> = scores
            .iter()
            .copied()
            .enumerate()
            .filter(|&(row, _)| row != query.row_index)
            .collect();

        // sort_by is stable: ties stay in ascending row order
        ranked.sort_by(|a, b| {
            rank_key(b.1)
                .partial_cmp(&rank_key(a.1))
                .unwrap_or(Ordering::Equal)
        });
        ranked.truncate(top_k);

        let neighbors: Vec<Neighbor> = ranked
            .into_iter()
            .filter_map(|(row, score)| {
                let item = self.dataset.catalog.get_by_row(row)?;
                Some(Neighbor {
                    item_id: item.id,
                    title: item.title.clone(),
                    row_index: row,
                    score,
                })
            })
            .collect();

        debug!(
            "Ranked {} neighbors for '{}' (row {})",
            neighbors.len(),
            query_title,
            query.row_index
        );
        Ok(neighbors)
    }
}

/// NaN sorts below every real score
fn rank_key(score: f32) -> f32 {
    if score.is_nan() {
        f32::NEG_INFINITY
    } else {
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{Catalog, SimilarityMatrix};

    fn build_dataset(titles: &[&str], rows: Vec<Vec<f32>>) -> Arc<Dataset> {
        let catalog = Catalog::new(
            titles
                .iter()
                .enumerate()
                .map(|(i, t)| (100 + i as ItemId, t.to_string()))
                .collect(),
        )
        .unwrap();
        let similarity = SimilarityMatrix::from_rows(rows).unwrap();
        Arc::new(Dataset::new(catalog, similarity).unwrap())
    }

    fn titles(neighbors: &[Neighbor]) -> Vec<&str> {
        neighbors.iter().map(|n| n.title.as_str()).collect()
    }

    #[test]
    fn test_ties_break_by_row_order() {
        let dataset = build_dataset(
            &["A", "B", "C", "D"],
            vec![
                vec![1.0, 0.9, 0.9, 0.1],
                vec![0.9, 1.0, 0.2, 0.3],
                vec![0.9, 0.2, 1.0, 0.4],
                vec![0.1, 0.3, 0.4, 1.0],
            ],
        );
        let recommender = Recommender::new(dataset);

        let result = recommender.recommend("A", 2).unwrap();
        assert_eq!(titles(&result), vec!["B", "C"]);
        assert_eq!(result[0].item_id, 101);
        assert_eq!(result[0].row_index, 1);
        assert_eq!(result[1].score, 0.9);
    }

    #[test]
    fn test_self_excluded_by_row_even_when_tied() {
        // B ties A's self-score; dropping the first ranked entry would lose B
        let dataset = build_dataset(
            &["A", "B", "C"],
            vec![
                vec![1.0, 1.0, 0.5],
                vec![1.0, 1.0, 0.5],
                vec![0.5, 0.5, 1.0],
            ],
        );
        let recommender = Recommender::new(dataset);

        let result = recommender.recommend("A", 2).unwrap();
        assert_eq!(titles(&result), vec!["B", "C"]);
    }

    #[test]
    fn test_self_excluded_when_not_maximum() {
        let dataset = build_dataset(
            &["A", "B", "C"],
            vec![
                vec![0.1, 0.8, 0.5],
                vec![0.8, 1.0, 0.5],
                vec![0.5, 0.5, 1.0],
            ],
        );
        let recommender = Recommender::new(dataset);

        let result = recommender.recommend("A", 5).unwrap();
        assert_eq!(titles(&result), vec!["B", "C"]);
    }

    #[test]
    fn test_top_k_larger_than_catalog() {
        let dataset = build_dataset(
            &["A", "B", "C"],
            vec![
                vec![1.0, 0.2, 0.7],
                vec![0.2, 1.0, 0.1],
                vec![0.7, 0.1, 1.0],
            ],
        );
        let recommender = Recommender::new(dataset);

        let result = recommender.recommend("A", 10).unwrap();
        assert_eq!(titles(&result), vec!["C", "B"]);
    }

    #[test]
    fn test_nan_scores_rank_last() {
        let dataset = build_dataset(
            &["A", "B", "C", "D"],
            vec![
                vec![1.0, f32::NAN, 0.2, 0.3],
                vec![0.0, 1.0, 0.0, 0.0],
                vec![0.0, 0.0, 1.0, 0.0],
                vec![0.0, 0.0, 0.0, 1.0],
            ],
        );
        let recommender = Recommender::new(dataset);

        let result = recommender.recommend("A", 3).unwrap();
        assert_eq!(titles(&result), vec!["D", "C", "B"]);
    }

    #[test]
    fn test_unknown_title() {
        let dataset = build_dataset(&["A", "B"], vec![vec![1.0, 0.5], vec![0.5, 1.0]]);
        let recommender = Recommender::new(dataset);

        let err = recommender.recommend("a", 1).unwrap_err();
        assert_eq!(
            err,
            EngineError::NotFound {
                title: "a".to_string()
            }
        );
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let dataset = build_dataset(&["A", "B"], vec![vec![1.0, 0.5], vec![0.5, 1.0]]);
        let recommender = Recommender::new(dataset);

        assert_eq!(
            recommender.recommend("A", 0).unwrap_err(),
            EngineError::InvalidTopK(0)
        );
    }

    #[test]
    fn test_single_item_catalog() {
        let dataset = build_dataset(&["Solo"], vec![vec![1.0]]);
        let recommender = Recommender::new(dataset);

        assert!(recommender.recommend("Solo", 3).unwrap().is_empty());
    }
}
