//! Dataset loading and validation.
//!
//! Parses both dataset files in parallel, builds the catalog indices and
//! checks that the catalog and the similarity matrix describe the same rows.

use crate::error::Result;
use crate::parser;
use crate::types::*;
use std::path::Path;
use tracing::info;

/// File holding `itemId::title` rows
pub const ITEMS_FILE: &str = "items.dat";

/// File holding the similarity matrix rows
pub const SIMILARITY_FILE: &str = "similarity.dat";

impl Dataset {
    /// Load the dataset from a directory containing `items.dat` and `similarity.dat`.
    ///
    /// Steps:
    /// 1. Parse both files in parallel
    /// 2. Build the catalog (rejects duplicate titles)
    /// 3. Build the similarity matrix (rejects non-square input)
    /// 4. Check that catalog rows and matrix rows agree
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        info!("Loading dataset from {:?}", data_dir);

        let items_path = data_dir.join(ITEMS_FILE);
        let similarity_path = data_dir.join(SIMILARITY_FILE);

        // The matrix is by far the larger file; parse it alongside the catalog
        let (items, rows) = rayon::join(
            || parser::parse_items(&items_path),
            || parser::parse_similarity(&similarity_path),
        );
        let items = items?;
        let rows = rows?;

        info!(
            "Parsed {} items and {} similarity rows",
            items.len(),
            rows.len()
        );

        let catalog = Catalog::new(items)?;
        let similarity = SimilarityMatrix::from_rows(rows)?;
        let dataset = Dataset::new(catalog, similarity)?;

        info!("Dataset successfully built and validated!");
        Ok(dataset)
    }
}
