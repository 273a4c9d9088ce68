//! # Data Loader Crate
//!
//! This crate loads the item catalog and the precomputed similarity matrix.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Item, Catalog, SimilarityMatrix, Dataset)
//! - **parser**: Parse .dat files into Rust values
//! - **index**: Load and validate a `Dataset` from a directory
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::Dataset;
//! use std::path::Path;
//!
//! let dataset = Dataset::load_from_files(Path::new("data"))?;
//!
//! let avatar = dataset.catalog.get_by_title("Avatar").unwrap();
//! let row = dataset.similarity.row(avatar.row_index).unwrap();
//! println!("{} has {} similarity scores", avatar.title, row.len());
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use index::{ITEMS_FILE, SIMILARITY_FILE};
pub use types::{Catalog, Dataset, Item, ItemId, SimilarityMatrix};
