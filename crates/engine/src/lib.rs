//! Recommendation and explanation engine.
//!
//! This crate provides:
//! - `Recommender`: ranks catalog items by precomputed similarity
//! - `ExplanationGenerator`: turns two items' metadata into a short
//!   justification of why one was recommended for the other
//!
//! Both are pure: the recommender reads the shared `Dataset`, the generator
//! only looks at the two `ItemMetadata` values it is given.
//!
//! ## Example Usage
//! ```ignore
//! use engine::{ExplanationGenerator, Recommender};
//!
//! let recommender = Recommender::new(dataset.clone());
//! let neighbors = recommender.recommend("Avatar", 5)?;
//!
//! let generator = ExplanationGenerator::new();
//! let why = generator.explain(&avatar_metadata, &neighbor_metadata);
//! ```

pub mod error;
pub mod explain;
pub mod recommender;
pub mod text;

// Re-export main types
pub use error::{EngineError, Result};
pub use explain::{ComparisonSignals, ExplanationGenerator, FALLBACK_EXPLANATION};
pub use recommender::{Neighbor, Recommender};
