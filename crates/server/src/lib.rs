//! Server crate for the WhyWatch recommender.
//!
//! This crate contains the orchestrator that combines similarity ranking,
//! metadata lookups and explanation rendering into user-facing requests.

pub mod orchestrator;

pub use orchestrator::{ItemPreview, Recommendation, RecommendationOrchestrator};
