//! Top-level recommendation pipeline.
//!
//! # Key Types
//!
//! - [`RecommendConfig`]: parallelism, explanation style, ranking epsilon
//!   and the [`ScoringConfig`](crate::scoring::ScoringConfig)
//! - [`RecommendationEngine`]: scores, explains and ranks a plan catalog

mod config;
mod engine;

pub use config::RecommendConfig;
pub use engine::RecommendationEngine;
