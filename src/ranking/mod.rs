//! Deterministic ranking with tie-breaks and top-N selection.
//!
//! Scoring can happen in any order (or concurrently); the final order is
//! decided only here, by a strict total order over recommendations.

mod engine;
mod types;

pub use engine::{RankingEngine, MIN_EPSILON};
pub use types::TopN;
