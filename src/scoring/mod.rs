//! Scoring configuration and the weighted orchestrator.
//!
//! # Key Types
//!
//! - [`ScoringConfig`]: thresholds and fallback policies shared by all agents
//! - [`ScoringOrchestrator`]: runs the agents and combines their scores
//! - [`PlanEvaluation`]: per-plan overall score, fit scores, analyses and
//!   diagnostics

mod config;
mod orchestrator;

pub use config::{ScoringConfig, UsageMultipliers, ZeroWeightPolicy};
pub use orchestrator::{PlanEvaluation, ScoringOrchestrator};
