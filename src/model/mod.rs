//! Domain model: plans, profiles, analyses and recommendations.
//!
//! # Key Types
//!
//! - [`Plan`] / [`PlanBenefit`]: the read-only catalog produced by ingestion
//! - [`UserProfile`] / [`PriorityWeights`]: what the household needs
//! - [`Analyses`]: the facts each scoring agent derived
//! - [`Recommendation`]: the ranked, explained output
//!
//! Benefit names are canonicalized with [`canonical_benefit_name`] both when
//! a plan is built and when a profile is built.

mod analysis;
mod plan;
mod recommendation;
mod user;

pub use analysis::{
    Analyses, CostAnalysis, CostSharingMethod, CoverageAnalysis, ExclusionAnalysis,
    LimitAnalysis,
};
pub use plan::{canonical_benefit_name, CostShare, Plan, PlanBenefit, TierCostShare};
pub use recommendation::{Dimension, FitScores, ReasoningChain, Recommendation, TradeOff};
pub use user::{
    BudgetConstraints, CostSharingPreference, ExpectedUsage, PriorityWeights, UserProfile,
};
pub(crate) use user::family_size;
