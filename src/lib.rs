//! Benefit-plan fit scoring and recommendation.
//!
//! Matches a household's requirements against a catalog of benefit plans
//! and returns a ranked, explained list of recommendations:
//!
//! - **Agents**: independent, pure scorers for four dimensions (coverage,
//!   cost, limits, exclusions), each producing a score in `[0, 1]` plus the
//!   analysis facts behind it.
//! - **Scoring**: validates and normalizes priority weights and combines
//!   agent scores into an overall score.
//! - **Reasoning**: turns analyses into explanations, strengths, weaknesses
//!   and trade-offs. Output depends only on the analyses.
//! - **Ranking**: a strict total order with deterministic tie-breaks and
//!   top-N selection.
//! - **Recommend**: the end-to-end pipeline, optionally parallel.
//! - **Profile**: builds a [`UserProfile`](model::UserProfile) from
//!   structured input, inferring usage and default priorities.
//!
//! # Quick Start
//!
//! ```
//! use u_planfit::model::{
//!     CostShare, CostSharingPreference, ExpectedUsage, Plan, PlanBenefit, PriorityWeights,
//!     UserProfile,
//! };
//! use u_planfit::ranking::TopN;
//! use u_planfit::recommend::{RecommendConfig, RecommendationEngine};
//!
//! let plans = vec![
//!     Plan::new("P-A").with_benefit(
//!         PlanBenefit::new("Routine Eye Exam")
//!             .with_covered(true)
//!             .with_coinsurance(CostShare::Percent(0.0)),
//!     ),
//!     Plan::new("P-B").with_benefit(
//!         PlanBenefit::new("Routine Eye Exam")
//!             .with_covered(true)
//!             .with_coinsurance(CostShare::Percent(40.0)),
//!     ),
//! ];
//! let profile = UserProfile::new(
//!     1,
//!     0,
//!     ExpectedUsage::Low,
//!     PriorityWeights::default(),
//!     CostSharingPreference::Either,
//! )
//! .unwrap()
//! .with_required_benefits(["routine eye exam"]);
//!
//! let engine = RecommendationEngine::new(RecommendConfig::default());
//! let ranked = engine.recommend(&plans, &profile, TopN::All).unwrap();
//! assert_eq!(ranked[0].plan_id(), "P-A");
//! assert_eq!(ranked[0].rank(), 1);
//! ```
//!
//! # Architecture
//!
//! The crate is a pure computational core: no I/O, no global state. Plan
//! ingestion and output formatting belong to the caller. Incomplete plan
//! data never fails a call; it degrades a sub-score to a neutral value and
//! is reported as a [`Diagnostic`](diagnostics::Diagnostic). Log events go
//! through `tracing`; the crate never installs a subscriber.

pub mod agents;
pub mod diagnostics;
pub mod error;
pub mod model;
pub mod profile;
pub mod ranking;
pub mod reasoning;
pub mod recommend;
pub mod scoring;

pub use error::{PlanfitError, Result};
