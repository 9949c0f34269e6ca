//! Per-dimension scoring agents.
//!
//! Each agent is a pure function `(Plan, UserProfile) -> AgentOutput`
//! producing a score in `[0, 1]` (higher is better), the analysis facts the
//! score was computed from, and any diagnostics. Agents share no state and
//! can run in any order or concurrently.
//!
//! | Agent | Formula |
//! |-------|---------|
//! | [`CoverageAgent`] | `0.4 required + 0.2 ehb + 0.2 breadth + 0.2 exclusion penalty` |
//! | [`CostAgent`] | `0.3 copay alignment + 0.3 coinsurance + 0.2 annual max + 0.2 out-of-network` |
//! | [`LimitAgent`] | `0.4 quantity + 0.3 time + 0.3 exclusion period` |
//! | [`ExclusionAgent`] | `0.7 complexity + 0.3 prior coverage` |
//!
//! Missing inputs never fail an evaluation: the affected sub-term uses
//! [`ScoringConfig::neutral_score`](crate::scoring::ScoringConfig) and a
//! [`Diagnostic`](crate::diagnostics::Diagnostic) is recorded.

mod cost;
mod coverage;
mod exclusion;
mod limit;
mod types;

pub use cost::{extract_dollar_amounts, CostAgent, CostComponents};
pub use coverage::{CoverageAgent, CoverageComponents};
pub use exclusion::{waiting_periods_months, ExclusionAgent, ExclusionComponents};
pub use limit::{has_exclusion_period, has_time_limit, LimitAgent, LimitComponents};
pub use types::{AgentOutput, ScoringAgent};
