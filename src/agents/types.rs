//! Core trait for scoring agents.

use crate::diagnostics::Diagnostics;
use crate::model::{Dimension, Plan, UserProfile};

/// Result of scoring one plan along one dimension.
#[derive(Debug, Clone)]
pub struct AgentOutput<A> {
    /// Score in `[0, 1]`, higher is better.
    pub score: f64,
    /// Facts the score was computed from.
    pub analysis: A,
    /// Missing-data, extraction and clamping notes from this evaluation.
    pub diagnostics: Diagnostics,
}

/// Scores a plan for a household along one dimension.
///
/// Implementations are pure: the same `(plan, profile)` always yields the
/// same output, and no state is shared between calls. Missing inputs never
/// fail an evaluation; they degrade to a neutral sub-score and a diagnostic.
///
/// **Higher scores are better.**
///
/// # Examples
///
/// ```ignore
/// struct HasDental;
///
/// impl ScoringAgent for HasDental {
///     type Analysis = bool;
///     fn dimension(&self) -> Dimension { Dimension::Coverage }
///     fn evaluate(&self, plan: &Plan, _profile: &UserProfile) -> AgentOutput<bool> {
///         let found = plan.benefit("Basic Dental Care - Adult").is_some();
///         AgentOutput {
///             score: if found { 1.0 } else { 0.0 },
///             analysis: found,
///             diagnostics: Diagnostics::new(),
///         }
///     }
/// }
/// ```
pub trait ScoringAgent: Send + Sync {
    /// Facts produced alongside the score.
    type Analysis;

    /// The dimension this agent scores.
    fn dimension(&self) -> Dimension;

    /// Returns the name of this agent.
    fn name(&self) -> &str {
        self.dimension().name()
    }

    /// Scores `plan` for `profile`.
    fn evaluate(&self, plan: &Plan, profile: &UserProfile) -> AgentOutput<Self::Analysis>;

    /// Convenience wrapper returning only the score.
    fn score(&self, plan: &Plan, profile: &UserProfile) -> f64 {
        self.evaluate(plan, profile).score
    }
}

/// `1 - part / whole`, or `None` when `whole` is zero.
pub(crate) fn inverse_ratio(part: usize, whole: usize) -> Option<f64> {
    (whole > 0).then(|| 1.0 - part as f64 / whole as f64)
}

/// Maps a rate in percent onto `[0, 1]`: 0% scores 1, `ceiling` and above
/// score 0, linear in between.
pub(crate) fn rate_score(rate: f64, ceiling: f64) -> f64 {
    if rate <= 0.0 {
        1.0
    } else if rate >= ceiling {
        0.0
    } else {
        1.0 - rate / ceiling
    }
}

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}
