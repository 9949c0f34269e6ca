//! Weighted combination of agent scores.

use super::config::{ScoringConfig, ZeroWeightPolicy};
use crate::agents::{CostAgent, CoverageAgent, ExclusionAgent, LimitAgent, ScoringAgent};
use crate::diagnostics::{clamp_unit, Diagnostics};
use crate::error::{PlanfitError, Result};
use crate::model::{Analyses, FitScores, Plan, PriorityWeights, UserProfile};

/// Everything the orchestrator derived for one plan.
#[derive(Debug, Clone)]
pub struct PlanEvaluation {
    pub plan_id: String,
    /// Weighted overall score in `[0, 1]`.
    pub overall: f64,
    /// Raw agent scores.
    pub fit: FitScores,
    pub analyses: Analyses,
    pub diagnostics: Diagnostics,
}

/// Runs the four agents and combines their scores with normalized weights.
///
/// Weights are validated once, at construction:
///
/// - a negative or non-finite weight is a configuration error;
/// - all-zero weights follow [`ZeroWeightPolicy`];
/// - anything else is re-normalized to sum to 1.
///
/// # Examples
///
/// ```
/// use u_planfit::model::PriorityWeights;
/// use u_planfit::scoring::{ScoringConfig, ScoringOrchestrator};
///
/// let orch = ScoringOrchestrator::new(
///     PriorityWeights::new(2.0, 2.0, 1.0),
///     ScoringConfig::default(),
/// )
/// .unwrap();
/// let w = orch.weights();
/// assert!((w.coverage - 0.4).abs() < 1e-12);
/// assert!((w.limit - 0.2).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct ScoringOrchestrator {
    weights: PriorityWeights,
    config: ScoringConfig,
    coverage: CoverageAgent,
    cost: CostAgent,
    limit: LimitAgent,
    exclusion: ExclusionAgent,
    /// Batch-level notes (weight fallback) copied into every evaluation.
    notes: Diagnostics,
}

impl ScoringOrchestrator {
    /// Creates an orchestrator.
    ///
    /// # Errors
    /// Returns [`PlanfitError::Configuration`] for invalid weights or
    /// configuration.
    pub fn new(weights: PriorityWeights, config: ScoringConfig) -> Result<Self> {
        config.validate()?;
        weights.validate()?;

        let mut notes = Diagnostics::new();
        let sum = weights.sum();
        let weights = if sum > 0.0 {
            PriorityWeights::new(
                weights.coverage / sum,
                weights.cost / sum,
                weights.limit / sum,
            )
        } else {
            match config.zero_weight_policy {
                ZeroWeightPolicy::Reject => {
                    return Err(PlanfitError::config("all priority weights are zero"));
                }
                ZeroWeightPolicy::Uniform => {
                    notes.weight_fallback(
                        "all priority weights are zero, using uniform weights of 1/3",
                    );
                    let third = 1.0 / 3.0;
                    PriorityWeights::new(third, third, third)
                }
            }
        };

        Ok(Self {
            weights,
            coverage: CoverageAgent::new(config.clone()),
            cost: CostAgent::new(config.clone()),
            limit: LimitAgent::new(config.clone()),
            exclusion: ExclusionAgent::new(config.clone()),
            config,
            notes,
        })
    }

    /// Normalized weights, summing to 1.
    pub fn weights(&self) -> PriorityWeights {
        self.weights
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Whether the zero-weight fallback was applied.
    pub fn used_weight_fallback(&self) -> bool {
        !self.notes.is_empty()
    }

    /// Scores one plan.
    pub fn score_plan(&self, plan: &Plan, profile: &UserProfile) -> PlanEvaluation {
        let mut diagnostics = self.notes.clone();

        let coverage = self.coverage.evaluate(plan, profile);
        let cost = self.cost.evaluate(plan, profile);
        let limit = self.limit.evaluate(plan, profile);
        let exclusion = self.exclusion.evaluate(plan, profile);

        let fit = FitScores {
            coverage: coverage.score,
            cost: cost.score,
            limit: limit.score,
            exclusion: exclusion.score,
        };

        let mut overall = self.weights.coverage * fit.coverage
            + self.weights.cost * fit.cost
            + self.weights.limit * fit.limit;
        if self.config.exclusion_modifier {
            overall *= 0.5 + 0.5 * fit.exclusion;
        }

        diagnostics.extend(coverage.diagnostics);
        diagnostics.extend(cost.diagnostics);
        diagnostics.extend(limit.diagnostics);
        diagnostics.extend(exclusion.diagnostics);
        let overall = clamp_unit(overall, plan.plan_id(), "overall", &mut diagnostics);

        tracing::debug!(
            plan_id = %plan.plan_id(),
            overall,
            coverage = fit.coverage,
            cost = fit.cost,
            limit = fit.limit,
            exclusion = fit.exclusion,
            "plan scored"
        );

        PlanEvaluation {
            plan_id: plan.plan_id().to_string(),
            overall,
            fit,
            analyses: Analyses {
                coverage: coverage.analysis,
                cost: cost.analysis,
                limit: limit.analysis,
                exclusion: exclusion.analysis,
            },
            diagnostics,
        }
    }
}
