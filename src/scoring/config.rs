//! Scoring configuration.
//!
//! [`ScoringConfig`] holds every threshold the agents and the orchestrator
//! use, so none of them is hard-coded in a formula.

use crate::error::{PlanfitError, Result};
use crate::model::ExpectedUsage;

/// What the orchestrator does when every priority weight is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZeroWeightPolicy {
    /// Split evenly, 1/3 per weighted dimension, and record a diagnostic.
    #[default]
    Uniform,
    /// Treat all-zero weights as a configuration error.
    Reject,
}

/// Multipliers applied to limit sub-scores by expected usage.
///
/// Heavier users are penalized more by the same limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsageMultipliers {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

impl Default for UsageMultipliers {
    fn default() -> Self {
        Self {
            low: 1.0,
            medium: 0.9,
            high: 0.8,
        }
    }
}

impl UsageMultipliers {
    pub fn for_usage(&self, usage: ExpectedUsage) -> f64 {
        match usage {
            ExpectedUsage::Low => self.low,
            ExpectedUsage::Medium => self.medium,
            ExpectedUsage::High => self.high,
        }
    }
}

/// Configuration shared by the scoring agents and the orchestrator.
///
/// # Defaults
///
/// ```
/// use u_planfit::scoring::{ScoringConfig, ZeroWeightPolicy};
///
/// let config = ScoringConfig::default();
/// assert!((config.neutral_score - 0.5).abs() < 1e-12);
/// assert_eq!(config.breadth_target, 20);
/// assert_eq!(config.zero_weight_policy, ZeroWeightPolicy::Uniform);
/// assert!(!config.exclusion_modifier);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    /// Sub-score used when the inputs for a sub-term are missing.
    pub neutral_score: f64,

    /// Number of covered benefits that earns a full breadth score.
    pub breadth_target: usize,

    /// Coinsurance rate (percent) at or above which the rate score is 0.
    pub coinsurance_ceiling: f64,

    /// Annual maximum (dollars) at or above which the score is 1.
    pub annual_maximum_target: f64,

    /// Extracted dollar amounts must be strictly below this value.
    pub max_plausible_amount: f64,

    /// A limit quantity at or below this value is binding.
    pub restrictive_limit_qty: f64,

    /// Waiting periods of at least this many months count as complex
    /// exclusions.
    pub long_waiting_period_months: u32,

    pub usage_multipliers: UsageMultipliers,

    pub zero_weight_policy: ZeroWeightPolicy,

    /// Scale the weighted overall score by `0.5 + 0.5 * exclusion_score`.
    ///
    /// Off by default: the overall score is then exactly the weighted sum of
    /// the coverage, cost and limit scores.
    pub exclusion_modifier: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            neutral_score: 0.5,
            breadth_target: 20,
            coinsurance_ceiling: 50.0,
            annual_maximum_target: 5_000.0,
            max_plausible_amount: 1_000_000.0,
            restrictive_limit_qty: 2.0,
            long_waiting_period_months: 12,
            usage_multipliers: UsageMultipliers::default(),
            zero_weight_policy: ZeroWeightPolicy::Uniform,
            exclusion_modifier: false,
        }
    }
}

impl ScoringConfig {
    /// Sets the neutral fallback sub-score.
    pub fn with_neutral_score(mut self, score: f64) -> Self {
        self.neutral_score = score.clamp(0.0, 1.0);
        self
    }

    pub fn with_breadth_target(mut self, n: usize) -> Self {
        self.breadth_target = n;
        self
    }

    pub fn with_coinsurance_ceiling(mut self, percent: f64) -> Self {
        self.coinsurance_ceiling = percent;
        self
    }

    pub fn with_annual_maximum_target(mut self, dollars: f64) -> Self {
        self.annual_maximum_target = dollars;
        self
    }

    pub fn with_restrictive_limit_qty(mut self, qty: f64) -> Self {
        self.restrictive_limit_qty = qty;
        self
    }

    pub fn with_long_waiting_period_months(mut self, months: u32) -> Self {
        self.long_waiting_period_months = months;
        self
    }

    pub fn with_usage_multipliers(mut self, multipliers: UsageMultipliers) -> Self {
        self.usage_multipliers = multipliers;
        self
    }

    pub fn with_zero_weight_policy(mut self, policy: ZeroWeightPolicy) -> Self {
        self.zero_weight_policy = policy;
        self
    }

    pub fn with_exclusion_modifier(mut self, enabled: bool) -> Self {
        self.exclusion_modifier = enabled;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.neutral_score) {
            return Err(PlanfitError::config("neutral_score must be within [0, 1]"));
        }
        if self.breadth_target == 0 {
            return Err(PlanfitError::config("breadth_target must be at least 1"));
        }
        if !is_positive(self.coinsurance_ceiling) {
            return Err(PlanfitError::config("coinsurance_ceiling must be positive"));
        }
        if !is_positive(self.annual_maximum_target) {
            return Err(PlanfitError::config(
                "annual_maximum_target must be positive",
            ));
        }
        if !is_positive(self.max_plausible_amount - self.annual_maximum_target) {
            return Err(PlanfitError::config(
                "max_plausible_amount must exceed annual_maximum_target",
            ));
        }
        if self.restrictive_limit_qty.is_nan() || self.restrictive_limit_qty < 0.0 {
            return Err(PlanfitError::config(
                "restrictive_limit_qty must be non-negative",
            ));
        }
        let m = self.usage_multipliers;
        for v in [m.low, m.medium, m.high] {
            if !(0.0..=1.0).contains(&v) {
                return Err(PlanfitError::config(
                    "usage multipliers must be within [0, 1]",
                ));
            }
        }
        Ok(())
    }
}

fn is_positive(v: f64) -> bool {
    v > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ScoringConfig::default();
        assert!((config.coinsurance_ceiling - 50.0).abs() < 1e-12);
        assert!((config.annual_maximum_target - 5000.0).abs() < 1e-12);
        assert!((config.max_plausible_amount - 1_000_000.0).abs() < 1e-12);
        assert!((config.restrictive_limit_qty - 2.0).abs() < 1e-12);
        assert_eq!(config.long_waiting_period_months, 12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = ScoringConfig::default()
            .with_neutral_score(0.4)
            .with_breadth_target(10)
            .with_zero_weight_policy(ZeroWeightPolicy::Reject)
            .with_exclusion_modifier(true);

        assert!((config.neutral_score - 0.4).abs() < 1e-12);
        assert_eq!(config.breadth_target, 10);
        assert_eq!(config.zero_weight_policy, ZeroWeightPolicy::Reject);
        assert!(config.exclusion_modifier);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_clamp_neutral_score() {
        let config = ScoringConfig::default().with_neutral_score(1.7);
        assert!((config.neutral_score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(ScoringConfig::default()
            .with_breadth_target(0)
            .validate()
            .is_err());
        assert!(ScoringConfig::default()
            .with_coinsurance_ceiling(0.0)
            .validate()
            .is_err());
        assert!(ScoringConfig::default()
            .with_restrictive_limit_qty(-1.0)
            .validate()
            .is_err());
        assert!(ScoringConfig::default()
            .with_usage_multipliers(UsageMultipliers {
                low: 1.0,
                medium: 1.2,
                high: 0.8,
            })
            .validate()
            .is_err());
    }

    #[test]
    fn test_usage_multiplier_lookup() {
        let m = UsageMultipliers::default();
        assert!((m.for_usage(ExpectedUsage::Low) - 1.0).abs() < 1e-12);
        assert!((m.for_usage(ExpectedUsage::Medium) - 0.9).abs() < 1e-12);
        assert!((m.for_usage(ExpectedUsage::High) - 0.8).abs() < 1e-12);
    }
}
