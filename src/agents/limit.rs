//! Limit agent.
//!
//! ```text
//! score = 0.4 * quantity + 0.3 * time + 0.3 * exclusion_period
//! ```
//!
//! Quantity and time sub-scores are scaled by the usage multiplier of the
//! profile: the same limit hurts a heavy user more.

use std::collections::BTreeMap;

use super::types::{inverse_ratio, AgentOutput, ScoringAgent};
use crate::diagnostics::{clamp_unit, Diagnostics};
use crate::model::{Dimension, LimitAnalysis, Plan, PlanBenefit, UserProfile};
use crate::scoring::ScoringConfig;

/// Words in a limit unit that make it a time-based limit.
const TIME_WORDS: [&str; 5] = ["year", "month", "day", "visit", "occurrence"];

/// Phrases in exclusion text that indicate a waiting or exclusion period.
const PERIOD_KEYWORDS: [&str; 5] = [
    "waiting period",
    "exclusion period",
    "must wait",
    "not covered for",
    "excluded for",
];

/// Whether the benefit's limit unit is time-based ("Visit(s) per Year").
pub fn has_time_limit(benefit: &PlanBenefit) -> bool {
    benefit.limit_unit.as_deref().is_some_and(|unit| {
        let unit = unit.to_lowercase();
        TIME_WORDS.iter().any(|w| unit.contains(w))
    })
}

/// Whether the benefit's exclusion text mentions a waiting or exclusion
/// period.
pub fn has_exclusion_period(benefit: &PlanBenefit) -> bool {
    benefit.exclusions.as_deref().is_some_and(|text| {
        let text = text.to_lowercase();
        PERIOD_KEYWORDS.iter().any(|k| text.contains(k))
    })
}

/// The three limit sub-scores, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimitComponents {
    pub quantity: f64,
    pub time: f64,
    pub exclusion_period: f64,
}

impl LimitComponents {
    /// Weighted combination, before clamping.
    pub fn combined(&self) -> f64 {
        0.4 * self.quantity + 0.3 * self.time + 0.3 * self.exclusion_period
    }
}

/// Scores quantity limits, time limits and waiting periods.
#[derive(Debug, Clone, Default)]
pub struct LimitAgent {
    config: ScoringConfig,
}

impl LimitAgent {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    fn is_binding(&self, benefit: &PlanBenefit) -> bool {
        benefit
            .limit_qty
            .is_some_and(|qty| qty <= self.config.restrictive_limit_qty)
    }

    /// Computes the sub-scores and analysis without combining them.
    pub fn components(
        &self,
        plan: &Plan,
        profile: &UserProfile,
        diagnostics: &mut Diagnostics,
    ) -> (LimitComponents, LimitAnalysis) {
        let plan_id = plan.plan_id();
        let neutral = self.config.neutral_score;
        let multiplier = self
            .config
            .usage_multipliers
            .for_usage(profile.expected_usage());

        let mut covered = 0usize;
        let mut quantity_limited = 0usize;
        let mut time_limited = 0usize;
        // canonical key -> display name; a benefit lands here at most once
        let mut restrictive: BTreeMap<&str, &str> = BTreeMap::new();

        for (key, benefit) in plan.covered_benefits() {
            covered += 1;
            let quantity = benefit.has_quantity_limit();
            let time = has_time_limit(benefit);
            if quantity {
                quantity_limited += 1;
            }
            if time {
                time_limited += 1;
            }
            if (quantity || time) && self.is_binding(benefit) {
                restrictive.insert(key, &benefit.benefit_name);
            }
        }

        let (quantity, time) = match (
            inverse_ratio(quantity_limited, covered),
            inverse_ratio(time_limited, covered),
        ) {
            (Some(q), Some(t)) => (q * multiplier, t * multiplier),
            _ => {
                diagnostics.missing_data(
                    plan_id,
                    format!("limit: plan covers no benefits, quantity and time use neutral {neutral:.2}"),
                );
                (neutral, neutral)
            }
        };

        let with_periods = plan
            .benefits()
            .filter(|(_, b)| has_exclusion_period(b))
            .count();
        let exclusion_period = inverse_ratio(with_periods, plan.benefit_count())
            .unwrap_or_else(|| {
                diagnostics.missing_data(
                    plan_id,
                    format!("limit: plan lists no benefits, exclusion period uses neutral {neutral:.2}"),
                );
                neutral
            });

        if !restrictive.is_empty() {
            tracing::debug!(
                plan_id = %plan_id,
                count = restrictive.len(),
                "restrictive limits found"
            );
        }

        let components = LimitComponents {
            quantity,
            time,
            exclusion_period,
        };
        let analysis = LimitAnalysis {
            benefits_with_quantity_limits: quantity_limited,
            benefits_with_time_limits: time_limited,
            benefits_with_exclusion_periods: with_periods,
            total_covered_benefits: covered,
            restrictive_limits: restrictive.into_values().map(str::to_string).collect(),
        };
        (components, analysis)
    }
}

impl ScoringAgent for LimitAgent {
    type Analysis = LimitAnalysis;

    fn dimension(&self) -> Dimension {
        Dimension::Limit
    }

    fn evaluate(&self, plan: &Plan, profile: &UserProfile) -> AgentOutput<LimitAnalysis> {
        let mut diagnostics = Diagnostics::new();
        let (components, analysis) = self.components(plan, profile, &mut diagnostics);
        let score = clamp_unit(
            components.combined(),
            plan.plan_id(),
            self.name(),
            &mut diagnostics,
        );
        AgentOutput {
            score,
            analysis,
            diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;
    use crate::model::{CostSharingPreference, ExpectedUsage, PriorityWeights};

    fn profile(usage: ExpectedUsage) -> UserProfile {
        UserProfile::new(
            2,
            1,
            usage,
            PriorityWeights::default(),
            CostSharingPreference::Either,
        )
        .unwrap()
    }

    #[test]
    fn test_no_limits_low_usage() {
        let plan = Plan::new("P1")
            .with_benefit(PlanBenefit::new("A").with_covered(true))
            .with_benefit(PlanBenefit::new("B").with_covered(true));
        let out = LimitAgent::default().evaluate(&plan, &profile(ExpectedUsage::Low));
        assert!((out.score - 1.0).abs() < 1e-12);
        assert!(out.analysis.restrictive_limits.is_empty());
    }

    #[test]
    fn test_usage_multiplier_applies() {
        let plan = Plan::new("P1").with_benefit(PlanBenefit::new("A").with_covered(true));
        let agent = LimitAgent::default();
        let mut d = Diagnostics::new();
        let (high, _) = agent.components(&plan, &profile(ExpectedUsage::High), &mut d);
        assert!((high.quantity - 0.8).abs() < 1e-12);
        assert!((high.time - 0.8).abs() < 1e-12);
        assert!((high.exclusion_period - 1.0).abs() < 1e-12);
        // 0.4 * 0.8 + 0.3 * 0.8 + 0.3 * 1.0
        assert!((high.combined() - 0.86).abs() < 1e-12);
    }

    #[test]
    fn test_both_limit_kinds_listed_once() {
        let plan = Plan::new("P1")
            .with_benefit(
                PlanBenefit::new("Routine Eye Exam for Children")
                    .with_covered(true)
                    .with_quantity_limit(1.0, "Exam(s) per Year"),
            )
            .with_benefit(
                PlanBenefit::new("Basic Dental Care - Child")
                    .with_covered(true)
                    .with_quantity_limit(2.0, "Visit(s) per Year"),
            )
            .with_benefit(
                PlanBenefit::new("Eyeglasses for Children")
                    .with_covered(true)
                    .with_quantity_limit(10.0, "Item(s) per Year"),
            );
        let out = LimitAgent::default().evaluate(&plan, &profile(ExpectedUsage::Low));
        assert_eq!(out.analysis.benefits_with_quantity_limits, 3);
        assert_eq!(out.analysis.benefits_with_time_limits, 3);
        assert_eq!(
            out.analysis.restrictive_limits,
            vec!["Basic Dental Care - Child", "Routine Eye Exam for Children"]
        );
    }

    #[test]
    fn test_time_limit_detection() {
        let visit = PlanBenefit::new("A").with_quantity_limit(3.0, "Visit(s) per Benefit Period");
        let item = PlanBenefit::new("B").with_quantity_limit(1.0, "Item(s)");
        assert!(has_time_limit(&visit));
        assert!(!has_time_limit(&item));
        assert!(!has_time_limit(&PlanBenefit::new("C")));
    }

    #[test]
    fn test_exclusion_period_counts_all_benefits() {
        let plan = Plan::new("P1")
            .with_benefit(
                PlanBenefit::new("Major Dental Care - Adult")
                    .with_covered(true)
                    .with_exclusions("12 month waiting period applies"),
            )
            .with_benefit(PlanBenefit::new("Orthodontia - Adult").with_covered(false))
            .with_benefit(PlanBenefit::new("Basic Dental Care - Adult").with_covered(true))
            .with_benefit(
                PlanBenefit::new("Routine Dental Services (Adult)")
                    .with_covered(true)
                    .with_exclusions("Limited to 2 cleanings"),
            );
        let mut d = Diagnostics::new();
        let (c, a) = LimitAgent::default().components(&plan, &profile(ExpectedUsage::Low), &mut d);
        assert_eq!(a.benefits_with_exclusion_periods, 1);
        assert!((c.exclusion_period - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_empty_plan_is_neutral() {
        let out = LimitAgent::default().evaluate(&Plan::new("EMPTY"), &profile(ExpectedUsage::High));
        assert!((out.score - 0.5).abs() < 1e-12);
        assert_eq!(out.diagnostics.count(DiagnosticKind::MissingData), 2);
    }
}
