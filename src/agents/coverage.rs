//! Coverage agent.
//!
//! Scores how well a plan covers what the household asked for:
//!
//! ```text
//! score = 0.4 * required_ratio + 0.2 * ehb_bonus
//!       + 0.2 * breadth        + 0.2 * exclusion_penalty
//! ```

use super::types::{inverse_ratio, AgentOutput, ScoringAgent};
use crate::diagnostics::{clamp_unit, Diagnostics};
use crate::model::{CoverageAnalysis, Dimension, Plan, UserProfile};
use crate::scoring::ScoringConfig;

/// The four coverage sub-scores, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverageComponents {
    /// Covered required benefits over all required benefits.
    pub required_ratio: f64,
    /// Share of the plan's benefits that are Essential Health Benefits.
    pub ehb_bonus: f64,
    /// Covered benefits relative to the breadth target.
    pub breadth: f64,
    /// 1 minus the share of needed benefits the plan explicitly excludes.
    pub exclusion_penalty: f64,
}

impl CoverageComponents {
    /// Weighted combination, before clamping.
    pub fn combined(&self) -> f64 {
        0.4 * self.required_ratio
            + 0.2 * self.ehb_bonus
            + 0.2 * self.breadth
            + 0.2 * self.exclusion_penalty
    }
}

/// Scores benefit coverage against the profile's required benefits.
#[derive(Debug, Clone, Default)]
pub struct CoverageAgent {
    config: ScoringConfig,
}

impl CoverageAgent {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Computes the sub-scores and analysis without combining them.
    pub fn components(
        &self,
        plan: &Plan,
        profile: &UserProfile,
        diagnostics: &mut Diagnostics,
    ) -> (CoverageComponents, CoverageAnalysis) {
        let required = profile.required_benefits();
        let mut covered_names = Vec::new();
        let mut missing_names = Vec::new();
        for key in required {
            match plan.benefit_by_key(key) {
                Some(b) if b.is_covered() => covered_names.push(b.benefit_name.clone()),
                Some(b) => missing_names.push(b.benefit_name.clone()),
                None => missing_names.push(key.clone()),
            }
        }

        let required_ratio = if required.is_empty() {
            1.0
        } else {
            covered_names.len() as f64 / required.len() as f64
        };

        let total = plan.benefit_count();
        let ehb_count = plan.ehb_benefits().count();
        let covered_count = plan.covered_benefits().count();

        let ehb_bonus = if total == 0 {
            diagnostics.missing_data(
                plan.plan_id(),
                format!(
                    "coverage: plan lists no benefits, ehb bonus uses neutral {:.2}",
                    self.config.neutral_score
                ),
            );
            self.config.neutral_score
        } else {
            ehb_count as f64 / total as f64
        };

        let breadth = (covered_count as f64 / self.config.breadth_target as f64).min(1.0);

        let exclusion_penalty = self.exclusion_penalty(plan, profile);

        tracing::debug!(
            plan_id = %plan.plan_id(),
            covered = covered_names.len(),
            required = required.len(),
            "required benefits coverage"
        );

        let components = CoverageComponents {
            required_ratio,
            ehb_bonus,
            breadth,
            exclusion_penalty,
        };
        let analysis = CoverageAnalysis {
            required_benefits_covered: covered_names.len(),
            required_benefits_total: required.len(),
            ehb_benefits_count: ehb_count,
            total_benefits_count: total,
            covered_benefits_count: covered_count,
            missing_benefits: missing_names,
            covered_benefits: covered_names,
        };
        (components, analysis)
    }

    /// Penalizes required benefits the household still needs (not in
    /// `excluded_benefits_ok`) that the plan explicitly lists as not covered.
    fn exclusion_penalty(&self, plan: &Plan, profile: &UserProfile) -> f64 {
        let required = profile.required_benefits();
        let ok = profile.excluded_benefits_ok();
        if ok.is_empty() {
            return 1.0;
        }
        let excluded_needed = required
            .iter()
            .filter(|key| !ok.contains(*key))
            .filter(|key| plan.benefit_by_key(key).is_some_and(|b| b.is_not_covered()))
            .count();
        inverse_ratio(excluded_needed, required.len()).unwrap_or(1.0)
    }
}

impl ScoringAgent for CoverageAgent {
    type Analysis = CoverageAnalysis;

    fn dimension(&self) -> Dimension {
        Dimension::Coverage
    }

    fn evaluate(&self, plan: &Plan, profile: &UserProfile) -> AgentOutput<CoverageAnalysis> {
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
    use crate::model::{CostSharingPreference, ExpectedUsage, PlanBenefit, PriorityWeights};

    fn profile(required: &[&str]) -> UserProfile {
        UserProfile::new(
            1,
            0,
            ExpectedUsage::Medium,
            PriorityWeights::default(),
            CostSharingPreference::Either,
        )
        .unwrap()
        .with_required_benefits(required.iter().copied())
    }

    fn covered(name: &str) -> PlanBenefit {
        PlanBenefit::new(name).with_covered(true).with_ehb(true)
    }

    #[test]
    fn test_all_required_covered() {
        let plan = Plan::new("P1")
            .with_benefit(covered("Basic Dental Care - Adult"))
            .with_benefit(covered("Routine Eye Exam"));
        let out = CoverageAgent::default().evaluate(
            &plan,
            &profile(&["basic dental care - adult", "ROUTINE eye exam"]),
        );

        // 0.4 * 1 + 0.2 * 1 + 0.2 * (2 / 20) + 0.2 * 1
        assert!((out.score - 0.82).abs() < 1e-12);
        assert_eq!(out.analysis.required_benefits_covered, 2);
        assert!(out.analysis.missing_benefits.is_empty());
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn test_absent_required_benefit_counts_as_missing() {
        let plan = Plan::new("P1").with_benefit(covered("Basic Dental Care - Adult"));
        let out = CoverageAgent::default().evaluate(
            &plan,
            &profile(&["Basic Dental Care - Adult", "Orthodontia - Child"]),
        );

        assert_eq!(out.analysis.required_benefits_covered, 1);
        assert_eq!(out.analysis.required_benefits_total, 2);
        assert_eq!(out.analysis.missing_benefits, vec!["orthodontia - child"]);
        // 0.4 * 0.5 + 0.2 * 1 + 0.2 * 0.05 + 0.2 * 1
        assert!((out.score - 0.61).abs() < 1e-12);
    }

    #[test]
    fn test_empty_requirements_give_full_ratio() {
        let plan = Plan::new("P1").with_benefit(covered("A"));
        let agent = CoverageAgent::default();
        let mut d = Diagnostics::new();
        let (c, _) = agent.components(&plan, &profile(&[]), &mut d);
        assert!((c.required_ratio - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_plan_uses_neutral_ehb() {
        let out = CoverageAgent::default().evaluate(&Plan::new("EMPTY"), &profile(&["A"]));
        // 0.4 * 0 + 0.2 * 0.5 + 0.2 * 0 + 0.2 * 1
        assert!((out.score - 0.3).abs() < 1e-12);
        assert_eq!(out.diagnostics.count(DiagnosticKind::MissingData), 1);
    }

    #[test]
    fn test_exclusion_penalty_only_for_needed_benefits() {
        let plan = Plan::new("P1")
            .with_benefit(covered("A"))
            .with_benefit(PlanBenefit::new("B").with_covered(false))
            .with_benefit(PlanBenefit::new("C").with_covered(false));
        let p = profile(&["A", "B", "C", "D"]).with_excluded_benefits_ok(["C"]);

        let mut d = Diagnostics::new();
        let (c, _) = CoverageAgent::default().components(&plan, &p, &mut d);
        // B is needed and explicitly not covered; C is acceptable; D is absent.
        assert!((c.exclusion_penalty - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_breadth_saturates() {
        let mut plan = Plan::new("P1");
        for i in 0..30 {
            plan.insert_benefit(covered(&format!("Benefit {i}")));
        }
        let mut d = Diagnostics::new();
        let (c, a) = CoverageAgent::default().components(&plan, &profile(&[]), &mut d);
        assert!((c.breadth - 1.0).abs() < 1e-12);
        assert_eq!(a.covered_benefits_count, 30);
    }
}
