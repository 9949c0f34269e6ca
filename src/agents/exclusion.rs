//! Exclusion agent.
//!
//! ```text
//! score = 0.7 * complexity + 0.3 * prior_coverage
//! ```

use std::sync::OnceLock;

use regex::Regex;

use super::types::{inverse_ratio, AgentOutput, ScoringAgent};
use crate::diagnostics::{clamp_unit, Diagnostics};
use crate::model::{Dimension, ExclusionAnalysis, Plan, UserProfile};
use crate::scoring::ScoringConfig;

const COMPLEXITY_INDICATORS: [&str; 6] = [
    "see policy",
    "see contract",
    "subject to",
    "may be excluded",
    "varies by",
    "consult",
];

const PRIOR_COVERAGE_KEYWORDS: [&str; 6] = [
    "prior coverage",
    "previous coverage",
    "must have had",
    "continuous coverage",
    "preexisting",
    "pre-existing",
];

fn waiting_period_patterns() -> &'static [Regex; 2] {
    static PATTERNS: OnceLock<[Regex; 2]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(r"(?i)(\d+)[\s-]*(month|year|day)s?[\s-]+waiting period")
                .expect("valid waiting period pattern"),
            Regex::new(r"(?i)waiting period of\s+(\d+)[\s-]*(month|year|day)s?")
                .expect("valid waiting period pattern"),
        ]
    })
}

/// Extracts waiting periods from exclusion text, converted to whole months.
///
/// Recognizes "12 month waiting period", "6-month waiting period" and
/// "waiting period of 1 year". Days are converted at 30 per month.
pub fn waiting_periods_months(
    text: &str,
    plan_id: &str,
    benefit: &str,
    diagnostics: &mut Diagnostics,
) -> Vec<u32> {
    let mut months = Vec::new();
    for pattern in waiting_period_patterns() {
        for caps in pattern.captures_iter(text) {
            let Ok(n) = caps[1].parse::<u32>() else {
                diagnostics.extraction_failure(
                    plan_id,
                    format!(
                        "exclusion: unparseable waiting period {:?} for {benefit}: {text:?}",
                        &caps[1]
                    ),
                );
                continue;
            };
            let unit = caps[2].to_lowercase();
            months.push(match unit.as_str() {
                "year" => n.saturating_mul(12),
                "day" => n / 30,
                _ => n,
            });
        }
    }
    months
}

/// The two exclusion sub-scores, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExclusionComponents {
    pub complexity: f64,
    pub prior_coverage: f64,
}

impl ExclusionComponents {
    /// Weighted combination, before clamping.
    pub fn combined(&self) -> f64 {
        0.7 * self.complexity + 0.3 * self.prior_coverage
    }
}

/// Scores how complicated and restrictive a plan's exclusions are.
#[derive(Debug, Clone, Default)]
pub struct ExclusionAgent {
    config: ScoringConfig,
}

impl ExclusionAgent {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Computes the sub-scores and analysis without combining them.
    pub fn components(
        &self,
        plan: &Plan,
        _profile: &UserProfile,
        diagnostics: &mut Diagnostics,
    ) -> (ExclusionComponents, ExclusionAnalysis) {
        let plan_id = plan.plan_id();

        let mut with_exclusions = 0usize;
        let mut complex = 0usize;
        let mut prior_benefits = Vec::new();
        let mut longest: Option<u32> = None;

        for (_, benefit) in plan.benefits() {
            let Some(text) = benefit.exclusions.as_deref() else {
                continue;
            };
            if text.trim().is_empty() {
                continue;
            }
            with_exclusions += 1;
            let lower = text.to_lowercase();

            let waits = waiting_periods_months(text, plan_id, &benefit.benefit_name, diagnostics);
            let longest_here = waits.iter().copied().max();
            if let Some(m) = longest_here {
                longest = Some(longest.map_or(m, |l| l.max(m)));
            }

            let long_wait =
                longest_here.is_some_and(|m| m >= self.config.long_waiting_period_months);
            if long_wait || COMPLEXITY_INDICATORS.iter().any(|k| lower.contains(k)) {
                complex += 1;
            }
            if PRIOR_COVERAGE_KEYWORDS.iter().any(|k| lower.contains(k)) {
                prior_benefits.push(benefit.benefit_name.clone());
            }
        }

        let complexity = inverse_ratio(complex, with_exclusions).unwrap_or(1.0);
        let prior_coverage = inverse_ratio(prior_benefits.len(), plan.benefit_count())
            .unwrap_or_else(|| {
                diagnostics.missing_data(
                    plan_id,
                    format!(
                        "exclusion: plan lists no benefits, prior coverage uses neutral {:.2}",
                        self.config.neutral_score
                    ),
                );
                self.config.neutral_score
            });

        let components = ExclusionComponents {
            complexity,
            prior_coverage,
        };
        let analysis = ExclusionAnalysis {
            total_benefits: plan.benefit_count(),
            benefits_with_exclusions: with_exclusions,
            complex_exclusions: complex,
            prior_coverage_required: !prior_benefits.is_empty(),
            prior_coverage_benefits: prior_benefits,
            longest_waiting_period_months: longest,
        };
        (components, analysis)
    }
}

impl ScoringAgent for ExclusionAgent {
    type Analysis = ExclusionAnalysis;

    fn dimension(&self) -> Dimension {
        Dimension::Exclusion
    }

    fn evaluate(&self, plan: &Plan, profile: &UserProfile) -> AgentOutput<ExclusionAnalysis> {
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

    fn profile() -> UserProfile {
        UserProfile::new(
            1,
            0,
            ExpectedUsage::Medium,
            PriorityWeights::default(),
            CostSharingPreference::Either,
        )
        .unwrap()
    }

    #[test]
    fn test_waiting_period_extraction() {
        let mut d = Diagnostics::new();
        assert_eq!(
            waiting_periods_months("12 month waiting period applies", "P", "A", &mut d),
            vec![12]
        );
        assert_eq!(
            waiting_periods_months("Subject to a 6-month waiting period", "P", "A", &mut d),
            vec![6]
        );
        assert_eq!(
            waiting_periods_months("Waiting period of 1 year for crowns", "P", "A", &mut d),
            vec![12]
        );
        assert_eq!(
            waiting_periods_months("waiting period of 90 days", "P", "A", &mut d),
            vec![3]
        );
        assert!(waiting_periods_months("No waiting period", "P", "A", &mut d).is_empty());
        assert!(d.is_empty());
    }

    #[test]
    fn test_no_exclusions_full_score() {
        let plan = Plan::new("P1").with_benefit(PlanBenefit::new("A").with_covered(true));
        let out = ExclusionAgent::default().evaluate(&plan, &profile());
        assert!((out.score - 1.0).abs() < 1e-12);
        assert!(!out.analysis.prior_coverage_required);
        assert_eq!(out.analysis.longest_waiting_period_months, None);
    }

    #[test]
    fn test_complex_and_prior_coverage() {
        let plan = Plan::new("P1")
            .with_benefit(PlanBenefit::new("A").with_exclusions("See policy for details"))
            .with_benefit(PlanBenefit::new("B").with_exclusions("Limited to 1 per year"))
            .with_benefit(
                PlanBenefit::new("C").with_exclusions("Requires 12 months of prior coverage"),
            )
            .with_benefit(PlanBenefit::new("D"));
        let mut d = Diagnostics::new();
        let (c, a) = ExclusionAgent::default().components(&plan, &profile(), &mut d);

        assert_eq!(a.benefits_with_exclusions, 3);
        assert_eq!(a.complex_exclusions, 1);
        assert!(a.prior_coverage_required);
        assert_eq!(a.prior_coverage_benefits, vec!["C"]);
        assert!((c.complexity - 2.0 / 3.0).abs() < 1e-12);
        assert!((c.prior_coverage - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_long_waiting_period_is_complex() {
        let plan = Plan::new("P1")
            .with_benefit(PlanBenefit::new("Major").with_exclusions("24 month waiting period"))
            .with_benefit(PlanBenefit::new("Basic").with_exclusions("6 month waiting period"));
        let mut d = Diagnostics::new();
        let (c, a) = ExclusionAgent::default().components(&plan, &profile(), &mut d);
        assert_eq!(a.complex_exclusions, 1);
        assert_eq!(a.longest_waiting_period_months, Some(24));
        assert!((c.complexity - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_plan_prior_coverage_neutral() {
        let out = ExclusionAgent::default().evaluate(&Plan::new("EMPTY"), &profile());
        // 0.7 * 1.0 + 0.3 * 0.5
        assert!((out.score - 0.85).abs() < 1e-12);
        assert_eq!(out.diagnostics.count(DiagnosticKind::MissingData), 1);
    }
}
