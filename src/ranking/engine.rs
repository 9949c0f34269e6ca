//! Ranking and tie-break engine.

use std::cmp::Ordering;

use super::types::TopN;
use crate::model::Recommendation;

/// Smallest accepted quantization step. Scores lie in `[0, 1]`, so bucket
/// indices stay far below `i64::MAX`.
pub const MIN_EPSILON: f64 = f64::EPSILON;

/// Sorts recommendations into a deterministic total order and numbers them.
///
/// Sort keys, in order:
///
/// 1. overall score, descending;
/// 2. coverage fit score, descending;
/// 3. number of benefits with restrictive limits, ascending;
/// 4. plan id, ascending (lexicographic).
///
/// Scores are compared after quantization to `epsilon`-wide buckets, so
/// float noise below `epsilon` does not decide an order while the
/// comparison stays transitive. Two plans with distinct ids never compare
/// equal.
///
/// # Examples
///
/// ```ignore
/// let ranked = RankingEngine::new().rank(recommendations, TopN::First(3));
/// assert!(ranked.iter().map(|r| r.rank()).eq(1..=ranked.len()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingEngine {
    epsilon: f64,
}

impl RankingEngine {
    /// Creates an engine with `epsilon = 1e-9`.
    pub fn new() -> Self {
        Self { epsilon: 1e-9 }
    }

    /// Sets the score quantization step. Non-finite values and values
    /// below [`MIN_EPSILON`] are ignored.
    pub fn with_epsilon(mut self, eps: f64) -> Self {
        if eps.is_finite() && eps >= MIN_EPSILON {
            self.epsilon = eps;
        }
        self
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    fn bucket(&self, score: f64) -> i64 {
        (score / self.epsilon).round() as i64
    }

    /// Total order used by [`rank`](Self::rank); `Less` means `a` ranks
    /// ahead of `b`.
    pub fn compare(&self, a: &Recommendation, b: &Recommendation) -> Ordering {
        self.bucket(b.overall_score())
            .cmp(&self.bucket(a.overall_score()))
            .then_with(|| {
                self.bucket(b.user_fit_scores().coverage)
                    .cmp(&self.bucket(a.user_fit_scores().coverage))
            })
            .then_with(|| {
                a.restrictive_limit_count()
                    .cmp(&b.restrictive_limit_count())
            })
            .then_with(|| a.plan_id().cmp(b.plan_id()))
    }

    /// Sorts, truncates to `top_n` and assigns ranks `1..=len`.
    pub fn rank(&self, mut recommendations: Vec<Recommendation>, top_n: TopN) -> Vec<Recommendation> {
        recommendations.sort_by(|a, b| self.compare(a, b));
        let keep = top_n.limit(recommendations.len());
        recommendations.truncate(keep);
        recommendations
            .into_iter()
            .enumerate()
            .map(|(i, r)| r.with_rank(i + 1))
            .collect()
    }

    /// Returns the index of the best recommendation, or `None` if empty.
    pub fn select_best(&self, recommendations: &[Recommendation]) -> Option<usize> {
        (0..recommendations.len())
            .min_by(|&a, &b| self.compare(&recommendations[a], &recommendations[b]))
    }
}

impl Default for RankingEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Analyses, CostAnalysis, CostSharingMethod, CostSharingPreference, CoverageAnalysis,
        ExclusionAnalysis, FitScores, LimitAnalysis, ReasoningChain,
    };

    fn rec(id: &str, overall: f64, coverage: f64, restrictive: usize) -> Recommendation {
        let analyses = Analyses {
            coverage: CoverageAnalysis {
                required_benefits_covered: 0,
                required_benefits_total: 0,
                ehb_benefits_count: 0,
                total_benefits_count: 0,
                covered_benefits_count: 0,
                missing_benefits: vec![],
                covered_benefits: vec![],
            },
            cost: CostAnalysis {
                avg_coinsurance_rate: None,
                copay_available: false,
                annual_maximum: None,
                out_of_network_rate: None,
                cost_sharing_method: CostSharingMethod::Mixed,
                preference: CostSharingPreference::Either,
            },
            limit: LimitAnalysis {
                benefits_with_quantity_limits: 0,
                benefits_with_time_limits: 0,
                benefits_with_exclusion_periods: 0,
                total_covered_benefits: 0,
                restrictive_limits: (0..restrictive).map(|i| format!("B{i}")).collect(),
            },
            exclusion: ExclusionAnalysis {
                total_benefits: 0,
                benefits_with_exclusions: 0,
                complex_exclusions: 0,
                prior_coverage_required: false,
                prior_coverage_benefits: vec![],
                longest_waiting_period_months: None,
            },
        };
        let reasoning = ReasoningChain {
            analyses,
            explanations: vec![],
            strengths: vec![],
            weaknesses: vec![],
            trade_offs: vec![],
        };
        let fit = FitScores {
            coverage,
            cost: 0.5,
            limit: 0.5,
            exclusion: 0.5,
        };
        Recommendation::new(id, overall, fit, reasoning, vec![])
    }

    fn ids(recs: &[Recommendation]) -> Vec<&str> {
        recs.iter().map(|r| r.plan_id()).collect()
    }

    #[test]
    fn test_sort_by_overall() {
        let ranked = RankingEngine::new().rank(
            vec![rec("A", 0.5, 0.5, 0), rec("B", 0.9, 0.5, 0), rec("C", 0.7, 0.5, 0)],
            TopN::All,
        );
        assert_eq!(ids(&ranked), vec!["B", "C", "A"]);
        assert_eq!(
            ranked.iter().map(|r| r.rank()).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_tie_break_chain() {
        let ranked = RankingEngine::new().rank(
            vec![
                rec("Z", 0.8, 0.6, 0),
                rec("Y", 0.8, 0.7, 3),
                rec("X", 0.8, 0.6, 1),
                rec("W", 0.8, 0.6, 0),
            ],
            TopN::All,
        );
        // Y wins on coverage; W and Z tie on restrictive count, id decides.
        assert_eq!(ids(&ranked), vec!["Y", "W", "Z", "X"]);
    }

    #[test]
    fn test_float_noise_does_not_split_ties() {
        let ranked = RankingEngine::new().rank(
            vec![rec("B", 0.8 + 1e-13, 0.6, 0), rec("A", 0.8, 0.6, 0)],
            TopN::All,
        );
        assert_eq!(ids(&ranked), vec!["A", "B"]);
    }

    #[test]
    fn test_input_order_irrelevant() {
        let a = vec![rec("A", 0.7, 0.5, 1), rec("B", 0.7, 0.5, 0), rec("C", 0.2, 0.9, 0)];
        let mut b = a.clone();
        b.reverse();
        let engine = RankingEngine::new();
        assert_eq!(engine.rank(a, TopN::All), engine.rank(b, TopN::All));
    }

    #[test]
    fn test_top_n() {
        let recs = || vec![rec("A", 0.1, 0.5, 0), rec("B", 0.2, 0.5, 0), rec("C", 0.3, 0.5, 0)];
        let engine = RankingEngine::new();
        assert!(engine.rank(recs(), TopN::First(0)).is_empty());
        assert_eq!(engine.rank(recs(), TopN::First(10)).len(), 3);
        let two = engine.rank(recs(), TopN::First(2));
        assert_eq!(ids(&two), vec!["C", "B"]);
        assert_eq!(two[1].rank(), 2);
    }

    #[test]
    fn test_select_best() {
        let engine = RankingEngine::new();
        let recs = vec![rec("A", 0.4, 0.5, 0), rec("B", 0.6, 0.5, 0)];
        assert_eq!(engine.select_best(&recs), Some(1));
        assert_eq!(engine.select_best(&[]), None);
    }

    #[test]
    fn test_epsilon_builder() {
        assert!((RankingEngine::new().with_epsilon(-1.0).epsilon() - 1e-9).abs() < 1e-20);
        assert!((RankingEngine::new().with_epsilon(1e-6).epsilon() - 1e-6).abs() < 1e-20);
        assert!((RankingEngine::new().with_epsilon(1e-20).epsilon() - 1e-9).abs() < 1e-20);
    }

    #[test]
    fn test_tiny_epsilon_keeps_score_order() {
        let recs = || vec![rec("A-worse", 0.53, 0.5, 0), rec("B-better", 0.80, 0.5, 0)];

        let ranked = RankingEngine::new().with_epsilon(1e-20).rank(recs(), TopN::All);
        assert_eq!(ids(&ranked), vec!["B-better", "A-worse"]);

        let ranked = RankingEngine::new().with_epsilon(MIN_EPSILON).rank(recs(), TopN::All);
        assert_eq!(ids(&ranked), vec!["B-better", "A-worse"]);
    }
}
