//! End-to-end recommendation pipeline.
//!
//! [`RecommendationEngine`] wires the pieces together:
//! score every plan → build its reasoning chain → rank → select top N.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::config::RecommendConfig;
use crate::error::{PlanfitError, Result};
use crate::model::{Plan, Recommendation, UserProfile};
use crate::ranking::{RankingEngine, TopN};
use crate::reasoning::ReasoningBuilder;
use crate::scoring::ScoringOrchestrator;

/// Produces ranked, explained recommendations for a household.
///
/// Every plan passed in is scored; none is skipped for incomplete data.
/// Scoring may run in parallel, but the output order is decided only by
/// the ranking engine, so parallel and sequential runs return identical
/// results.
///
/// # Usage
///
/// ```ignore
/// let engine = RecommendationEngine::new(RecommendConfig::default());
/// let top3 = engine.recommend(&plans, &profile, TopN::First(3))?;
/// for r in &top3 {
///     println!("{} {} {:.3}", r.rank(), r.plan_id(), r.overall_score());
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine {
    config: RecommendConfig,
}

impl RecommendationEngine {
    pub fn new(config: RecommendConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RecommendConfig {
        &self.config
    }

    /// Scores, explains and ranks `plans` for `profile`.
    ///
    /// # Errors
    /// Returns [`PlanfitError::Configuration`] for an empty catalog,
    /// duplicate plan ids, invalid priority weights or an invalid
    /// configuration.
    pub fn recommend(
        &self,
        plans: &[Plan],
        profile: &UserProfile,
        top_n: TopN,
    ) -> Result<Vec<Recommendation>> {
        self.recommend_with_cancel(plans, profile, top_n, None)
    }

    /// Like [`recommend`](Self::recommend), with an optional cancellation
    /// token.
    ///
    /// Cancellation aborts the whole batch with [`PlanfitError::Cancelled`];
    /// a partial ranking is never returned.
    pub fn recommend_with_cancel(
        &self,
        plans: &[Plan],
        profile: &UserProfile,
        top_n: TopN,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<Vec<Recommendation>> {
        self.config.validate()?;
        check_catalog(plans)?;

        let orchestrator =
            ScoringOrchestrator::new(profile.priorities(), self.config.scoring.clone())?;
        let builder = ReasoningBuilder::new(self.config.style);

        let is_cancelled = || {
            cancel
                .as_ref()
                .is_some_and(|flag| flag.load(Ordering::Relaxed))
        };

        let evaluate = |plan: &Plan| -> Option<Recommendation> {
            if is_cancelled() {
                return None;
            }
            let eval = orchestrator.score_plan(plan, profile);
            let reasoning = builder.build(&eval.analyses);
            Some(Recommendation::new(
                eval.plan_id,
                eval.overall,
                eval.fit,
                reasoning,
                eval.diagnostics.into_vec(),
            ))
        };

        let scored = map_plans(plans, self.config.parallel, evaluate);
        let recommendations = match scored {
            Some(recs) if !is_cancelled() => recs,
            _ => {
                tracing::warn!(plans = plans.len(), "recommendation batch cancelled");
                return Err(PlanfitError::Cancelled);
            }
        };

        let diagnostics: usize = recommendations.iter().map(|r| r.diagnostics().len()).sum();
        let ranked = RankingEngine::new()
            .with_epsilon(self.config.epsilon)
            .rank(recommendations, top_n);

        tracing::info!(
            plans = plans.len(),
            returned = ranked.len(),
            top_plan = ranked.first().map(|r| r.plan_id()).unwrap_or("-"),
            top_score = ranked.first().map_or(0.0, |r| r.overall_score()),
            diagnostics,
            "recommendations ranked"
        );

        Ok(ranked)
    }

    /// Like [`recommend`](Self::recommend), pairing each recommendation
    /// with the plan it describes.
    pub fn recommend_with_plans<'a>(
        &self,
        plans: &'a [Plan],
        profile: &UserProfile,
        top_n: TopN,
    ) -> Result<Vec<(Recommendation, &'a Plan)>> {
        let ranked = self.recommend(plans, profile, top_n)?;
        // Plan ids are unique, checked by `recommend`.
        let by_id: HashMap<&str, &'a Plan> = plans.iter().map(|p| (p.plan_id(), p)).collect();
        Ok(ranked
            .into_iter()
            .filter_map(|r| {
                let plan = *by_id.get(r.plan_id())?;
                Some((r, plan))
            })
            .collect())
    }
}

fn check_catalog(plans: &[Plan]) -> Result<()> {
    if plans.is_empty() {
        return Err(PlanfitError::config("plan catalog is empty"));
    }
    let mut seen = BTreeSet::new();
    for plan in plans {
        if !seen.insert(plan.plan_id()) {
            return Err(PlanfitError::config(format!(
                "duplicate plan id {} in catalog",
                plan.plan_id()
            )));
        }
    }
    Ok(())
}

#[cfg(feature = "parallel")]
fn map_plans<F>(plans: &[Plan], parallel: bool, f: F) -> Option<Vec<Recommendation>>
where
    F: Fn(&Plan) -> Option<Recommendation> + Sync + Send,
{
    if parallel {
        plans.par_iter().map(f).collect()
    } else {
        plans.iter().map(f).collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn map_plans<F>(plans: &[Plan], _parallel: bool, f: F) -> Option<Vec<Recommendation>>
where
    F: Fn(&Plan) -> Option<Recommendation>,
{
    plans.iter().map(f).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        CostShare, CostSharingPreference, ExpectedUsage, PlanBenefit, PriorityWeights,
    };

    fn profile() -> UserProfile {
        UserProfile::new(
            2,
            1,
            ExpectedUsage::Medium,
            PriorityWeights::default(),
            CostSharingPreference::Either,
        )
        .unwrap()
        .with_required_benefits(["Routine Eye Exam for Children", "Basic Dental Care - Child"])
    }

    fn plan(id: &str, rate: f64) -> Plan {
        Plan::new(id)
            .with_benefit(
                PlanBenefit::new("Routine Eye Exam for Children")
                    .with_covered(true)
                    .with_ehb(true)
                    .with_coinsurance(CostShare::Percent(rate)),
            )
            .with_benefit(
                PlanBenefit::new("Basic Dental Care - Child")
                    .with_covered(true)
                    .with_coinsurance(CostShare::Percent(rate)),
            )
    }

    fn catalog() -> Vec<Plan> {
        vec![plan("P-HIGH", 40.0), plan("P-LOW", 0.0), plan("P-MID", 20.0)]
    }

    #[test]
    fn test_recommend_orders_by_score() {
        let engine = RecommendationEngine::default();
        let ranked = engine.recommend(&catalog(), &profile(), TopN::All).unwrap();
        let ids: Vec<_> = ranked.iter().map(|r| r.plan_id()).collect();
        assert_eq!(ids, vec!["P-LOW", "P-MID", "P-HIGH"]);
        assert_eq!(ranked[0].rank(), 1);
        assert_eq!(ranked[2].rank(), 3);
        assert_eq!(ranked[0].explanations().len(), 4);
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let err = RecommendationEngine::default()
            .recommend(&[], &profile(), TopN::All)
            .unwrap_err();
        assert!(matches!(err, PlanfitError::Configuration(_)));
    }

    #[test]
    fn test_duplicate_plan_id_rejected() {
        let plans = vec![plan("P1", 0.0), plan("P1", 10.0)];
        assert!(RecommendationEngine::default()
            .recommend(&plans, &profile(), TopN::All)
            .is_err());
    }

    #[test]
    fn test_negative_weight_rejected() {
        let p = profile().with_priorities(PriorityWeights::new(0.5, -0.5, 1.0));
        let err = RecommendationEngine::default()
            .recommend(&catalog(), &p, TopN::All)
            .unwrap_err();
        assert!(matches!(err, PlanfitError::Configuration(_)));
    }

    #[test]
    fn test_cancelled_batch() {
        let flag = Arc::new(AtomicBool::new(true));
        let err = RecommendationEngine::default()
            .recommend_with_cancel(&catalog(), &profile(), TopN::All, Some(flag))
            .unwrap_err();
        assert_eq!(err, PlanfitError::Cancelled);
    }

    #[test]
    fn test_unset_cancel_flag_completes() {
        let flag = Arc::new(AtomicBool::new(false));
        let ranked = RecommendationEngine::default()
            .recommend_with_cancel(&catalog(), &profile(), TopN::All, Some(flag))
            .unwrap();
        assert_eq!(ranked.len(), 3);
    }

    #[test]
    fn test_recommend_with_plans() {
        let plans = catalog();
        let pairs = RecommendationEngine::default()
            .recommend_with_plans(&plans, &profile(), TopN::First(2))
            .unwrap();
        assert_eq!(pairs.len(), 2);
        for (rec, plan) in &pairs {
            assert_eq!(rec.plan_id(), plan.plan_id());
        }
    }

    #[test]
    fn test_recommend_with_plans_large_catalog() {
        let plans: Vec<Plan> = (0..200)
            .map(|i| plan(&format!("P-{i:03}"), f64::from(i % 50)))
            .collect();
        let pairs = RecommendationEngine::default()
            .recommend_with_plans(&plans, &profile(), TopN::All)
            .unwrap();
        assert_eq!(pairs.len(), plans.len());
        for (rec, plan) in &pairs {
            assert!(std::ptr::eq(*plan, plans.iter().find(|p| p.plan_id() == rec.plan_id()).unwrap()));
        }
        assert_eq!(pairs[0].0.plan_id(), "P-000");
    }

    #[test]
    fn test_tiny_epsilon_rejected() {
        let err = RecommendationEngine::new(RecommendConfig::default().with_epsilon(1e-20))
            .recommend(&catalog(), &profile(), TopN::All)
            .unwrap_err();
        assert!(matches!(err, PlanfitError::Configuration(_)));
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let plans = catalog();
        let par = RecommendationEngine::new(RecommendConfig::default().with_parallel(true))
            .recommend(&plans, &profile(), TopN::All)
            .unwrap();
        let seq = RecommendationEngine::new(RecommendConfig::default().with_parallel(false))
            .recommend(&plans, &profile(), TopN::All)
            .unwrap();
        assert_eq!(par, seq);
    }
}
