//! Household profile and priority weights.

use std::collections::BTreeSet;

use super::plan::canonical_benefit_name;
use crate::error::{PlanfitError, Result};

/// Expected healthcare usage level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExpectedUsage {
    Low,
    #[default]
    Medium,
    High,
}

/// Preferred cost-sharing arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CostSharingPreference {
    Copay,
    Coinsurance,
    #[default]
    Either,
}

/// Relative importance of the weighted scoring dimensions.
///
/// Weights must be non-negative and are intended to sum to 1.0; the
/// scoring orchestrator re-normalizes them regardless of their raw sum.
///
/// # Presets
///
/// ```
/// use u_planfit::model::PriorityWeights;
///
/// let w = PriorityWeights::coverage_focused();
/// assert!((w.coverage - 0.6).abs() < 1e-12);
/// assert!((w.sum() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PriorityWeights {
    pub coverage: f64,
    pub cost: f64,
    pub limit: f64,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            coverage: 0.4,
            cost: 0.4,
            limit: 0.2,
        }
    }
}

impl PriorityWeights {
    pub fn new(coverage: f64, cost: f64, limit: f64) -> Self {
        Self {
            coverage,
            cost,
            limit,
        }
    }

    pub fn coverage_focused() -> Self {
        Self::new(0.6, 0.3, 0.1)
    }

    pub fn cost_focused() -> Self {
        Self::new(0.2, 0.7, 0.1)
    }

    pub fn balanced() -> Self {
        Self::new(0.33, 0.33, 0.34)
    }

    pub fn sum(&self) -> f64 {
        self.coverage + self.cost + self.limit
    }

    /// Rejects negative or non-finite weights.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("coverage", self.coverage),
            ("cost", self.cost),
            ("limit", self.limit),
        ] {
            if !value.is_finite() {
                return Err(PlanfitError::config(format!(
                    "{name} weight must be finite, got {value}"
                )));
            }
            if value < 0.0 {
                return Err(PlanfitError::config(format!(
                    "{name} weight must be non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Optional budget limits the household stated.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BudgetConstraints {
    pub max_monthly_premium: Option<f64>,
    pub max_annual_out_of_pocket: Option<f64>,
    pub max_copay_per_visit: Option<f64>,
}

impl BudgetConstraints {
    /// Whether a premium or out-of-pocket cap is present.
    pub fn caps_spending(&self) -> bool {
        self.max_monthly_premium.is_some() || self.max_annual_out_of_pocket.is_some()
    }

    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("max_monthly_premium", self.max_monthly_premium),
            ("max_annual_out_of_pocket", self.max_annual_out_of_pocket),
            ("max_copay_per_visit", self.max_copay_per_visit),
        ] {
            if let Some(v) = value {
                if v.is_nan() || v < 0.0 {
                    return Err(PlanfitError::config(format!(
                        "{name} must be non-negative, got {v}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// A household's requirements and preferences.
///
/// Benefit names are canonicalized on the way in, so lookups against a
/// [`Plan`](super::Plan) are case- and whitespace-insensitive.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserProfile {
    adults_count: u32,
    children_count: u32,
    expected_usage: ExpectedUsage,
    priorities: PriorityWeights,
    required_benefits: BTreeSet<String>,
    excluded_benefits_ok: BTreeSet<String>,
    preferred_cost_sharing: CostSharingPreference,
    budget: Option<BudgetConstraints>,
}

impl UserProfile {
    /// Creates a profile with no benefit requirements.
    ///
    /// # Errors
    /// Returns [`PlanfitError::Configuration`] when there is no adult or the
    /// family size does not fit in a `u32`.
    pub fn new(
        adults_count: u32,
        children_count: u32,
        expected_usage: ExpectedUsage,
        priorities: PriorityWeights,
        preferred_cost_sharing: CostSharingPreference,
    ) -> Result<Self> {
        if adults_count < 1 {
            return Err(PlanfitError::config(format!(
                "adults_count must be at least 1, got {adults_count}"
            )));
        }
        family_size(adults_count, children_count)?;
        Ok(Self {
            adults_count,
            children_count,
            expected_usage,
            priorities,
            required_benefits: BTreeSet::new(),
            excluded_benefits_ok: BTreeSet::new(),
            preferred_cost_sharing,
            budget: None,
        })
    }

    /// Replaces the required benefit set.
    pub fn with_required_benefits<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.required_benefits = canonical_set(names);
        self
    }

    /// Replaces the set of benefits the household does not need.
    pub fn with_excluded_benefits_ok<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.excluded_benefits_ok = canonical_set(names);
        self
    }

    pub fn with_priorities(mut self, priorities: PriorityWeights) -> Self {
        self.priorities = priorities;
        self
    }

    /// Attaches budget constraints.
    ///
    /// # Errors
    /// Returns [`PlanfitError::Configuration`] for negative amounts.
    pub fn with_budget(mut self, budget: BudgetConstraints) -> Result<Self> {
        budget.validate()?;
        self.budget = Some(budget);
        Ok(self)
    }

    pub fn adults_count(&self) -> u32 {
        self.adults_count
    }

    pub fn children_count(&self) -> u32 {
        self.children_count
    }

    /// Always `adults_count + children_count`.
    pub fn family_size(&self) -> u32 {
        self.adults_count.saturating_add(self.children_count)
    }

    pub fn expected_usage(&self) -> ExpectedUsage {
        self.expected_usage
    }

    pub fn priorities(&self) -> PriorityWeights {
        self.priorities
    }

    /// Canonical required benefit names, sorted.
    pub fn required_benefits(&self) -> &BTreeSet<String> {
        &self.required_benefits
    }

    /// Canonical names of benefits the household can do without.
    pub fn excluded_benefits_ok(&self) -> &BTreeSet<String> {
        &self.excluded_benefits_ok
    }

    pub fn preferred_cost_sharing(&self) -> CostSharingPreference {
        self.preferred_cost_sharing
    }

    pub fn budget(&self) -> Option<&BudgetConstraints> {
        self.budget.as_ref()
    }
}

/// `adults + children`, or a configuration error on overflow.
pub(crate) fn family_size(adults: u32, children: u32) -> Result<u32> {
    adults.checked_add(children).ok_or_else(|| {
        PlanfitError::config(format!(
            "family size overflows: {adults} adults and {children} children"
        ))
    })
}

fn canonical_set<I, S>(names: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|n| canonical_benefit_name(n.as_ref()))
        .filter(|n| !n.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        UserProfile::new(
            2,
            1,
            ExpectedUsage::Medium,
            PriorityWeights::default(),
            CostSharingPreference::Either,
        )
        .unwrap()
    }

    #[test]
    fn test_family_size_is_sum() {
        let p = profile();
        assert_eq!(p.family_size(), 3);
        assert_eq!(p.adults_count(), 2);
        assert_eq!(p.children_count(), 1);
    }

    #[test]
    fn test_requires_an_adult() {
        let err = UserProfile::new(
            0,
            2,
            ExpectedUsage::Low,
            PriorityWeights::default(),
            CostSharingPreference::Either,
        );
        assert!(matches!(err, Err(PlanfitError::Configuration(_))));
    }

    #[test]
    fn test_family_size_overflow_rejected() {
        let err = UserProfile::new(
            u32::MAX,
            1,
            ExpectedUsage::Low,
            PriorityWeights::default(),
            CostSharingPreference::Either,
        );
        assert!(matches!(err, Err(PlanfitError::Configuration(_))));

        let max = UserProfile::new(
            u32::MAX - 1,
            1,
            ExpectedUsage::Low,
            PriorityWeights::default(),
            CostSharingPreference::Either,
        )
        .unwrap();
        assert_eq!(max.family_size(), u32::MAX);
    }

    #[test]
    fn test_benefit_names_canonicalized_and_deduplicated() {
        let p = profile().with_required_benefits([
            "Basic Dental Care - Adult",
            "basic  dental care - ADULT",
            "  ",
            "Orthodontia - Child",
        ]);
        let names: Vec<_> = p.required_benefits().iter().cloned().collect();
        assert_eq!(
            names,
            vec!["basic dental care - adult", "orthodontia - child"]
        );
    }

    #[test]
    fn test_weight_presets_sum_to_one() {
        for w in [
            PriorityWeights::default(),
            PriorityWeights::coverage_focused(),
            PriorityWeights::cost_focused(),
            PriorityWeights::balanced(),
        ] {
            assert!((w.sum() - 1.0).abs() < 1e-9);
            assert!(w.validate().is_ok());
        }
    }

    #[test]
    fn test_weight_validation() {
        assert!(PriorityWeights::new(-0.1, 0.5, 0.6).validate().is_err());
        assert!(PriorityWeights::new(f64::NAN, 0.5, 0.5).validate().is_err());
        assert!(PriorityWeights::new(0.0, 0.0, 0.0).validate().is_ok());
    }

    #[test]
    fn test_budget_validation() {
        let ok = BudgetConstraints {
            max_monthly_premium: Some(300.0),
            ..Default::default()
        };
        assert!(ok.caps_spending());
        assert!(profile().with_budget(ok).is_ok());

        let bad = BudgetConstraints {
            max_copay_per_visit: Some(-5.0),
            ..Default::default()
        };
        assert!(profile().with_budget(bad).is_err());
    }
}
