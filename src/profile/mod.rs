//! Profile construction from structured input.
//!
//! [`ProfileBuilder`] collects family composition, benefit requirements and
//! preferences. Expected usage and priority weights are inferred when the
//! caller does not set them (see [`infer_expected_usage`] and
//! [`default_priorities`]).

use std::collections::BTreeSet;

use crate::error::{PlanfitError, Result};
use crate::model::{
    canonical_benefit_name, family_size, BudgetConstraints, CostSharingPreference, ExpectedUsage,
    PriorityWeights, UserProfile,
};

/// Benefit-name fragments that signal heavier expected usage.
const HIGH_USAGE_KEYWORDS: [&str; 5] = ["orthodontia", "major", "surgery", "specialist", "chronic"];

/// Infers expected usage from the household's requirements.
///
/// ```text
/// points = 2 * required + 3 * children + family_size
///        + 5 * (required names mentioning orthodontia/major/surgery/specialist/chronic)
/// ```
///
/// 15 or more points is `High`, 8 or more is `Medium`, anything less `Low`.
///
/// ```
/// use u_planfit::model::ExpectedUsage;
/// use u_planfit::profile::infer_expected_usage;
///
/// assert_eq!(infer_expected_usage(&["Routine Eye Exam"], 1, 0), ExpectedUsage::Low);
/// assert_eq!(
///     infer_expected_usage(&["Orthodontia - Child", "Routine Eye Exam"], 3, 1),
///     ExpectedUsage::High
/// );
/// ```
pub fn infer_expected_usage<S: AsRef<str>>(
    required_benefits: &[S],
    family_size: u32,
    children_count: u32,
) -> ExpectedUsage {
    let special = required_benefits
        .iter()
        .filter(|name| {
            let name = name.as_ref().to_lowercase();
            HIGH_USAGE_KEYWORDS.iter().any(|k| name.contains(k))
        })
        .count() as u64;
    let points = 2 * required_benefits.len() as u64
        + 3 * u64::from(children_count)
        + u64::from(family_size)
        + 5 * special;

    match points {
        p if p >= 15 => ExpectedUsage::High,
        p if p >= 8 => ExpectedUsage::Medium,
        _ => ExpectedUsage::Low,
    }
}

/// Picks priority weights when the household did not state any.
///
/// - a premium or out-of-pocket cap → [`PriorityWeights::cost_focused`];
/// - five or more required benefits → [`PriorityWeights::coverage_focused`];
/// - a specific cost-sharing preference → 0.35 / 0.45 / 0.2;
/// - otherwise [`PriorityWeights::balanced`].
pub fn default_priorities(
    required_count: usize,
    preference: CostSharingPreference,
    budget: Option<&BudgetConstraints>,
) -> PriorityWeights {
    if budget.is_some_and(BudgetConstraints::caps_spending) {
        return PriorityWeights::cost_focused();
    }
    if required_count >= 5 {
        return PriorityWeights::coverage_focused();
    }
    if preference != CostSharingPreference::Either {
        return PriorityWeights::new(0.35, 0.45, 0.2);
    }
    PriorityWeights::balanced()
}

#[derive(Debug, Clone, Copy)]
enum Family {
    Counts { adults: u32, children: u32 },
    Size(u32),
}

impl Family {
    /// `(adults, children)`.
    fn split(self) -> (u32, u32) {
        match self {
            Family::Counts { adults, children } => (adults, children),
            Family::Size(0) => (0, 0),
            Family::Size(1) => (1, 0),
            Family::Size(n) => {
                let adults = 2.min(n - 1);
                (adults, n - adults)
            }
        }
    }
}

/// Builds a [`UserProfile`] from structured fields.
///
/// # Examples
///
/// ```
/// use u_planfit::model::{CostSharingPreference, ExpectedUsage};
/// use u_planfit::profile::ProfileBuilder;
///
/// let profile = ProfileBuilder::new()
///     .with_family(2, 2)
///     .with_required_benefits(["Basic Dental Care - Child", "Orthodontia - Child"])
///     .with_cost_sharing(CostSharingPreference::Copay)
///     .build()
///     .unwrap();
///
/// assert_eq!(profile.family_size(), 4);
/// assert_eq!(profile.expected_usage(), ExpectedUsage::High);
/// assert!((profile.priorities().cost - 0.45).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProfileBuilder {
    family: Option<Family>,
    required: Vec<String>,
    excluded_ok: Vec<String>,
    usage: Option<ExpectedUsage>,
    priorities: Option<PriorityWeights>,
    preference: CostSharingPreference,
    budget: Option<BudgetConstraints>,
}

impl ProfileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets explicit adult and child counts.
    pub fn with_family(mut self, adults: u32, children: u32) -> Self {
        self.family = Some(Family::Counts { adults, children });
        self
    }

    /// Sets only the family size. One person is one adult; larger families
    /// are assumed to have two adults (one if the size is two) and the rest
    /// children.
    pub fn with_family_size(mut self, size: u32) -> Self {
        self.family = Some(Family::Size(size));
        self
    }

    pub fn with_required_benefits<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.required = names.into_iter().map(|n| n.as_ref().to_string()).collect();
        self
    }

    pub fn with_excluded_benefits_ok<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.excluded_ok = names.into_iter().map(|n| n.as_ref().to_string()).collect();
        self
    }

    /// Sets expected usage instead of inferring it.
    pub fn with_expected_usage(mut self, usage: ExpectedUsage) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Sets priority weights instead of deriving defaults.
    pub fn with_priorities(mut self, priorities: PriorityWeights) -> Self {
        self.priorities = Some(priorities);
        self
    }

    pub fn with_cost_sharing(mut self, preference: CostSharingPreference) -> Self {
        self.preference = preference;
        self
    }

    pub fn with_budget(mut self, budget: BudgetConstraints) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Builds the profile.
    ///
    /// # Errors
    /// Returns [`PlanfitError::Configuration`] when the family composition
    /// is missing or has no adult, or a budget amount is negative.
    pub fn build(self) -> Result<UserProfile> {
        let family = self
            .family
            .ok_or_else(|| PlanfitError::config("family composition is required"))?;
        let (adults, children) = family.split();
        let size = family_size(adults, children)?;

        let required: Vec<String> = self
            .required
            .iter()
            .map(|n| canonical_benefit_name(n))
            .filter(|n| !n.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let usage = self.usage.unwrap_or_else(|| {
            let inferred = infer_expected_usage(&required, size, children);
            tracing::debug!(usage = ?inferred, "expected usage inferred");
            inferred
        });
        let priorities = self.priorities.unwrap_or_else(|| {
            let derived = default_priorities(required.len(), self.preference, self.budget.as_ref());
            tracing::debug!(
                coverage = derived.coverage,
                cost = derived.cost,
                limit = derived.limit,
                "default priorities selected"
            );
            derived
        });

        let mut profile = UserProfile::new(adults, children, usage, priorities, self.preference)?
            .with_required_benefits(&required)
            .with_excluded_benefits_ok(&self.excluded_ok);
        if let Some(budget) = self.budget {
            profile = profile.with_budget(budget)?;
        }
        Ok(profile)
    }
}
