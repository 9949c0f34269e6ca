//! Per-dimension analysis facts.
//!
//! Each scoring agent produces one of these alongside its score. The same
//! facts drive both the numeric score and the generated explanation text,
//! so the two can never disagree.

use super::user::CostSharingPreference;

/// Coverage facts for one plan against one profile.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoverageAnalysis {
    pub required_benefits_covered: usize,
    pub required_benefits_total: usize,
    pub ehb_benefits_count: usize,
    pub total_benefits_count: usize,
    pub covered_benefits_count: usize,
    /// Required benefits the plan does not cover, in canonical order.
    pub missing_benefits: Vec<String>,
    /// Required benefits the plan covers, in canonical order.
    pub covered_benefits: Vec<String>,
}

impl CoverageAnalysis {
    pub fn covers_all_required(&self) -> bool {
        self.required_benefits_covered == self.required_benefits_total
    }
}

/// Dominant cost-sharing arrangement among covered benefits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CostSharingMethod {
    Copay,
    Coinsurance,
    Mixed,
}

/// Cost-sharing facts.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostAnalysis {
    /// Average in-network tier 1 coinsurance over covered benefits, percent.
    pub avg_coinsurance_rate: Option<f64>,
    pub copay_available: bool,
    /// Highest plausible dollar amount found in covered benefits' explanations.
    pub annual_maximum: Option<f64>,
    /// Average out-of-network coinsurance over covered benefits, percent.
    pub out_of_network_rate: Option<f64>,
    pub cost_sharing_method: CostSharingMethod,
    pub preference: CostSharingPreference,
}

/// Quantity and time limit facts.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LimitAnalysis {
    pub benefits_with_quantity_limits: usize,
    pub benefits_with_time_limits: usize,
    pub benefits_with_exclusion_periods: usize,
    pub total_covered_benefits: usize,
    /// Benefits with at least one binding limit. Unique, sorted by canonical
    /// name; a benefit with both a quantity and a time limit appears once.
    pub restrictive_limits: Vec<String>,
}

/// Exclusion and prior-coverage facts.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExclusionAnalysis {
    pub total_benefits: usize,
    pub benefits_with_exclusions: usize,
    pub complex_exclusions: usize,
    pub prior_coverage_required: bool,
    /// Benefits whose exclusions demand prior coverage, in canonical order.
    pub prior_coverage_benefits: Vec<String>,
    /// Longest waiting period found in exclusion text, in months.
    pub longest_waiting_period_months: Option<u32>,
}

/// The four analyses of one plan.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Analyses {
    pub coverage: CoverageAnalysis,
    pub cost: CostAnalysis,
    pub limit: LimitAnalysis,
    pub exclusion: ExclusionAnalysis,
}
