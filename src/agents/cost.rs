//! Cost agent.
//!
//! ```text
//! score = 0.3 * copay_alignment + 0.3 * coinsurance
//!       + 0.2 * annual_maximum  + 0.2 * out_of_network
//! ```
//!
//! Annual maximums are not a table column; they are extracted from the free
//! text of each covered benefit's explanation.

use std::sync::OnceLock;

use regex::Regex;

use super::types::{mean, rate_score, AgentOutput, ScoringAgent};
use crate::diagnostics::{clamp_unit, Diagnostics};
use crate::model::{
    CostAnalysis, CostSharingMethod, CostSharingPreference, Dimension, Plan, UserProfile,
};
use crate::scoring::ScoringConfig;

/// Benefits sampled (in canonical order) to judge copay alignment.
const ALIGNMENT_SAMPLE: usize = 5;

/// The four cost sub-scores, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostComponents {
    pub copay_alignment: f64,
    pub coinsurance: f64,
    pub annual_maximum: f64,
    pub out_of_network: f64,
}

impl CostComponents {
    /// Weighted combination, before clamping.
    pub fn combined(&self) -> f64 {
        0.3 * self.copay_alignment
            + 0.3 * self.coinsurance
            + 0.2 * self.annual_maximum
            + 0.2 * self.out_of_network
    }
}

fn amount_patterns() -> &'static [Regex; 2] {
    static PATTERNS: OnceLock<[Regex; 2]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(r"\$\s?(\d[\d,]*(?:\.\d+)?)").expect("valid dollar pattern"),
            Regex::new(r"(?i)(\d[\d,]*(?:\.\d+)?)\s*dollars?\b").expect("valid dollars pattern"),
        ]
    })
}

/// Extracts plausible dollar amounts (`0 < amount < max_plausible`) from
/// free text. Unparseable or implausible matches are reported and skipped.
///
/// Recognizes `$1,000`, `$ 250.50` and `1000 dollars`.
pub fn extract_dollar_amounts(
    text: &str,
    max_plausible: f64,
    plan_id: &str,
    benefit: &str,
    diagnostics: &mut Diagnostics,
) -> Vec<f64> {
    let mut amounts = Vec::new();
    for pattern in amount_patterns() {
        for caps in pattern.captures_iter(text) {
            let raw = &caps[1];
            match raw.replace(',', "").parse::<f64>() {
                Ok(v) if v > 0.0 && v < max_plausible => amounts.push(v),
                Ok(v) => diagnostics.extraction_failure(
                    plan_id,
                    format!("cost: implausible amount {v} in explanation of {benefit}: {text:?}"),
                ),
                Err(_) => diagnostics.extraction_failure(
                    plan_id,
                    format!("cost: unparseable amount {raw:?} in explanation of {benefit}: {text:?}"),
                ),
            }
        }
    }
    amounts
}

/// Scores cost-sharing against the profile's preference.
#[derive(Debug, Clone, Default)]
pub struct CostAgent {
    config: ScoringConfig,
}

impl CostAgent {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Computes the sub-scores and analysis without combining them.
    pub fn components(
        &self,
        plan: &Plan,
        profile: &UserProfile,
        diagnostics: &mut Diagnostics,
    ) -> (CostComponents, CostAnalysis) {
        let plan_id = plan.plan_id();
        let neutral = self.config.neutral_score;

        let mut in_network = Vec::new();
        let mut out_of_network = Vec::new();
        let mut maximums = Vec::new();
        let mut copay_count = 0usize;
        let mut coinsurance_count = 0usize;

        for (_, benefit) in plan.covered_benefits() {
            if benefit.has_copay() {
                copay_count += 1;
            }
            if let Some(rate) = benefit.in_network_rate() {
                in_network.push(rate);
                coinsurance_count += 1;
            }
            if let Some(rate) = benefit.out_of_network_rate() {
                out_of_network.push(rate);
            }
            if let Some(text) = &benefit.explanation {
                maximums.extend(extract_dollar_amounts(
                    text,
                    self.config.max_plausible_amount,
                    plan_id,
                    &benefit.benefit_name,
                    diagnostics,
                ));
            }
        }

        let avg_in = mean(&in_network);
        let avg_oon = mean(&out_of_network);
        let annual_max = maximums.iter().copied().reduce(f64::max);

        let copay_alignment = self.copay_alignment(plan, profile, diagnostics);

        let coinsurance = match avg_in {
            Some(rate) => rate_score(rate, self.config.coinsurance_ceiling),
            None => {
                diagnostics.missing_data(
                    plan_id,
                    format!("cost: no in-network coinsurance data, using neutral {neutral:.2}"),
                );
                neutral
            }
        };

        let annual_maximum = match annual_max {
            Some(amount) => (amount / self.config.annual_maximum_target).min(1.0),
            None => {
                diagnostics.missing_data(
                    plan_id,
                    format!("cost: no annual maximum found, using neutral {neutral:.2}"),
                );
                neutral
            }
        };

        let oon = match avg_oon {
            Some(rate) => rate_score(rate, self.config.coinsurance_ceiling),
            None => {
                diagnostics.missing_data(
                    plan_id,
                    format!("cost: no out-of-network coinsurance data, using neutral {neutral:.2}"),
                );
                neutral
            }
        };

        let method = if copay_count > coinsurance_count {
            CostSharingMethod::Copay
        } else if coinsurance_count > copay_count {
            CostSharingMethod::Coinsurance
        } else {
            CostSharingMethod::Mixed
        };

        let components = CostComponents {
            copay_alignment,
            coinsurance,
            annual_maximum,
            out_of_network: oon,
        };
        let analysis = CostAnalysis {
            avg_coinsurance_rate: avg_in,
            copay_available: copay_count > 0,
            annual_maximum: annual_max,
            out_of_network_rate: avg_oon,
            cost_sharing_method: method,
            preference: profile.preferred_cost_sharing(),
        };
        (components, analysis)
    }

    fn copay_alignment(
        &self,
        plan: &Plan,
        profile: &UserProfile,
        diagnostics: &mut Diagnostics,
    ) -> f64 {
        let preference = profile.preferred_cost_sharing();
        if preference == CostSharingPreference::Either {
            return 1.0;
        }

        let mut copays = 0usize;
        let mut coinsurances = 0usize;
        for (_, benefit) in plan.benefits().take(ALIGNMENT_SAMPLE) {
            if !benefit.is_covered() {
                continue;
            }
            if benefit.has_copay() {
                copays += 1;
            }
            if benefit.in_network_rate().is_some() {
                coinsurances += 1;
            }
        }

        let total = copays + coinsurances;
        if total == 0 {
            diagnostics.missing_data(
                plan.plan_id(),
                format!(
                    "cost: no copay or coinsurance data in sampled benefits, using neutral {:.2}",
                    self.config.neutral_score
                ),
            );
            return self.config.neutral_score;
        }

        let copay_ratio = copays as f64 / total as f64;
        match preference {
            CostSharingPreference::Copay => copay_ratio,
            _ => 1.0 - copay_ratio,
        }
    }
}

impl ScoringAgent for CostAgent {
    type Analysis = CostAnalysis;

    fn dimension(&self) -> Dimension {
        Dimension::Cost
    }

    fn evaluate(&self, plan: &Plan, profile: &UserProfile) -> AgentOutput<CostAnalysis> {
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
