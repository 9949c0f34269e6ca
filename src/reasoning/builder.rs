//! Reasoning chain assembly.

use super::templates::{
    cost_explanation, count_noun, coverage_explanation, exclusion_explanation,
    format_benefit_list, format_dollars, format_percent, limit_explanation, ExplanationStyle,
};
use crate::model::{
    Analyses, CostSharingPreference, CoverageAnalysis, ReasoningChain, TradeOff,
};

/// Annual maximum at or above which it is listed as a strength.
const STRENGTH_ANNUAL_MAXIMUM: f64 = 3_000.0;
/// Annual maximum below which it is listed as a weakness.
const WEAKNESS_ANNUAL_MAXIMUM: f64 = 1_000.0;
/// Average in-network coinsurance at or below which it is a strength.
const STRENGTH_COINSURANCE: f64 = 20.0;
/// Average in-network coinsurance above which it is a weakness.
const WEAKNESS_COINSURANCE: f64 = 40.0;
/// Out-of-network minus in-network rate that surfaces a network trade-off.
const NETWORK_GAP: f64 = 10.0;

type Template = fn(&Analyses, ExplanationStyle) -> String;

fn coverage_text(a: &Analyses, style: ExplanationStyle) -> String {
    coverage_explanation(&a.coverage, style)
}

fn cost_text(a: &Analyses, style: ExplanationStyle) -> String {
    cost_explanation(&a.cost, style)
}

fn limit_text(a: &Analyses, style: ExplanationStyle) -> String {
    limit_explanation(&a.limit, style)
}

fn exclusion_text(a: &Analyses, style: ExplanationStyle) -> String {
    exclusion_explanation(&a.exclusion, style)
}

/// One explanation per dimension, in dimension order.
const EXPLANATIONS: [Template; 4] = [coverage_text, cost_text, limit_text, exclusion_text];

/// Insertion-ordered list that ignores repeated entries.
#[derive(Default)]
struct UniqueList(Vec<String>);

impl UniqueList {
    fn push(&mut self, item: String) {
        if !self.0.contains(&item) {
            self.0.push(item);
        }
    }
}

/// Builds explanations, strengths, weaknesses and trade-offs from analyses.
///
/// The builder holds no state beyond its style: the same analyses always
/// produce byte-identical output.
///
/// # Examples
///
/// ```ignore
/// let chain = ReasoningBuilder::new(ExplanationStyle::Concise).build(&analyses);
/// assert_eq!(chain.explanations.len(), 4);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ReasoningBuilder {
    style: ExplanationStyle,
}

impl ReasoningBuilder {
    pub fn new(style: ExplanationStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> ExplanationStyle {
        self.style
    }

    pub fn build(&self, analyses: &Analyses) -> ReasoningChain {
        ReasoningChain {
            analyses: analyses.clone(),
            explanations: EXPLANATIONS
                .iter()
                .map(|template| template(analyses, self.style))
                .collect(),
            strengths: strengths(analyses),
            weaknesses: weaknesses(analyses),
            trade_offs: trade_offs(analyses),
        }
    }
}

/// At least one benefit was required and all of them are covered.
fn covers_all_required(coverage: &CoverageAnalysis) -> bool {
    coverage.required_benefits_total > 0 && coverage.covers_all_required()
}

fn strengths(a: &Analyses) -> Vec<String> {
    let mut out = UniqueList::default();
    let coverage = &a.coverage;
    let cost = &a.cost;

    if covers_all_required(coverage) {
        out.push(format!(
            "Covers all {} required benefits",
            coverage.required_benefits_total
        ));
    }
    if let Some(max) = cost.annual_maximum.filter(|m| *m >= STRENGTH_ANNUAL_MAXIMUM) {
        out.push(format!("Annual maximum of {}", format_dollars(max)));
    }
    if let Some(rate) = cost
        .avg_coinsurance_rate
        .filter(|r| *r <= STRENGTH_COINSURANCE)
    {
        out.push(format!(
            "Average in-network coinsurance of {}",
            format_percent(rate)
        ));
    }
    if cost.copay_available && cost.preference == CostSharingPreference::Copay {
        out.push("Offers copays, matching the copay preference".to_string());
    }
    if coverage.ehb_benefits_count > 0 {
        out.push(format!(
            "Includes {} of {} benefits as Essential Health Benefits",
            coverage.ehb_benefits_count, coverage.total_benefits_count
        ));
    }
    if a.limit.total_covered_benefits > 0
        && a.limit.benefits_with_quantity_limits == 0
        && a.limit.benefits_with_time_limits == 0
    {
        out.push("No quantity or time limits on covered benefits".to_string());
    }
    out.0
}

fn weaknesses(a: &Analyses) -> Vec<String> {
    let mut out = UniqueList::default();
    let missing = &a.coverage.missing_benefits;

    match missing.len() {
        0 => {}
        1 => out.push(format!("Missing required benefit: {}", missing[0])),
        n => out.push(format!(
            "Missing {n} required benefits: {}",
            format_benefit_list(missing)
        )),
    }
    if let Some(rate) = a
        .cost
        .avg_coinsurance_rate
        .filter(|r| *r > WEAKNESS_COINSURANCE)
    {
        out.push(format!("High average coinsurance ({})", format_percent(rate)));
    }
    if !a.limit.restrictive_limits.is_empty() {
        out.push(format!(
            "Restrictive limits on {}",
            format_benefit_list(&a.limit.restrictive_limits)
        ));
    }
    if let Some(max) = a
        .cost
        .annual_maximum
        .filter(|m| *m < WEAKNESS_ANNUAL_MAXIMUM)
    {
        out.push(format!("Low annual maximum ({})", format_dollars(max)));
    }
    if a.exclusion.prior_coverage_required {
        out.push(format!(
            "Requires prior coverage for {}",
            format_benefit_list(&a.exclusion.prior_coverage_benefits)
        ));
    }
    if let Some(months) = a.exclusion.longest_waiting_period_months.filter(|m| *m > 0) {
        out.push(format!(
            "Waiting period of up to {}",
            count_noun(months as usize, "month", "months")
        ));
    }
    out.0
}

fn trade_offs(a: &Analyses) -> Vec<TradeOff> {
    let mut out: Vec<TradeOff> = Vec::new();
    let mut push = |aspect: &str, pro: String, con: String| {
        if !out.iter().any(|t| t.aspect == aspect) {
            out.push(TradeOff {
                aspect: aspect.to_string(),
                pro,
                con,
            });
        }
    };

    let coverage = &a.coverage;
    let inn = a.cost.avg_coinsurance_rate;

    if let Some(rate) = inn.filter(|r| *r > WEAKNESS_COINSURANCE) {
        if covers_all_required(coverage) {
            push(
                "Coverage vs Cost",
                "Covers all required benefits".to_string(),
                format!("Higher coinsurance rate ({})", format_percent(rate)),
            );
        }
    }
    if let Some(rate) = inn.filter(|r| *r < 30.0) {
        if !coverage.missing_benefits.is_empty() {
            push(
                "Cost vs Coverage",
                format!("Lower coinsurance rate ({})", format_percent(rate)),
                format!(
                    "Missing {}",
                    count_noun(
                        coverage.missing_benefits.len(),
                        "required benefit",
                        "required benefits"
                    )
                ),
            );
        }
    }
    if covers_all_required(coverage) && !a.limit.restrictive_limits.is_empty() {
        push(
            "Coverage vs Limits",
            "Covers all required benefits".to_string(),
            format!(
                "Restrictive limits on {}",
                format_benefit_list(&a.limit.restrictive_limits)
            ),
        );
    }
    if let (Some(inn), Some(oon)) = (inn, a.cost.out_of_network_rate) {
        if oon - inn > NETWORK_GAP {
            push(
                "In-network vs Out-of-network",
                format!("In-network coinsurance of {}", format_percent(inn)),
                format!("Out-of-network coinsurance of {}", format_percent(oon)),
            );
        }
    }
    out
}
