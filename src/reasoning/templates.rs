//! Explanation templates.
//!
//! Every template is a pure function of one analysis and an
//! [`ExplanationStyle`]; none keeps state between calls.

use std::collections::BTreeSet;

use crate::model::{
    CostAnalysis, CostSharingMethod, CoverageAnalysis, ExclusionAnalysis, LimitAnalysis,
};

/// How much detail the explanation strings carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExplanationStyle {
    /// Full sentences with names and figures.
    #[default]
    Detailed,
    /// One short sentence per dimension.
    Concise,
}

/// Formats a list of benefit names for prose.
///
/// Duplicates are dropped first (keeping the first occurrence). One name is
/// returned as is, two or three are comma-separated, and longer lists show
/// the first two plus a count of the rest.
///
/// ```
/// use u_planfit::reasoning::format_benefit_list;
///
/// let names = ["Eye Exam", "Crowns", "Fillings", "Crowns", "X-Rays"];
/// assert_eq!(format_benefit_list(&names), "Eye Exam, Crowns and 2 more");
/// assert_eq!(format_benefit_list(&["Eye Exam", "Crowns"]), "Eye Exam, Crowns");
/// ```
pub fn format_benefit_list<S: AsRef<str>>(names: &[S]) -> String {
    let mut seen = BTreeSet::new();
    let unique: Vec<&str> = names
        .iter()
        .map(|n| n.as_ref())
        .filter(|n| seen.insert(*n))
        .collect();
    match unique.len() {
        0..=3 => unique.join(", "),
        n => format!("{}, {} and {} more", unique[0], unique[1], n - 2),
    }
}

/// Whole-dollar amount with thousands separators: `$5,000`.
pub fn format_dollars(amount: f64) -> String {
    let digits = (amount.round().max(0.0) as u64).to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push('$');
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// A rate in percent, rounded to a whole number: `35%`.
pub fn format_percent(rate: f64) -> String {
    format!("{rate:.0}%")
}

/// `"1 benefit"`, `"3 benefits"`.
pub(crate) fn count_noun(n: usize, singular: &str, plural: &str) -> String {
    format!("{n} {}", if n == 1 { singular } else { plural })
}

/// `"has"` for one, `"have"` otherwise.
fn has_have(n: usize) -> &'static str {
    if n == 1 {
        "has"
    } else {
        "have"
    }
}

fn share(part: usize, whole: usize) -> String {
    format_percent(100.0 * part as f64 / whole.max(1) as f64)
}

fn ehb_sentence(a: &CoverageAnalysis) -> String {
    if a.total_benefits_count == 0 {
        return "The plan lists no benefits, so its Essential Health Benefit share is unknown."
            .to_string();
    }
    format!(
        "{} of {} total benefits are Essential Health Benefits ({}).",
        a.ehb_benefits_count,
        a.total_benefits_count,
        share(a.ehb_benefits_count, a.total_benefits_count)
    )
}

pub fn coverage_explanation(a: &CoverageAnalysis, style: ExplanationStyle) -> String {
    if style == ExplanationStyle::Concise {
        let head = if a.required_benefits_total == 0 {
            "No required benefits were given.".to_string()
        } else {
            format!(
                "Covers {}/{} required benefits.",
                a.required_benefits_covered, a.required_benefits_total
            )
        };
        return format!("{head} {}", ehb_sentence(a));
    }

    let mut parts = Vec::new();
    if a.required_benefits_total == 0 {
        parts.push(format!(
            "This plan covers {} of the {} benefits it lists.",
            a.covered_benefits_count, a.total_benefits_count
        ));
    } else if a.covers_all_required() {
        parts.push(format!(
            "This plan covers all {} of your required benefits: {}.",
            a.required_benefits_total,
            format_benefit_list(&a.covered_benefits)
        ));
    } else {
        parts.push(format!(
            "This plan covers {} of {} required benefits ({}).",
            a.required_benefits_covered,
            a.required_benefits_total,
            share(a.required_benefits_covered, a.required_benefits_total)
        ));
        parts.push(format!(
            "Missing: {}.",
            format_benefit_list(&a.missing_benefits)
        ));
    }
    parts.push(ehb_sentence(a));
    parts.join(" ")
}

pub fn cost_explanation(a: &CostAnalysis, style: ExplanationStyle) -> String {
    if style == ExplanationStyle::Concise {
        return match a.avg_coinsurance_rate {
            Some(rate) => format!("Average coinsurance: {}.", format_percent(rate)),
            None => "No coinsurance rates listed.".to_string(),
        };
    }

    let mut parts = Vec::new();
    parts.push(match (a.cost_sharing_method, a.avg_coinsurance_rate) {
        (CostSharingMethod::Copay, _) => {
            "This plan mostly uses copays for covered services.".to_string()
        }
        (CostSharingMethod::Coinsurance, Some(rate)) => format!(
            "This plan uses coinsurance, averaging {} for covered services.",
            format_percent(rate)
        ),
        (CostSharingMethod::Coinsurance, None) => {
            "This plan uses coinsurance for covered services.".to_string()
        }
        (CostSharingMethod::Mixed, _) => {
            "This plan mixes copays and coinsurance depending on the service.".to_string()
        }
    });

    if let Some(max) = a.annual_maximum {
        parts.push(format!("The annual maximum stated is {}.", format_dollars(max)));
    }

    match (a.out_of_network_rate, a.avg_coinsurance_rate) {
        (Some(oon), Some(inn)) if oon - inn > 10.0 => parts.push(format!(
            "Out-of-network coinsurance is {} versus {} in-network.",
            format_percent(oon),
            format_percent(inn)
        )),
        (Some(oon), _) => parts.push(format!(
            "Out-of-network coinsurance is {}.",
            format_percent(oon)
        )),
        (None, _) => {}
    }
    parts.join(" ")
}

pub fn limit_explanation(a: &LimitAnalysis, style: ExplanationStyle) -> String {
    let unlimited = a.benefits_with_quantity_limits == 0 && a.benefits_with_time_limits == 0;
    if style == ExplanationStyle::Concise {
        if unlimited {
            return "No quantity or time limits on covered services.".to_string();
        }
        return format!(
            "{} quantity-limited and {} time-limited benefits.",
            a.benefits_with_quantity_limits, a.benefits_with_time_limits
        );
    }

    let mut parts = Vec::new();
    if unlimited {
        parts.push("This plan has no quantity or time-based limits on covered services.".to_string());
    } else {
        let (q, t) = (a.benefits_with_quantity_limits, a.benefits_with_time_limits);
        parts.push(format!(
            "Of {}, {q} {} quantity limits and {t} {} time-based limits.",
            count_noun(a.total_covered_benefits, "covered benefit", "covered benefits"),
            has_have(q),
            has_have(t)
        ));
    }
    match a.restrictive_limits.len() {
        0 => {}
        1 => parts.push(format!(
            "Note: {} has a restrictive limit.",
            a.restrictive_limits[0]
        )),
        _ => parts.push(format!(
            "Note: restrictive limits apply to {}.",
            format_benefit_list(&a.restrictive_limits)
        )),
    }
    if a.benefits_with_exclusion_periods > 0 {
        let n = a.benefits_with_exclusion_periods;
        parts.push(format!(
            "{} a waiting or exclusion period.",
            count_noun(n, "benefit mentions", "benefits mention")
        ));
    }
    parts.join(" ")
}

pub fn exclusion_explanation(a: &ExclusionAnalysis, style: ExplanationStyle) -> String {
    if style == ExplanationStyle::Concise {
        if a.benefits_with_exclusions == 0 {
            return "No exclusions listed.".to_string();
        }
        return format!(
            "{} of {} benefits list exclusions.",
            a.benefits_with_exclusions, a.total_benefits
        );
    }

    if a.benefits_with_exclusions == 0 {
        return "No benefit in this plan lists exclusions or restrictions.".to_string();
    }
    let mut parts = vec![format!(
        "{} of {} benefits list exclusions or restrictions.",
        a.benefits_with_exclusions, a.total_benefits
    )];
    if a.complex_exclusions > 0 {
        let verbs = if a.complex_exclusions == 1 {
            "refers to policy documents, varies by case or imposes a long waiting period"
        } else {
            "refer to policy documents, vary by case or impose long waiting periods"
        };
        parts.push(format!("{} of these {verbs}.", a.complex_exclusions));
    }
    if let Some(months) = a.longest_waiting_period_months {
        parts.push(format!(
            "The longest waiting period stated is {}.",
            count_noun(months as usize, "month", "months")
        ));
    }
    if a.prior_coverage_required {
        parts.push(format!(
            "Prior coverage is required for {}.",
            format_benefit_list(&a.prior_coverage_benefits)
        ));
    }
    parts.join(" ")
}
