//! Recommendation output types.

use std::collections::BTreeMap;
use std::fmt;

use super::analysis::Analyses;
use crate::diagnostics::Diagnostic;

/// A scoring dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dimension {
    Coverage,
    Cost,
    Limit,
    Exclusion,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Coverage,
        Dimension::Cost,
        Dimension::Limit,
        Dimension::Exclusion,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Dimension::Coverage => "coverage",
            Dimension::Cost => "cost",
            Dimension::Limit => "limit",
            Dimension::Exclusion => "exclusion",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw per-agent scores, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FitScores {
    pub coverage: f64,
    pub cost: f64,
    pub limit: f64,
    pub exclusion: f64,
}

impl FitScores {
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Coverage => self.coverage,
            Dimension::Cost => self.cost,
            Dimension::Limit => self.limit,
            Dimension::Exclusion => self.exclusion,
        }
    }

    /// Dimension name → score.
    pub fn to_map(&self) -> BTreeMap<&'static str, f64> {
        Dimension::ALL
            .iter()
            .map(|d| (d.name(), self.get(*d)))
            .collect()
    }
}

/// A surfaced trade-off: one benefit of the plan paired with its cost.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TradeOff {
    pub aspect: String,
    pub pro: String,
    pub con: String,
}

/// Analyses plus the explanation text generated from them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReasoningChain {
    pub analyses: Analyses,
    /// One explanation per dimension: coverage, cost, limit, exclusion.
    pub explanations: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub trade_offs: Vec<TradeOff>,
}

/// A scored, explained plan. Immutable once built; only the ranking engine
/// assigns `rank`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Recommendation {
    plan_id: String,
    overall_score: f64,
    rank: usize,
    user_fit_scores: FitScores,
    reasoning: ReasoningChain,
    diagnostics: Vec<Diagnostic>,
}

impl Recommendation {
    /// Creates an unranked recommendation (`rank() == 0`).
    pub fn new(
        plan_id: impl Into<String>,
        overall_score: f64,
        user_fit_scores: FitScores,
        reasoning: ReasoningChain,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        Self {
            plan_id: plan_id.into(),
            overall_score,
            rank: 0,
            user_fit_scores,
            reasoning,
            diagnostics,
        }
    }

    pub(crate) fn with_rank(mut self, rank: usize) -> Self {
        self.rank = rank;
        self
    }

    pub fn plan_id(&self) -> &str {
        &self.plan_id
    }

    pub fn overall_score(&self) -> f64 {
        self.overall_score
    }

    /// 1-based position after ranking; 0 before.
    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn user_fit_scores(&self) -> &FitScores {
        &self.user_fit_scores
    }

    pub fn reasoning(&self) -> &ReasoningChain {
        &self.reasoning
    }

    pub fn strengths(&self) -> &[String] {
        &self.reasoning.strengths
    }

    pub fn weaknesses(&self) -> &[String] {
        &self.reasoning.weaknesses
    }

    pub fn trade_offs(&self) -> &[TradeOff] {
        &self.reasoning.trade_offs
    }

    pub fn explanations(&self) -> &[String] {
        &self.reasoning.explanations
    }

    /// Number of unique benefits with restrictive limits.
    pub fn restrictive_limit_count(&self) -> usize {
        self.reasoning.analyses.limit.restrictive_limits.len()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
