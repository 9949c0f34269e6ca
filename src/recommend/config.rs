//! Recommendation engine configuration.

use crate::error::{PlanfitError, Result};
use crate::ranking::MIN_EPSILON;
use crate::reasoning::ExplanationStyle;
use crate::scoring::ScoringConfig;

/// Configuration for [`RecommendationEngine`](super::RecommendationEngine).
///
/// # Defaults
///
/// ```
/// use u_planfit::reasoning::ExplanationStyle;
/// use u_planfit::recommend::RecommendConfig;
///
/// let config = RecommendConfig::default();
/// assert!(config.parallel);
/// assert_eq!(config.style, ExplanationStyle::Detailed);
/// assert!(config.validate().is_ok());
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_planfit::reasoning::ExplanationStyle;
/// use u_planfit::recommend::RecommendConfig;
/// use u_planfit::scoring::ScoringConfig;
///
/// let config = RecommendConfig::default()
///     .with_style(ExplanationStyle::Concise)
///     .with_scoring(ScoringConfig::default().with_exclusion_modifier(true))
///     .with_parallel(false);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendConfig {
    /// Score plans in parallel using rayon.
    ///
    /// Has no effect when the crate is built without the `parallel` feature.
    /// The result is identical either way.
    pub parallel: bool,

    pub style: ExplanationStyle,

    /// Score quantization step used by the ranking engine.
    pub epsilon: f64,

    pub scoring: ScoringConfig,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            style: ExplanationStyle::Detailed,
            epsilon: 1e-9,
            scoring: ScoringConfig::default(),
        }
    }
}

impl RecommendConfig {
    /// Single-threaded scoring with concise explanations.
    pub fn compact() -> Self {
        Self::default()
            .with_parallel(false)
            .with_style(ExplanationStyle::Concise)
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_style(mut self, style: ExplanationStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_epsilon(mut self, eps: f64) -> Self {
        self.epsilon = eps;
        self
    }

    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.epsilon.is_finite() || self.epsilon < MIN_EPSILON {
            return Err(PlanfitError::config(format!(
                "epsilon must be finite and at least {MIN_EPSILON:e}, got {}",
                self.epsilon
            )));
        }
        self.scoring.validate()
    }
}
