//! Crate error type.
//!
//! Only configuration-level problems are errors. Per-plan data gaps are
//! absorbed into neutral sub-scores and reported as
//! [`Diagnostic`](crate::diagnostics::Diagnostic)s instead.

/// Errors that abort a whole recommendation call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanfitError {
    /// Invalid caller-supplied configuration: negative weights, an empty
    /// plan catalog, an inconsistent profile, and similar.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The batch was cancelled before every plan was scored.
    #[error("recommendation batch cancelled")]
    Cancelled,
}

impl PlanfitError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PlanfitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = PlanfitError::config("coverage weight is negative");
        assert_eq!(
            err.to_string(),
            "configuration error: coverage weight is negative"
        );
        assert_eq!(
            PlanfitError::Cancelled.to_string(),
            "recommendation batch cancelled"
        );
    }
}
