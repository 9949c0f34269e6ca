//! Scoring diagnostics.
//!
//! A [`Diagnostic`] records a condition that degraded a score without
//! failing it: a missing field, an unparseable amount, a clamped formula
//! output. Every diagnostic is also emitted through `tracing` at the moment
//! it is recorded.

/// Category of a scoring diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiagnosticKind {
    /// A sub-score fell back to the neutral value because inputs were absent.
    MissingData,
    /// Free-text extraction failed or produced an implausible value.
    ExtractionFailure,
    /// A score left `[0, 1]` and was clamped. Indicates a formula bug.
    Clamped,
    /// All priority weights were zero and the fallback policy was applied.
    WeightFallback,
}

/// One diagnostic entry, scoped to a plan (or to the batch when `plan_id`
/// is `None`).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    pub plan_id: Option<String>,
    pub kind: DiagnosticKind,
    pub message: String,
}

/// Ordered collector of diagnostics for one scoring pass.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a missing-data fallback for `plan_id`.
    pub fn missing_data(&mut self, plan_id: &str, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(plan_id = %plan_id, "{}", message);
        self.push(Some(plan_id), DiagnosticKind::MissingData, message);
    }

    /// Records a failed or implausible free-text extraction for `plan_id`.
    pub fn extraction_failure(&mut self, plan_id: &str, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(plan_id = %plan_id, "{}", message);
        self.push(Some(plan_id), DiagnosticKind::ExtractionFailure, message);
    }

    /// Records a clamped score for `plan_id`.
    pub fn clamped(&mut self, plan_id: &str, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(plan_id = %plan_id, "{}", message);
        self.push(Some(plan_id), DiagnosticKind::Clamped, message);
    }

    /// Records a batch-level weight fallback.
    pub fn weight_fallback(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{}", message);
        self.push(None, DiagnosticKind::WeightFallback, message);
    }

    fn push(&mut self, plan_id: Option<&str>, kind: DiagnosticKind, message: String) {
        self.entries.push(Diagnostic {
            plan_id: plan_id.map(str::to_string),
            kind,
            message,
        });
    }

    /// Appends all entries of `other`, preserving order.
    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Number of entries of the given kind.
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

/// Clamps `score` into `[0, 1]`, recording a diagnostic when the value
/// actually changed. NaN is mapped to `0.0`.
pub(crate) fn clamp_unit(
    score: f64,
    plan_id: &str,
    label: &str,
    diagnostics: &mut Diagnostics,
) -> f64 {
    if score.is_nan() {
        diagnostics.clamped(plan_id, format!("{label} score was NaN, clamped to 0.0000"));
        return 0.0;
    }
    let clamped = score.clamp(0.0, 1.0);
    if clamped != score {
        diagnostics.clamped(
            plan_id,
            format!("{label} score clamped from {score:.4} to {clamped:.4}"),
        );
    }
    clamped
}
