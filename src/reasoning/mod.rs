//! Reasoning chain builder.
//!
//! Turns the four per-dimension analyses into explanation text, strengths,
//! weaknesses and trade-offs. Text is generated only from analysis facts,
//! so explanations always agree with the scores they accompany.
//!
//! # Key Types
//!
//! - [`ReasoningBuilder`]: assembles a [`ReasoningChain`](crate::model::ReasoningChain)
//! - [`ExplanationStyle`]: detailed or concise explanation text
//!
//! The template functions are exposed for callers that need a single
//! explanation without building a full chain.

mod builder;
mod templates;

pub use builder::ReasoningBuilder;
pub use templates::{
    cost_explanation, coverage_explanation, exclusion_explanation, format_benefit_list,
    format_dollars, format_percent, limit_explanation, ExplanationStyle,
};
