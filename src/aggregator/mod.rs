//! Aggregation of trace blocks into ranked exception groups.
//!
//! This module transforms completed trace blocks into:
//! - Exception groups keyed by trace body (count, timestamps, headers)
//! - A ranking by occurrence count for reports

pub mod groups;
pub mod ranking;

// Re-export main types and functions
pub use groups::{AggregateScope, AggregateState, ExceptionGroup};
pub use ranking::{rank, RankedException};
