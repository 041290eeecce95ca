//! Typed error taxonomy for the search core and its collaborators.
//!
//! All fallible operations in this crate return [`Error`]. There is no retry
//! machinery around the sampling oracle; it is assumed reliable, and a failure
//! anywhere in an `explain` call propagates straight to the caller.

/// Errors produced by the explanation search and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A component was used before its required fit step.
    #[error("{0} is not fitted; call the fit step before use")]
    NotFitted(&'static str),

    /// A query point fell outside the fitted discretization span.
    #[error("value {value} at feature {feature} is outside the fitted discretization span")]
    OutOfRange {
        /// Offending feature index.
        feature: usize,
        /// Offending coordinate value.
        value: f64,
    },

    /// An expansion policy attempted to produce a smaller region than its
    /// parent. Growth is monotone; this is a programming-contract violation.
    #[error(
        "expansion attempted to shrink feature {feature} from [{from_low}, {from_high}] to [{to_low}, {to_high}]"
    )]
    InvalidShrink {
        /// Feature whose span would have shrunk.
        feature: usize,
        /// Parent span (low).
        from_low: u32,
        /// Parent span (high).
        from_high: u32,
        /// Requested span (low).
        to_low: u32,
        /// Requested span (high).
        to_high: u32,
    },

    /// An adaptive-sampling loop exhausted its resolution budget without a
    /// provable decision. This happens when the confidence-interval floor at
    /// the configured significance level is wider than the decision gap.
    #[error("confidence bounds did not resolve within {rounds} resampling rounds")]
    UnresolvedBounds {
        /// The budget that was exhausted.
        rounds: usize,
    },

    /// A metric was asked to estimate a statistic from zero total samples.
    #[error("cannot estimate a sample statistic from an empty batch")]
    EmptySample,

    /// A point's arity does not match the fitted feature count.
    #[error("expected {expected} features, got {got}")]
    DimensionMismatch {
        /// Fitted feature count.
        expected: usize,
        /// Provided feature count.
        got: usize,
    },
}
