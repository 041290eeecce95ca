//! Sequential validity test against a restriction threshold.
//!
//! Decides whether a candidate's restriction score provably exceeds a minimum
//! value, drawing more samples only while the decision is still open. The test
//! is one-sided in each direction with a shared tolerance: a candidate is
//! valid once `minimum - lb < tolerance` and invalid once
//! `minimum - ub > tolerance`. Lowering the threshold can never invalidate a
//! previously valid candidate, and needs no further sampling to re-confirm.

use log::trace;

use crate::candidate::{Candidate, Resampler};
use crate::error::Error;
use crate::explainer::Restriction;
use crate::score::{is_probably_higher, is_probably_lower};

/// Whether `candidate` provably satisfies `restriction`.
///
/// Undecided candidates are resampled with the batch size the restriction
/// metric asks for, up to `max_rounds` rounds; past that the test surfaces
/// [`Error::UnresolvedBounds`] rather than looping on an interval floor.
pub fn is_valid(
    candidate: &mut Candidate,
    restriction: &Restriction,
    tolerance: f64,
    resampler: &mut Resampler<'_>,
    max_rounds: usize,
) -> Result<bool, Error> {
    let minimum = restriction.minimum_value;
    let mut rounds = 0usize;
    loop {
        let score = candidate.restriction_score;
        if is_probably_higher(&score, minimum, tolerance) {
            return Ok(true);
        }
        if is_probably_lower(&score, minimum, tolerance) {
            return Ok(false);
        }

        if rounds == max_rounds {
            return Err(Error::UnresolvedBounds { rounds: max_rounds });
        }
        rounds += 1;

        // Narrow to the current distance from the threshold; once the interval
        // fits inside it, one of the two checks above must fire.
        let width = (score.score() - minimum).abs();
        let n_points = restriction.metric.reduce_uncertainty_to(&score, width);
        trace!(
            "validity round {rounds}: score={:.4} in [{:.4}, {:.4}], threshold={minimum}, drawing {n_points}",
            score.score(),
            score.lb(),
            score.ub()
        );
        resampler.resample(candidate, n_points)?;
    }
}
