//! Best/worst-arm selection under sampling uncertainty.
//!
//! [`select_top_m`] ranks candidate explanations ("arms") by an interval-valued
//! score and returns the `m` most likely to be the true top-`m`. For exact
//! metrics this is a stable sort; for estimated metrics it runs an LUCB-style
//! elimination loop that requests more samples only where the ranking is not
//! yet provably settled:
//!
//! - Accept the best-by-lower-bound once its strongest competitor's upper
//!   bound has closed to within the tolerance.
//! - Discard the worst-by-upper-bound once some competitor's lower bound
//!   provably clears it.
//! - Otherwise, resample *both* members of the contested pair with the larger
//!   decisive gap, splitting the needed width reduction evenly between them.
//!
//! Each resampling round either resolves a decision or provably shrinks the
//! decisive gap (intervals narrow monotonically in the sample count), so the
//! loop terminates — unless the interval floor at the configured significance
//! level is wider than the tolerance, which is why a hard `max_rounds` budget
//! is enforced.

use log::trace;

use crate::candidate::{Candidate, Resampler, ScoreKind};
use crate::error::Error;
use crate::metric::Metric;
use crate::score::{is_probably_better, Score};

/// Select the `m` arms most likely to be the true top-`m` under `kind`.
///
/// `entrants` are indices into `pool`; the result is a subset of `entrants`
/// with at most `m` elements (exactly `entrants` when `m >= entrants.len()`).
/// Estimated metrics may mutate the pooled candidates through `resampler`.
#[allow(clippy::too_many_arguments)]
pub fn select_top_m(
    pool: &mut [Candidate],
    entrants: &[usize],
    m: usize,
    tolerance: f64,
    kind: ScoreKind,
    metric: &dyn Metric,
    resampler: &mut Resampler<'_>,
    max_rounds: usize,
) -> Result<Vec<usize>, Error> {
    if metric.is_estimation() {
        lucb_top_m(pool, entrants, m, tolerance, kind, metric, resampler, max_rounds)
    } else {
        Ok(top_m_exact(pool, entrants, m, kind))
    }
}

/// Exact-metric bypass: stable sort by point score, descending, truncated.
fn top_m_exact(pool: &[Candidate], entrants: &[usize], m: usize, kind: ScoreKind) -> Vec<usize> {
    let mut ranked = entrants.to_vec();
    ranked.sort_by(|&a, &b| {
        pool[b]
            .score(kind)
            .score()
            .total_cmp(&pool[a].score(kind).score())
    });
    ranked.truncate(m);
    ranked
}

/// LUCB elimination over interval-valued scores.
#[allow(clippy::too_many_arguments)]
fn lucb_top_m(
    pool: &mut [Candidate],
    entrants: &[usize],
    m: usize,
    tolerance: f64,
    kind: ScoreKind,
    metric: &dyn Metric,
    resampler: &mut Resampler<'_>,
    max_rounds: usize,
) -> Result<Vec<usize>, Error> {
    let mut selected: Vec<usize> = Vec::new();
    let mut remaining: Vec<usize> = entrants.to_vec();
    let num_arms = entrants.len();
    let mut num_discarded = 0usize;
    let mut rounds = 0usize;

    while selected.len() < m && num_discarded < num_arms.saturating_sub(m) {
        if remaining.len() == 1 {
            selected.append(&mut remaining);
            break;
        }

        let mut by_lb = remaining.clone();
        by_lb.sort_by(|&a, &b| pool[b].score(kind).lb().total_cmp(&pool[a].score(kind).lb()));
        let mut by_ub = remaining.clone();
        by_ub.sort_by(|&a, &b| pool[b].score(kind).ub().total_cmp(&pool[a].score(kind).ub()));

        let best_by_lb = by_lb[0];
        let worst_by_ub = by_ub[by_ub.len() - 1];
        let worst_by_lb = by_lb[by_lb.len() - 1];

        // Strongest competitor on each contested side: the runner-up by the
        // opposing bound, skipping the contender itself when they coincide.
        let compare_best = if by_ub[0] == best_by_lb { by_ub[1] } else { by_ub[0] };
        let compare_worst = if worst_by_lb == worst_by_ub {
            by_lb[by_lb.len() - 2]
        } else {
            worst_by_lb
        };

        let best: Score = *pool[best_by_lb].score(kind);
        let best_rival: Score = *pool[compare_best].score(kind);
        let worst: Score = *pool[worst_by_ub].score(kind);
        let worst_rival: Score = *pool[compare_worst].score(kind);

        if is_probably_better(&best, &best_rival, tolerance) {
            selected.push(best_by_lb);
            remaining.retain(|&i| i != best_by_lb);
        } else if is_probably_better(&worst_rival, &worst, tolerance) {
            num_discarded += 1;
            remaining.retain(|&i| i != worst_by_ub);
        } else {
            rounds += 1;
            if rounds > max_rounds {
                return Err(Error::UnresolvedBounds { rounds: max_rounds });
            }
            // Resample whichever contested pair is closer to a decision.
            let best_gap = best.lb() - best_rival.ub();
            let worst_gap = worst_rival.lb() - worst.ub();
            trace!(
                "lucb round {rounds}: undecided, best_gap={best_gap:.4} worst_gap={worst_gap:.4}"
            );
            if best_gap > worst_gap {
                narrow_pair(pool, best_by_lb, compare_best, tolerance, kind, metric, resampler)?;
            } else {
                narrow_pair(pool, compare_worst, worst_by_ub, tolerance, kind, metric, resampler)?;
            }
        }
    }

    // Discard budget exhausted: everything still standing belongs to the top-m.
    if selected.len() < m {
        selected.extend(remaining);
    }
    Ok(selected)
}

/// Request samples for both members of a contested pair, splitting the needed
/// width reduction evenly between them.
fn narrow_pair(
    pool: &mut [Candidate],
    leader: usize,
    rival: usize,
    tolerance: f64,
    kind: ScoreKind,
    metric: &dyn Metric,
    resampler: &mut Resampler<'_>,
) -> Result<(), Error> {
    let gap = tolerance - (pool[leader].score(kind).lb() - pool[rival].score(kind).ub());
    let split = gap / 2.0;
    let n_leader = metric.reduce_uncertainty_to(pool[leader].score(kind), split);
    let n_rival = metric.reduce_uncertainty_to(pool[rival].score(kind), split);
    resampler.resample(&mut pool[leader], n_leader)?;
    resampler.resample(&mut pool[rival], n_rival)?;
    Ok(())
}
