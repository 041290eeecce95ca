//! Hoeffding confidence bounds for sample means of `[0, 1]`-bounded variables.
//!
//! The adaptive-sampling loops in this crate terminate because these intervals
//! narrow monotonically with the sample count: drawing more points can only
//! tighten a candidate's score interval, never widen it.

/// Symmetric Hoeffding interval around `sample_mean`.
///
/// Returns `(lower, upper)` with half-width `sqrt(-ln(p) / (2 * n_points))`,
/// so that the true mean escapes either bound with probability at most `p`.
/// Valid for sample means of variables bounded in `[0, 1]`.
///
/// The interval degenerates to `(-inf, +inf)` as `n_points -> 0`; callers must
/// guard `n_points >= 1`.
#[must_use]
pub fn hoeffding_bounds(sample_mean: f64, n_points: usize, p: f64) -> (f64, f64) {
    let half_width = hoeffding_half_width(n_points, p);
    (sample_mean - half_width, sample_mean + half_width)
}

/// Half-width of the Hoeffding interval for `n_points` samples at
/// significance `p`.
#[must_use]
pub fn hoeffding_half_width(n_points: usize, p: f64) -> f64 {
    (-p.ln() / (2.0 * n_points as f64)).sqrt()
}
