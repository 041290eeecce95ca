//! Interval-valued statistics and the comparisons the selector makes on them.
//!
//! A [`Score`] splits a statistic into a *fixed* component (known exactly, e.g.
//! region size) and an *uncertain* component (a sample mean with confidence
//! bounds). Exact metrics produce zero-width intervals with `n_points == 0`;
//! estimated metrics produce intervals that narrow as samples accrue.

/// An interval-valued statistic backing one candidate metric.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Score {
    /// Deterministic component, known exactly.
    pub fixed: f64,
    /// Point estimate of the sampled component.
    pub uncertain: f64,
    /// Lower confidence bound on the sampled component.
    pub uncertain_lb: f64,
    /// Upper confidence bound on the sampled component.
    pub uncertain_ub: f64,
    /// Samples backing the uncertain component (`0` means exact).
    pub n_points: usize,
}

impl Score {
    /// An exact statistic: zero-width interval, no samples.
    #[must_use]
    pub fn exact(value: f64) -> Self {
        Self {
            fixed: value,
            uncertain: 0.0,
            uncertain_lb: 0.0,
            uncertain_ub: 0.0,
            n_points: 0,
        }
    }

    /// An estimated statistic with confidence bounds on the sampled mean.
    #[must_use]
    pub fn estimated(mean: f64, lb: f64, ub: f64, n_points: usize) -> Self {
        Self {
            fixed: 0.0,
            uncertain: mean,
            uncertain_lb: lb,
            uncertain_ub: ub,
            n_points,
        }
    }

    /// Point estimate: fixed plus uncertain components.
    #[must_use]
    pub fn score(&self) -> f64 {
        self.fixed + self.uncertain
    }

    /// Lower bound of the full statistic.
    #[must_use]
    pub fn lb(&self) -> f64 {
        self.fixed + self.uncertain_lb
    }

    /// Upper bound of the full statistic.
    #[must_use]
    pub fn ub(&self) -> f64 {
        self.fixed + self.uncertain_ub
    }

    /// Interval width `ub - lb`.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.ub() - self.lb()
    }
}

/// Whether `best` provably ranks above `other`: the remaining overlap
/// `other.ub - best.lb` has closed below `tolerance`.
#[must_use]
pub fn is_probably_better(best: &Score, other: &Score, tolerance: f64) -> bool {
    other.ub() - best.lb() < tolerance
}

/// Whether the statistic provably exceeds `value` within `tolerance`.
#[must_use]
pub fn is_probably_higher(score: &Score, value: f64, tolerance: f64) -> bool {
    value - score.lb() < tolerance
}

/// Whether the statistic provably falls below `value` within `tolerance`.
#[must_use]
pub fn is_probably_lower(score: &Score, value: f64, tolerance: f64) -> bool {
    value - score.ub() > tolerance
}
