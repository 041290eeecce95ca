//! Utility and restriction scoring of candidate regions.
//!
//! A [`Metric`] turns a sample batch plus a structure into a [`Score`]. Exact
//! metrics (e.g. [`SizeMetric`]) ignore the samples and return a zero-width
//! interval; estimated metrics (e.g. [`FidelityMetric`]) fold each new batch
//! into the running estimate by a count-weighted mean, so prior evidence is
//! never discarded.

use crate::bounds::hoeffding_bounds;
use crate::error::Error;
use crate::grouping::GroupingMeasure;
use crate::sampler::SampleBatch;
use crate::score::Score;
use crate::structure::Structure;

/// Incremental batch size requested by the default refinement policy.
pub const DEFAULT_REFINE_BATCH: usize = 100;

/// Scores candidate regions from finite samples.
pub trait Metric {
    /// Fold a freshly drawn batch into the running score for `structure`.
    ///
    /// `previous` carries the score from earlier batches; estimated metrics
    /// must combine means by sample-count weighting rather than replacing the
    /// old estimate.
    fn calculate(
        &self,
        batch: &SampleBatch,
        structure: &Structure,
        previous: Option<&Score>,
    ) -> Result<Score, Error>;

    /// Sample count to request next to drive the interval toward `width`.
    ///
    /// The reference policy is a fixed batch; any monotone policy that drives
    /// the interval width toward zero under repeated calls is acceptable.
    fn reduce_uncertainty_to(&self, _current: &Score, _width: f64) -> usize {
        DEFAULT_REFINE_BATCH
    }

    /// Whether scores carry sampling uncertainty. Exact metrics get a
    /// sort-and-truncate bypass in the selector.
    fn is_estimation(&self) -> bool;
}

/// Fraction of sampled points whose prediction matches the grouping measure.
///
/// The canonical restriction metric: a region is faithful when most points
/// inside it share the queried point's predicted class.
#[derive(Debug, Clone)]
pub struct FidelityMetric<G: GroupingMeasure> {
    grouping: G,
    p: f64,
}

impl<G: GroupingMeasure> FidelityMetric<G> {
    /// A fidelity metric at the default significance level 0.05.
    #[must_use]
    pub fn new(grouping: G) -> Self {
        Self::with_significance(grouping, 0.05)
    }

    /// A fidelity metric with an explicit Hoeffding significance level.
    #[must_use]
    pub fn with_significance(grouping: G, p: f64) -> Self {
        Self { grouping, p }
    }
}

impl<G: GroupingMeasure> Metric for FidelityMetric<G> {
    fn calculate(
        &self,
        batch: &SampleBatch,
        _structure: &Structure,
        previous: Option<&Score>,
    ) -> Result<Score, Error> {
        let hits = self.grouping.calculate(&batch.labels);
        let count = hits.len();
        let hit_count = hits.iter().filter(|&&hit| hit).count();

        let (previous_mean, previous_count) =
            previous.map_or((0.0, 0), |s| (s.uncertain, s.n_points));
        let combined_count = count + previous_count;
        if combined_count == 0 {
            return Err(Error::EmptySample);
        }

        let batch_weight = hit_count as f64;
        let combined_mean =
            (batch_weight + previous_mean * previous_count as f64) / combined_count as f64;
        let (lb, ub) = hoeffding_bounds(combined_mean, combined_count, self.p);
        Ok(Score::estimated(combined_mean, lb, ub, combined_count))
    }

    fn is_estimation(&self) -> bool {
        true
    }
}

/// Region size: the sum of per-feature bin spans. Exact, sample-free.
///
/// Larger scores win in the selector, so ranking by this metric prefers the
/// largest region satisfying the restriction.
#[derive(Debug, Clone, Copy, Default)]
pub struct SizeMetric;

impl Metric for SizeMetric {
    fn calculate(
        &self,
        _batch: &SampleBatch,
        structure: &Structure,
        _previous: Option<&Score>,
    ) -> Result<Score, Error> {
        Ok(Score::exact(structure.total_width() as f64))
    }

    fn reduce_uncertainty_to(&self, _current: &Score, _width: f64) -> usize {
        0
    }

    fn is_estimation(&self) -> bool {
        false
    }
}
