//! Oracle-backed samplers: draw labelled points from inside a region.
//!
//! A sampler owns the black-box predictor and projects uniform draws into the
//! real-valued span of a structure. Like the rest of the crate's stochastic
//! components, samplers are **seedable** and deterministic by default.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::discretizer::BinGrid;
use crate::error::Error;
use crate::structure::Structure;

/// A batch of labelled points drawn from the oracle.
#[derive(Debug, Clone, Default)]
pub struct SampleBatch {
    /// One row per sample.
    pub points: Vec<Vec<f64>>,
    /// Predicted class per row.
    pub labels: Vec<u32>,
}

impl SampleBatch {
    /// Number of samples in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the batch holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// The black-box predictor, evaluated one point at a time.
pub type PredictFn = Box<dyn Fn(&[f64]) -> u32>;

/// Draws labelled points from a black-box predictor inside a given region.
pub trait Sampler {
    /// Remember anything needed from the training set. Default: nothing.
    fn dataset_fit(&mut self, _x: &[Vec<f64>]) -> Result<(), Error> {
        Ok(())
    }

    /// Bind the sampler to a fitted bin grid.
    fn fit_discretizer(&mut self, grid: &BinGrid) -> Result<(), Error>;

    /// Draw `n_points` labelled points uniformly from inside `structure` and
    /// evaluate the oracle on each.
    fn sample(&mut self, structure: &Structure, n_points: usize) -> Result<SampleBatch, Error>;

    /// First batch for a freshly materialized candidate; may be served from a
    /// precomputed cache. Default: a plain [`Sampler::sample`].
    fn initial_sampling(
        &mut self,
        structure: &Structure,
        n_points: usize,
    ) -> Result<SampleBatch, Error> {
        self.sample(structure, n_points)
    }
}

/// Uniform region sampler over a fitted bin grid.
pub struct TabularSampler {
    predict: PredictFn,
    rng: StdRng,
    grid: Option<BinGrid>,
}

impl TabularSampler {
    /// A sampler with a fixed default seed (deterministic by default).
    #[must_use]
    pub fn new(predict: impl Fn(&[f64]) -> u32 + 'static) -> Self {
        Self::with_seed(predict, 42)
    }

    /// A sampler with an explicit seed (reproducible).
    #[must_use]
    pub fn with_seed(predict: impl Fn(&[f64]) -> u32 + 'static, seed: u64) -> Self {
        Self {
            predict: Box::new(predict),
            rng: StdRng::seed_from_u64(seed),
            grid: None,
        }
    }

    fn fitted_grid(&self) -> Result<&BinGrid, Error> {
        self.grid.as_ref().ok_or(Error::NotFitted("TabularSampler"))
    }
}

impl Sampler for TabularSampler {
    fn fit_discretizer(&mut self, grid: &BinGrid) -> Result<(), Error> {
        self.grid = Some(grid.clone());
        Ok(())
    }

    fn sample(&mut self, structure: &Structure, n_points: usize) -> Result<SampleBatch, Error> {
        let spans: Vec<(f64, f64)> = {
            let grid = self.fitted_grid()?;
            if structure.n_features() != grid.n_features() {
                return Err(Error::DimensionMismatch {
                    expected: grid.n_features(),
                    got: structure.n_features(),
                });
            }
            (0..grid.n_features())
                .map(|feature| grid.span(feature, structure.range(feature)))
                .collect()
        };

        let mut points = Vec::with_capacity(n_points);
        let mut labels = Vec::with_capacity(n_points);
        for _ in 0..n_points {
            let point: Vec<f64> = spans
                .iter()
                .map(|&(lo, hi)| lo + (hi - lo) * self.rng.random::<f64>())
                .collect();
            labels.push((self.predict)(&point));
            points.push(point);
        }
        Ok(SampleBatch { points, labels })
    }
}

/// Region sampler with a precomputed initial-sampling pool.
///
/// On [`Sampler::fit_discretizer`] it draws a large pool over the full
/// discretizer area (refreshed only when the area changes) and serves
/// [`Sampler::initial_sampling`] by filtering the pool down to points whose
/// bins fall inside the requested structure, truncated to `n_points`.
/// Incremental [`Sampler::sample`] calls still hit the oracle directly.
pub struct CachingTabularSampler {
    inner: TabularSampler,
    pool_size: usize,
    pool: SampleBatch,
    pool_bins: Vec<Vec<u32>>,
    pooled_area: Option<Structure>,
}

impl CachingTabularSampler {
    /// A caching sampler with the default pool of 10 000 points.
    #[must_use]
    pub fn new(predict: impl Fn(&[f64]) -> u32 + 'static) -> Self {
        Self::with_pool_size(predict, 10_000, 42)
    }

    /// A caching sampler with an explicit pool size and seed.
    #[must_use]
    pub fn with_pool_size(
        predict: impl Fn(&[f64]) -> u32 + 'static,
        pool_size: usize,
        seed: u64,
    ) -> Self {
        Self {
            inner: TabularSampler::with_seed(predict, seed),
            pool_size,
            pool: SampleBatch::default(),
            pool_bins: Vec::new(),
            pooled_area: None,
        }
    }
}

impl Sampler for CachingTabularSampler {
    fn dataset_fit(&mut self, x: &[Vec<f64>]) -> Result<(), Error> {
        self.inner.dataset_fit(x)
    }

    fn fit_discretizer(&mut self, grid: &BinGrid) -> Result<(), Error> {
        self.inner.fit_discretizer(grid)?;
        let area = grid.full_area();
        if self.pooled_area.as_ref() != Some(&area) {
            let pool = self.inner.sample(&area, self.pool_size)?;
            self.pool_bins = pool
                .points
                .iter()
                .map(|point| grid.point_bins(point))
                .collect::<Result<_, _>>()?;
            self.pool = pool;
            self.pooled_area = Some(area);
        }
        Ok(())
    }

    fn sample(&mut self, structure: &Structure, n_points: usize) -> Result<SampleBatch, Error> {
        self.inner.sample(structure, n_points)
    }

    fn initial_sampling(
        &mut self,
        structure: &Structure,
        n_points: usize,
    ) -> Result<SampleBatch, Error> {
        if self.pooled_area.is_none() {
            return Err(Error::NotFitted("CachingTabularSampler"));
        }

        let mut batch = SampleBatch::default();
        for (row, bins) in self.pool_bins.iter().enumerate() {
            if batch.len() == n_points {
                break;
            }
            let inside = bins.iter().enumerate().all(|(feature, &bin)| {
                let range = structure.range(feature);
                range.low <= bin && bin <= range.high
            });
            if inside {
                batch.points.push(self.pool.points[row].clone());
                batch.labels.push(self.pool.labels[row]);
            }
        }

        // A small or unlucky pool can miss a narrow region entirely; fall back
        // to fresh draws rather than handing metrics an empty batch.
        if batch.is_empty() {
            return self.inner.sample(structure, n_points);
        }
        Ok(batch)
    }
}
