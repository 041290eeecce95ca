//! Feature-space discretization into per-feature bin grids.
//!
//! A fitted discretizer exposes a [`BinGrid`]: per-feature ascending edge
//! arrays. Samplers and expansion policies are fitted against a cloned grid
//! rather than holding a reference back into the discretizer, so the grid is
//! the value that actually travels between collaborators.

use crate::error::Error;
use crate::structure::{BinRange, Structure};

/// Fitted per-feature bin edges.
///
/// Each feature carries `num_bins + 1` non-decreasing edges; bin `i` covers
/// `[edges[i], edges[i + 1])`, with the final bin closed on both sides so the
/// fitted maximum still falls inside the grid.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinGrid {
    edges: Vec<Vec<f64>>,
}

impl BinGrid {
    /// A grid from per-feature edge arrays. Each array must hold at least two
    /// non-decreasing edges.
    #[must_use]
    pub fn new(edges: Vec<Vec<f64>>) -> Self {
        debug_assert!(edges.iter().all(|e| e.len() >= 2));
        debug_assert!(edges
            .iter()
            .all(|e| e.windows(2).all(|pair| pair[0] <= pair[1])));
        Self { edges }
    }

    /// Number of features in the grid.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.edges.len()
    }

    /// Number of bins available in one feature.
    #[must_use]
    pub fn bins_in_feature(&self, feature: usize) -> usize {
        self.edges[feature].len() - 1
    }

    /// Real-valued span covered by `range` in `feature`.
    ///
    /// `range` must come from this grid (bin indices in bounds).
    #[must_use]
    pub fn span(&self, feature: usize, range: BinRange) -> (f64, f64) {
        let edges = &self.edges[feature];
        (edges[range.low as usize], edges[range.high as usize + 1])
    }

    /// Bin index of `value` in `feature`.
    ///
    /// The fitted maximum maps to the last bin; anything outside the fitted
    /// span is [`Error::OutOfRange`].
    pub fn bin_of(&self, feature: usize, value: f64) -> Result<u32, Error> {
        let edges = &self.edges[feature];
        let last = edges[edges.len() - 1];
        if value < edges[0] || value > last {
            return Err(Error::OutOfRange { feature, value });
        }
        // First edge strictly above the value; the bin is the edge before it.
        let idx = edges.partition_point(|&edge| edge <= value);
        let bin = idx.max(1) - 1;
        Ok(bin.min(edges.len() - 2) as u32)
    }

    /// Per-feature bin indices of a point.
    pub fn point_bins(&self, point: &[f64]) -> Result<Vec<u32>, Error> {
        if point.len() != self.n_features() {
            return Err(Error::DimensionMismatch {
                expected: self.n_features(),
                got: point.len(),
            });
        }
        point
            .iter()
            .enumerate()
            .map(|(feature, &value)| self.bin_of(feature, value))
            .collect()
    }

    /// The full-range region over every feature.
    #[must_use]
    pub fn full_area(&self) -> Structure {
        Structure::new(
            self.edges
                .iter()
                .map(|e| BinRange::new(0, (e.len() - 2) as u32))
                .collect(),
        )
    }
}

/// Turns raw points into bin-range structures and reports region bounds.
pub trait Discretizer {
    /// Fit bin edges from the training set.
    fn fit(&mut self, x: &[Vec<f64>], y: &[u32]) -> Result<(), Error>;

    /// The fitted grid; [`Error::NotFitted`] before [`Discretizer::fit`].
    fn grid(&self) -> Result<&BinGrid, Error>;

    /// Number of fitted features.
    fn n_features(&self) -> Result<usize, Error> {
        Ok(self.grid()?.n_features())
    }

    /// The degenerate single-bin-per-feature region containing `point`.
    fn to_structure(&self, point: &[f64]) -> Result<Structure, Error> {
        let bins = self.grid()?.point_bins(point)?;
        Ok(Structure::from_point_bins(&bins))
    }

    /// The full fitted region.
    fn discretizer_area(&self) -> Result<Structure, Error> {
        Ok(self.grid()?.full_area())
    }
}

/// Quantile-based discretizer: bin edges follow the empirical distribution of
/// each feature, so dense value ranges get finer bins.
#[derive(Debug, Clone)]
pub struct TabularDiscretizer {
    num_bins: usize,
    grid: Option<BinGrid>,
}

impl TabularDiscretizer {
    /// A discretizer with `num_bins` bins per feature.
    #[must_use]
    pub fn new(num_bins: usize) -> Self {
        Self {
            num_bins: num_bins.max(1),
            grid: None,
        }
    }
}

impl Default for TabularDiscretizer {
    fn default() -> Self {
        Self::new(10)
    }
}

impl Discretizer for TabularDiscretizer {
    fn fit(&mut self, x: &[Vec<f64>], _y: &[u32]) -> Result<(), Error> {
        let columns = columns_of(x)?;
        let mut edges = Vec::with_capacity(columns.len());
        for mut column in columns {
            column.sort_by(f64::total_cmp);
            let mut feature_edges = Vec::with_capacity(self.num_bins + 1);
            feature_edges.push(column[0]);
            for i in 1..self.num_bins {
                let q = (i + 1) as f64 / (self.num_bins + 1) as f64;
                feature_edges.push(quantile(&column, q));
            }
            feature_edges.push(column[column.len() - 1]);
            // Ties in the data can produce locally decreasing quantiles.
            for j in 1..feature_edges.len() {
                if feature_edges[j] < feature_edges[j - 1] {
                    feature_edges[j] = feature_edges[j - 1];
                }
            }
            edges.push(feature_edges);
        }
        self.grid = Some(BinGrid::new(edges));
        Ok(())
    }

    fn grid(&self) -> Result<&BinGrid, Error> {
        self.grid.as_ref().ok_or(Error::NotFitted("TabularDiscretizer"))
    }
}

/// Equal-width discretizer: bins split each feature's fitted `[min, max]`
/// span into `num_bins` uniform intervals.
#[derive(Debug, Clone)]
pub struct UniformDiscretizer {
    num_bins: usize,
    grid: Option<BinGrid>,
}

impl UniformDiscretizer {
    /// A discretizer with `num_bins` equal-width bins per feature.
    #[must_use]
    pub fn new(num_bins: usize) -> Self {
        Self {
            num_bins: num_bins.max(1),
            grid: None,
        }
    }
}

impl Default for UniformDiscretizer {
    fn default() -> Self {
        Self::new(10)
    }
}

impl Discretizer for UniformDiscretizer {
    fn fit(&mut self, x: &[Vec<f64>], _y: &[u32]) -> Result<(), Error> {
        let columns = columns_of(x)?;
        let mut edges = Vec::with_capacity(columns.len());
        for column in columns {
            let min = column.iter().copied().fold(f64::INFINITY, f64::min);
            let max = column.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let step = (max - min) / self.num_bins as f64;
            let mut feature_edges: Vec<f64> = (0..self.num_bins)
                .map(|i| min + step * i as f64)
                .collect();
            feature_edges.push(max);
            edges.push(feature_edges);
        }
        self.grid = Some(BinGrid::new(edges));
        Ok(())
    }

    fn grid(&self) -> Result<&BinGrid, Error> {
        self.grid.as_ref().ok_or(Error::NotFitted("UniformDiscretizer"))
    }
}

/// Column-major copy of a row-major training set, validating rectangularity.
fn columns_of(x: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, Error> {
    let n_features = x.first().map_or(0, Vec::len);
    if n_features == 0 {
        return Err(Error::EmptySample);
    }
    let mut columns = vec![Vec::with_capacity(x.len()); n_features];
    for row in x {
        if row.len() != n_features {
            return Err(Error::DimensionMismatch {
                expected: n_features,
                got: row.len(),
            });
        }
        for (column, &value) in columns.iter_mut().zip(row.iter()) {
            column.push(value);
        }
    }
    Ok(columns)
}

/// Linear-interpolation quantile over a sorted slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let below = position.floor() as usize;
    let above = position.ceil() as usize;
    let fraction = position - below as f64;
    sorted[below] + (sorted[above] - sorted[below]) * fraction
}
