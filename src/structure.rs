//! Axis-aligned hyper-rectangles over discretized feature bins.
//!
//! A [`Structure`] is the object being searched over: one inclusive bin span
//! per feature. It is an immutable value type whose equality and hash derive
//! from the bin contents, so structurally identical regions collapse to one
//! entry in visited-sets no matter how they were produced.

use crate::error::Error;

/// One feature's inclusive bin span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinRange {
    /// First bin covered (inclusive).
    pub low: u32,
    /// Last bin covered (inclusive).
    pub high: u32,
}

impl BinRange {
    /// A span from `low` to `high`, both inclusive. Requires `low <= high`.
    #[must_use]
    pub fn new(low: u32, high: u32) -> Self {
        debug_assert!(low <= high, "BinRange requires low <= high");
        Self { low, high }
    }

    /// The degenerate span covering a single bin.
    #[must_use]
    pub fn point(bin: u32) -> Self {
        Self { low: bin, high: bin }
    }

    /// Bins spanned beyond the first: `high - low`.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.high - self.low
    }

    /// Whether `other` lies entirely within this span.
    #[must_use]
    pub fn covers(&self, other: &BinRange) -> bool {
        self.low <= other.low && other.high <= self.high
    }
}

/// A hyper-rectangular region of discretized feature bins.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Structure {
    bins: Box<[BinRange]>,
}

impl Structure {
    /// A region from per-feature spans.
    #[must_use]
    pub fn new(bins: Vec<BinRange>) -> Self {
        Self {
            bins: bins.into_boxed_slice(),
        }
    }

    /// The degenerate region covering exactly one bin per feature.
    #[must_use]
    pub fn from_point_bins(bins: &[u32]) -> Self {
        Self::new(bins.iter().map(|&b| BinRange::point(b)).collect())
    }

    /// Number of features.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.bins.len()
    }

    /// The span of one feature.
    #[must_use]
    pub fn range(&self, feature: usize) -> BinRange {
        self.bins[feature]
    }

    /// All per-feature spans.
    #[must_use]
    pub fn ranges(&self) -> &[BinRange] {
        &self.bins
    }

    /// Sum of per-feature widths: the size objective.
    #[must_use]
    pub fn total_width(&self) -> u64 {
        self.bins.iter().map(|r| u64::from(r.width())).sum()
    }

    /// Whether `other` lies entirely within this region.
    #[must_use]
    pub fn contains(&self, other: &Structure) -> bool {
        self.bins.len() == other.bins.len()
            && self
                .bins
                .iter()
                .zip(other.bins.iter())
                .all(|(own, theirs)| own.covers(theirs))
    }

    /// A copy with one feature's span replaced by a covering span.
    ///
    /// Growth is monotone: the new span must cover the old one, otherwise this
    /// is a contract violation and returns [`Error::InvalidShrink`].
    pub fn grown(&self, feature: usize, range: BinRange) -> Result<Structure, Error> {
        let current = self.bins[feature];
        if !range.covers(&current) {
            return Err(Error::InvalidShrink {
                feature,
                from_low: current.low,
                from_high: current.high,
                to_low: range.low,
                to_high: range.high,
            });
        }
        let mut bins = self.bins.to_vec();
        bins[feature] = range;
        Ok(Structure::new(bins))
    }
}
