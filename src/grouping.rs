//! Grouping measures: turn raw predictor output into a binary match signal.

/// Maps oracle labels to a hit/miss signal consumed by fidelity-style metrics.
pub trait GroupingMeasure {
    /// One flag per label: whether it counts as a match.
    fn calculate(&self, labels: &[u32]) -> Vec<bool>;
}

/// Marks labels equal to a configured target class.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimpleMatching {
    /// The class a matching prediction must equal.
    pub target_class: u32,
}

impl SimpleMatching {
    /// A matcher for `target_class`.
    #[must_use]
    pub fn new(target_class: u32) -> Self {
        Self { target_class }
    }
}

impl GroupingMeasure for SimpleMatching {
    fn calculate(&self, labels: &[u32]) -> Vec<bool> {
        labels.iter().map(|&y| y == self.target_class).collect()
    }
}
