//! Expansion policies: propose neighboring, existing-or-larger regions.

use crate::discretizer::BinGrid;
use crate::error::Error;
use crate::neighborhood::Neighborhood;
use crate::structure::{BinRange, Structure};

/// Proposes the next regions to try around a surviving candidate.
///
/// Growth is monotone: every emitted structure must cover its parent. A
/// policy that attempts to shrink a region triggers [`Error::InvalidShrink`].
pub trait ExpandStrategy {
    /// Bind the policy to a fitted bin grid.
    fn fit_discretizer(&mut self, grid: &BinGrid) -> Result<(), Error>;

    /// Neighboring structures of `structure`, each inside `neighborhood`.
    fn expand(
        &self,
        structure: &Structure,
        neighborhood: &dyn Neighborhood,
    ) -> Result<Vec<Structure>, Error>;
}

/// Widens one feature at a time by up to `max_step` bins per side.
///
/// Per feature, emits the parent with its left edge moved out by
/// `1..=max_step` bins and separately with its right edge moved out by
/// `1..=max_step` bins, clamped to the grid and filtered through the
/// neighborhood.
#[derive(Debug, Clone)]
pub struct StepExpandStrategy {
    max_step: u32,
    grid: Option<BinGrid>,
}

impl StepExpandStrategy {
    /// A policy widening by at most `max_step` bins per side per round.
    #[must_use]
    pub fn new(max_step: u32) -> Self {
        Self {
            max_step: max_step.max(1),
            grid: None,
        }
    }
}

impl Default for StepExpandStrategy {
    fn default() -> Self {
        Self::new(1)
    }
}

impl ExpandStrategy for StepExpandStrategy {
    fn fit_discretizer(&mut self, grid: &BinGrid) -> Result<(), Error> {
        self.grid = Some(grid.clone());
        Ok(())
    }

    fn expand(
        &self,
        structure: &Structure,
        neighborhood: &dyn Neighborhood,
    ) -> Result<Vec<Structure>, Error> {
        let grid = self
            .grid
            .as_ref()
            .ok_or(Error::NotFitted("StepExpandStrategy"))?;
        if structure.n_features() != grid.n_features() {
            return Err(Error::DimensionMismatch {
                expected: grid.n_features(),
                got: structure.n_features(),
            });
        }

        let mut offspring = Vec::new();
        for feature in 0..grid.n_features() {
            let BinRange { low, high } = structure.range(feature);

            for new_low in low.saturating_sub(self.max_step)..low {
                let grown = structure.grown(feature, BinRange::new(new_low, high))?;
                if neighborhood.check_inside(&grown) {
                    offspring.push(grown);
                }
            }

            let last_bin = (grid.bins_in_feature(feature) - 1) as u32;
            let limit = high.saturating_add(self.max_step).min(last_bin);
            for new_high in (high + 1)..=limit {
                let grown = structure.grown(feature, BinRange::new(low, new_high))?;
                if neighborhood.check_inside(&grown) {
                    offspring.push(grown);
                }
            }
        }
        Ok(offspring)
    }
}
