//! Region-of-interest constraints on expansion.

use crate::structure::Structure;

/// Constrains expansion to a bounded region of interest.
pub trait Neighborhood {
    /// Whether `structure` stays inside the region of interest.
    fn check_inside(&self, structure: &Structure) -> bool;
}

/// Unconstrained: every structure is inside.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anywhere;

impl Neighborhood for Anywhere {
    fn check_inside(&self, _structure: &Structure) -> bool {
        true
    }
}

/// Containment in a fixed bounding region.
#[derive(Debug, Clone)]
pub struct BoundedNeighborhood {
    area: Structure,
}

impl BoundedNeighborhood {
    /// A neighborhood bounded by `area`.
    #[must_use]
    pub fn new(area: Structure) -> Self {
        Self { area }
    }
}

impl Neighborhood for BoundedNeighborhood {
    fn check_inside(&self, structure: &Structure) -> bool {
        self.area.contains(structure)
    }
}
