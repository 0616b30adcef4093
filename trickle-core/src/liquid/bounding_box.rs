//! Collision and selection shapes for liquid cells.

use trickle_utils::BlockPos;

use super::amount::MAX_AMOUNT;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: [f64; 3],
    /// Maximum corner.
    pub max: [f64; 3],
}

impl Aabb {
    /// The unit cube of a single cell.
    pub const FULL_BLOCK: Self = Self::new([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);

    /// Creates a new box from two corners.
    #[must_use]
    pub const fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Self { min, max }
    }

    /// Returns this box moved into world space at `pos`.
    #[must_use]
    pub fn offset(&self, pos: BlockPos) -> Self {
        let delta = [f64::from(pos.x()), f64::from(pos.y()), f64::from(pos.z())];
        Self {
            min: [
                self.min[0] + delta[0],
                self.min[1] + delta[1],
                self.min[2] + delta[2],
            ],
            max: [
                self.max[0] + delta[0],
                self.max[1] + delta[1],
                self.max[2] + delta[2],
            ],
        }
    }

    /// Whether the two boxes overlap with non-zero volume.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        (0..3).all(|axis| self.min[axis] < other.max[axis] && self.max[axis] > other.min[axis])
    }
}

/// Cell-local box for a liquid holding `amount` units.
///
/// The box covers the full horizontal footprint and `amount / 16` of the
/// height. Amounts above the maximum give a full cube, empty cells give none.
#[must_use]
pub fn liquid_shape(amount: i32) -> Option<Aabb> {
    match amount {
        i32::MIN..=0 => None,
        1..=16 => Some(Aabb::new(
            [0.0, 0.0, 0.0],
            [1.0, f64::from(amount) / f64::from(MAX_AMOUNT), 1.0],
        )),
        _ => Some(Aabb::FULL_BLOCK),
    }
}
