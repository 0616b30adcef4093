// Wrapper types making it harder to accidentally mix up coordinates and flags.

use std::fmt::{self, Display};

use bitflags::bitflags;

use crate::math::Vector3;

// A block position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlockPos(pub Vector3<i32>);

impl BlockPos {
    /// Creates a new block position.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self(Vector3::new(x, y, z))
    }

    /// The x coordinate.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.0.x
    }

    /// The y coordinate.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.0.y
    }

    /// The z coordinate.
    #[must_use]
    pub const fn z(&self) -> i32 {
        self.0.z
    }

    /// Returns this position shifted by the given deltas.
    #[must_use]
    pub const fn offset(&self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.0.x + dx, self.0.y + dy, self.0.z + dz)
    }

    /// The position directly underneath.
    #[must_use]
    pub const fn below(&self) -> Self {
        self.offset(0, -1, 0)
    }

    /// The position directly above.
    #[must_use]
    pub const fn above(&self) -> Self {
        self.offset(0, 1, 0)
    }

    /// Largest per-axis distance between two positions.
    #[must_use]
    pub const fn chebyshev_distance(&self, other: &Self) -> u32 {
        let dx = self.0.x.abs_diff(other.0.x);
        let dy = self.0.y.abs_diff(other.0.y);
        let dz = self.0.z.abs_diff(other.0.z);
        let max = if dx > dy { dx } else { dy };
        if max > dz { max } else { dz }
    }

    /// Whether `other` lies inside the cube of the given radius centered here.
    #[must_use]
    pub const fn is_in_range(&self, other: &Self, radius: u32) -> bool {
        self.chebyshev_distance(other) <= radius
    }
}

impl From<[i32; 3]> for BlockPos {
    fn from([x, y, z]: [i32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.0.x, self.0.y, self.0.z)
    }
}

bitflags! {
    /// Side effects requested alongside a block write.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct UpdateFlags: u8 {
        /// Neighbouring blocks are told that this block changed.
        const NOTIFY_NEIGHBORS = 0b01;
        /// The change is sent to observers of the world.
        const UPDATE_CLIENTS = 0b10;
        /// Both of the above.
        const ALL = Self::NOTIFY_NEIGHBORS.bits() | Self::UPDATE_CLIENTS.bits();
    }
}
