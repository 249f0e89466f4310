use std::cmp::Ordering;
use std::fmt;

use glam::{DVec3, I64Vec3, UVec3};

/// Cell coordinate inside a prefab's bounding box.
///
/// Ordered by (y, z, x): plane first, then row, then column. This is the
/// order the layer encoder walks the grid, so a `BTreeMap<BlockPos, _>`
/// iterates blocks in the same order they appear in the layered format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockPos {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl BlockPos {
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// Validate a raw document offset against the bounding extent.
    /// Returns None when any component falls outside `0..size`.
    pub fn within(offset: I64Vec3, size: UVec3) -> Option<Self> {
        let in_range = |v: i64, extent: u32| v >= 0 && v < i64::from(extent);
        if in_range(offset.x, size.x) && in_range(offset.y, size.y) && in_range(offset.z, size.z)
        {
            Some(Self::new(offset.x as u32, offset.y as u32, offset.z as u32))
        } else {
            None
        }
    }

    pub fn as_uvec3(self) -> UVec3 {
        UVec3::new(self.x, self.y, self.z)
    }
}

impl Ord for BlockPos {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.y, self.z, self.x).cmp(&(other.y, other.z, other.x))
    }
}

impl PartialOrd for BlockPos {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// One occupied voxel cell. Type and meta are opaque to the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Block {
    pub block_type: u32,
    pub meta: u32,
}

impl Block {
    pub const fn new(block_type: u32, meta: u32) -> Self {
        Self { block_type, meta }
    }
}

/// A placed entity (door, light, ...) anchored near the voxel grid.
///
/// The offset is not confined to the grid; its y component may be fractional.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlacedObject {
    pub object_id: i32,
    pub offset: DVec3,
    pub rotation: i32,
    pub fractional_y: f64,
}
