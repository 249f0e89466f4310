use std::collections::BTreeMap;

use glam::UVec3;

use crate::constants::DEFAULT_SUBMERGE;
use crate::types::{Block, BlockPos, PlacedObject};

/// Canonical in-memory prefab. Both wire formats are projections of this.
///
/// Blocks are stored sparsely, so memory follows the number of occupied
/// cells rather than the volume of `size`.
#[derive(Debug, Clone, PartialEq)]
pub struct Prefab {
    pub name: String,
    /// Bounding extent (size_x, size_y, size_z).
    pub size: UVec3,
    /// Opaque placement parameter, carried through unchanged.
    pub submerge: i32,
    pub blocks: BTreeMap<BlockPos, Block>,
    /// Placed objects in document order.
    pub objects: Vec<PlacedObject>,
}

impl Prefab {
    /// Create an empty prefab with the default submerge value.
    pub fn new(name: impl Into<String>, size: UVec3) -> Self {
        Self {
            name: name.into(),
            size,
            submerge: DEFAULT_SUBMERGE,
            blocks: BTreeMap::new(),
            objects: Vec::new(),
        }
    }

    /// Whether `pos` lies inside the bounding extent.
    pub fn contains(&self, pos: BlockPos) -> bool {
        pos.x < self.size.x && pos.y < self.size.y && pos.z < self.size.z
    }

    /// Store a block, replacing and returning any block already at `pos`.
    ///
    /// Callers must check `contains` first; the bounds invariant is enforced
    /// by the readers, not here.
    pub fn insert_block(&mut self, pos: BlockPos, block: Block) -> Option<Block> {
        debug_assert!(self.contains(pos), "block {pos} outside {:?}", self.size);
        self.blocks.insert(pos, block)
    }

    pub fn block(&self, pos: BlockPos) -> Option<Block> {
        self.blocks.get(&pos).copied()
    }

    /// Number of occupied cells.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Total number of cells in the bounding box.
    pub fn volume(&self) -> u64 {
        u64::from(self.size.x) * u64::from(self.size.y) * u64::from(self.size.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_prefab_is_empty() {
        let prefab = Prefab::new("hut", UVec3::new(3, 2, 4));
        assert_eq!(prefab.name, "hut");
        assert_eq!(prefab.submerge, DEFAULT_SUBMERGE);
        assert_eq!(prefab.block_count(), 0);
        assert!(prefab.objects.is_empty());
        assert_eq!(prefab.volume(), 24);
    }

    #[test]
    fn test_insert_block_last_write_wins() {
        let mut prefab = Prefab::new("p", UVec3::splat(2));
        let pos = BlockPos::new(1, 1, 1);
        assert_eq!(prefab.insert_block(pos, Block::new(3, 0)), None);
        assert_eq!(
            prefab.insert_block(pos, Block::new(4, 1)),
            Some(Block::new(3, 0))
        );
        assert_eq!(prefab.block(pos), Some(Block::new(4, 1)));
        assert_eq!(prefab.block_count(), 1);
    }

    #[test]
    fn test_contains_checks_every_axis() {
        let prefab = Prefab::new("p", UVec3::new(1, 2, 3));
        assert!(prefab.contains(BlockPos::new(0, 1, 2)));
        assert!(!prefab.contains(BlockPos::new(1, 0, 0)));
        assert!(!prefab.contains(BlockPos::new(0, 2, 0)));
        assert!(!prefab.contains(BlockPos::new(0, 0, 3)));
    }
}
