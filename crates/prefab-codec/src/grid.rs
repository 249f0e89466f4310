use glam::UVec3;
use prefab_core::{Block, Prefab};

/// Dense cell arena for one prefab, indexed by `(x, y, z)`.
///
/// Only the layer encoder builds one; the canonical model stays sparse.
pub struct LayerGrid {
    size: UVec3,
    cells: Vec<Option<Block>>,
}

impl LayerGrid {
    /// Materialize the prefab's sparse block set into a dense arena.
    pub fn from_prefab(prefab: &Prefab) -> Self {
        let size = prefab.size;
        let mut cells = vec![None; cell_count(size)];
        for (pos, block) in &prefab.blocks {
            if let Some(i) = linear_index(size, pos.x, pos.y, pos.z) {
                cells[i] = Some(*block);
            }
        }
        Self { size, cells }
    }

    pub fn size(&self) -> UVec3 {
        self.size
    }

    /// Cell contents at `(x, y, z)`, or None for empty and out-of-range cells.
    pub fn get(&self, x: u32, y: u32, z: u32) -> Option<Block> {
        linear_index(self.size, x, y, z).and_then(|i| self.cells[i])
    }
}

fn cell_count(size: UVec3) -> usize {
    size.x as usize * size.y as usize * size.z as usize
}

/// Plane-major linear index: y planes, then z rows, then x columns.
fn linear_index(size: UVec3, x: u32, y: u32, z: u32) -> Option<usize> {
    if x >= size.x || y >= size.y || z >= size.z {
        return None;
    }
    let (sx, sz) = (size.x as usize, size.z as usize);
    Some((y as usize * sz + z as usize) * sx + x as usize)
}
