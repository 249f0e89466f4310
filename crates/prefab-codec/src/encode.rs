use prefab_core::constants::{FORMAT_VERSION, LAYER_SEPARATOR, LEGACY_VERSION};
use prefab_core::{PlacedObject, Prefab};

use crate::format::{CompactObject, Coord, V1Block, V1Document, V1Object, V2Document};
use crate::grid::LayerGrid;
use crate::token::Token;

/// Serialize a prefab into the layered (version 2) document.
pub fn encode_v2(prefab: &Prefab) -> V2Document {
    V2Document {
        name: prefab.name.clone(),
        version: FORMAT_VERSION,
        size: prefab.size.to_array(),
        submerge: prefab.submerge,
        layers: encode_layers(prefab),
        objects: compact_objects(&prefab.objects),
    }
}

/// Render the block grid as layer lines.
///
/// Planes run y = 0..size_y with a separator before every plane after the
/// first. Each plane is size_z lines, each line size_x space-separated tokens.
pub fn encode_layers(prefab: &Prefab) -> Vec<String> {
    let grid = LayerGrid::from_prefab(prefab);
    let size = grid.size();

    let mut layers = Vec::with_capacity(layer_line_count(size.y, size.z));
    for y in 0..size.y {
        if y > 0 {
            layers.push(LAYER_SEPARATOR.to_string());
        }
        for z in 0..size.z {
            let row: Vec<String> = (0..size.x)
                .map(|x| Token::from(grid.get(x, y, z)).to_string())
                .collect();
            layers.push(row.join(" "));
        }
    }
    layers
}

/// Number of layer entries a grid with this height and depth encodes to.
pub fn layer_line_count(size_y: u32, size_z: u32) -> usize {
    if size_y == 0 {
        return 0;
    }
    size_y as usize * size_z as usize + (size_y as usize - 1)
}

/// Convert placed objects to positional arrays, preserving order.
pub fn compact_objects(objects: &[PlacedObject]) -> Vec<CompactObject> {
    objects
        .iter()
        .map(|obj| CompactObject {
            object_id: obj.object_id,
            offset: obj.offset.to_array().map(Coord),
            rotation: obj.rotation,
            fractional_y: obj.fractional_y,
        })
        .collect()
}

/// Serialize a prefab into the sparse-list (version 1) document.
///
/// Blocks are listed in layer order (y, then z, then x).
pub fn encode_v1(prefab: &Prefab) -> V1Document {
    let blocks = prefab
        .blocks
        .iter()
        .map(|(pos, block)| V1Block {
            offset: pos.as_uvec3().to_array().map(|c| Coord(f64::from(c))),
            block_type: block.block_type,
            meta: block.meta,
        })
        .collect();

    let objects = prefab
        .objects
        .iter()
        .map(|obj| V1Object {
            object_id: obj.object_id,
            offset: obj.offset.to_array().map(Coord),
            rotation: obj.rotation,
            fractional_y: obj.fractional_y,
        })
        .collect();

    V1Document {
        name: Some(prefab.name.clone()),
        version: LEGACY_VERSION,
        size: prefab.size.to_array(),
        submerge: prefab.submerge,
        blocks,
        objects,
    }
}
