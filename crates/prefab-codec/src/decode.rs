use std::collections::BTreeMap;
use std::fmt;

use glam::{DVec3, I64Vec3, UVec3};
use prefab_core::constants::{FORMAT_VERSION, LAYER_SEPARATOR};
use prefab_core::{Block, BlockPos, PlacedObject, Prefab};
use serde::Deserialize;
use serde_json::Value;

use crate::compat;
use crate::encode::layer_line_count;
use crate::error::{CodecError, ShapeMismatch};
use crate::format::{CompactObject, Coord, V1Document, V1Object, V2Document};
use crate::token::Token;

/// A block discarded because its offset lies outside the prefab's size.
///
/// Not an error: the document still converts, but the block is lost, so
/// callers should surface these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfBoundsDrop {
    pub offset: I64Vec3,
    pub size: UVec3,
    pub block: Block,
}

impl fmt::Display for OutOfBoundsDrop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "block {} at ({}, {}, {}) is outside size ({}, {}, {}) and was dropped",
            Token::Block(self.block),
            self.offset.x,
            self.offset.y,
            self.offset.z,
            self.size.x,
            self.size.y,
            self.size.z,
        )
    }
}

/// A prefab read from a document, plus any blocks dropped on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub prefab: Prefab,
    pub drops: Vec<OutOfBoundsDrop>,
}

/// Read a sparse-list (version 1) document into the canonical model.
///
/// `fallback_name` is used when the document has no `name`. Blocks outside
/// `size` are dropped and reported; later blocks at the same coordinate
/// replace earlier ones.
pub fn decode_v1(doc: &Value, fallback_name: &str) -> Result<Decoded, CodecError> {
    let version = compat::read_version(doc)?;
    if version >= FORMAT_VERSION {
        return Err(CodecError::UnsupportedVersion(version));
    }
    let size = compat::read_size(doc)?;
    let name = compat::read_name(doc, fallback_name)?;
    let parsed =
        V1Document::deserialize(doc).map_err(|e| CodecError::schema("document", e.to_string()))?;

    let mut prefab = Prefab::new(name, size);
    prefab.submerge = parsed.submerge;

    let mut drops = Vec::new();
    for entry in &parsed.blocks {
        let offset = truncate_offset(&entry.offset);
        let block = Block::new(entry.block_type, entry.meta);
        match BlockPos::within(offset, size) {
            Some(pos) => {
                if let Some(previous) = prefab.insert_block(pos, block) {
                    log::debug!(
                        "{}: block {} at {} replaces earlier {}",
                        prefab.name,
                        Token::Block(block),
                        pos,
                        Token::Block(previous)
                    );
                }
            }
            None => {
                let dropped = OutOfBoundsDrop {
                    offset,
                    size,
                    block,
                };
                log::warn!("{}: {}", prefab.name, dropped);
                drops.push(dropped);
            }
        }
    }

    prefab.objects = parsed.objects.iter().map(object_from_v1).collect();

    Ok(Decoded { prefab, drops })
}

/// Read a layered (version 2) document into the canonical model.
pub fn decode_v2(doc: &Value, fallback_name: &str) -> Result<Decoded, CodecError> {
    let version = compat::read_version(doc)?;
    if version != FORMAT_VERSION {
        return Err(CodecError::UnsupportedVersion(version));
    }
    let size = compat::read_size(doc)?;
    let name = compat::read_name(doc, fallback_name)?;
    let parsed =
        V2Document::deserialize(doc).map_err(|e| CodecError::schema("document", e.to_string()))?;

    let mut prefab = Prefab::new(name, size);
    prefab.submerge = parsed.submerge;
    prefab.blocks = decode_layers(&parsed.layers, size)?;
    prefab.objects = parsed.objects.iter().map(object_from_compact).collect();

    Ok(Decoded {
        prefab,
        drops: Vec::new(),
    })
}

/// Parse layer lines back into a sparse block map.
///
/// The lines must be exactly what the encoder would produce for `size`:
/// size_z rows per plane, a separator between planes, size_x tokens per row.
pub fn decode_layers(
    layers: &[String],
    size: UVec3,
) -> Result<BTreeMap<BlockPos, Block>, CodecError> {
    let expected = layer_line_count(size.y, size.z);
    if layers.len() != expected {
        return Err(CodecError::ShapeMismatch(ShapeMismatch::LineCount {
            expected,
            actual: layers.len(),
        }));
    }

    let rows_per_plane = size.z as usize;
    // Each plane is its rows followed by one separator (absent after the last).
    let stride = rows_per_plane + 1;

    let mut blocks = BTreeMap::new();
    for (index, text) in layers.iter().enumerate() {
        let line = index + 1;
        let is_separator = text.trim() == LAYER_SEPARATOR;
        let y = (index / stride) as u32;
        let row = index % stride;

        if row == rows_per_plane {
            if !is_separator {
                return Err(CodecError::ShapeMismatch(ShapeMismatch::MissingSeparator {
                    line,
                }));
            }
            continue;
        }
        if is_separator {
            return Err(CodecError::ShapeMismatch(
                ShapeMismatch::UnexpectedSeparator { line },
            ));
        }

        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens.len() != size.x as usize {
            return Err(CodecError::ShapeMismatch(ShapeMismatch::TokenCount {
                line,
                expected: size.x as usize,
                actual: tokens.len(),
            }));
        }

        for (x, raw) in tokens.into_iter().enumerate() {
            let token: Token = raw.parse().map_err(|_| CodecError::Format {
                line,
                token: raw.to_string(),
            })?;
            if let Token::Block(block) = token {
                blocks.insert(BlockPos::new(x as u32, y, row as u32), block);
            }
        }
    }

    Ok(blocks)
}

/// Offsets are read as numbers and truncated toward zero.
fn truncate_offset(offset: &[Coord; 3]) -> I64Vec3 {
    let [x, y, z] = offset.map(|c| c.0.trunc() as i64);
    I64Vec3::new(x, y, z)
}

fn object_from_v1(obj: &V1Object) -> PlacedObject {
    PlacedObject {
        object_id: obj.object_id,
        offset: DVec3::from_array(obj.offset.map(|c| c.0)),
        rotation: obj.rotation,
        fractional_y: obj.fractional_y,
    }
}

fn object_from_compact(obj: &CompactObject) -> PlacedObject {
    PlacedObject {
        object_id: obj.object_id,
        offset: DVec3::from_array(obj.offset.map(|c| c.0)),
        rotation: obj.rotation,
        fractional_y: obj.fractional_y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::{encode_v1, encode_v2};
    use serde_json::json;

    fn layers(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    fn sample_prefab() -> Prefab {
        let mut prefab = Prefab::new("cabin", UVec3::new(3, 2, 2));
        prefab.submerge = 2;
        prefab.insert_block(BlockPos::new(0, 0, 0), Block::new(1, 0));
        prefab.insert_block(BlockPos::new(2, 0, 1), Block::new(4, 3));
        prefab.insert_block(BlockPos::new(1, 1, 0), Block::new(17, 0));
        prefab.objects = vec![
            PlacedObject {
                object_id: 12,
                offset: DVec3::new(1.0, 0.5, 1.0),
                rotation: 90,
                fractional_y: 0.25,
            },
            PlacedObject {
                object_id: 3,
                offset: DVec3::new(0.0, 1.0, 0.0),
                rotation: 0,
                fractional_y: 0.0,
            },
        ];
        prefab
    }

    #[test]
    fn test_v2_roundtrip_preserves_prefab() {
        let prefab = sample_prefab();
        let doc = serde_json::to_value(encode_v2(&prefab)).expect("ser");
        let decoded = decode_v2(&doc, "unused").expect("should decode");
        assert_eq!(decoded.prefab, prefab);
        assert!(decoded.drops.is_empty());
    }

    #[test]
    fn test_v1_roundtrip_preserves_prefab() {
        let prefab = sample_prefab();
        let doc = serde_json::to_value(encode_v1(&prefab)).expect("ser");
        let decoded = decode_v1(&doc, "unused").expect("should decode");
        assert_eq!(decoded.prefab, prefab);
    }

    #[test]
    fn test_v1_out_of_bounds_block_dropped() {
        let doc = json!({
            "size": [2, 2, 2],
            "blocks": [
                {"offset": [5, 0, 0], "type": 3},
                {"offset": [1, 1, 1], "type": 4},
            ],
        });
        let decoded = decode_v1(&doc, "p").expect("should decode");
        assert_eq!(decoded.prefab.block_count(), 1);
        assert_eq!(decoded.drops.len(), 1);
        assert_eq!(decoded.drops[0].offset, I64Vec3::new(5, 0, 0));
        assert_eq!(decoded.drops[0].block, Block::new(3, 0));

        let layers = encode_v2(&decoded.prefab).layers;
        assert!(layers.iter().all(|l| !l.contains("[3]")));
    }

    #[test]
    fn test_v1_negative_offset_dropped() {
        let doc = json!({
            "size": [2, 2, 2],
            "blocks": [{"offset": [0, -1, 0], "type": 3}],
        });
        let decoded = decode_v1(&doc, "p").expect("should decode");
        assert_eq!(decoded.prefab.block_count(), 0);
        assert_eq!(decoded.drops.len(), 1);
    }

    #[test]
    fn test_v1_duplicate_coordinate_last_write_wins() {
        let doc = json!({
            "size": [1, 1, 1],
            "blocks": [
                {"offset": [0, 0, 0], "type": 1},
                {"offset": [0, 0, 0], "type": 2, "meta": 6},
            ],
        });
        let decoded = decode_v1(&doc, "p").expect("should decode");
        assert_eq!(
            decoded.prefab.block(BlockPos::new(0, 0, 0)),
            Some(Block::new(2, 6))
        );
    }

    #[test]
    fn test_v1_fractional_offset_truncated() {
        let doc = json!({
            "size": [2, 2, 2],
            "blocks": [{"offset": [1.9, 0.2, 1.0], "type": 5}],
        });
        let decoded = decode_v1(&doc, "p").expect("should decode");
        assert_eq!(
            decoded.prefab.block(BlockPos::new(1, 0, 1)),
            Some(Block::new(5, 0))
        );
    }

    #[test]
    fn test_v1_name_and_submerge_defaults() {
        let doc = json!({"size": [1, 1, 1], "blocks": []});
        let decoded = decode_v1(&doc, "watchtower").expect("should decode");
        assert_eq!(decoded.prefab.name, "watchtower");
        assert_eq!(decoded.prefab.submerge, 1);
        assert!(decoded.prefab.objects.is_empty());
    }

    #[test]
    fn test_v1_object_defaults() {
        let doc = json!({
            "size": [1, 1, 1],
            "objects": [{"object_id": 4}, {"offset": [1, 2.5, 3], "rotation": 180}],
        });
        let decoded = decode_v1(&doc, "p").expect("should decode");
        let objects = &decoded.prefab.objects;
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].object_id, 4);
        assert_eq!(objects[0].offset, DVec3::ZERO);
        assert_eq!(objects[0].rotation, 0);
        assert_eq!(objects[0].fractional_y, 0.0);
        assert_eq!(objects[1].object_id, 0);
        assert_eq!(objects[1].offset, DVec3::new(1.0, 2.5, 3.0));
        assert_eq!(objects[1].rotation, 180);
    }

    #[test]
    fn test_v1_rejects_current_version() {
        let doc = json!({"version": 2, "size": [1, 1, 1], "layers": ["."]});
        assert!(matches!(
            decode_v1(&doc, "p"),
            Err(CodecError::UnsupportedVersion(2))
        ));
    }

    #[test]
    fn test_v1_bad_block_shape_is_schema_error() {
        let doc = json!({"size": [1, 1, 1], "blocks": [{"offset": [0, 0], "type": 1}]});
        assert!(matches!(
            decode_v1(&doc, "p"),
            Err(CodecError::Schema { .. })
        ));
    }

    #[test]
    fn test_v2_rejects_legacy_version() {
        let doc = json!({"version": 1, "size": [1, 1, 1], "layers": ["."]});
        assert!(matches!(
            decode_v2(&doc, "p"),
            Err(CodecError::UnsupportedVersion(1))
        ));
    }

    #[test]
    fn test_v2_bad_object_array_is_schema_error() {
        let doc = json!({
            "version": 2,
            "size": [1, 1, 1],
            "layers": ["."],
            "objects": [[1, 2, 3]],
        });
        assert!(matches!(
            decode_v2(&doc, "p"),
            Err(CodecError::Schema { .. })
        ));
    }

    #[test]
    fn test_decode_separator_placement() {
        let blocks = decode_layers(&layers(&["[1]", "---", "[2]"]), UVec3::new(1, 2, 1))
            .expect("should decode");
        assert_eq!(blocks.get(&BlockPos::new(0, 0, 0)), Some(&Block::new(1, 0)));
        assert_eq!(blocks.get(&BlockPos::new(0, 1, 0)), Some(&Block::new(2, 0)));
    }

    #[test]
    fn test_decode_extra_whitespace_tolerated() {
        let blocks = decode_layers(&layers(&["  [1]   .\t[2:4] "]), UVec3::new(3, 1, 1))
            .expect("should decode");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks.get(&BlockPos::new(2, 0, 0)), Some(&Block::new(2, 4)));
    }

    #[test]
    fn test_decode_malformed_token_rejected() {
        let result = decode_layers(&layers(&[". [abc]"]), UVec3::new(2, 1, 1));
        match result {
            Err(CodecError::Format { line, token }) => {
                assert_eq!(line, 1);
                assert_eq!(token, "[abc]");
            }
            other => panic!("expected Format error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_wrong_line_count_rejected() {
        let result = decode_layers(&layers(&[".", "."]), UVec3::new(1, 1, 1));
        assert!(matches!(
            result,
            Err(CodecError::ShapeMismatch(ShapeMismatch::LineCount {
                expected: 1,
                actual: 2
            }))
        ));
    }

    #[test]
    fn test_decode_wrong_token_count_rejected() {
        let result = decode_layers(&layers(&[". .", "."]), UVec3::new(2, 1, 2));
        assert!(matches!(
            result,
            Err(CodecError::ShapeMismatch(ShapeMismatch::TokenCount {
                line: 2,
                expected: 2,
                actual: 1
            }))
        ));
    }

    #[test]
    fn test_decode_misplaced_separator_rejected() {
        let result = decode_layers(&layers(&["---", ".", "."]), UVec3::new(1, 2, 1));
        assert!(matches!(
            result,
            Err(CodecError::ShapeMismatch(
                ShapeMismatch::UnexpectedSeparator { line: 1 }
            ))
        ));

        let result = decode_layers(&layers(&[".", ".", "---"]), UVec3::new(1, 2, 1));
        assert!(matches!(
            result,
            Err(CodecError::ShapeMismatch(ShapeMismatch::MissingSeparator {
                line: 2
            }))
        ));
    }

    #[test]
    fn test_decode_zero_depth_planes_are_only_separators() {
        let blocks =
            decode_layers(&layers(&["---", "---"]), UVec3::new(4, 3, 0)).expect("should decode");
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_out_of_bounds_drop_display() {
        let dropped = OutOfBoundsDrop {
            offset: I64Vec3::new(5, 0, 0),
            size: UVec3::splat(2),
            block: Block::new(3, 1),
        };
        assert_eq!(
            dropped.to_string(),
            "block [3:1] at (5, 0, 0) is outside size (2, 2, 2) and was dropped"
        );
    }
}
