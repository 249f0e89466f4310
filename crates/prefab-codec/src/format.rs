//! Wire shapes of the two prefab document versions.
//!
//! Field declaration order is serialization order; the batch driver relies
//! on it for stable, diff-friendly output.

use prefab_core::constants::{DEFAULT_META, DEFAULT_SUBMERGE, LEGACY_VERSION};
use serde::de::Deserializer;
use serde::ser::{SerializeTuple, Serializer};
use serde::{Deserialize, Serialize};

/// A numeric document field that is written as an integer whenever it has
/// no fractional part, and as a float otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coord(pub f64);

/// Largest magnitude at which every integer is exactly representable in f64.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

impl Serialize for Coord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let v = self.0;
        if v.is_finite() && v.fract() == 0.0 && v.abs() <= MAX_EXACT_INT {
            serializer.serialize_i64(v as i64)
        } else {
            serializer.serialize_f64(v)
        }
    }
}

impl<'de> Deserialize<'de> for Coord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(Coord)
    }
}

/// Sparse-list (version 1) document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct V1Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default = "legacy_version")]
    pub version: u64,
    pub size: [u32; 3],
    #[serde(default = "default_submerge")]
    pub submerge: i32,
    #[serde(default)]
    pub blocks: Vec<V1Block>,
    #[serde(default)]
    pub objects: Vec<V1Object>,
}

/// One entry of a v1 block list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct V1Block {
    pub offset: [Coord; 3],
    #[serde(rename = "type")]
    pub block_type: u32,
    #[serde(default = "default_meta", skip_serializing_if = "is_default_meta")]
    pub meta: u32,
}

/// One entry of a v1 object list. Every field is optional on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct V1Object {
    #[serde(default)]
    pub object_id: i32,
    #[serde(default)]
    pub offset: [Coord; 3],
    #[serde(default)]
    pub rotation: i32,
    #[serde(default)]
    pub fractional_y: f64,
}

/// Layered bracket-notation (version 2) document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct V2Document {
    #[serde(default)]
    pub name: String,
    pub version: u64,
    pub size: [u32; 3],
    #[serde(default = "default_submerge")]
    pub submerge: i32,
    pub layers: Vec<String>,
    #[serde(default)]
    pub objects: Vec<CompactObject>,
}

/// A placed object as a positional array:
/// `[object_id, x, y, z, rotation, fractional_y]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompactObject {
    pub object_id: i32,
    pub offset: [Coord; 3],
    pub rotation: i32,
    pub fractional_y: f64,
}

/// Number of elements in a compact object array.
pub const COMPACT_OBJECT_LEN: usize = 6;

impl Serialize for CompactObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(COMPACT_OBJECT_LEN)?;
        tuple.serialize_element(&self.object_id)?;
        for component in &self.offset {
            tuple.serialize_element(component)?;
        }
        tuple.serialize_element(&self.rotation)?;
        tuple.serialize_element(&self.fractional_y)?;
        tuple.end()
    }
}

impl<'de> Deserialize<'de> for CompactObject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (object_id, x, y, z, rotation, fractional_y) =
            <(i32, Coord, Coord, Coord, i32, f64)>::deserialize(deserializer)?;
        Ok(Self {
            object_id,
            offset: [x, y, z],
            rotation,
            fractional_y,
        })
    }
}

fn legacy_version() -> u64 {
    LEGACY_VERSION
}

fn default_submerge() -> i32 {
    DEFAULT_SUBMERGE
}

fn default_meta() -> u32 {
    DEFAULT_META
}

fn is_default_meta(meta: &u32) -> bool {
    *meta == DEFAULT_META
}
