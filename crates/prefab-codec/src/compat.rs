use glam::UVec3;
use prefab_core::constants::{FORMAT_VERSION, LEGACY_VERSION, MAX_PREFAB_VOLUME};
use serde_json::Value;

use crate::error::CodecError;

/// Whether a document still needs converting to the current format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// Version below the current format; the forward conversion applies.
    Convertible { version: u64 },
    /// Already at (or beyond) the current format; nothing to do.
    AlreadyCurrent { version: u64 },
}

impl Readiness {
    pub fn version(self) -> u64 {
        match self {
            Readiness::Convertible { version } | Readiness::AlreadyCurrent { version } => version,
        }
    }
}

/// Classify a document by its declared version. A missing `version` field
/// means the legacy format.
pub fn classify(doc: &Value) -> Result<Readiness, CodecError> {
    let version = read_version(doc)?;
    if version >= FORMAT_VERSION {
        Ok(Readiness::AlreadyCurrent { version })
    } else {
        Ok(Readiness::Convertible { version })
    }
}

/// Read the `version` field, defaulting to the legacy version.
pub fn read_version(doc: &Value) -> Result<u64, CodecError> {
    let object = as_object(doc)?;
    match object.get("version") {
        None => Ok(LEGACY_VERSION),
        Some(v) => v.as_u64().ok_or_else(|| {
            CodecError::schema(
                "version",
                format!("expected a non-negative integer, got {v}"),
            )
        }),
    }
}

/// Read and validate `size`: exactly three non-negative integers whose
/// product, counting zero-length axes as one, does not exceed
/// `MAX_PREFAB_VOLUME`. Zero axes still bound the separator lines a
/// layered document carries.
pub fn read_size(doc: &Value) -> Result<UVec3, CodecError> {
    let object = as_object(doc)?;
    let size = object
        .get("size")
        .ok_or_else(|| CodecError::schema("size", "missing"))?;
    let components = size
        .as_array()
        .ok_or_else(|| CodecError::schema("size", format!("expected an array, got {size}")))?;
    if components.len() != 3 {
        return Err(CodecError::schema(
            "size",
            format!("expected 3 components, got {}", components.len()),
        ));
    }

    let mut extent = [0u32; 3];
    for (slot, component) in extent.iter_mut().zip(components) {
        *slot = component
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| {
                CodecError::schema(
                    "size",
                    format!("component {component} is not a non-negative integer"),
                )
            })?;
    }

    let volume = extent
        .iter()
        .try_fold(1u64, |acc, &e| acc.checked_mul(u64::from(e.max(1))));
    match volume {
        Some(v) if v <= MAX_PREFAB_VOLUME => Ok(UVec3::from_array(extent)),
        _ => Err(CodecError::schema(
            "size",
            format!("{extent:?} exceeds the {MAX_PREFAB_VOLUME}-cell limit"),
        )),
    }
}

/// The document's `name`, or `fallback` when absent.
pub fn read_name(doc: &Value, fallback: &str) -> Result<String, CodecError> {
    let object = as_object(doc)?;
    match object.get("name") {
        None => Ok(fallback.to_string()),
        Some(Value::String(name)) => Ok(name.clone()),
        Some(other) => Err(CodecError::schema(
            "name",
            format!("expected a string, got {other}"),
        )),
    }
}

fn as_object(doc: &Value) -> Result<&serde_json::Map<String, Value>, CodecError> {
    doc.as_object()
        .ok_or_else(|| CodecError::schema("document", "top level is not an object"))
}
