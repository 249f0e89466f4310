use serde_json::Value;

use crate::compat::{self, Readiness};
use crate::decode::{decode_v1, decode_v2, OutOfBoundsDrop};
use crate::encode::{encode_v1, encode_v2};
use crate::error::CodecError;
use crate::format::{V1Document, V2Document};

/// Outcome of converting one document.
#[derive(Debug, Clone, PartialEq)]
pub enum Conversion<D> {
    /// The document was rewritten in the target format.
    Converted(Converted<D>),
    /// The document is already in the target format; nothing was done.
    AlreadyCurrent { version: u64 },
}

/// A converted document and what it cost.
#[derive(Debug, Clone, PartialEq)]
pub struct Converted<D> {
    pub document: D,
    /// Number of occupied cells carried over.
    pub block_count: usize,
    /// Blocks lost because they were outside the declared size.
    pub drops: Vec<OutOfBoundsDrop>,
}

impl<D> Conversion<D> {
    /// The converted document, or None when conversion was skipped.
    pub fn into_document(self) -> Option<D> {
        match self {
            Conversion::Converted(converted) => Some(converted.document),
            Conversion::AlreadyCurrent { .. } => None,
        }
    }
}

/// Upgrade a sparse-list document to the layered format.
///
/// Documents already at the layered version are reported as
/// `AlreadyCurrent` and never re-encoded.
pub fn convert(doc: &Value, fallback_name: &str) -> Result<Conversion<V2Document>, CodecError> {
    if let Readiness::AlreadyCurrent { version } = compat::classify(doc)? {
        return Ok(Conversion::AlreadyCurrent { version });
    }

    let decoded = decode_v1(doc, fallback_name)?;
    Ok(Conversion::Converted(Converted {
        block_count: decoded.prefab.block_count(),
        document: encode_v2(&decoded.prefab),
        drops: decoded.drops,
    }))
}

/// Downgrade a layered document to the sparse-list format.
///
/// Documents that are not at the layered version yet are reported as
/// `AlreadyCurrent` (already in the target format).
pub fn downgrade(doc: &Value, fallback_name: &str) -> Result<Conversion<V1Document>, CodecError> {
    if let Readiness::Convertible { version } = compat::classify(doc)? {
        return Ok(Conversion::AlreadyCurrent { version });
    }

    let decoded = decode_v2(doc, fallback_name)?;
    Ok(Conversion::Converted(Converted {
        block_count: decoded.prefab.block_count(),
        document: encode_v1(&decoded.prefab),
        drops: decoded.drops,
    }))
}
