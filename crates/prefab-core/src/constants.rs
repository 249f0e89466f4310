//! Shared constants for the prefab model and its wire formats.
//! Both the codec and the batch driver read these; nothing else defines them.

/// Version number of the sparse-list prefab format.
pub const LEGACY_VERSION: u64 = 1;

/// Version number of the layered bracket-notation prefab format.
pub const FORMAT_VERSION: u64 = 2;

/// Placement parameter used when a document does not specify one.
pub const DEFAULT_SUBMERGE: i32 = 1;

/// Block metadata value used when a document does not specify one.
pub const DEFAULT_META: u32 = 0;

/// Layer entry that separates two consecutive y-planes.
pub const LAYER_SEPARATOR: &str = "---";

/// Token written for a cell with no block.
pub const EMPTY_TOKEN: &str = ".";

/// Largest bounding-box volume, in cells, a document may declare. The layer
/// encoder allocates one slot per cell.
pub const MAX_PREFAB_VOLUME: u64 = 1 << 24;
