pub mod constants;
pub mod prefab;
pub mod types;

pub use prefab::Prefab;
pub use types::{Block, BlockPos, PlacedObject};
