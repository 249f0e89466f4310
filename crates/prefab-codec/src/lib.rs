pub mod compat;
pub mod convert;
pub mod decode;
pub mod encode;
pub mod error;
pub mod format;
mod grid;
pub mod token;

pub use compat::Readiness;
pub use convert::{convert, downgrade, Conversion, Converted};
pub use decode::{decode_layers, decode_v1, decode_v2, Decoded, OutOfBoundsDrop};
pub use encode::{encode_layers, encode_v1, encode_v2};
pub use error::{CodecError, ShapeMismatch};
pub use format::{CompactObject, V1Document, V2Document};
pub use token::Token;
