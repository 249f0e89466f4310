pub mod batch;
pub mod error;
pub mod options;
pub mod report;

pub use batch::{convert_file, run_batch, ConvertedFile, FileOutcome};
pub use error::ConvertError;
pub use options::{ConvertOptions, Direction, OutputMode};
pub use report::{format_summary, BatchReport};
