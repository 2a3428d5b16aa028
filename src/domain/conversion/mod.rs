pub mod batch;
pub mod converter;

pub use batch::{convert_batch, BatchSummary, ConversionResult, ConversionTask};
pub use converter::{convert, ConversionError, PNG_SIGNATURE};
