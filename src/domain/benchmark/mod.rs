pub mod job;
pub mod runner;
pub mod summary;

pub use job::{quality_levels, RenderJob, RenderResult, DEFAULT_QUALITY_LEVELS};
pub use runner::{BenchmarkRunner, MatrixError, MatrixPhase};
pub use summary::{format_summary, SUMMARY_HEADER};
