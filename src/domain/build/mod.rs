pub mod ensure;
pub mod pipeline;

pub use ensure::{ensure_executable, is_executable, BuildError, BuildOutcome};
pub use pipeline::{BuildCommand, BuildPipeline, BuildStage};
