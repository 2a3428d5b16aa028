pub mod cancellation;
pub mod child_runner;

pub use cancellation::CancellationToken;
pub use child_runner::{run_to_completion, JobError, RunLimits};
