//! Step-level error type.

use thiserror::Error;

/// Errors returned by a step executor.
///
/// There is no retryable class: the engine runs each request to completion
/// or aborts it entirely, so any failure is terminal for the run.
#[derive(Debug, Error, Clone)]
pub enum StepError {
    /// The executor could not produce an output for this step.
    #[error("step execution failed: {0}")]
    Failed(String),
}
