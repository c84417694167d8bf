//! The `StepExecutor` trait — the contract every executor must fulfil.

use async_trait::async_trait;
use serde_json::Value;

use crate::StepError;

/// Everything an executor needs to know about the step it is running.
///
/// Defined here (in the leaf crate) so both the engine and executor
/// implementations can import it without a circular dependency.
#[derive(Debug, Clone)]
pub struct StepContext {
    /// ID of the parent workflow.
    pub workflow_id: uuid::Uuid,
    /// ID of the current execution run.
    pub execution_id: uuid::Uuid,
    /// Name of the step being executed.
    pub step_name: String,
    /// The step's agent label.
    pub agent_type: String,
    /// The step's task description.
    pub task: String,
}

/// The core executor trait.
///
/// `input` is whatever payload the engine decided this step receives: the
/// caller's input, or in sequential mode the previous step's output.
#[async_trait]
pub trait StepExecutor: Send + Sync {
    async fn execute(&self, ctx: &StepContext, input: Value) -> Result<Value, StepError>;
}
