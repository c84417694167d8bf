//! The deterministic simulation — the only shipped `StepExecutor`.
//!
//! Step "execution" never invokes a real agent: the output is a fixed string
//! built from the step's agent label and task, just enough to give the next
//! sequential step something to receive. Reimplementations that add real
//! dispatch belong behind the trait, not in place of this.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::traits::{StepContext, StepExecutor};
use crate::StepError;

/// The string a simulated step produces for a given agent label and task.
pub fn simulated_output(agent_type: &str, task: &str) -> String {
    format!("[{agent_type}] completed: {task}")
}

/// Executor that resolves every step immediately with a simulated output.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedStepExecutor;

#[async_trait]
impl StepExecutor for SimulatedStepExecutor {
    async fn execute(&self, ctx: &StepContext, _input: Value) -> Result<Value, StepError> {
        debug!(step = %ctx.step_name, agent_type = %ctx.agent_type, "simulating step execution");
        Ok(Value::String(simulated_output(&ctx.agent_type, &ctx.task)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn ctx(agent_type: &str, task: &str) -> StepContext {
        StepContext {
            workflow_id: Uuid::new_v4(),
            execution_id: Uuid::new_v4(),
            step_name: "build".into(),
            agent_type: agent_type.into(),
            task: task.into(),
        }
    }

    #[tokio::test]
    async fn output_is_deterministic_and_ignores_input() {
        let executor = SimulatedStepExecutor;
        let context = ctx("builder", "compile the crate");

        let a = executor.execute(&context, json!({})).await.unwrap();
        let b = executor
            .execute(&context, json!({ "different": "payload" }))
            .await
            .unwrap();

        assert_eq!(a, b);
        assert_eq!(
            a,
            Value::String("[builder] completed: compile the crate".into())
        );
    }
}
