//! `MockStepExecutor` — a test double for `StepExecutor`.
//!
//! Records every call it receives so tests can assert execution order and
//! input chaining; can be told to fail on a named step.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::simulated::simulated_output;
use crate::traits::{StepContext, StepExecutor};
use crate::StepError;

/// A mock executor that logs `(step_name, input)` pairs in call order and
/// otherwise behaves like the simulation.
#[derive(Debug, Default)]
pub struct MockStepExecutor {
    calls: Arc<Mutex<Vec<(String, Value)>>>,
    fail_on: Option<String>,
}

impl MockStepExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that fails when asked to execute the named step.
    pub fn failing_on(step_name: impl Into<String>) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_on: Some(step_name.into()),
        }
    }

    /// All `(step_name, input)` pairs seen so far, in call order.
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of times `execute` has been called.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl StepExecutor for MockStepExecutor {
    async fn execute(&self, ctx: &StepContext, input: Value) -> Result<Value, StepError> {
        self.calls
            .lock()
            .unwrap()
            .push((ctx.step_name.clone(), input));

        if self.fail_on.as_deref() == Some(ctx.step_name.as_str()) {
            return Err(StepError::Failed(format!(
                "mock failure in step '{}'",
                ctx.step_name
            )));
        }

        Ok(Value::String(simulated_output(&ctx.agent_type, &ctx.task)))
    }
}
