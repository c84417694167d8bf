//! Workflow execution engine.
//!
//! `WorkflowRunner` is the central orchestrator. One call to
//! [`WorkflowRunner::run`] is one transaction:
//! 1. Snapshot the workflow from the catalog and validate it.
//! 2. Dispatch on the declared mode: topological chain, dependency-level
//!    grouping, or per-step condition gating.
//! 3. Dispatch each runnable step through the injected `StepExecutor`.
//! 4. Append one immutable record to the workflow's history.
//!
//! A cycle or executor failure aborts the whole run and nothing is recorded.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use catalog::{ExecutionRecord, Mode, Step, StepResult, StepStatus, Workflow, WorkflowCatalog};
use steps::{SimulatedStepExecutor, StepContext, StepExecutor};

use crate::condition::evaluate_condition;
use crate::graph::{parallel_levels, topological_sort};
use crate::EngineError;

/// Orchestrator that runs workflow executions against a shared catalog.
///
/// Holds the catalog handle and the executor seam; construct once and reuse
/// across requests.
pub struct WorkflowRunner {
    catalog: Arc<WorkflowCatalog>,
    executor: Arc<dyn StepExecutor>,
}

impl WorkflowRunner {
    pub fn new(catalog: Arc<WorkflowCatalog>, executor: Arc<dyn StepExecutor>) -> Self {
        Self { catalog, executor }
    }

    /// A runner wired to the deterministic simulation.
    pub fn simulated(catalog: Arc<WorkflowCatalog>) -> Self {
        Self::new(catalog, Arc::new(SimulatedStepExecutor))
    }

    /// Execute the workflow once and return the recorded result.
    ///
    /// # Errors
    /// `WORKFLOW_NOT_FOUND` for an unknown id, `NO_STEPS` for an empty
    /// workflow, `CIRCULAR_DEPENDENCY` when the graph utilities detect a
    /// cycle, and `STEP_FAILED` if the injected executor fails. On any error
    /// the history is left untouched.
    #[instrument(skip(self, input), fields(workflow_id = %workflow_id))]
    pub async fn run(
        &self,
        workflow_id: Uuid,
        input: Value,
    ) -> Result<ExecutionRecord, EngineError> {
        let workflow = self.catalog.get_workflow(workflow_id)?;
        if workflow.steps.is_empty() {
            return Err(EngineError::NoSteps);
        }

        let execution_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(
            execution_id = %execution_id,
            mode = %workflow.mode,
            steps = workflow.steps.len(),
            "starting workflow execution"
        );

        let trace = match workflow.mode {
            Mode::Sequential => self.run_sequential(&workflow, execution_id, &input).await?,
            Mode::Parallel => self.run_parallel(&workflow, execution_id, &input).await?,
            Mode::Conditional => self.run_conditional(&workflow, execution_id, &input).await?,
        };

        let executed_steps = trace
            .iter()
            .filter(|r| r.status == StepStatus::Completed)
            .count();
        let skipped_steps = trace.len() - executed_steps;

        let record = ExecutionRecord {
            execution_id,
            workflow_id,
            workflow_name: workflow.name.clone(),
            mode: workflow.mode,
            started_at,
            completed_at: Utc::now(),
            total_steps: workflow.steps.len(),
            executed_steps,
            skipped_steps,
            input,
            trace,
        };

        self.catalog.append_execution(record.clone())?;
        info!(
            execution_id = %execution_id,
            executed = executed_steps,
            skipped = skipped_steps,
            "execution recorded"
        );

        Ok(record)
    }

    // -----------------------------------------------------------------------
    // Mode strategies
    // -----------------------------------------------------------------------

    /// Linear chain over the topological order: step 1 receives the caller
    /// input, every later step receives the output of the step immediately
    /// before it in the chain — not a merge of its graph ancestors.
    async fn run_sequential(
        &self,
        workflow: &Workflow,
        execution_id: Uuid,
        input: &Value,
    ) -> Result<Vec<StepResult>, EngineError> {
        let order = topological_sort(&workflow.steps)?;
        let by_name = step_index(&workflow.steps);

        let mut trace = Vec::with_capacity(order.len());
        let mut current_input = input.clone();

        for (idx, name) in order.iter().enumerate() {
            let step = by_name[name.as_str()];
            let output = self.dispatch(workflow.id, execution_id, step, &current_input).await?;

            trace.push(StepResult {
                step_name: step.name.clone(),
                agent_type: step.agent_type.clone(),
                task: step.task.clone(),
                order: idx + 1,
                status: StepStatus::Completed,
                input: current_input.clone(),
                output: Some(output.clone()),
                parallel_group: None,
                condition: None,
                condition_met: None,
            });
            current_input = output;
        }

        Ok(trace)
    }

    /// Level-grouped execution: every step receives the original caller
    /// input and carries its 1-based group number. The grouping is a label
    /// for the caller's own downstream concurrency; members run here in a
    /// fixed deterministic order.
    async fn run_parallel(
        &self,
        workflow: &Workflow,
        execution_id: Uuid,
        input: &Value,
    ) -> Result<Vec<StepResult>, EngineError> {
        let levels = parallel_levels(&workflow.steps)?;
        let by_name = step_index(&workflow.steps);

        let mut trace = Vec::with_capacity(workflow.steps.len());
        let mut order = 1;

        for (level_idx, level) in levels.iter().enumerate() {
            debug!(group = level_idx + 1, members = level.len(), "entering parallel group");
            for name in level {
                let step = by_name[name.as_str()];
                let output = self.dispatch(workflow.id, execution_id, step, input).await?;

                trace.push(StepResult {
                    step_name: step.name.clone(),
                    agent_type: step.agent_type.clone(),
                    task: step.task.clone(),
                    order,
                    status: StepStatus::Completed,
                    input: input.clone(),
                    output: Some(output),
                    parallel_group: Some(level_idx + 1),
                    condition: None,
                    condition_met: None,
                });
                order += 1;
            }
        }

        Ok(trace)
    }

    /// Per-step gating in catalog insertion order; no graph algorithm.
    /// Skipped steps get no output and no side effects.
    async fn run_conditional(
        &self,
        workflow: &Workflow,
        execution_id: Uuid,
        input: &Value,
    ) -> Result<Vec<StepResult>, EngineError> {
        let mut trace = Vec::with_capacity(workflow.steps.len());

        for (idx, step) in workflow.steps.iter().enumerate() {
            let met = evaluate_condition(step.condition.as_deref(), input);
            // A step without a condition is recorded as the literal it
            // behaves like.
            let condition = step
                .condition
                .clone()
                .unwrap_or_else(|| "always".to_string());

            let (status, output) = if met {
                let output = self.dispatch(workflow.id, execution_id, step, input).await?;
                (StepStatus::Completed, Some(output))
            } else {
                debug!(step = %step.name, condition = %condition, "condition not met, skipping");
                (StepStatus::Skipped, None)
            };

            trace.push(StepResult {
                step_name: step.name.clone(),
                agent_type: step.agent_type.clone(),
                task: step.task.clone(),
                order: idx + 1,
                status,
                input: input.clone(),
                output,
                parallel_group: None,
                condition: Some(condition),
                condition_met: Some(met),
            });
        }

        Ok(trace)
    }

    async fn dispatch(
        &self,
        workflow_id: Uuid,
        execution_id: Uuid,
        step: &Step,
        input: &Value,
    ) -> Result<Value, EngineError> {
        let ctx = StepContext {
            workflow_id,
            execution_id,
            step_name: step.name.clone(),
            agent_type: step.agent_type.clone(),
            task: step.task.clone(),
        };

        let output = self
            .executor
            .execute(&ctx, input.clone())
            .await
            .map_err(|e| EngineError::StepFailed {
                step_name: step.name.clone(),
                message: e.to_string(),
            })?;

        debug!(step = %step.name, "step completed");
        Ok(output)
    }
}

fn step_index(steps: &[Step]) -> HashMap<&str, &Step> {
    steps.iter().map(|s| (s.name.as_str(), s)).collect()
}
