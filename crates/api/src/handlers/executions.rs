//! The `execute_workflow` action.

use serde_json::{json, Value};

use catalog::{ExecutionRecord, StepStatus};

use super::require_workflow_id;
use crate::requests::ExecuteWorkflowRequest;
use crate::response::ActionResponse;
use crate::WorkflowService;

pub async fn execute(svc: &WorkflowService, req: ExecuteWorkflowRequest) -> ActionResponse {
    let workflow_id = match require_workflow_id(req.workflow_id.as_deref()) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let input = req.input.unwrap_or_else(|| Value::Object(Default::default()));

    match svc.runner().run(workflow_id, input).await {
        Ok(record) => ActionResponse::ok(
            render_trace(&record),
            json!({
                "executionId": record.execution_id,
                "workflowId": record.workflow_id,
                "mode": record.mode,
                "totalSteps": record.total_steps,
                "executedSteps": record.executed_steps,
                "skippedSteps": record.skipped_steps,
                "trace": record.trace,
            }),
        ),
        Err(e) => ActionResponse::err(e.code(), e.to_string()),
    }
}

/// Deterministic, line-per-step rendering of the trace for display.
fn render_trace(record: &ExecutionRecord) -> String {
    let mut out = format!(
        "Executed workflow '{}' in {} mode: {} completed, {} skipped",
        record.workflow_name, record.mode, record.executed_steps, record.skipped_steps
    );

    for result in &record.trace {
        out.push_str(&format!(
            "\n  {}. {} [{}]",
            result.order, result.step_name, result.status
        ));
        if let Some(group) = result.parallel_group {
            out.push_str(&format!(" (group {group})"));
        }
        if result.status == StepStatus::Skipped {
            if let Some(condition) = &result.condition {
                out.push_str(&format!(" (condition: {condition})"));
            }
        }
    }

    out
}
