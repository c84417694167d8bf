//! Workflow lifecycle actions and the read-only reporting projections.

use serde_json::{json, Value};

use catalog::Workflow;

use super::require_workflow_id;
use crate::codes;
use crate::requests::{AddStepRequest, CreateWorkflowRequest, RemoveStepRequest, WorkflowIdRequest};
use crate::response::ActionResponse;
use crate::WorkflowService;

pub fn create(svc: &WorkflowService, req: CreateWorkflowRequest) -> ActionResponse {
    let name = req.name.unwrap_or_default();
    match svc
        .catalog()
        .create_workflow(&name, req.description, req.mode.as_deref())
    {
        Ok(wf) => ActionResponse::ok(
            format!("Created workflow '{}' with {} execution mode", wf.name, wf.mode),
            json!({
                "workflowId": wf.id,
                "name": wf.name,
                "mode": wf.mode,
            }),
        ),
        Err(e) => ActionResponse::err(e.code(), e.to_string()),
    }
}

pub fn add_step(svc: &WorkflowService, req: AddStepRequest) -> ActionResponse {
    let workflow_id = match require_workflow_id(req.workflow_id.as_deref()) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Some(step) = req.step else {
        return ActionResponse::err(codes::MISSING_STEP, "a step parameter is required");
    };

    match svc.catalog().add_step(workflow_id, step) {
        Ok(wf) => {
            // The catalog appends, so the added step is the last one.
            let step_name = wf
                .steps
                .last()
                .map(|s| s.name.clone())
                .unwrap_or_default();
            ActionResponse::ok(
                format!(
                    "Added step '{}' to workflow '{}' ({} step(s) total)",
                    step_name,
                    wf.name,
                    wf.steps.len()
                ),
                json!({
                    "workflowId": wf.id,
                    "stepName": step_name,
                    "totalSteps": wf.steps.len(),
                    "steps": step_names(&wf),
                }),
            )
        }
        Err(e) => ActionResponse::err(e.code(), e.to_string()),
    }
}

pub fn remove_step(svc: &WorkflowService, req: RemoveStepRequest) -> ActionResponse {
    let workflow_id = match require_workflow_id(req.workflow_id.as_deref()) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let step_name = req.step_name.unwrap_or_default();

    match svc.catalog().remove_step(workflow_id, &step_name) {
        Ok((removed, wf)) => ActionResponse::ok(
            format!(
                "Removed step '{}' from workflow '{}' ({} step(s) remaining)",
                removed.name,
                wf.name,
                wf.steps.len()
            ),
            json!({
                "workflowId": wf.id,
                "removedStep": removed.name,
                "remainingSteps": wf.steps.len(),
                "steps": step_names(&wf),
            }),
        ),
        Err(e) => ActionResponse::err(e.code(), e.to_string()),
    }
}

pub fn cancel(svc: &WorkflowService, req: WorkflowIdRequest) -> ActionResponse {
    let workflow_id = match require_workflow_id(req.workflow_id.as_deref()) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match svc.catalog().cancel_workflow(workflow_id) {
        Ok(wf) => ActionResponse::ok(
            format!("Cancelled workflow '{}' and deleted its history", wf.name),
            json!({
                "workflowId": wf.id,
                "name": wf.name,
            }),
        ),
        Err(e) => ActionResponse::err(e.code(), e.to_string()),
    }
}

pub fn status(svc: &WorkflowService, req: WorkflowIdRequest) -> ActionResponse {
    let workflow_id = match require_workflow_id(req.workflow_id.as_deref()) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let wf = match svc.catalog().get_workflow(workflow_id) {
        Ok(wf) => wf,
        Err(e) => return ActionResponse::err(e.code(), e.to_string()),
    };
    let history = svc.catalog().executions(workflow_id).unwrap_or_default();

    let last_execution = history.last().map(|record| {
        json!({
            "executionId": record.execution_id,
            "mode": record.mode,
            "totalSteps": record.total_steps,
            "executedSteps": record.executed_steps,
            "skippedSteps": record.skipped_steps,
            "startedAt": record.started_at,
            "completedAt": record.completed_at,
        })
    });

    ActionResponse::ok(
        format!(
            "Workflow '{}' ({} mode): {} step(s), {} execution(s)",
            wf.name,
            wf.mode,
            wf.steps.len(),
            history.len()
        ),
        json!({
            "workflowId": wf.id,
            "name": wf.name,
            "description": wf.description,
            "mode": wf.mode,
            "stepCount": wf.steps.len(),
            "executionCount": history.len(),
            "createdAt": wf.created_at,
            "updatedAt": wf.updated_at,
            "steps": wf.steps,
            "lastExecution": last_execution,
        }),
    )
}

pub fn list(svc: &WorkflowService) -> ActionResponse {
    let workflows = svc.catalog().list_workflows();
    let entries: Vec<Value> = workflows
        .iter()
        .map(|wf| {
            json!({
                "id": wf.id,
                "name": wf.name,
                "mode": wf.mode,
                "stepCount": wf.steps.len(),
                "executionCount": svc.catalog().execution_count(wf.id).unwrap_or(0),
                "createdAt": wf.created_at,
            })
        })
        .collect();

    ActionResponse::ok(
        format!("{} workflow(s) registered", entries.len()),
        json!({
            "count": entries.len(),
            "workflows": entries,
        }),
    )
}

fn step_names(wf: &Workflow) -> Vec<String> {
    wf.steps.iter().map(|s| s.name.clone()).collect()
}
