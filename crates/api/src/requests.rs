//! Typed request structs, one per action.
//!
//! Fields the parameter bag may omit are `Option`s; the handlers turn
//! absent or blank values into the matching MISSING_* code. Deserialization
//! itself only fails on a structurally malformed bag.

use serde::Deserialize;
use serde_json::Value;

use catalog::NewStep;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateWorkflowRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub mode: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddStepRequest {
    pub workflow_id: Option<String>,
    pub step: Option<NewStep>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoveStepRequest {
    pub workflow_id: Option<String>,
    pub step_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExecuteWorkflowRequest {
    pub workflow_id: Option<String>,
    pub input: Option<Value>,
}

/// Shared by `get_status` and `cancel_workflow`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkflowIdRequest {
    pub workflow_id: Option<String>,
}
