//! Per-action handlers; thin functions that validate parameters, delegate
//! to the catalog or runner, and render the response.

pub mod executions;
pub mod workflows;

use uuid::Uuid;

use crate::codes;
use crate::response::ActionResponse;

/// Resolve the `workflowId` parameter.
///
/// Absent or blank → MISSING_WORKFLOW_ID. A non-blank string that is not a
/// valid id cannot name any workflow, so it reports WORKFLOW_NOT_FOUND just
/// like a well-formed-but-unknown id.
pub(crate) fn require_workflow_id(raw: Option<&str>) -> Result<Uuid, ActionResponse> {
    let raw = raw.map(str::trim).unwrap_or("");
    if raw.is_empty() {
        return Err(ActionResponse::err(
            codes::MISSING_WORKFLOW_ID,
            "a workflowId parameter is required",
        ));
    }
    Uuid::parse_str(raw).map_err(|_| {
        ActionResponse::err(
            codes::WORKFLOW_NOT_FOUND,
            format!("workflow '{raw}' not found"),
        )
    })
}
