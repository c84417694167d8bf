//! `api` crate — the action dispatch boundary and reporting layer.
//!
//! The engine is invoked through a single request/response operation: an
//! action name plus a JSON parameter bag in, an [`ActionResponse`] out.
//! Failures never escape as panics or raw errors; every outcome is a
//! structured response carrying a success flag and, on failure, a stable
//! error code.
//!
//! Supported actions: `create_workflow`, `add_step`, `remove_step`,
//! `execute_workflow`, `get_status`, `list_workflows`, `cancel_workflow`.

pub mod codes;
pub mod handlers;
pub mod requests;
pub mod response;

pub use response::ActionResponse;


use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use catalog::WorkflowCatalog;
use engine::WorkflowRunner;
use steps::{SimulatedStepExecutor, StepExecutor};

/// Owns the catalog and the runner; one instance serves all actions.
pub struct WorkflowService {
    catalog: Arc<WorkflowCatalog>,
    runner: WorkflowRunner,
}

impl WorkflowService {
    /// A service wired to the deterministic simulation.
    pub fn new() -> Self {
        Self::with_executor(Arc::new(SimulatedStepExecutor))
    }

    /// A service with a caller-provided executor behind the seam.
    pub fn with_executor(executor: Arc<dyn StepExecutor>) -> Self {
        let catalog = Arc::new(WorkflowCatalog::new());
        let runner = WorkflowRunner::new(Arc::clone(&catalog), executor);
        Self { catalog, runner }
    }

    pub fn catalog(&self) -> &Arc<WorkflowCatalog> {
        &self.catalog
    }

    pub fn runner(&self) -> &WorkflowRunner {
        &self.runner
    }

    /// Route one action to its handler.
    pub async fn dispatch(&self, action: &str, params: Value) -> ActionResponse {
        debug!(action, "dispatching action");
        match action {
            "create_workflow" => match parse(params) {
                Ok(req) => handlers::workflows::create(self, req),
                Err(resp) => resp,
            },
            "add_step" => match parse(params) {
                Ok(req) => handlers::workflows::add_step(self, req),
                Err(resp) => resp,
            },
            "remove_step" => match parse(params) {
                Ok(req) => handlers::workflows::remove_step(self, req),
                Err(resp) => resp,
            },
            "execute_workflow" => match parse(params) {
                Ok(req) => handlers::executions::execute(self, req).await,
                Err(resp) => resp,
            },
            "get_status" => match parse(params) {
                Ok(req) => handlers::workflows::status(self, req),
                Err(resp) => resp,
            },
            "list_workflows" => handlers::workflows::list(self),
            "cancel_workflow" => match parse(params) {
                Ok(req) => handlers::workflows::cancel(self, req),
                Err(resp) => resp,
            },
            other => ActionResponse::err(
                codes::UNKNOWN_ACTION,
                format!("unknown action '{other}'"),
            ),
        }
    }
}

impl Default for WorkflowService {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the parameter bag into a typed request. A `null` bag counts as an
/// empty one so field-level validation produces the precise MISSING_* code.
fn parse<T: DeserializeOwned>(params: Value) -> Result<T, ActionResponse> {
    let params = match params {
        Value::Null => Value::Object(serde_json::Map::new()),
        other => other,
    };
    serde_json::from_value(params).map_err(|e| {
        ActionResponse::err(codes::INVALID_PARAMS, format!("invalid parameters: {e}"))
    })
}
