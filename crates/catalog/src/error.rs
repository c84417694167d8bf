//! Catalog-level error types.

use thiserror::Error;
use uuid::Uuid;

/// Errors produced by catalog mutations and lookups.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Workflow name absent or blank after trimming.
    #[error("workflow name is required")]
    MissingName,

    /// Mode string is not one of sequential / parallel / conditional.
    #[error("invalid execution mode: '{0}'")]
    InvalidMode(String),

    /// No workflow registered under the given id.
    #[error("workflow '{0}' not found")]
    WorkflowNotFound(Uuid),

    /// Step name absent or blank after trimming.
    #[error("step name is required")]
    MissingStepName,

    /// A step with the same name already exists in the workflow.
    #[error("step '{0}' already exists in this workflow")]
    DuplicateStep(String),

    /// A dependency references a step that has not been added yet.
    #[error("step '{step}' depends on unknown step '{dependency}'")]
    InvalidDependency { step: String, dependency: String },

    /// No step with the given name exists in the workflow.
    #[error("step '{0}' not found in this workflow")]
    StepNotFound(String),
}

impl CatalogError {
    /// Stable machine-readable code reported at the action boundary.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingName => "MISSING_NAME",
            Self::InvalidMode(_) => "INVALID_MODE",
            Self::WorkflowNotFound(_) => "WORKFLOW_NOT_FOUND",
            Self::MissingStepName => "MISSING_STEP_NAME",
            Self::DuplicateStep(_) => "DUPLICATE_STEP",
            Self::InvalidDependency { .. } => "INVALID_DEPENDENCY",
            Self::StepNotFound(_) => "STEP_NOT_FOUND",
        }
    }
}
