//! Engine-level error types.

use thiserror::Error;

use catalog::CatalogError;

/// Errors produced by one execution request.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The workflow exists but has zero steps.
    #[error("workflow has no steps to execute")]
    NoSteps,

    /// The dependency graph contains a cycle; nothing was executed or
    /// recorded.
    #[error("workflow dependency graph contains a cycle")]
    CircularDependency,

    /// The injected executor failed; the run is aborted with nothing
    /// recorded. Unreachable with the shipped simulation.
    #[error("step '{step_name}' failed: {message}")]
    StepFailed { step_name: String, message: String },

    /// Lookup or append against the catalog failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl EngineError {
    /// Stable machine-readable code reported at the action boundary.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoSteps => "NO_STEPS",
            Self::CircularDependency => "CIRCULAR_DEPENDENCY",
            Self::StepFailed { .. } => "STEP_FAILED",
            Self::Catalog(e) => e.code(),
        }
    }
}
