//! `engine` crate — graph utilities, the condition evaluator, and the
//! workflow execution engine.
//!
//! Everything here is a synchronous, side-effect-free computation over a
//! snapshot of a workflow's step list, except the final history append. The
//! async surface exists for the `StepExecutor` seam, not for concurrency
//! inside the engine itself.

pub mod condition;
pub mod error;
pub mod executor;
pub mod graph;

pub use condition::{evaluate_condition, Condition};
pub use error::EngineError;
pub use executor::WorkflowRunner;
pub use graph::{parallel_levels, topological_sort};
