//! `catalog` crate — domain models plus the in-memory workflow catalog and
//! execution history store.
//!
//! All state lives for the lifetime of the hosting process; there is no
//! durable persistence. The catalog is an explicitly owned object — construct
//! one per process (or per test) and hand out `Arc` clones.

pub mod error;
pub mod models;
pub mod store;

pub use error::CatalogError;
pub use models::{ExecutionRecord, Mode, NewStep, Step, StepResult, StepStatus, Workflow};
pub use store::WorkflowCatalog;
