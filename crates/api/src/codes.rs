//! Error codes raised by the dispatch layer itself.
//!
//! Catalog and engine errors carry their own codes (`CatalogError::code`,
//! `EngineError::code`); these constants cover failures detected before any
//! typed call is made.

pub const MISSING_WORKFLOW_ID: &str = "MISSING_WORKFLOW_ID";
pub const MISSING_STEP: &str = "MISSING_STEP";
pub const WORKFLOW_NOT_FOUND: &str = "WORKFLOW_NOT_FOUND";
pub const INVALID_PARAMS: &str = "INVALID_PARAMS";
pub const UNKNOWN_ACTION: &str = "UNKNOWN_ACTION";
