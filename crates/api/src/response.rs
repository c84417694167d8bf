//! The structured response envelope returned by every action.

use serde::Serialize;
use serde_json::Value;

/// Outcome of one dispatched action.
///
/// `result` is a deterministic textual rendering of the metadata meant for
/// display; machine consumers should read `metadata` and `error`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    pub success: bool,
    pub result: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    pub metadata: Value,
}

impl ActionResponse {
    pub fn ok(result: impl Into<String>, metadata: Value) -> Self {
        Self {
            success: true,
            result: result.into(),
            error: None,
            metadata,
        }
    }

    pub fn err(code: &'static str, result: impl Into<String>) -> Self {
        Self {
            success: false,
            result: result.into(),
            error: Some(code),
            metadata: Value::Null,
        }
    }
}
