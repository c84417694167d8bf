//! Core domain models for the orchestration engine.
//!
//! These types are the source of truth for what a workflow looks like in
//! memory. Wire-facing structs serialize with camelCase keys so the action
//! metadata matches the external contract (`workflowId`, `totalSteps`, …).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// Execution strategy declared on a workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Linear chain over the topological order; each step feeds the next.
    Sequential,
    /// Steps grouped into dependency levels; groups are labels for the
    /// caller's own concurrency, not real threads.
    Parallel,
    /// Per-step boolean gate evaluated against the caller input.
    Conditional,
}

impl Default for Mode {
    fn default() -> Self {
        Self::Sequential
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sequential => write!(f, "sequential"),
            Self::Parallel => write!(f, "parallel"),
            Self::Conditional => write!(f, "conditional"),
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    /// Case-insensitive over trimmed input.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(Self::Sequential),
            "parallel" => Ok(Self::Parallel),
            "conditional" => Ok(Self::Conditional),
            other => Err(format!("unknown execution mode: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Step
// ---------------------------------------------------------------------------

/// A single unit of work within a workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Unique key within the owning workflow (case-sensitive, trimmed).
    pub name: String,
    /// Free-text label for the agent that would run this step.
    pub agent_type: String,
    /// Free-text description of the work.
    pub task: String,
    /// Names of steps this one depends on, in declaration order. Every entry
    /// references a step that was already present when this one was added.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    /// Gate expression, consulted only by conditional-mode execution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    pub added_at: DateTime<Utc>,
}

/// Caller-supplied description of a step to add to a workflow.
///
/// Missing fields take their documented defaults (`agentType` → `"default"`,
/// `task` → empty). The catalog validates and trims on insertion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStep {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub agent_type: Option<String>,
    #[serde(default)]
    pub task: Option<String>,
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default)]
    pub condition: Option<String>,
}

impl NewStep {
    /// Convenience constructor for the common name-only case.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn depends_on(mut self, deps: &[&str]) -> Self {
        self.depends_on = deps.iter().map(|d| d.to_string()).collect();
        self
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

/// A named, mode-tagged collection of steps with dependency edges.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub mode: Mode,
    /// Insertion-ordered; name uniqueness is enforced by the catalog.
    pub steps: Vec<Step>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Workflow {
    pub fn new(name: impl Into<String>, description: Option<String>, mode: Mode) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description,
            mode,
            steps: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Look up a step by exact name.
    pub fn step(&self, name: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.name == name)
    }

    pub fn has_step(&self, name: &str) -> bool {
        self.step(name).is_some()
    }
}

// ---------------------------------------------------------------------------
// Execution results
// ---------------------------------------------------------------------------

/// Terminal state of one step within an execution trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Completed,
    Skipped,
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

/// One entry in an execution trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    pub step_name: String,
    pub agent_type: String,
    pub task: String,
    /// 1-based position in the trace.
    pub order: usize,
    pub status: StepStatus,
    /// Payload the step notionally received.
    pub input: Value,
    /// Present only for completed steps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
    /// 1-based dependency level; parallel mode only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel_group: Option<usize>,
    /// The gate that was evaluated; conditional mode only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_met: Option<bool>,
}

/// Immutable log entry produced by one execution request.
///
/// Appended to the per-workflow history list and never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRecord {
    pub execution_id: Uuid,
    pub workflow_id: Uuid,
    pub workflow_name: String,
    /// Snapshot of the workflow's mode at execution time.
    pub mode: Mode,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub total_steps: usize,
    pub executed_steps: usize,
    pub skipped_steps: usize,
    /// The caller-supplied payload.
    pub input: Value,
    pub trace: Vec<StepResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("Sequential".parse::<Mode>().unwrap(), Mode::Sequential);
        assert_eq!("  PARALLEL ".parse::<Mode>().unwrap(), Mode::Parallel);
        assert_eq!("conditional".parse::<Mode>().unwrap(), Mode::Conditional);
        assert!("round-robin".parse::<Mode>().is_err());
    }

    #[test]
    fn mode_display_round_trips() {
        for mode in [Mode::Sequential, Mode::Parallel, Mode::Conditional] {
            assert_eq!(mode.to_string().parse::<Mode>().unwrap(), mode);
        }
    }

    #[test]
    fn workflow_step_lookup_is_exact() {
        let mut wf = Workflow::new("lookup", None, Mode::Sequential);
        wf.steps.push(Step {
            name: "Build".into(),
            agent_type: "default".into(),
            task: String::new(),
            depends_on: Vec::new(),
            condition: None,
            added_at: Utc::now(),
        });

        assert!(wf.has_step("Build"));
        // Case-sensitive, exact match.
        assert!(!wf.has_step("build"));
    }
}
