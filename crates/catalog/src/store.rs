//! In-memory workflow catalog and execution history store.
//!
//! One mutex guards both maps: structural mutations (add/remove step) must
//! not race an in-flight execution snapshotting the step list, and contention
//! is expected to be low enough that finer-grained locking buys nothing.
//! Every operation takes the lock, works on the state, and returns owned
//! snapshots — no references into the locked state escape.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::error::CatalogError;
use crate::models::{ExecutionRecord, Mode, NewStep, Step, Workflow};

/// Owns every workflow definition and its execution history.
///
/// Construct one per process (or per test); there are no ambient singletons.
#[derive(Debug, Default)]
pub struct WorkflowCatalog {
    inner: Mutex<CatalogState>,
}

#[derive(Debug, Default)]
struct CatalogState {
    workflows: HashMap<Uuid, Workflow>,
    /// Append-only per-workflow execution records, keyed by workflow id.
    /// Registered empty at creation, deleted together with the workflow.
    history: HashMap<Uuid, Vec<ExecutionRecord>>,
}

impl WorkflowCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Workflow mutations
    // -----------------------------------------------------------------------

    /// Register a new workflow and an empty history list for it.
    ///
    /// `mode` defaults to sequential when absent or blank.
    pub fn create_workflow(
        &self,
        name: &str,
        description: Option<String>,
        mode: Option<&str>,
    ) -> Result<Workflow, CatalogError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogError::MissingName);
        }

        let mode = match mode.map(str::trim).filter(|m| !m.is_empty()) {
            None => Mode::default(),
            Some(raw) => raw
                .parse()
                .map_err(|_| CatalogError::InvalidMode(raw.to_string()))?,
        };

        let description = description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        let workflow = Workflow::new(name, description, mode);

        let mut state = self.lock();
        state.history.insert(workflow.id, Vec::new());
        state.workflows.insert(workflow.id, workflow.clone());

        info!(workflow_id = %workflow.id, name = %workflow.name, mode = %workflow.mode, "workflow created");
        Ok(workflow)
    }

    /// Add a step to an existing workflow and return the updated snapshot.
    ///
    /// Dependencies must name steps already present — the forward-only rule
    /// that keeps graph construction acyclic through this API.
    pub fn add_step(&self, workflow_id: Uuid, new_step: NewStep) -> Result<Workflow, CatalogError> {
        let name = new_step.name.trim().to_string();
        if name.is_empty() {
            return Err(CatalogError::MissingStepName);
        }

        let mut state = self.lock();
        let workflow = state
            .workflows
            .get_mut(&workflow_id)
            .ok_or(CatalogError::WorkflowNotFound(workflow_id))?;

        if workflow.has_step(&name) {
            return Err(CatalogError::DuplicateStep(name));
        }

        let mut depends_on = Vec::with_capacity(new_step.depends_on.len());
        for dep in &new_step.depends_on {
            let dep = dep.trim();
            if dep.is_empty() || !workflow.has_step(dep) {
                return Err(CatalogError::InvalidDependency {
                    step: name,
                    dependency: dep.to_string(),
                });
            }
            depends_on.push(dep.to_string());
        }

        let agent_type = new_step
            .agent_type
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or("default")
            .to_string();

        let task = new_step
            .task
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();

        let condition = new_step
            .condition
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        workflow.steps.push(Step {
            name,
            agent_type,
            task,
            depends_on,
            condition,
            added_at: Utc::now(),
        });
        workflow.updated_at = Utc::now();

        Ok(workflow.clone())
    }

    /// Remove a step by name and return it with the updated snapshot.
    ///
    /// The removed name is pruned from every remaining step's dependency
    /// list; dependents are kept, not cascaded.
    pub fn remove_step(
        &self,
        workflow_id: Uuid,
        step_name: &str,
    ) -> Result<(Step, Workflow), CatalogError> {
        let step_name = step_name.trim();
        if step_name.is_empty() {
            return Err(CatalogError::MissingStepName);
        }

        let mut state = self.lock();
        let workflow = state
            .workflows
            .get_mut(&workflow_id)
            .ok_or(CatalogError::WorkflowNotFound(workflow_id))?;

        let index = workflow
            .steps
            .iter()
            .position(|s| s.name == step_name)
            .ok_or_else(|| CatalogError::StepNotFound(step_name.to_string()))?;

        let removed = workflow.steps.remove(index);
        for step in &mut workflow.steps {
            step.depends_on.retain(|d| d != step_name);
        }
        workflow.updated_at = Utc::now();

        Ok((removed, workflow.clone()))
    }

    /// Delete a workflow and its execution history atomically.
    pub fn cancel_workflow(&self, workflow_id: Uuid) -> Result<Workflow, CatalogError> {
        let mut state = self.lock();
        let workflow = state
            .workflows
            .remove(&workflow_id)
            .ok_or(CatalogError::WorkflowNotFound(workflow_id))?;
        state.history.remove(&workflow_id);

        info!(workflow_id = %workflow_id, name = %workflow.name, "workflow cancelled");
        Ok(workflow)
    }

    // -----------------------------------------------------------------------
    // Read-only projections
    // -----------------------------------------------------------------------

    /// Snapshot a single workflow.
    pub fn get_workflow(&self, workflow_id: Uuid) -> Result<Workflow, CatalogError> {
        self.lock()
            .workflows
            .get(&workflow_id)
            .cloned()
            .ok_or(CatalogError::WorkflowNotFound(workflow_id))
    }

    /// Snapshot every workflow, newest first (id as tiebreaker so repeated
    /// calls return identical output).
    pub fn list_workflows(&self) -> Vec<Workflow> {
        let mut workflows: Vec<Workflow> = self.lock().workflows.values().cloned().collect();
        workflows.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        workflows
    }

    // -----------------------------------------------------------------------
    // Execution history
    // -----------------------------------------------------------------------

    /// Append an execution record to its workflow's history list.
    ///
    /// Fails if the workflow was cancelled between execution and the append.
    pub fn append_execution(&self, record: ExecutionRecord) -> Result<(), CatalogError> {
        let mut state = self.lock();
        let history = state
            .history
            .get_mut(&record.workflow_id)
            .ok_or(CatalogError::WorkflowNotFound(record.workflow_id))?;
        history.push(record);
        Ok(())
    }

    /// Snapshot the execution history for a workflow, oldest first.
    pub fn executions(&self, workflow_id: Uuid) -> Result<Vec<ExecutionRecord>, CatalogError> {
        self.lock()
            .history
            .get(&workflow_id)
            .cloned()
            .ok_or(CatalogError::WorkflowNotFound(workflow_id))
    }

    /// Number of recorded executions for a workflow.
    pub fn execution_count(&self, workflow_id: Uuid) -> Result<usize, CatalogError> {
        self.lock()
            .history
            .get(&workflow_id)
            .map(Vec::len)
            .ok_or(CatalogError::WorkflowNotFound(workflow_id))
    }

    /// Drop every workflow and all history. Intended for test isolation.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.workflows.clear();
        state.history.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CatalogState> {
        // Mutations validate before touching the maps and snapshots are
        // cloned out, so the state stays usable even if a holder panicked.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_with_workflow(mode: &str) -> (WorkflowCatalog, Uuid) {
        let catalog = WorkflowCatalog::new();
        let wf = catalog
            .create_workflow("Deploy", None, Some(mode))
            .expect("create should succeed");
        (catalog, wf.id)
    }

    #[test]
    fn create_rejects_blank_name() {
        let catalog = WorkflowCatalog::new();
        assert!(matches!(
            catalog.create_workflow("   ", None, None),
            Err(CatalogError::MissingName)
        ));
    }

    #[test]
    fn create_defaults_to_sequential_mode() {
        let catalog = WorkflowCatalog::new();
        let wf = catalog.create_workflow("Deploy", None, None).unwrap();
        assert_eq!(wf.mode, Mode::Sequential);

        // Blank mode string behaves like an absent one.
        let wf = catalog.create_workflow("Release", None, Some("  ")).unwrap();
        assert_eq!(wf.mode, Mode::Sequential);
    }

    #[test]
    fn create_rejects_unknown_mode() {
        let catalog = WorkflowCatalog::new();
        let err = catalog
            .create_workflow("Deploy", None, Some("round-robin"))
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_MODE");
    }

    #[test]
    fn create_registers_empty_history() {
        let (catalog, id) = catalog_with_workflow("sequential");
        assert_eq!(catalog.execution_count(id).unwrap(), 0);
        assert!(catalog.executions(id).unwrap().is_empty());
    }

    #[test]
    fn add_step_applies_defaults_and_trims() {
        let (catalog, id) = catalog_with_workflow("sequential");
        let wf = catalog
            .add_step(
                id,
                NewStep {
                    name: "  build  ".into(),
                    agent_type: None,
                    task: None,
                    depends_on: Vec::new(),
                    condition: Some("   ".into()),
                },
            )
            .unwrap();

        let step = wf.step("build").expect("trimmed name should be stored");
        assert_eq!(step.agent_type, "default");
        assert_eq!(step.task, "");
        assert!(step.condition.is_none());
    }

    #[test]
    fn add_step_round_trips_supplied_attributes() {
        let (catalog, id) = catalog_with_workflow("conditional");
        catalog.add_step(id, NewStep::named("fetch")).unwrap();
        catalog
            .add_step(
                id,
                NewStep {
                    name: "notify".into(),
                    agent_type: Some("messenger".into()),
                    task: Some("send the report".into()),
                    depends_on: vec!["fetch".into()],
                    condition: Some("input.env == \"prod\"".into()),
                },
            )
            .unwrap();

        let wf = catalog.get_workflow(id).unwrap();
        let step = wf.step("notify").unwrap();
        assert_eq!(step.agent_type, "messenger");
        assert_eq!(step.task, "send the report");
        assert_eq!(step.depends_on, vec!["fetch"]);
        assert_eq!(step.condition.as_deref(), Some("input.env == \"prod\""));
    }

    #[test]
    fn add_step_rejects_duplicate_name() {
        let (catalog, id) = catalog_with_workflow("sequential");
        catalog.add_step(id, NewStep::named("build")).unwrap();

        let err = catalog.add_step(id, NewStep::named("build")).unwrap_err();
        assert_eq!(err.code(), "DUPLICATE_STEP");
        assert_eq!(catalog.get_workflow(id).unwrap().steps.len(), 1);
    }

    #[test]
    fn add_step_rejects_forward_dependency() {
        let (catalog, id) = catalog_with_workflow("sequential");
        let err = catalog
            .add_step(id, NewStep::named("test").depends_on(&["nonexistent"]))
            .unwrap_err();

        assert_eq!(err.code(), "INVALID_DEPENDENCY");
        // The workflow is unchanged.
        assert!(catalog.get_workflow(id).unwrap().steps.is_empty());
    }

    #[test]
    fn add_step_rejects_self_dependency() {
        // A step cannot depend on itself: it is not present yet when its own
        // dependency list is validated.
        let (catalog, id) = catalog_with_workflow("sequential");
        let err = catalog
            .add_step(id, NewStep::named("loop").depends_on(&["loop"]))
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_DEPENDENCY");
    }

    #[test]
    fn add_step_rejects_blank_name() {
        let (catalog, id) = catalog_with_workflow("sequential");
        let err = catalog.add_step(id, NewStep::named("   ")).unwrap_err();
        assert_eq!(err.code(), "MISSING_STEP_NAME");
    }

    #[test]
    fn remove_step_prunes_dangling_dependencies() {
        let (catalog, id) = catalog_with_workflow("sequential");
        catalog.add_step(id, NewStep::named("build")).unwrap();
        catalog
            .add_step(id, NewStep::named("test").depends_on(&["build"]))
            .unwrap();
        catalog
            .add_step(id, NewStep::named("deploy").depends_on(&["build", "test"]))
            .unwrap();

        let (removed, wf) = catalog.remove_step(id, "build").unwrap();
        assert_eq!(removed.name, "build");
        assert_eq!(wf.steps.len(), 2);
        // Dependents survive with the dangling edge pruned.
        assert!(wf.step("test").unwrap().depends_on.is_empty());
        assert_eq!(wf.step("deploy").unwrap().depends_on, vec!["test"]);
    }

    #[test]
    fn remove_step_reports_missing_step() {
        let (catalog, id) = catalog_with_workflow("sequential");
        let err = catalog.remove_step(id, "ghost").unwrap_err();
        assert_eq!(err.code(), "STEP_NOT_FOUND");
    }

    #[test]
    fn cancel_removes_workflow_and_history() {
        let (catalog, id) = catalog_with_workflow("sequential");
        catalog.cancel_workflow(id).unwrap();

        assert!(matches!(
            catalog.get_workflow(id),
            Err(CatalogError::WorkflowNotFound(_))
        ));
        assert!(catalog.executions(id).is_err());
        assert!(matches!(
            catalog.cancel_workflow(id),
            Err(CatalogError::WorkflowNotFound(_))
        ));
    }

    #[test]
    fn list_is_deterministic_and_idempotent() {
        let catalog = WorkflowCatalog::new();
        for name in ["one", "two", "three"] {
            catalog.create_workflow(name, None, None).unwrap();
        }

        let first = catalog.list_workflows();
        let second = catalog.list_workflows();
        assert_eq!(first.len(), 3);
        let ids: Vec<Uuid> = first.iter().map(|w| w.id).collect();
        let ids_again: Vec<Uuid> = second.iter().map(|w| w.id).collect();
        assert_eq!(ids, ids_again);
    }

    #[test]
    fn list_on_empty_catalog_returns_empty() {
        let catalog = WorkflowCatalog::new();
        assert!(catalog.list_workflows().is_empty());
    }

    #[test]
    fn clear_resets_all_state() {
        let (catalog, id) = catalog_with_workflow("sequential");
        catalog.clear();
        assert!(catalog.list_workflows().is_empty());
        assert!(catalog.get_workflow(id).is_err());
    }
}
