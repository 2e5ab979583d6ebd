//! Stage registry and execution planning.

use crate::errors::{CycleDetectedError, DuplicateStageError, GovflowError, UnknownDependencyError};
use crate::stages::StageSpec;
use std::collections::{HashMap, HashSet, VecDeque};

/// Registry of stages with dependency-ordered planning.
///
/// The plan is recomputed on every call from the current registrations;
/// registration order breaks ties between stages that are ready together.
#[derive(Debug, Clone, Default)]
pub struct StageManager {
    /// Stage specifications by id.
    stages: HashMap<String, StageSpec>,
    /// Registration order of ids.
    stage_order: Vec<String>,
}

impl StageManager {
    /// Creates an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a manager from an initial list of stages.
    ///
    /// Dependencies are not checked here; unknown ids surface when a plan is
    /// computed.
    pub fn from_stages(stages: impl IntoIterator<Item = StageSpec>) -> Result<Self, GovflowError> {
        let mut manager = Self::new();
        for stage in stages {
            manager.add_stage(stage)?;
        }
        Ok(manager)
    }

    /// Registers a stage.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateStageError` if the id is taken; the registry is left
    /// unchanged.
    pub fn add_stage(&mut self, spec: StageSpec) -> Result<(), DuplicateStageError> {
        if self.stages.contains_key(&spec.id) {
            return Err(DuplicateStageError::new(&spec.id));
        }

        tracing::debug!(
            stage = %spec.id,
            dependencies = ?spec.dependencies,
            "Registered stage"
        );
        self.stage_order.push(spec.id.clone());
        self.stages.insert(spec.id.clone(), spec);
        Ok(())
    }

    /// Unregisters a stage, returning it if it was present.
    pub fn remove_stage(&mut self, id: &str) -> Option<StageSpec> {
        let removed = self.stages.remove(id)?;
        self.stage_order.retain(|s| s != id);
        Some(removed)
    }

    /// Looks up a stage by id.
    #[must_use]
    pub fn get_stage(&self, id: &str) -> Option<&StageSpec> {
        self.stages.get(id)
    }

    /// Stage ids in registration order.
    #[must_use]
    pub fn stage_ids(&self) -> &[String] {
        &self.stage_order
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns true if no stage is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Computes the execution order of stage ids.
    ///
    /// Every registered stage appears exactly once and after all of its
    /// dependencies.
    ///
    /// # Errors
    ///
    /// - `UnknownDependency` if a declared dependency is not registered.
    /// - `CycleDetected` if the stages cannot be ordered; no partial plan is
    ///   returned.
    pub fn execution_plan(&self) -> Result<Vec<String>, GovflowError> {
        let mut in_degree: HashMap<&str, usize> = HashMap::with_capacity(self.stages.len());
        let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();

        for id in &self.stage_order {
            let spec = &self.stages[id];
            for dep in &spec.dependencies {
                if !self.stages.contains_key(dep) {
                    return Err(UnknownDependencyError::new(id, dep).into());
                }
                dependents.entry(dep.as_str()).or_default().push(id.as_str());
            }
            in_degree.insert(id.as_str(), spec.dependencies.len());
        }

        let mut queue: VecDeque<&str> = self
            .stage_order
            .iter()
            .map(String::as_str)
            .filter(|id| in_degree[id] == 0)
            .collect();
        let mut order = Vec::with_capacity(self.stages.len());

        while let Some(id) = queue.pop_front() {
            order.push(id.to_string());
            for &child in dependents.get(id).map_or(&[][..], Vec::as_slice) {
                if let Some(count) = in_degree.get_mut(child) {
                    *count -= 1;
                    if *count == 0 {
                        queue.push_back(child);
                    }
                }
            }
        }

        if order.len() < self.stages.len() {
            return Err(self.cycle_error(&order).into());
        }

        Ok(order)
    }

    /// Computes the execution plan and returns the planned stages.
    pub fn execution_plan_specs(&self) -> Result<Vec<StageSpec>, GovflowError> {
        let order = self.execution_plan()?;
        Ok(order
            .iter()
            .filter_map(|id| self.stages.get(id).cloned())
            .collect())
    }

    /// Builds the cycle error for the stages a plan could not reach.
    ///
    /// Every unreached stage has at least one unreached dependency, so
    /// following unreached dependencies from any of them must revisit a
    /// stage; that loop is reported as the cycle path.
    fn cycle_error(&self, scheduled: &[String]) -> CycleDetectedError {
        let scheduled: HashSet<&str> = scheduled.iter().map(String::as_str).collect();
        let unscheduled: Vec<String> = self
            .stage_order
            .iter()
            .filter(|id| !scheduled.contains(id.as_str()))
            .cloned()
            .collect();

        let mut path: Vec<String> = Vec::new();
        let mut current = unscheduled.first().cloned();
        while let Some(id) = current {
            if let Some(pos) = path.iter().position(|p| *p == id) {
                let mut cycle = path.split_off(pos);
                cycle.push(id);
                path = cycle;
                break;
            }
            current = self.stages.get(&id).and_then(|spec| {
                spec.dependencies
                    .iter()
                    .find(|dep| !scheduled.contains(dep.as_str()))
                    .cloned()
            });
            path.push(id);
        }

        tracing::error!(unscheduled = ?unscheduled, cycle = ?path, "Dependency cycle detected");
        CycleDetectedError::new(unscheduled, path)
    }
}
