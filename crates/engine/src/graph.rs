//! Graph utilities over a workflow's step list.
//!
//! Pure functions, no state. Traversal is deterministic for a given
//! insertion order: steps are visited in the order they appear in the slice
//! and each step's dependencies in their stored order, so repeated
//! executions of the same workflow produce identical traces.

use std::collections::{HashMap, HashSet};

use catalog::Step;

use crate::EngineError;

/// Order steps so that every step appears after all of its transitive
/// dependencies.
///
/// Depth-first traversal with a `visiting` set for cycle detection and a
/// `visited` set for memoization. A name re-encountered while still in the
/// visiting set means a cycle; the whole sort fails with
/// [`EngineError::CircularDependency`] and no partial order is returned.
///
/// Dependency names that match no step are skipped — the catalog prunes
/// dangling edges on removal, so they cannot occur through its API.
pub fn topological_sort(steps: &[Step]) -> Result<Vec<String>, EngineError> {
    let by_name: HashMap<&str, &Step> = steps.iter().map(|s| (s.name.as_str(), s)).collect();

    let mut visiting: HashSet<&str> = HashSet::new();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut sorted: Vec<String> = Vec::with_capacity(steps.len());

    fn visit<'a>(
        name: &'a str,
        by_name: &HashMap<&'a str, &'a Step>,
        visiting: &mut HashSet<&'a str>,
        visited: &mut HashSet<&'a str>,
        sorted: &mut Vec<String>,
    ) -> Result<(), EngineError> {
        if visited.contains(name) {
            return Ok(());
        }
        if !visiting.insert(name) {
            return Err(EngineError::CircularDependency);
        }

        // `visit` is only ever called with names present in the map.
        let step = by_name[name];
        for dep in &step.depends_on {
            if by_name.contains_key(dep.as_str()) {
                visit(dep, by_name, visiting, visited, sorted)?;
            }
        }

        visiting.remove(name);
        visited.insert(name);
        sorted.push(name.to_string());
        Ok(())
    }

    for step in steps {
        visit(
            step.name.as_str(),
            &by_name,
            &mut visiting,
            &mut visited,
            &mut sorted,
        )?;
    }

    Ok(sorted)
}

/// Group steps into dependency levels for parallel execution.
///
/// The level of a step is 0 when it has no dependencies, otherwise
/// 1 + max(level of each direct dependency). Steps in the same level have no
/// dependency relationship in either direction; within a level they keep the
/// topological-sort order. Fails like [`topological_sort`] on a cycle.
pub fn parallel_levels(steps: &[Step]) -> Result<Vec<Vec<String>>, EngineError> {
    let order = topological_sort(steps)?;
    let by_name: HashMap<&str, &Step> = steps.iter().map(|s| (s.name.as_str(), s)).collect();

    let mut level_of: HashMap<&str, usize> = HashMap::new();
    let mut levels: Vec<Vec<String>> = Vec::new();

    for name in &order {
        let step = by_name[name.as_str()];
        // Dependencies precede their dependents in the order, so their
        // levels are already known.
        let level = step
            .depends_on
            .iter()
            .filter_map(|d| level_of.get(d.as_str()))
            .map(|l| l + 1)
            .max()
            .unwrap_or(0);

        if levels.len() <= level {
            levels.resize_with(level + 1, Vec::new);
        }
        levels[level].push(step.name.clone());
        level_of.insert(step.name.as_str(), level);
    }

    Ok(levels)
}
