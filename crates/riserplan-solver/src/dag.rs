//! Dependency graph ordering
//!
//! Orders tasks so every task comes after its predecessors (Kahn's
//! algorithm). The builder always produces a DAG; a cyclic or dangling
//! graph does not abort scheduling but comes back as
//! [`Sequence::Degraded`] in the original input order, so callers can tell
//! the two paths apart.

use riserplan_core::{Task, TaskId};
use std::collections::{HashMap, VecDeque};
use thiserror::Error;

/// Why a task graph could not be ordered
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// Cycle detected in dependencies
    #[error("Cycle detected involving tasks: {tasks:?}")]
    CycleDetected { tasks: Vec<TaskId> },
    /// Referenced task doesn't exist
    #[error("Task '{task}' depends on '{missing}' which doesn't exist")]
    MissingDependency { task: TaskId, missing: TaskId },
}

/// Outcome of ordering a task list
#[derive(Debug, Clone, PartialEq)]
pub enum Sequence<'a> {
    /// Every task appears after all of its dependencies
    Sorted(Vec<&'a Task>),
    /// The graph could not be drained; tasks are in input order
    Degraded {
        order: Vec<&'a Task>,
        reason: GraphError,
    },
}

impl<'a> Sequence<'a> {
    /// The task order to process, whichever path was taken
    pub fn tasks(&self) -> &[&'a Task] {
        match self {
            Sequence::Sorted(order) | Sequence::Degraded { order, .. } => order,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Sequence::Degraded { .. })
    }

    pub fn into_tasks(self) -> Vec<&'a Task> {
        match self {
            Sequence::Sorted(order) | Sequence::Degraded { order, .. } => order,
        }
    }
}

/// Successor lists keyed by predecessor id, restricted to known tasks.
///
/// Each successor list keeps task input order.
pub fn successors(tasks: &[Task]) -> HashMap<&str, Vec<&str>> {
    let mut succ: HashMap<&str, Vec<&str>> =
        tasks.iter().map(|t| (t.id.as_str(), Vec::new())).collect();

    for task in tasks {
        for dep in &task.deps {
            if let Some(list) = succ.get_mut(dep.as_str()) {
                list.push(task.id.as_str());
            }
        }
    }

    succ
}

/// Kahn's algorithm for topological sort.
///
/// The ready queue is seeded and drained in input order, so the result is
/// deterministic. Every declared dependency counts toward a task's
/// in-degree: a dependency on an unknown id can never be satisfied and
/// degrades the sequence just like a cycle does.
pub fn topo_sort(tasks: &[Task]) -> Sequence<'_> {
    let index: HashMap<&str, usize> = tasks
        .iter()
        .enumerate()
        .map(|(i, t)| (t.id.as_str(), i))
        .collect();

    let mut in_degree: Vec<usize> = tasks.iter().map(|t| t.deps.len()).collect();
    let mut out: Vec<Vec<usize>> = vec![Vec::new(); tasks.len()];
    let mut missing: Option<GraphError> = None;

    for (i, task) in tasks.iter().enumerate() {
        for dep in &task.deps {
            match index.get(dep.as_str()) {
                Some(&from) => out[from].push(i),
                None => {
                    missing.get_or_insert_with(|| GraphError::MissingDependency {
                        task: task.id.clone(),
                        missing: dep.clone(),
                    });
                }
            }
        }
    }

    let mut queue: VecDeque<usize> = (0..tasks.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut order: Vec<&Task> = Vec::with_capacity(tasks.len());

    while let Some(i) = queue.pop_front() {
        order.push(&tasks[i]);
        for &next in &out[i] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                queue.push_back(next);
            }
        }
    }

    if order.len() == tasks.len() {
        return Sequence::Sorted(order);
    }

    let reason = missing.unwrap_or_else(|| GraphError::CycleDetected {
        tasks: tasks
            .iter()
            .enumerate()
            .filter(|(i, _)| in_degree[*i] > 0)
            .map(|(_, t)| t.id.clone())
            .collect(),
    });

    tracing::warn!(%reason, "task graph could not be ordered; using input order");

    Sequence::Degraded {
        order: tasks.iter().collect(),
        reason,
    }
}
