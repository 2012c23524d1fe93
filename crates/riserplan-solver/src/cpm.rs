//! Critical Path Method
//!
//! Classic CPM over the task graph, ignoring crew limits. Durations are
//! whole working days (quarter days round up).
//!
//! # Algorithm
//!
//! 1. Topological sort (dag.rs)
//! 2. Forward pass: ES = max(EF of predecessors), EF = ES + duration
//! 3. Backward pass: LF = min(LS of successors), LS = LF - duration
//! 4. Slack = LS - ES; critical tasks have zero slack
//!
//! The pass is infallible: on a degraded (cyclic or dangling) graph the
//! numbers are still produced in input order, they just stop meaning much.

use crate::dag::{successors, topo_sort};
use riserplan_core::{whole_days, DurationOverrides, Task, TaskId, TaskKind};
use std::collections::HashMap;

/// CPM figures for a single task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpmResult {
    pub task_id: TaskId,
    /// Early Start (working days from the first day)
    pub es: i64,
    /// Early Finish
    pub ef: i64,
    /// Late Start
    pub ls: i64,
    /// Late Finish
    pub lf: i64,
    /// Total slack (LS - ES)
    pub total_slack: i64,
    /// Slip allowed before any successor moves
    pub free_slack: i64,
    /// Zero total slack
    pub is_critical: bool,
    /// Whole working days
    pub duration: i64,
}

/// Complete CPM analysis
#[derive(Debug, Clone, PartialEq)]
pub struct CpmSchedule {
    pub results: HashMap<TaskId, CpmResult>,
    /// Zero-slack tasks in topological order
    pub critical_path: Vec<TaskId>,
    /// Max EF
    pub project_end: i64,
}

impl CpmSchedule {
    pub fn get(&self, task_id: &str) -> Option<&CpmResult> {
        self.results.get(task_id)
    }

    pub fn slack(&self, task_id: &str) -> Option<i64> {
        self.results.get(task_id).map(|r| r.total_slack)
    }
}

/// Run forward and backward passes over `tasks`
pub fn analyze(tasks: &[Task], overrides: &DurationOverrides) -> CpmSchedule {
    let sequence = topo_sort(tasks);
    let order = sequence.tasks();
    let succ = successors(tasks);

    let duration: HashMap<&str, i64> = tasks
        .iter()
        .map(|t| (t.id.as_str(), whole_days(overrides.duration_of(t))))
        .collect();

    // ════════════════════════════════════════════════════════════════════
    // FORWARD PASS
    // ════════════════════════════════════════════════════════════════════

    let mut es: HashMap<&str, i64> = HashMap::new();
    let mut ef: HashMap<&str, i64> = HashMap::new();

    for task in order {
        let id = task.id.as_str();
        let early_start = task
            .deps
            .iter()
            .filter_map(|dep| ef.get(dep.as_str()).copied())
            .max()
            .unwrap_or(0);
        es.insert(id, early_start);
        ef.insert(id, early_start.saturating_add(duration[id]));
    }

    let project_end = ef.values().copied().max().unwrap_or(0);

    // ════════════════════════════════════════════════════════════════════
    // BACKWARD PASS
    // ════════════════════════════════════════════════════════════════════
    //
    // Late dates start at the project end so that a successor visited out
    // of order (degraded graphs only) still yields a bound.

    let mut lf: HashMap<&str, i64> = tasks.iter().map(|t| (t.id.as_str(), project_end)).collect();
    let mut ls: HashMap<&str, i64> = tasks
        .iter()
        .map(|t| {
            let id = t.id.as_str();
            (id, project_end.saturating_sub(duration[id]))
        })
        .collect();

    for task in order.iter().rev() {
        let id = task.id.as_str();
        let late_finish = succ
            .get(id)
            .and_then(|next| next.iter().map(|s| ls[s]).min())
            .unwrap_or(project_end);
        lf.insert(id, late_finish);
        ls.insert(id, late_finish.saturating_sub(duration[id]));
    }

    // ════════════════════════════════════════════════════════════════════
    // SLACK
    // ════════════════════════════════════════════════════════════════════

    let mut results: HashMap<TaskId, CpmResult> = HashMap::with_capacity(tasks.len());
    let mut critical_path: Vec<TaskId> = Vec::new();

    for task in order {
        let id = task.id.as_str();
        let total_slack = ls[id] - es[id];

        let free_slack = succ
            .get(id)
            .and_then(|next| next.iter().map(|s| es[s]).min())
            .map(|min_succ_es| (min_succ_es - ef[id]).max(0))
            .unwrap_or(total_slack);

        let is_critical = total_slack == 0;
        if is_critical {
            critical_path.push(task.id.clone());
        }

        results.insert(
            task.id.clone(),
            CpmResult {
                task_id: task.id.clone(),
                es: es[id],
                ef: ef[id],
                ls: ls[id],
                lf: lf[id],
                total_slack,
                free_slack,
                is_critical,
                duration: duration[id],
            },
        );
    }

    tracing::debug!(
        project_end,
        critical = critical_path.len(),
        "critical path analysis complete"
    );

    CpmSchedule {
        results,
        critical_path,
        project_end,
    }
}

/// Why a critical task matters, in words a site manager would use
pub fn stage_reason(kind: TaskKind) -> &'static str {
    match kind {
        TaskKind::Org => "Tenant access is blocking: without entry to apartments the riser cannot start",
        TaskKind::Test => "Commissioning closes the riser: water is back only after a passed test",
        TaskKind::Restore => "Finishing works close the riser for tenants",
        _ => "No slack: any delay here moves the completion date",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn task(id: &str, days: f64, deps: &[&str]) -> Task {
        deps.iter()
            .fold(Task::new(id, TaskKind::Install).duration(days), |t, d| {
                t.depends_on(*d)
            })
    }

    #[test]
    fn test_cpm_linear_chain() {
        let tasks = vec![
            task("a", 2.0, &[]),
            task("b", 1.25, &["a"]),
            task("c", 3.0, &["b"]),
        ];
        let cpm = analyze(&tasks, &DurationOverrides::new());

        assert_eq!(cpm.project_end, 7);
        assert_eq!(cpm.get("b").map(|r| (r.es, r.ef, r.duration)), Some((2, 4, 2)));
        assert_eq!(cpm.critical_path, vec!["a", "b", "c"]);
        assert!(cpm.results.values().all(|r| r.total_slack == 0));
    }

    #[test]
    fn test_cpm_parallel_branches() {
        let tasks = vec![
            task("start", 1.0, &[]),
            task("long", 5.0, &["start"]),
            task("short", 2.0, &["start"]),
            task("end", 1.0, &["long", "short"]),
        ];
        let cpm = analyze(&tasks, &DurationOverrides::new());

        assert_eq!(cpm.project_end, 7);
        assert_eq!(cpm.slack("short"), Some(3));
        assert_eq!(cpm.get("short").map(|r| r.free_slack), Some(3));
        assert_eq!(cpm.critical_path, vec!["start", "long", "end"]);
    }

    #[test]
    fn test_free_slack_vs_total_slack() {
        let tasks = vec![
            task("a", 1.0, &[]),
            task("b", 1.0, &["a"]),
            task("c", 4.0, &[]),
            task("d", 1.0, &["b", "c"]),
        ];
        let cpm = analyze(&tasks, &DurationOverrides::new());

        // a can only slip as far as b lets it
        assert_eq!(cpm.get("a").map(|r| (r.total_slack, r.free_slack)), Some((2, 0)));
        assert_eq!(cpm.get("b").map(|r| (r.total_slack, r.free_slack)), Some((2, 2)));
    }

    #[test]
    fn test_terminal_tasks_anchor_on_project_end() {
        let tasks = vec![task("a", 3.0, &[]), task("b", 1.0, &[])];
        let cpm = analyze(&tasks, &DurationOverrides::new());
        assert_eq!(cpm.get("b").map(|r| (r.ls, r.lf)), Some((2, 3)));
    }

    #[test]
    fn test_overrides_feed_the_passes() {
        let tasks = vec![task("a", 1.0, &[]), task("b", 1.0, &[])];
        let overrides = DurationOverrides::new().with("b", 4.0);
        let cpm = analyze(&tasks, &overrides);
        assert_eq!(cpm.project_end, 4);
        assert_eq!(cpm.critical_path, vec!["b"]);
    }

    #[test]
    fn test_zero_duration_milestone_is_critical_on_the_path() {
        let tasks = vec![task("a", 2.0, &[]), task("gate", 0.0, &["a"])];
        let cpm = analyze(&tasks, &DurationOverrides::new());
        assert_eq!(cpm.critical_path, vec!["a", "gate"]);
    }

    #[test]
    fn test_huge_overrides_are_capped_in_the_passes() {
        let tasks = vec![task("a", 1.0, &[]), task("b", 1.0, &["a"])];
        let overrides = DurationOverrides::new().with("a", 1e19).with("b", f64::MAX);
        let cpm = analyze(&tasks, &overrides);
        assert_eq!(cpm.project_end, 20_000);
        assert_eq!(cpm.get("b").map(|r| (r.es, r.ef)), Some((10_000, 20_000)));
        assert_eq!(cpm.critical_path, vec!["a", "b"]);
    }

    #[test]
    fn test_cycle_still_produces_numbers() {
        let tasks = vec![task("a", 1.0, &["b"]), task("b", 1.0, &["a"])];
        let cpm = analyze(&tasks, &DurationOverrides::new());
        assert_eq!(cpm.results.len(), 2);
        assert_eq!(cpm.project_end, 2);
        assert_eq!(cpm.get("b").map(|r| r.es), Some(1));
    }

    #[test]
    fn test_empty_task_list() {
        let cpm = analyze(&[], &DurationOverrides::new());
        assert_eq!(cpm.project_end, 0);
        assert!(cpm.critical_path.is_empty());
    }

    #[test]
    fn test_stage_reasons_differ_by_kind() {
        assert_ne!(stage_reason(TaskKind::Org), stage_reason(TaskKind::Test));
        assert_eq!(stage_reason(TaskKind::Install), stage_reason(TaskKind::Buffer));
    }
}
