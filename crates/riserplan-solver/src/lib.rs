//! # riserplan-solver
//!
//! Scheduling engine for riser replacement.
//!
//! This crate provides:
//! - Task graph construction from building parameters (`builder`)
//! - Topological ordering with cycle detection (`dag`)
//! - Resource-constrained list scheduling (`leveling`)
//! - Critical Path Method analysis (`cpm`)
//! - Bottleneck detection, outage windows and schedule verification
//!
//! ## Example
//!
//! ```rust
//! use riserplan_core::{DurationOverrides, ScheduleInput};
//! use riserplan_solver::generate_schedule;
//!
//! let input = ScheduleInput::default();
//! let overrides = DurationOverrides::new().with("install-K1-P1", 5.0);
//! let result = generate_schedule(&input, Some(&overrides));
//!
//! assert!(result.stats.total_work_days > 0);
//! assert!(riserplan_solver::verify(&result).is_empty());
//! ```

pub mod bottleneck;
pub mod builder;
pub mod calendar;
pub mod cpm;
pub mod dag;
pub mod leveling;
pub mod outage;
pub mod verify;

pub use bottleneck::{detect as detect_bottlenecks, Bottlenecks};
pub use builder::build_tasks;
pub use cpm::{analyze as critical_path, CpmResult, CpmSchedule};
pub use leveling::{pool_utilization, PoolUtilization};
pub use outage::{outage_windows, OutageWindow};
pub use verify::{verify, Violation};

use riserplan_core::{
    whole_days, CriticalStage, DurationOverrides, ScheduleInput, ScheduleResult, ScheduleStats,
    ScheduledTask, Task,
};

/// Optimistic end of the duration band (summed work minus 10%)
pub const OPTIMISTIC_FACTOR: f64 = 0.9;
/// Pessimistic end of the duration band (summed work plus 25%)
pub const PESSIMISTIC_FACTOR: f64 = 1.25;
/// Critical stages shown to the user
pub const MAX_CRITICAL_STAGES: usize = 8;

/// Build, schedule and analyse a building in one call.
///
/// The input is normalised first; `overrides` replace base durations for
/// the task ids they name. Identical input always yields an identical
/// result.
pub fn generate_schedule(
    input: &ScheduleInput,
    overrides: Option<&DurationOverrides>,
) -> ScheduleResult {
    let input = input.normalized();
    let no_overrides = DurationOverrides::new();
    let overrides = overrides.unwrap_or(&no_overrides);

    let tasks = build_tasks(&input);
    let scheduled = leveling::schedule(&input, &tasks, overrides);
    let stats = compute_stats(&input, &tasks, &scheduled, overrides);

    let cpm = cpm::analyze(&tasks, overrides);
    let critical_stages = critical_stages(&tasks, &cpm.critical_path);
    let bottlenecks = bottleneck::detect(&input, &tasks);

    tracing::debug!(
        work_days = stats.total_work_days,
        calendar_days = stats.total_calendar_days,
        critical = cpm.critical_path.len(),
        bottlenecks = bottlenecks.messages.len(),
        "schedule generated"
    );

    ScheduleResult {
        input,
        tasks,
        scheduled,
        stats,
        critical_stages,
        critical_task_ids: cpm.critical_path,
        bottlenecks: bottlenecks.messages,
        bottleneck_task_ids: bottlenecks.task_ids,
    }
}

/// Summary figures for a schedule.
///
/// Calendar spans come from a day-by-day walk, so the cost grows with the
/// band's upper bound; per-task durations are capped, which keeps it finite.
pub fn compute_stats(
    input: &ScheduleInput,
    tasks: &[Task],
    scheduled: &[ScheduledTask],
    overrides: &DurationOverrides,
) -> ScheduleStats {
    let start = input.start_date;
    let total_work_days = scheduled.iter().map(|t| t.end_work_day).max().unwrap_or(0).max(0);

    let work_of = |t: &Task| whole_days(overrides.duration_of(t));
    let base_work: i64 = tasks.iter().map(work_of).sum();

    let total_work_days_min = ((base_work as f64 * OPTIMISTIC_FACTOR).round() as i64).max(0);
    let total_work_days_max =
        ((base_work as f64 * PESSIMISTIC_FACTOR).round() as i64).max(total_work_days_min);

    let organizational_work_days: i64 = tasks
        .iter()
        .filter(|t| leveling::is_organizational(t.kind))
        .map(work_of)
        .sum();
    let organizational_loss_pct = if base_work > 0 {
        (organizational_work_days as f64 / base_work as f64 * 100.0).round() as i64
    } else {
        0
    };

    ScheduleStats {
        total_work_days,
        total_calendar_days: calendar::work_days_to_calendar_days(start, total_work_days),
        total_work_days_min,
        total_work_days_max,
        total_calendar_days_min: calendar::work_days_to_calendar_days(start, total_work_days_min),
        total_calendar_days_max: calendar::work_days_to_calendar_days(start, total_work_days_max),
        organizational_work_days,
        organizational_loss_pct,
    }
}

fn critical_stages(tasks: &[Task], critical_path: &[String]) -> Vec<CriticalStage> {
    critical_path
        .iter()
        .filter_map(|id| tasks.iter().find(|t| &t.id == id))
        .take(MAX_CRITICAL_STAGES)
        .map(|t| CriticalStage {
            task_id: t.id.clone(),
            title: t.title.clone(),
            reason: cpm::stage_reason(t.kind).to_string(),
        })
        .collect()
}
