//! Schedule verification
//!
//! Re-checks a finished schedule against the constraints it was built
//! under. An empty list means the schedule is valid:
//!
//! 1. Every window is well-formed (start >= 0, end >= start)
//! 2. No task starts before a known dependency ends
//! 3. No pool books more crews than it has on any day
//! 4. No day has more active risers than allowed
//! 5. Calendar dates match the working-day windows

use crate::calendar::map_work_range_to_dates;
use crate::leveling::pool_timelines;
use chrono::NaiveDate;
use riserplan_core::{ResourcePool, ScheduleResult, TaskId};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use thiserror::Error;

/// A broken constraint in a produced schedule
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("Task '{task}' has an invalid window [{start}, {end})")]
    InvalidWindow { task: TaskId, start: i64, end: i64 },

    #[error("Task '{task}' starts on day {start} before '{dependency}' ends on day {dependency_end}")]
    DependencyOrder {
        task: TaskId,
        dependency: TaskId,
        start: i64,
        dependency_end: i64,
    },

    #[error("{pool} pool books {booked} crews on day {day} but has {capacity}")]
    PoolOverbooked {
        pool: ResourcePool,
        day: i64,
        booked: u32,
        capacity: u32,
    },

    #[error("{active} risers are active on day {day}, limit is {limit}")]
    RiserLimitExceeded { day: i64, active: usize, limit: u32 },

    #[error("Task '{task}' is dated {start_date}..{end_date}, expected {expected_start}..{expected_end}")]
    DateMismatch {
        task: TaskId,
        start_date: NaiveDate,
        end_date: NaiveDate,
        expected_start: NaiveDate,
        expected_end: NaiveDate,
    },
}

/// Check every constraint; violations come out grouped by check
pub fn verify(result: &ScheduleResult) -> Vec<Violation> {
    let mut violations = Vec::new();

    check_windows(result, &mut violations);
    check_dependencies(result, &mut violations);
    check_pools(result, &mut violations);
    check_riser_limit(result, &mut violations);
    check_dates(result, &mut violations);

    if !violations.is_empty() {
        tracing::warn!(count = violations.len(), "schedule has constraint violations");
    }
    violations
}

fn check_windows(result: &ScheduleResult, out: &mut Vec<Violation>) {
    for t in &result.scheduled {
        if t.start_work_day < 0 || t.end_work_day < t.start_work_day {
            out.push(Violation::InvalidWindow {
                task: t.task.id.clone(),
                start: t.start_work_day,
                end: t.end_work_day,
            });
        }
    }
}

fn check_dependencies(result: &ScheduleResult, out: &mut Vec<Violation>) {
    let ends: HashMap<&str, i64> = result
        .scheduled
        .iter()
        .map(|t| (t.task.id.as_str(), t.end_work_day))
        .collect();

    for t in &result.scheduled {
        for dep in &t.task.deps {
            if let Some(&dependency_end) = ends.get(dep.as_str()) {
                if t.start_work_day < dependency_end {
                    out.push(Violation::DependencyOrder {
                        task: t.task.id.clone(),
                        dependency: dep.clone(),
                        start: t.start_work_day,
                        dependency_end,
                    });
                }
            }
        }
    }
}

fn check_pools(result: &ScheduleResult, out: &mut Vec<Violation>) {
    for timeline in pool_timelines(result) {
        for day in timeline.overallocated_days() {
            out.push(Violation::PoolOverbooked {
                pool: timeline.pool,
                day,
                booked: timeline.usage_on(day),
                capacity: timeline.capacity,
            });
        }
    }
}

fn check_riser_limit(result: &ScheduleResult, out: &mut Vec<Violation>) {
    let limit = result.input.organization.max_concurrent_risers.max(1);
    let mut active: BTreeMap<i64, BTreeSet<&str>> = BTreeMap::new();

    for t in result.scheduled.iter().filter(|t| t.task.occupies_riser()) {
        if let Some(riser) = t.task.riser_id.as_deref() {
            for day in t.start_work_day.max(0)..t.end_work_day {
                active.entry(day).or_default().insert(riser);
            }
        }
    }

    for (day, risers) in active {
        if risers.len() > limit as usize {
            out.push(Violation::RiserLimitExceeded {
                day,
                active: risers.len(),
                limit,
            });
        }
    }
}

fn check_dates(result: &ScheduleResult, out: &mut Vec<Violation>) {
    let start = result.input.start_date;
    for t in &result.scheduled {
        let (expected_start, expected_end) =
            map_work_range_to_dates(start, t.start_work_day, t.end_work_day);
        if t.start_date != expected_start || t.end_date != expected_end {
            out.push(Violation::DateMismatch {
                task: t.task.id.clone(),
                start_date: t.start_date,
                end_date: t.end_date,
                expected_start,
                expected_end,
            });
        }
    }
}
