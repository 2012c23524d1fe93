//! Resource-Constrained Scheduling
//!
//! Greedy list scheduling in topological order. Each task is placed in
//! the first window of whole working days, at or after its dependencies
//! finish, where:
//!
//! - its crew pool has a free crew on every day of the window, and
//! - for riser org/install/test work, fewer than `max_concurrent_risers`
//!   risers are already active on every day of the window.
//!
//! Placements are never revisited, so the makespan is not guaranteed
//! minimal, but every hard constraint holds and the result is
//! reproducible for identical input.

use crate::calendar;
use crate::dag::topo_sort;
use riserplan_core::{
    whole_days, DurationOverrides, ResourcePool, RiserId, ScheduleInput, ScheduleResult,
    ScheduledTask, Task, TaskKind,
};
use std::collections::HashMap;

/// Slot searches give up after this many working days
pub const MAX_HORIZON_DAYS: i64 = 10_000;

/// Per-day crew occupancy of one pool
#[derive(Debug, Clone, PartialEq)]
pub struct PoolTimeline {
    pub pool: ResourcePool,
    /// Crews available each day
    pub capacity: u32,
    /// Crews booked, indexed by working day
    pub usage: Vec<u32>,
}

impl PoolTimeline {
    pub fn new(pool: ResourcePool, capacity: u32) -> Self {
        Self {
            pool,
            capacity,
            usage: Vec::new(),
        }
    }

    /// Crews booked on a working day
    pub fn usage_on(&self, day: i64) -> u32 {
        usize::try_from(day)
            .ok()
            .and_then(|d| self.usage.get(d).copied())
            .unwrap_or(0)
    }

    /// Whether one more crew fits on every day of `[start, end)`
    pub fn has_room(&self, start: i64, end: i64) -> bool {
        (start..end).all(|day| self.usage_on(day) < self.capacity)
    }

    /// Book one crew for every day of `[start, end)`
    pub fn add_usage(&mut self, start: i64, end: i64) {
        if end <= start || start < 0 {
            return;
        }
        let end = end as usize;
        if self.usage.len() < end {
            self.usage.resize(end, 0);
        }
        for day in start as usize..end {
            self.usage[day] += 1;
        }
    }

    /// Days on which more crews are booked than available
    pub fn overallocated_days(&self) -> Vec<i64> {
        self.usage
            .iter()
            .enumerate()
            .filter(|(_, &used)| used > self.capacity)
            .map(|(day, _)| day as i64)
            .collect()
    }

    /// Highest daily occupancy
    pub fn peak_usage(&self) -> u32 {
        self.usage.iter().copied().max().unwrap_or(0)
    }

    /// Sum of booked crew-days
    pub fn booked_crew_days(&self) -> u64 {
        self.usage.iter().map(|&u| u64::from(u)).sum()
    }

    /// Days with at least one crew booked
    pub fn busy_days(&self) -> i64 {
        self.usage.iter().filter(|&&u| u > 0).count() as i64
    }
}

/// Per-riser activity used only for the concurrency cap
#[derive(Debug, Clone, Default)]
struct RiserActivity {
    /// Number of active risers per working day
    per_day: Vec<u32>,
    active: HashMap<RiserId, Vec<bool>>,
}

impl RiserActivity {
    fn active_on(&self, day: i64) -> u32 {
        usize::try_from(day)
            .ok()
            .and_then(|d| self.per_day.get(d).copied())
            .unwrap_or(0)
    }

    fn has_room(&self, start: i64, end: i64, cap: u32) -> bool {
        (start..end).all(|day| self.active_on(day) < cap)
    }

    /// Mark a riser active over `[start, end)`; a riser counts once per day
    fn mark(&mut self, riser: &str, start: i64, end: i64) {
        if end <= start || start < 0 {
            return;
        }
        let end = end as usize;
        if self.per_day.len() < end {
            self.per_day.resize(end, 0);
        }
        let days = self.active.entry(riser.to_string()).or_default();
        if days.len() < end {
            days.resize(end, false);
        }
        for day in start as usize..end {
            if !days[day] {
                days[day] = true;
                self.per_day[day] += 1;
            }
        }
    }
}

/// Pool a task is actually booked against.
///
/// Finishing work falls back to the install crews when there are no
/// restoration crews.
pub fn booked_pool(task: &Task, restoration_crews: u32) -> ResourcePool {
    match task.pool {
        ResourcePool::Restore if restoration_crews == 0 => ResourcePool::Install,
        pool => pool,
    }
}

/// Working arrays owned by a single scheduling run
struct Leveler {
    install: PoolTimeline,
    restore: PoolTimeline,
    risers: RiserActivity,
    restoration_crews: u32,
    max_concurrent_risers: u32,
}

impl Leveler {
    fn new(input: &ScheduleInput) -> Self {
        let org = &input.organization;
        Self {
            install: PoolTimeline::new(ResourcePool::Install, org.install_crews.max(1)),
            restore: PoolTimeline::new(ResourcePool::Restore, org.restoration_crews),
            risers: RiserActivity::default(),
            restoration_crews: org.restoration_crews,
            max_concurrent_risers: org.max_concurrent_risers.max(1),
        }
    }

    fn timeline(&self, task: &Task) -> &PoolTimeline {
        match booked_pool(task, self.restoration_crews) {
            ResourcePool::Install => &self.install,
            ResourcePool::Restore => &self.restore,
        }
    }

    fn timeline_mut(&mut self, task: &Task) -> &mut PoolTimeline {
        match booked_pool(task, self.restoration_crews) {
            ResourcePool::Install => &mut self.install,
            ResourcePool::Restore => &mut self.restore,
        }
    }

    /// First start day at or after `earliest` where the task fits
    fn find_available_slot(&self, task: &Task, earliest: i64, days: i64) -> Option<i64> {
        let timeline = self.timeline(task);
        let riser_bound = task.occupies_riser();

        (earliest.max(0)..MAX_HORIZON_DAYS).find(|&start| {
            let end = start.saturating_add(days);
            (!riser_bound || self.risers.has_room(start, end, self.max_concurrent_risers))
                && timeline.has_room(start, end)
        })
    }

    fn book(&mut self, task: &Task, start: i64, end: i64) {
        self.timeline_mut(task).add_usage(start, end);
        if task.occupies_riser() {
            if let Some(riser) = &task.riser_id {
                self.risers.mark(riser, start, end);
            }
        }
    }
}

/// Schedule tasks under crew capacity and the riser concurrency cap.
///
/// Returns one [`ScheduledTask`] per input task, carrying the effective
/// (override-aware) duration, ordered by start day and then title.
pub fn schedule(
    input: &ScheduleInput,
    tasks: &[Task],
    overrides: &DurationOverrides,
) -> Vec<ScheduledTask> {
    let sequence = topo_sort(tasks);
    let mut leveler = Leveler::new(input);
    let mut placements: HashMap<&str, (i64, i64)> = HashMap::new();

    for task in sequence.tasks() {
        let days = whole_days(overrides.duration_of(task));
        let earliest = task
            .deps
            .iter()
            .filter_map(|dep| placements.get(dep.as_str()).map(|&(_, end)| end))
            .max()
            .unwrap_or(0);

        let start = leveler
            .find_available_slot(task, earliest, days)
            .unwrap_or_else(|| {
                tracing::warn!(
                    task = %task.id,
                    earliest,
                    "no feasible slot within {} working days; placing at dependency finish",
                    MAX_HORIZON_DAYS
                );
                earliest
            });
        let end = start.saturating_add(days);

        leveler.book(task, start, end);
        placements.insert(task.id.as_str(), (start, end));
    }

    let mut scheduled: Vec<ScheduledTask> = tasks
        .iter()
        .map(|task| {
            let duration = overrides.duration_of(task);
            let (start, end) = placements
                .get(task.id.as_str())
                .copied()
                .unwrap_or((0, whole_days(duration)));
            let (start_date, end_date) =
                calendar::map_work_range_to_dates(input.start_date, start, end);

            let mut task = task.clone();
            task.duration_days = duration;
            ScheduledTask {
                task,
                start_work_day: start,
                end_work_day: end,
                start_date,
                end_date,
            }
        })
        .collect();

    scheduled.sort_by(|a, b| {
        a.start_work_day
            .cmp(&b.start_work_day)
            .then_with(|| a.task.title.cmp(&b.task.title))
    });

    tracing::debug!(
        tasks = scheduled.len(),
        makespan = scheduled.iter().map(|t| t.end_work_day).max().unwrap_or(0),
        degraded = sequence.is_degraded(),
        "leveled schedule"
    );

    scheduled
}

/// Rebuild both pool timelines from a finished schedule
pub fn pool_timelines(result: &ScheduleResult) -> [PoolTimeline; 2] {
    let org = &result.input.organization;
    let mut install = PoolTimeline::new(ResourcePool::Install, org.install_crews);
    let mut restore = PoolTimeline::new(ResourcePool::Restore, org.restoration_crews);

    for scheduled in &result.scheduled {
        let timeline = match booked_pool(&scheduled.task, org.restoration_crews) {
            ResourcePool::Install => &mut install,
            ResourcePool::Restore => &mut restore,
        };
        timeline.add_usage(scheduled.start_work_day, scheduled.end_work_day);
    }

    [install, restore]
}

/// Utilization statistics for a single crew pool
#[derive(Debug, Clone, PartialEq)]
pub struct PoolUtilization {
    pub pool: ResourcePool,
    /// Crews in the pool
    pub capacity: u32,
    /// Sum of daily bookings (in crew-days)
    pub booked_crew_days: u64,
    /// Number of days with any booking
    pub busy_days: i64,
    /// Peak daily bookings
    pub peak_usage: u32,
    /// Booked crew-days over available crew-days across the makespan (0-100)
    pub utilization_percent: f64,
}

/// Calculate crew utilization per pool for a schedule
pub fn pool_utilization(result: &ScheduleResult) -> Vec<PoolUtilization> {
    let makespan = result.stats.total_work_days;

    pool_timelines(result)
        .into_iter()
        .map(|timeline| {
            let available = f64::from(timeline.capacity) * makespan as f64;
            let booked = timeline.booked_crew_days();
            PoolUtilization {
                pool: timeline.pool,
                capacity: timeline.capacity,
                booked_crew_days: booked,
                busy_days: timeline.busy_days(),
                peak_usage: timeline.peak_usage(),
                utilization_percent: if available > 0.0 {
                    booked as f64 / available * 100.0
                } else {
                    0.0
                },
            }
        })
        .collect()
}

/// Task kinds whose scheduled windows count as organisational time
pub fn is_organizational(kind: TaskKind) -> bool {
    matches!(kind, TaskKind::Org | TaskKind::Buffer)
}
