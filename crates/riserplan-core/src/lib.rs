//! # riserplan-core
//!
//! Core domain model and traits for the riserplan scheduling engine.
//!
//! This crate provides:
//! - Input types: `ScheduleInput` and its building/scope/organization parts
//! - Work items: `Task`, `ScheduledTask`, `DurationOverrides`
//! - Output types: `ScheduleResult`, `ScheduleStats`, `CriticalStage`
//! - The stable task id scheme (`ids`) and input loading (`io`)
//! - The `Renderer` trait and error types
//!
//! ## Example
//!
//! ```rust
//! use riserplan_core::{ids, ResourcePool, Task, TaskKind};
//!
//! let install = Task::new(ids::riser_task(TaskKind::Install, "K1-P1"), TaskKind::Install)
//!     .title("Install risers (K1-P1)")
//!     .riser("K1-P1")
//!     .depends_on(ids::riser_task(TaskKind::Org, "K1-P1"))
//!     .duration(2.4)
//!     .outage();
//!
//! assert_eq!(install.id, "install-K1-P1");
//! assert_eq!(install.duration_days, 2.5);
//! assert_eq!(install.pool, ResourcePool::Install);
//! ```

pub mod ids;
pub mod io;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

// ============================================================================
// Type Aliases
// ============================================================================

/// Unique identifier for a task (see [`ids`] for the naming scheme)
pub type TaskId = String;

/// Identifier of a riser, `K{entrance}-P{riser}`
pub type RiserId = String;

// ============================================================================
// Numeric helpers
// ============================================================================

/// Longest duration a single task may take, in working days
pub const MAX_TASK_DAYS: f64 = 10_000.0;

/// Round a duration to the nearest quarter working day, never below zero.
pub fn round_to_quarter_day(days: f64) -> f64 {
    (days.max(0.0) * 4.0).round() / 4.0
}

/// Number of whole working days a duration occupies on the timeline,
/// at most [`MAX_TASK_DAYS`].
pub fn whole_days(days: f64) -> i64 {
    days.max(0.0).min(MAX_TASK_DAYS).ceil() as i64
}

/// Clamp a percentage-like value; non-finite input falls to `min`.
pub fn clamp_finite(value: f64, min: f64, max: f64) -> f64 {
    if !value.is_finite() {
        return min;
    }
    value.clamp(min, max)
}

// ============================================================================
// Schedule Input
// ============================================================================

/// Level of finishing works after the risers are replaced
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestorationStandard {
    Minimal,
    #[default]
    Standard,
    Extended,
}

impl RestorationStandard {
    /// Multiplier applied to the per-riser restoration duration
    pub fn factor(self) -> f64 {
        match self {
            RestorationStandard::Minimal => 0.6,
            RestorationStandard::Standard => 1.0,
            RestorationStandard::Extended => 1.6,
        }
    }
}

/// Building geometry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Building {
    /// Number of entrances (staircases)
    pub entrances: u32,
    /// Number of floors
    pub floors: u32,
    /// Risers in each entrance
    pub risers_per_entrance: u32,
    /// Total number of apartments
    pub units: u32,
}

impl Building {
    pub fn riser_count(&self) -> u32 {
        self.entrances.saturating_mul(self.risers_per_entrance)
    }
}

/// Plumbing scope being replaced
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scope {
    pub cold_water: bool,
    pub hot_water: bool,
    pub circulation: bool,
}

impl Scope {
    /// Whether any water installation is in scope (commissioning is needed)
    pub fn any_water(&self) -> bool {
        self.cold_water || self.hot_water || self.circulation
    }
}

/// Shared works done once for the whole building
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SharedWorks {
    /// Basement mains, horizontals and sectioning valves
    pub basement: bool,
    /// Heat node connections and fittings
    pub heat_node: bool,
}

/// Crew counts and site organization
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub install_crews: u32,
    pub restoration_crews: u32,
    /// Cap on risers with an active org/install/test task on the same day
    pub max_concurrent_risers: u32,
    /// Contingency buffer, percent of summed work (0..=40)
    pub buffer_pct: f64,
}

/// Apartment access conditions
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Accessibility {
    /// Share of apartments reachable on the first attempt (10..=100)
    pub units_access_pct: f64,
}

/// All levers an operator controls
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduleInput {
    /// First calendar day of the works
    pub start_date: NaiveDate,
    pub restoration: RestorationStandard,
    pub building: Building,
    pub scope: Scope,
    pub shared_works: SharedWorks,
    pub organization: Organization,
    pub accessibility: Accessibility,
}

impl Default for ScheduleInput {
    /// A typical ten-storey block with two entrances
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap_or_default(),
            restoration: RestorationStandard::Standard,
            building: Building {
                entrances: 2,
                floors: 10,
                risers_per_entrance: 2,
                units: 80,
            },
            scope: Scope {
                cold_water: true,
                hot_water: true,
                circulation: true,
            },
            shared_works: SharedWorks {
                basement: true,
                heat_node: true,
            },
            organization: Organization {
                install_crews: 1,
                restoration_crews: 1,
                max_concurrent_risers: 2,
                buffer_pct: 10.0,
            },
            accessibility: Accessibility {
                units_access_pct: 70.0,
            },
        }
    }
}

impl ScheduleInput {
    /// Set the start date
    pub fn starting(mut self, date: NaiveDate) -> Self {
        self.start_date = date;
        self
    }

    /// Coerce every lever into its valid range.
    ///
    /// Counts get their lower bounds (restoration crews may be zero);
    /// accessibility is clamped to `[10, 100]` and the buffer to `[0, 40]`.
    pub fn normalized(&self) -> Self {
        let mut input = self.clone();

        input.building.entrances = input.building.entrances.max(1);
        input.building.floors = input.building.floors.max(1);
        input.building.risers_per_entrance = input.building.risers_per_entrance.max(1);
        input.building.units = input.building.units.max(1);

        input.organization.install_crews = input.organization.install_crews.max(1);
        input.organization.max_concurrent_risers = input.organization.max_concurrent_risers.max(1);
        input.organization.buffer_pct = clamp_finite(input.organization.buffer_pct, 0.0, 40.0);

        input.accessibility.units_access_pct =
            clamp_finite(input.accessibility.units_access_pct, 10.0, 100.0);

        input
    }
}

// ============================================================================
// Task
// ============================================================================

/// Whether a task belongs to the shared works or to a single riser
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Common,
    Riser,
}

/// What kind of work a task represents
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// Organisation: notices, tenant access, shut-off windows
    Org,
    Install,
    /// Finishing works (walls, tiles, boxing-in)
    Restore,
    /// Pressure test, flushing, commissioning
    Test,
    /// Contingency
    Buffer,
}

impl TaskKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::Org => "org",
            TaskKind::Install => "install",
            TaskKind::Restore => "restore",
            TaskKind::Test => "test",
            TaskKind::Buffer => "buffer",
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Crew pool a task draws from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourcePool {
    Install,
    Restore,
}

impl std::fmt::Display for ResourcePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourcePool::Install => write!(f, "install"),
            ResourcePool::Restore => write!(f, "restore"),
        }
    }
}

/// An atomic unit of work
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,
    /// Human-readable title
    pub title: String,
    pub category: TaskCategory,
    pub kind: TaskKind,
    /// Crew pool the task is booked against
    pub pool: ResourcePool,
    /// Riser this task belongs to, if any
    pub riser_id: Option<RiserId>,
    /// Finish-to-start predecessors
    pub deps: Vec<TaskId>,
    /// Duration in working days (quarter-day resolution)
    pub duration_days: f64,
    /// Water is shut off while the task runs
    pub causes_outage: bool,
}

impl Task {
    /// Create a common task; restore tasks default to the restore pool
    pub fn new(id: impl Into<String>, kind: TaskKind) -> Self {
        let id = id.into();
        Self {
            title: id.clone(),
            id,
            category: TaskCategory::Common,
            kind,
            pool: match kind {
                TaskKind::Restore => ResourcePool::Restore,
                _ => ResourcePool::Install,
            },
            riser_id: None,
            deps: Vec::new(),
            duration_days: 0.0,
            causes_outage: false,
        }
    }

    /// Set the title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Attach the task to a riser
    pub fn riser(mut self, riser_id: impl Into<String>) -> Self {
        self.category = TaskCategory::Riser;
        self.riser_id = Some(riser_id.into());
        self
    }

    /// Override the crew pool
    pub fn pool(mut self, pool: ResourcePool) -> Self {
        self.pool = pool;
        self
    }

    /// Add a finish-to-start dependency
    pub fn depends_on(mut self, predecessor: impl Into<String>) -> Self {
        self.deps.push(predecessor.into());
        self
    }

    /// Set the duration, rounded to a quarter day
    pub fn duration(mut self, days: f64) -> Self {
        self.duration_days = round_to_quarter_day(days).min(MAX_TASK_DAYS);
        self
    }

    /// Mark the task as shutting off water
    pub fn outage(mut self) -> Self {
        self.causes_outage = true;
        self
    }

    /// Riser tasks that make their riser "active" for the concurrency cap
    pub fn occupies_riser(&self) -> bool {
        self.category == TaskCategory::Riser
            && matches!(self.kind, TaskKind::Org | TaskKind::Install | TaskKind::Test)
    }
}

// ============================================================================
// Duration Overrides
// ============================================================================

/// Manual duration edits keyed by task id.
///
/// Only finite, non-negative values are honoured; anything else (and any
/// id without an entry) falls back to the task's base duration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DurationOverrides(BTreeMap<TaskId, Option<f64>>);

impl DurationOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, task_id: impl Into<String>, days: f64) -> Self {
        self.insert(task_id, days);
        self
    }

    pub fn insert(&mut self, task_id: impl Into<String>, days: f64) {
        self.0.insert(task_id.into(), Some(days));
    }

    /// The honoured override for a task id, quarter-day rounded and
    /// capped at [`MAX_TASK_DAYS`]
    pub fn get(&self, task_id: &str) -> Option<f64> {
        match self.0.get(task_id) {
            Some(Some(days)) if days.is_finite() && *days >= 0.0 => {
                Some(round_to_quarter_day(*days).min(MAX_TASK_DAYS))
            }
            _ => None,
        }
    }

    /// Effective duration of a task
    pub fn duration_of(&self, task: &Task) -> f64 {
        self.get(&task.id).unwrap_or(task.duration_days)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ============================================================================
// Schedule (Result)
// ============================================================================

/// A task with computed timing
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduledTask {
    /// The task, with `duration_days` set to the effective duration
    #[serde(flatten)]
    pub task: Task,
    /// First working day (0 = first day of works)
    pub start_work_day: i64,
    /// Working day after the last one (exclusive)
    pub end_work_day: i64,
    pub start_date: NaiveDate,
    /// Calendar day after the task ends (exclusive)
    pub end_date: NaiveDate,
}

impl ScheduledTask {
    pub fn id(&self) -> &str {
        &self.task.id
    }

    /// Whole working days occupied on the timeline
    pub fn work_days(&self) -> i64 {
        self.end_work_day - self.start_work_day
    }
}

/// Aggregate summary
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleStats {
    pub total_work_days: i64,
    pub total_calendar_days: i64,
    /// Summed whole-day durations minus 10%
    pub total_work_days_min: i64,
    /// Summed whole-day durations plus 25%
    pub total_work_days_max: i64,
    pub total_calendar_days_min: i64,
    pub total_calendar_days_max: i64,
    /// Working days spent on organisation and contingency
    pub organizational_work_days: i64,
    /// `organizational_work_days` as a share of summed work (0..=100)
    pub organizational_loss_pct: i64,
}

/// A human-facing critical path entry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CriticalStage {
    pub task_id: TaskId,
    pub title: String,
    pub reason: String,
}

/// Full engine output
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResult {
    /// Normalised input the schedule was computed from
    pub input: ScheduleInput,
    /// Tasks as built, with base durations
    pub tasks: Vec<Task>,
    /// Scheduled tasks ordered by start day, then title
    pub scheduled: Vec<ScheduledTask>,
    pub stats: ScheduleStats,
    pub critical_stages: Vec<CriticalStage>,
    pub critical_task_ids: Vec<TaskId>,
    pub bottlenecks: Vec<String>,
    pub bottleneck_task_ids: Vec<TaskId>,
}

impl ScheduleResult {
    /// Look up a scheduled task by id
    pub fn scheduled_task(&self, id: &str) -> Option<&ScheduledTask> {
        self.scheduled.iter().find(|t| t.task.id == id)
    }

    /// Look up a built task by id
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn is_critical(&self, id: &str) -> bool {
        self.critical_task_ids.iter().any(|c| c == id)
    }

    pub fn is_bottleneck(&self, id: &str) -> bool {
        self.bottleneck_task_ids.iter().any(|b| b == id)
    }

    /// Riser ids in the order the builder emitted them
    pub fn riser_ids(&self) -> Vec<RiserId> {
        let mut risers: Vec<RiserId> = Vec::new();
        for task in &self.tasks {
            if let Some(riser) = &task.riser_id {
                if !risers.contains(riser) {
                    risers.push(riser.clone());
                }
            }
        }
        risers
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Output rendering
pub trait Renderer {
    type Output;

    /// Render a schedule to the output format
    fn render(&self, result: &ScheduleResult) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<std::fmt::Error> for RenderError {
    fn from(err: std::fmt::Error) -> Self {
        RenderError::Format(err.to_string())
    }
}

/// Error loading an input or overrides file
#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Could not write TOML: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported input format: {0} (expected .toml or .json)")]
    UnsupportedFormat(String),
}

// ============================================================================
// Tests
// ============================================================================
