//! Task graph construction
//!
//! Turns a [`ScheduleInput`] into the flat list of tasks the scheduler
//! works on: shared preparation and shared works, a four-step chain per
//! riser (access → install → commissioning → finishing) and a global
//! contingency buffer.
//!
//! Base durations are per riser and scale with the number of apartments
//! each riser serves, clamped so very large risers slow down but never
//! explode. Every duration is rounded to a quarter working day.

use riserplan_core::{
    clamp_finite, ids, round_to_quarter_day, ResourcePool, RiserId, ScheduleInput, Task,
    TaskCategory, TaskKind,
};

/// Preparation, notices and shut-off planning
const PREP_DAYS: f64 = 0.5;
/// Heat node works
const HEAT_NODE_DAYS: f64 = 0.75;
/// Basement works: fixed part plus a share per riser
const BASEMENT_BASE_DAYS: f64 = 0.8;
const BASEMENT_PER_RISER_DAYS: f64 = 0.15;

/// Per-riser durations at the reference load of 8 apartments per riser
const INSTALL_DAYS: f64 = 1.0;
const CIRCULATION_EXTRA_DAYS: f64 = 0.4;
const TEST_DAYS: f64 = 0.25;
const RESTORE_DAYS: f64 = 0.75;

const REFERENCE_UNITS_PER_RISER: f64 = 8.0;
const MIN_LOAD_SCALE: f64 = 0.75;
const MAX_LOAD_SCALE: f64 = 2.5;

/// Tenant-access delay per riser at 0% accessibility, and its cap
const ACCESS_DELAY_DAYS: f64 = 1.2;
const MAX_ACCESS_DELAY_DAYS: f64 = 1.5;

/// Riser ids for every entrance × riser-per-entrance pair
pub fn riser_ids(input: &ScheduleInput) -> Vec<RiserId> {
    let building = &input.building;
    let mut risers = Vec::with_capacity(building.riser_count() as usize);
    for entrance in 1..=building.entrances {
        for riser in 1..=building.risers_per_entrance {
            risers.push(ids::riser(entrance, riser));
        }
    }
    risers
}

/// Scaling factor for per-riser work derived from apartments per riser
pub fn apartment_load_scale(input: &ScheduleInput) -> f64 {
    let risers = input.building.riser_count();
    let units = f64::from(input.building.units);
    let units_per_riser = if risers > 0 {
        (units / f64::from(risers)).round().max(1.0)
    } else {
        units
    };

    clamp_finite(
        units_per_riser / REFERENCE_UNITS_PER_RISER,
        MIN_LOAD_SCALE,
        MAX_LOAD_SCALE,
    )
}

/// Per-riser durations shared by every chain
#[derive(Debug, Clone, Copy, PartialEq)]
struct RiserDurations {
    access: f64,
    install: f64,
    test: f64,
    restore: f64,
}

impl RiserDurations {
    fn for_input(input: &ScheduleInput) -> Self {
        let scale = apartment_load_scale(input);
        let access = clamp_finite(input.accessibility.units_access_pct, 10.0, 100.0) / 100.0;

        let circulation_extra = if input.scope.circulation {
            round_to_quarter_day(CIRCULATION_EXTRA_DAYS * scale)
        } else {
            0.0
        };

        Self {
            access: round_to_quarter_day(clamp_finite(
                (1.0 - access) * ACCESS_DELAY_DAYS,
                0.0,
                MAX_ACCESS_DELAY_DAYS,
            )),
            install: round_to_quarter_day(INSTALL_DAYS * scale) + circulation_extra,
            test: if input.scope.any_water() {
                round_to_quarter_day(TEST_DAYS * scale)
            } else {
                0.0
            },
            restore: round_to_quarter_day(RESTORE_DAYS * scale * input.restoration.factor()),
        }
    }
}

/// Build the full task list for an input.
///
/// The input is expected to be normalised already; the builder never
/// fails. Tasks come out in dependency order: shared works first, then
/// each riser chain, then the buffer.
pub fn build_tasks(input: &ScheduleInput) -> Vec<Task> {
    let risers = riser_ids(input);
    let durations = RiserDurations::for_input(input);
    let mut tasks: Vec<Task> = Vec::with_capacity(4 + risers.len() * 4);

    // Shared works
    tasks.push(
        Task::new(ids::PREP, TaskKind::Org)
            .title("Preparation and organisation (notices, shut-off windows)")
            .duration(PREP_DAYS),
    );

    if input.shared_works.basement {
        tasks.push(
            Task::new(ids::BASEMENT, TaskKind::Install)
                .title("Shared works: basement mains and sectioning")
                .depends_on(ids::PREP)
                .duration(BASEMENT_BASE_DAYS + BASEMENT_PER_RISER_DAYS * risers.len() as f64)
                .outage(),
        );
    }

    if input.shared_works.heat_node {
        tasks.push(
            Task::new(ids::HEAT_NODE, TaskKind::Install)
                .title("Shared works: heat node connections and fittings")
                .depends_on(ids::PREP)
                .duration(HEAT_NODE_DAYS)
                .outage(),
        );
    }

    // Riser chains
    for riser in &risers {
        let org_id = ids::riser_task(TaskKind::Org, riser);
        let install_id = ids::riser_task(TaskKind::Install, riser);
        let test_id = ids::riser_task(TaskKind::Test, riser);

        let mut org = Task::new(org_id.clone(), TaskKind::Org)
            .title(format!("Apartment access arrangements ({})", riser))
            .riser(riser.clone())
            .depends_on(ids::PREP)
            .duration(durations.access);
        if input.shared_works.basement {
            org = org.depends_on(ids::BASEMENT);
        }
        tasks.push(org);

        tasks.push(
            Task::new(install_id.clone(), TaskKind::Install)
                .title(format!("Riser installation and switch-over ({})", riser))
                .riser(riser.clone())
                .depends_on(org_id)
                .duration(durations.install)
                .outage(),
        );

        tasks.push(
            Task::new(test_id.clone(), TaskKind::Test)
                .title(format!("Pressure test, flushing and commissioning ({})", riser))
                .riser(riser.clone())
                .depends_on(install_id)
                .duration(durations.test)
                .outage(),
        );

        tasks.push(
            Task::new(ids::riser_task(TaskKind::Restore, riser), TaskKind::Restore)
                .title(format!("Finishing works ({})", riser))
                .riser(riser.clone())
                .pool(ResourcePool::Restore)
                .depends_on(test_id)
                .duration(durations.restore),
        );
    }

    // Contingency buffer after on-site work is verified
    let base_work: f64 = tasks.iter().map(|t| t.duration_days).sum();
    let buffer_share = clamp_finite(input.organization.buffer_pct, 0.0, 40.0) / 100.0;
    let buffer_days = round_to_quarter_day(base_work * buffer_share);

    if buffer_days > 0.0 {
        let mut buffer = Task::new(ids::BUFFER, TaskKind::Buffer)
            .title("Contingency buffer (leaks, clashes, revisits)")
            .duration(buffer_days);
        buffer.deps = tasks
            .iter()
            .filter(|t| t.category == TaskCategory::Riser && t.kind == TaskKind::Test)
            .map(|t| t.id.clone())
            .collect();
        tasks.push(buffer);
    }

    tracing::debug!(
        risers = risers.len(),
        tasks = tasks.len(),
        buffer_days,
        "built task graph"
    );

    tasks
}
