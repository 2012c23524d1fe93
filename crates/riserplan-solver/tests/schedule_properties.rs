//! Properties every generated schedule must satisfy, across a spread of
//! building shapes and organisational settings.

use pretty_assertions::assert_eq;
use riserplan_core::{
    DurationOverrides, ResourcePool, RestorationStandard, ScheduleInput, ScheduleResult, TaskKind,
    MAX_TASK_DAYS,
};
use riserplan_solver::leveling::booked_pool;
use riserplan_solver::{generate_schedule, pool_utilization, verify};

/// A grid of inputs exercising crews, riser caps and building sizes
fn variants() -> Vec<ScheduleInput> {
    let mut inputs = Vec::new();
    for (entrances, risers, units) in [(1, 1, 12), (2, 2, 80), (3, 2, 150), (4, 3, 400)] {
        for (install, restore, cap) in [(1, 1, 1), (1, 0, 2), (2, 1, 2), (3, 2, 4), (2, 0, 1)] {
            let mut input = ScheduleInput::default();
            input.building.entrances = entrances;
            input.building.risers_per_entrance = risers;
            input.building.units = units;
            input.organization.install_crews = install;
            input.organization.restoration_crews = restore;
            input.organization.max_concurrent_risers = cap;
            inputs.push(input);
        }
    }
    inputs
}

fn day_load(result: &ScheduleResult, pool: ResourcePool, day: i64) -> usize {
    let crews = result.input.organization.restoration_crews;
    result
        .scheduled
        .iter()
        .filter(|t| booked_pool(&t.task, crews) == pool)
        .filter(|t| t.start_work_day <= day && day < t.end_work_day)
        .count()
}

#[test]
fn all_variants_verify_clean() {
    for input in variants() {
        let result = generate_schedule(&input, None);
        assert_eq!(verify(&result), Vec::new(), "{:?}", input.organization);
    }
}

#[test]
fn every_task_is_scheduled_once() {
    for input in variants() {
        let result = generate_schedule(&input, None);
        assert_eq!(result.scheduled.len(), result.tasks.len());
        for task in &result.tasks {
            let count = result.scheduled.iter().filter(|s| s.task.id == task.id).count();
            assert_eq!(count, 1, "{}", task.id);
        }
    }
}

#[test]
fn dependencies_finish_before_successors_start() {
    for input in variants() {
        let result = generate_schedule(&input, None);
        for task in &result.scheduled {
            for dep in &task.task.deps {
                let dep = result.scheduled_task(dep).unwrap();
                assert!(dep.end_work_day <= task.start_work_day, "{} after {}", task.id(), dep.id());
            }
        }
    }
}

#[test]
fn scheduled_order_is_by_start_then_title() {
    let result = generate_schedule(&ScheduleInput::default(), None);
    for pair in result.scheduled.windows(2) {
        let key = |t: &riserplan_core::ScheduledTask| (t.start_work_day, t.task.title.clone());
        assert!(key(&pair[0]) <= key(&pair[1]));
    }
}

#[test]
fn identical_input_gives_identical_output() {
    let mut input = ScheduleInput::default();
    input.building.entrances = 3;
    input.organization.install_crews = 2;
    let overrides = DurationOverrides::new().with("install-K2-P1", 6.0);

    let first = serde_json::to_string(&generate_schedule(&input, Some(&overrides))).unwrap();
    let second = serde_json::to_string(&generate_schedule(&input, Some(&overrides))).unwrap();
    assert_eq!(first, second);
}

#[test]
fn no_restoration_crews_share_installers() {
    let mut input = ScheduleInput::default();
    input.organization.restoration_crews = 0;
    let result = generate_schedule(&input, None);

    assert!(verify(&result).is_empty());
    for day in 0..result.stats.total_work_days {
        assert!(day_load(&result, ResourcePool::Install, day) <= 1, "day {day}");
        assert_eq!(day_load(&result, ResourcePool::Restore, day), 0);
    }
    assert!(result.is_bottleneck("restore-K1-P1"));

    let utilization = pool_utilization(&result);
    let restore = utilization.iter().find(|u| u.pool == ResourcePool::Restore).unwrap();
    assert_eq!(restore.booked_crew_days, 0);
    assert_eq!(restore.utilization_percent, 0.0);
}

#[test]
fn single_riser_at_a_time() {
    let mut input = ScheduleInput::default();
    input.organization.install_crews = 3;
    input.organization.max_concurrent_risers = 1;
    let result = generate_schedule(&input, None);

    assert!(verify(&result).is_empty());
    for day in 0..result.stats.total_work_days {
        let active: std::collections::BTreeSet<&str> = result
            .scheduled
            .iter()
            .filter(|t| t.task.occupies_riser())
            .filter(|t| t.start_work_day <= day && day < t.end_work_day)
            .filter_map(|t| t.task.riser_id.as_deref())
            .collect();
        assert!(active.len() <= 1, "day {day}: {active:?}");
    }
    assert_eq!(result.bottlenecks.len(), 2);
}

#[test]
fn overrides_apply_and_invalid_ones_are_ignored() {
    let input = ScheduleInput::default();
    let base = generate_schedule(&input, None);

    let overrides = DurationOverrides::new()
        .with("install-K1-P1", 6.1)
        .with("test-K1-P1", -2.0)
        .with("org-K1-P1", f64::NAN)
        .with("no-such-task", 9.0);
    let result = generate_schedule(&input, Some(&overrides));

    let install = result.scheduled_task("install-K1-P1").unwrap();
    assert_eq!(install.task.duration_days, 6.0);
    assert_eq!(install.work_days(), 6);
    assert_eq!(
        result.scheduled_task("test-K1-P1").unwrap().task.duration_days,
        base.scheduled_task("test-K1-P1").unwrap().task.duration_days
    );
    assert_eq!(result.stats.total_work_days, base.stats.total_work_days + 2);
    // tasks keep their base durations
    assert_eq!(result.task("install-K1-P1").unwrap().duration_days, 3.5);
    assert!(verify(&result).is_empty());
}

#[test]
fn zero_override_collapses_a_task() {
    let overrides = DurationOverrides::new().with("common-node", 0.0);
    let result = generate_schedule(&ScheduleInput::default(), Some(&overrides));
    let node = result.scheduled_task("common-node").unwrap();
    assert_eq!(node.work_days(), 0);
    assert_eq!(node.start_date, node.end_date);
    assert!(verify(&result).is_empty());
}

#[test]
fn huge_override_is_capped_instead_of_overflowing() {
    let overrides = DurationOverrides::new().with("common-node", 1e19);
    let result = generate_schedule(&ScheduleInput::default(), Some(&overrides));

    let node = result.scheduled_task("common-node").unwrap();
    assert_eq!(node.task.duration_days, MAX_TASK_DAYS);
    assert_eq!(node.work_days(), 10_000);
    assert!(result.stats.total_work_days >= node.end_work_day);
    assert!(result.stats.total_work_days_min <= result.stats.total_work_days_max);
    assert!(result.is_critical("common-node"));
}

#[test]
fn capped_tail_override_still_verifies() {
    let input = ScheduleInput::default();
    let base = generate_schedule(&input, None);
    let overrides = DurationOverrides::new().with("buffer-global", f64::MAX);
    let result = generate_schedule(&input, Some(&overrides));

    let buffer = result.scheduled_task("buffer-global").unwrap();
    let base_buffer = base.scheduled_task("buffer-global").unwrap();
    assert_eq!(buffer.start_work_day, base_buffer.start_work_day);
    assert_eq!(buffer.work_days(), 10_000);
    assert_eq!(result.stats.total_work_days, buffer.end_work_day);
    assert!(verify(&result).is_empty());
}

#[test]
fn zero_buffer_drops_the_buffer_task() {
    let mut input = ScheduleInput::default();
    input.organization.buffer_pct = 0.0;
    let result = generate_schedule(&input, None);

    assert!(result.task("buffer-global").is_none());
    assert_eq!(result.tasks.len(), 19);
    assert_eq!(result.stats.organizational_work_days, 5);
}

#[test]
fn no_water_scope_has_empty_commissioning() {
    let mut input = ScheduleInput::default();
    input.scope.cold_water = false;
    input.scope.hot_water = false;
    input.scope.circulation = false;
    let result = generate_schedule(&input, None);

    for test in result.scheduled.iter().filter(|t| t.task.kind == TaskKind::Test) {
        assert_eq!(test.task.duration_days, 0.0);
        assert_eq!(test.work_days(), 0);
    }
    assert!(verify(&result).is_empty());
}

#[test]
fn extended_restoration_takes_longer() {
    let mut input = ScheduleInput::default();
    input.restoration = RestorationStandard::Extended;
    let extended = generate_schedule(&input, None);
    input.restoration = RestorationStandard::Minimal;
    let minimal = generate_schedule(&input, None);

    assert!(extended.stats.total_work_days >= minimal.stats.total_work_days);
    assert!(extended.stats.total_work_days_max > minimal.stats.total_work_days_max);
}

#[test]
fn stats_band_is_ordered() {
    for input in variants() {
        let stats = generate_schedule(&input, None).stats;
        assert!(stats.total_work_days_min <= stats.total_work_days_max);
        assert!(stats.total_calendar_days_min <= stats.total_calendar_days_max);
        assert!((0..=100).contains(&stats.organizational_loss_pct));
        assert!(stats.total_calendar_days >= stats.total_work_days);
    }
}

#[test]
fn critical_tasks_come_from_the_task_list() {
    for input in variants() {
        let result = generate_schedule(&input, None);
        assert!(!result.critical_task_ids.is_empty());
        assert!(result.critical_task_ids.iter().all(|id| result.task(id).is_some()));
        assert!(result.critical_stages.len() <= 8);
    }
}
