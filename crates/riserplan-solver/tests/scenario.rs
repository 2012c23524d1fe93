//! Reference building scenario
//!
//! Two entrances, two risers each, ten floors, 80 apartments, full water
//! scope, both shared works, one crew of each kind, at most two risers at
//! once, 10% buffer and 70% of apartments reachable on the first visit.
//! Works start on Monday 2025-01-06.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use riserplan_core::{ScheduleInput, ScheduleResult};
use riserplan_solver::{generate_schedule, verify};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn reference() -> ScheduleResult {
    generate_schedule(&ScheduleInput::default(), None)
}

fn window(result: &ScheduleResult, id: &str) -> (i64, i64) {
    let task = result
        .scheduled_task(id)
        .unwrap_or_else(|| panic!("missing task {id}"));
    (task.start_work_day, task.end_work_day)
}

#[test]
fn reference_task_list() {
    let result = reference();
    assert_eq!(result.tasks.len(), 20);
    assert_eq!(result.scheduled.len(), 20);
    assert_eq!(result.riser_ids(), vec!["K1-P1", "K1-P2", "K2-P1", "K2-P2"]);
}

#[test]
fn reference_shared_works() {
    let result = reference();
    assert_eq!(window(&result, "common-prep"), (0, 1));
    assert_eq!(window(&result, "common-basement"), (1, 3));
    // one installation crew: the heat node waits for the basement
    assert_eq!(window(&result, "common-node"), (3, 4));
}

#[test]
fn reference_riser_chains() {
    let result = reference();

    let expected = [
        ("org-K1-P1", (4, 5)),
        ("org-K1-P2", (5, 6)),
        ("org-K2-P1", (6, 7)),
        ("org-K2-P2", (7, 8)),
        ("install-K1-P1", (8, 12)),
        ("install-K1-P2", (12, 16)),
        ("install-K2-P1", (16, 20)),
        ("install-K2-P2", (20, 24)),
        ("test-K1-P1", (24, 25)),
        ("test-K1-P2", (25, 26)),
        ("test-K2-P1", (26, 27)),
        ("test-K2-P2", (27, 28)),
        ("restore-K1-P1", (25, 27)),
        ("restore-K1-P2", (27, 29)),
        ("restore-K2-P1", (29, 31)),
        ("restore-K2-P2", (31, 33)),
        ("buffer-global", (28, 31)),
    ];

    for (id, span) in expected {
        assert_eq!(window(&result, id), span, "{id}");
    }
}

#[test]
fn reference_dates() {
    let result = reference();
    let install = result.scheduled_task("install-K1-P1").unwrap();

    // working day 8 is Thursday of the second week
    assert_eq!(install.start_date, date(2025, 1, 16));
    assert_eq!(install.end_date, date(2025, 1, 22));

    let prep = result.scheduled_task("common-prep").unwrap();
    assert_eq!(prep.start_date, date(2025, 1, 6));
    assert_eq!(prep.end_date, date(2025, 1, 7));
}

#[test]
fn reference_stats() {
    let stats = reference().stats;
    assert_eq!(stats.total_work_days, 33);
    assert_eq!(stats.total_calendar_days, 45);
    assert_eq!(stats.total_work_days_min, 35);
    assert_eq!(stats.total_work_days_max, 49);
    assert_eq!(stats.organizational_work_days, 8);
    assert_eq!(stats.organizational_loss_pct, 21);
    assert!(stats.total_calendar_days_min <= stats.total_calendar_days_max);
}

#[test]
fn reference_critical_path() {
    let result = reference();
    assert_eq!(
        result.critical_task_ids,
        vec![
            "common-prep",
            "common-basement",
            "org-K1-P1",
            "org-K1-P2",
            "org-K2-P1",
            "org-K2-P2",
            "install-K1-P1",
            "install-K1-P2",
            "install-K2-P1",
            "install-K2-P2",
            "test-K1-P1",
            "test-K1-P2",
            "test-K2-P1",
            "test-K2-P2",
            "buffer-global",
        ]
    );

    let stages: Vec<&str> = result
        .critical_stages
        .iter()
        .map(|s| s.task_id.as_str())
        .collect();
    assert_eq!(
        stages,
        vec![
            "common-prep",
            "common-basement",
            "org-K1-P1",
            "org-K1-P2",
            "org-K2-P1",
            "org-K2-P2",
            "install-K1-P1",
            "install-K1-P2",
        ]
    );
    assert!(!result.is_critical("common-node"));
    assert!(!result.is_critical("restore-K1-P1"));
}

#[test]
fn reference_bottlenecks() {
    let result = reference();
    assert_eq!(result.bottlenecks.len(), 2);
    assert!(result.is_bottleneck("install-K2-P2"));
    assert!(result.is_bottleneck("org-K1-P1"));
    assert!(!result.is_bottleneck("restore-K1-P1"));
}

#[test]
fn reference_schedule_is_valid() {
    assert_eq!(verify(&reference()), Vec::new());
}

#[test]
fn more_crews_shorten_the_schedule() {
    let mut input = ScheduleInput::default();
    input.organization.install_crews = 2;
    input.organization.restoration_crews = 2;
    let faster = generate_schedule(&input, None);

    assert!(faster.stats.total_work_days < reference().stats.total_work_days);
    assert!(verify(&faster).is_empty());

    // two crews let basement and heat node run side by side after prep
    assert_eq!(window(&faster, "common-basement").0, 1);
    assert_eq!(window(&faster, "common-node").0, 1);
}
