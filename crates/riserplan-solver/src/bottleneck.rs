//! Bottleneck detection
//!
//! Flags organisational settings that throttle the schedule and the tasks
//! each one holds back. Rules are checked in a fixed order and task ids
//! are reported once, in first-seen order.

use riserplan_core::{ResourcePool, ScheduleInput, Task, TaskCategory, TaskId, TaskKind};

/// Accessibility below this percentage makes tenant access a bottleneck
pub const ACCESS_BOTTLENECK_PCT: f64 = 80.0;

/// Detected bottlenecks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bottlenecks {
    /// One message per triggered rule
    pub messages: Vec<String>,
    /// Tasks affected by any rule, de-duplicated
    pub task_ids: Vec<TaskId>,
}

struct Rule {
    triggered: bool,
    message: &'static str,
    affects: fn(&Task) -> bool,
}

fn rules(input: &ScheduleInput) -> [Rule; 4] {
    let org = &input.organization;
    [
        Rule {
            triggered: org.max_concurrent_risers <= 1,
            message: "Riser parallelism limited to 1 (sectional works)",
            affects: |t| {
                t.category == TaskCategory::Riser
                    && matches!(t.kind, TaskKind::Install | TaskKind::Test)
            },
        },
        Rule {
            triggered: org.install_crews <= 1,
            message: "Only 1 installation crew (install and test work queue up)",
            affects: |t| t.pool == ResourcePool::Install,
        },
        Rule {
            triggered: org.restoration_crews == 0,
            message: "No restoration crews (finishing works take installation crew time)",
            affects: |t| t.kind == TaskKind::Restore,
        },
        Rule {
            triggered: input.accessibility.units_access_pct < ACCESS_BOTTLENECK_PCT,
            message: "Apartment accessibility below 80% (tenant access is the choke point)",
            affects: |t| t.kind == TaskKind::Org,
        },
    ]
}

/// Evaluate every rule against a normalised input and its tasks
pub fn detect(input: &ScheduleInput, tasks: &[Task]) -> Bottlenecks {
    let mut found = Bottlenecks::default();

    for rule in rules(input).iter().filter(|r| r.triggered) {
        found.messages.push(rule.message.to_string());
        for task in tasks.iter().filter(|t| (rule.affects)(t)) {
            if !found.task_ids.contains(&task.id) {
                found.task_ids.push(task.id.clone());
            }
        }
    }

    found
}
