//! # riserplan-render
//!
//! Rendering backends for riser replacement schedules.
//!
//! This crate provides:
//! - A plain-text results summary (`SummaryRenderer`)
//! - A plain-text Gantt chart grouped by riser (`GanttRenderer`)
//! - MermaidJS Gantt output for Markdown and wikis (`MermaidRenderer`)
//!
//! ## Example
//!
//! ```rust
//! use riserplan_core::{Renderer, ScheduleInput};
//! use riserplan_render::{GanttRenderer, GanttScale, MermaidRenderer, SummaryRenderer};
//! use riserplan_solver::generate_schedule;
//!
//! let result = generate_schedule(&ScheduleInput::default(), None);
//!
//! let summary = SummaryRenderer::new().render(&result).unwrap();
//! assert!(summary.contains("working days"));
//!
//! let chart = GanttRenderer::new().scale(GanttScale::Weeks).render(&result).unwrap();
//! assert!(chart.contains("Common works"));
//!
//! let mermaid = MermaidRenderer::new().render(&result).unwrap();
//! assert!(mermaid.starts_with("gantt"));
//! ```

pub mod gantt;
pub mod mermaid;
pub mod summary;

pub use gantt::{GanttRenderer, GanttScale};
pub use mermaid::MermaidRenderer;
pub use summary::SummaryRenderer;

use riserplan_core::{RiserId, ScheduleResult, ScheduledTask};

/// Heading of the shared-works group
pub const COMMON_GROUP: &str = "Common works";

/// Scheduled tasks shown together under one heading
#[derive(Debug, Clone, PartialEq)]
pub struct TaskGroup<'a> {
    pub label: String,
    /// `None` for the shared works
    pub riser_id: Option<RiserId>,
    /// In schedule order (start day, then title)
    pub tasks: Vec<&'a ScheduledTask>,
}

/// Shared works first, then one group per riser in building order.
///
/// Empty groups are left out.
pub fn task_groups(result: &ScheduleResult) -> Vec<TaskGroup<'_>> {
    let mut groups = Vec::new();

    let common: Vec<&ScheduledTask> = result
        .scheduled
        .iter()
        .filter(|t| t.task.riser_id.is_none())
        .collect();
    if !common.is_empty() {
        groups.push(TaskGroup {
            label: COMMON_GROUP.to_string(),
            riser_id: None,
            tasks: common,
        });
    }

    for riser in result.riser_ids() {
        let tasks: Vec<&ScheduledTask> = result
            .scheduled
            .iter()
            .filter(|t| t.task.riser_id.as_ref() == Some(&riser))
            .collect();
        if !tasks.is_empty() {
            groups.push(TaskGroup {
                label: format!("Riser {riser}"),
                riser_id: Some(riser),
                tasks,
            });
        }
    }

    groups
}

/// Cut a label to `max` characters, marking the cut with `...`
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}
