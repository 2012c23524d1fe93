//! MermaidJS Gantt chart renderer
//!
//! Produces a `gantt` block for Markdown, GitHub or wikis. Weekends are
//! excluded so Mermaid counts durations in working days, matching the
//! engine's calendar. Every task is placed at its absolute start date.
//!
//! ## Example Output
//!
//! ```text
//! gantt
//!     title Riser replacement (4 risers)
//!     dateFormat YYYY-MM-DD
//!     excludes weekends
//!
//!     section Common works
//!     Preparation and organisation (notices, shut-off windows) :crit, common_prep, 2025-01-06, 1d
//!
//!     section Riser K1-P1
//!     Riser installation and switch-over (K1-P1) :crit, install_K1_P1, 2025-01-16, 4d
//! ```

use crate::task_groups;
use riserplan_core::{RenderError, Renderer, ScheduleResult, ScheduledTask};
use std::fmt::Write;

/// MermaidJS Gantt chart renderer
#[derive(Clone, Debug)]
pub struct MermaidRenderer {
    /// Chart title; defaults to a description of the building
    pub title: Option<String>,
    /// Whether to group tasks into sections
    pub show_sections: bool,
    /// Whether to mark critical path tasks
    pub show_critical: bool,
}

impl Default for MermaidRenderer {
    fn default() -> Self {
        Self {
            title: None,
            show_sections: true,
            show_critical: true,
        }
    }
}

impl MermaidRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Flat task list without sections
    pub fn no_sections(mut self) -> Self {
        self.show_sections = false;
        self
    }

    /// Disable critical path highlighting
    pub fn no_critical(mut self) -> Self {
        self.show_critical = false;
        self
    }

    /// Mermaid treats `:` `;` and `#` as syntax
    fn sanitize_name(name: &str) -> String {
        name.replace([':', ';'], "-")
            .replace('#', "")
            .replace(['\n', '\r'], " ")
    }

    /// Mermaid ids are alphanumeric with underscores
    fn make_id(task_id: &str) -> String {
        task_id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
            .collect()
    }

    fn format_task_line(&self, result: &ScheduleResult, task: &ScheduledTask) -> String {
        let mut parts: Vec<String> = Vec::new();

        if task.work_days() == 0 {
            parts.push("milestone".into());
        }
        if self.show_critical && result.is_critical(task.id()) {
            parts.push("crit".into());
        }
        parts.push(Self::make_id(task.id()));
        parts.push(task.start_date.format("%Y-%m-%d").to_string());
        parts.push(format!("{}d", task.work_days()));

        format!(
            "{} :{}",
            Self::sanitize_name(&task.task.title),
            parts.join(", ")
        )
    }
}

impl Renderer for MermaidRenderer {
    type Output = String;

    fn render(&self, result: &ScheduleResult) -> Result<String, RenderError> {
        if result.scheduled.is_empty() {
            return Err(RenderError::InvalidData("No tasks to render".into()));
        }

        let title = self.title.clone().unwrap_or_else(|| {
            format!(
                "Riser replacement ({} risers)",
                result.input.building.riser_count()
            )
        });

        let mut out = String::new();
        writeln!(out, "gantt")?;
        writeln!(out, "    title {}", Self::sanitize_name(&title))?;
        writeln!(out, "    dateFormat YYYY-MM-DD")?;
        writeln!(out, "    excludes weekends")?;

        if self.show_sections {
            for group in task_groups(result) {
                writeln!(out)?;
                writeln!(out, "    section {}", Self::sanitize_name(&group.label))?;
                for task in group.tasks {
                    writeln!(out, "    {}", self.format_task_line(result, task))?;
                }
            }
        } else {
            writeln!(out)?;
            for task in &result.scheduled {
                writeln!(out, "    {}", self.format_task_line(result, task))?;
            }
        }

        Ok(out)
    }
}
