//! Plain-text Gantt chart
//!
//! One row per task, grouped under "Common works" and then each riser.
//! Every column is one working day, or one five-day week on the week
//! scale. Rows are tagged `CRIT`, `BOTTLENECK` and `WATER OFF`.
//!
//! ## Example Output
//!
//! ```text
//! Schedule from 2025-01-06: 33 working days (1 column = 1 working day)
//!
//! Common works
//!   Preparation and organisation (no...  |=................................|  0-1    CRIT, BOTTLENECK
//!   Shared works: basement mains and...  |.==..............................|  1-3    CRIT, BOTTLENECK, WATER OFF
//! ```

use crate::{task_groups, truncate};
use riserplan_core::{RenderError, Renderer, ScheduleResult, ScheduledTask};
use std::fmt::Write;

/// Working days per column on the week scale
const DAYS_PER_WEEK: i64 = 5;

/// Time resolution of the chart
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GanttScale {
    #[default]
    Days,
    Weeks,
}

impl GanttScale {
    fn days_per_column(self) -> i64 {
        match self {
            GanttScale::Days => 1,
            GanttScale::Weeks => DAYS_PER_WEEK,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            GanttScale::Days => "1 column = 1 working day",
            GanttScale::Weeks => "1 column = 1 week (5 working days)",
        }
    }
}

/// Text Gantt renderer configuration
#[derive(Clone, Debug)]
pub struct GanttRenderer {
    pub scale: GanttScale,
    /// Width of the title column in characters
    pub label_width: usize,
    /// Fill character for task bars
    pub bar_char: char,
    /// Fill character for critical task bars
    pub critical_char: char,
    /// Fill character for empty cells
    pub empty_char: char,
    /// Marker for zero-length tasks
    pub milestone_char: char,
}

impl Default for GanttRenderer {
    fn default() -> Self {
        Self {
            scale: GanttScale::Days,
            label_width: 36,
            bar_char: '#',
            critical_char: '=',
            empty_char: '.',
            milestone_char: '*',
        }
    }
}

impl GanttRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scale(mut self, scale: GanttScale) -> Self {
        self.scale = scale;
        self
    }

    pub fn label_width(mut self, width: usize) -> Self {
        self.label_width = width.max(8);
        self
    }

    /// Number of columns needed for `work_days`
    fn columns(&self, work_days: i64) -> i64 {
        let per = self.scale.days_per_column();
        ((work_days + per - 1) / per).max(1)
    }

    fn bar(&self, task: &ScheduledTask, columns: i64, critical: bool) -> String {
        let per = self.scale.days_per_column();
        let fill = if critical {
            self.critical_char
        } else {
            self.bar_char
        };

        if task.work_days() == 0 {
            let at = task.start_work_day / per;
            return (0..columns)
                .map(|c| if c == at { self.milestone_char } else { self.empty_char })
                .collect();
        }

        (0..columns)
            .map(|c| {
                let col_start = c * per;
                let col_end = col_start + per;
                if task.start_work_day < col_end && col_start < task.end_work_day {
                    fill
                } else {
                    self.empty_char
                }
            })
            .collect()
    }

    fn tags(result: &ScheduleResult, task: &ScheduledTask) -> Vec<&'static str> {
        let mut tags = Vec::new();
        if result.is_critical(task.id()) {
            tags.push("CRIT");
        }
        if result.is_bottleneck(task.id()) {
            tags.push("BOTTLENECK");
        }
        if task.task.causes_outage && task.work_days() > 0 {
            tags.push("WATER OFF");
        }
        tags
    }
}

impl Renderer for GanttRenderer {
    type Output = String;

    fn render(&self, result: &ScheduleResult) -> Result<String, RenderError> {
        if result.scheduled.is_empty() {
            return Err(RenderError::InvalidData("No tasks to render".into()));
        }

        let columns = self.columns(result.stats.total_work_days);
        let span_width = result.stats.total_work_days.to_string().len() * 2 + 1;
        let mut out = String::new();

        writeln!(
            out,
            "Schedule from {}: {} working days ({})",
            result.input.start_date,
            result.stats.total_work_days,
            self.scale.describe()
        )?;

        for group in task_groups(result) {
            writeln!(out)?;
            writeln!(out, "{}", group.label)?;

            for task in group.tasks {
                let label = truncate(&task.task.title, self.label_width);
                let span = format!("{}-{}", task.start_work_day, task.end_work_day);
                let bar = self.bar(task, columns, result.is_critical(task.id()));
                let tags = Self::tags(result, task).join(", ");

                let line = format!(
                    "  {label:<lw$}  |{bar}|  {span:<sw$}  {tags}",
                    lw = self.label_width,
                    sw = span_width
                );
                writeln!(out, "{}", line.trim_end())?;
            }
        }

        Ok(out)
    }
}
