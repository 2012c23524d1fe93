//! Water-outage windows
//!
//! Tenants care about one thing: when the water is off. This module folds
//! every outage-causing task into merged spans, once for the shared works
//! (which cut the whole building) and once per riser.

use crate::calendar::map_work_range_to_dates;
use chrono::NaiveDate;
use riserplan_core::{RiserId, ScheduleResult, ScheduledTask};
use serde::Serialize;

/// Contiguous span of working days without water
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutageWindow {
    /// Affected riser; `None` for building-wide shared works
    pub riser_id: Option<RiserId>,
    pub start_work_day: i64,
    /// Exclusive
    pub end_work_day: i64,
    pub start_date: NaiveDate,
    /// Exclusive
    pub end_date: NaiveDate,
}

impl OutageWindow {
    pub fn work_days(&self) -> i64 {
        self.end_work_day - self.start_work_day
    }
}

/// Merge `[start, end)` spans that overlap or touch
fn merge_spans(mut spans: Vec<(i64, i64)>) -> Vec<(i64, i64)> {
    spans.sort_unstable();
    let mut merged: Vec<(i64, i64)> = Vec::with_capacity(spans.len());
    for (start, end) in spans {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}

fn windows_for<'a>(
    result: &ScheduleResult,
    riser_id: Option<&RiserId>,
    tasks: impl Iterator<Item = &'a ScheduledTask>,
) -> Vec<OutageWindow> {
    let spans: Vec<(i64, i64)> = tasks
        .filter(|t| t.task.causes_outage && t.work_days() > 0)
        .map(|t| (t.start_work_day, t.end_work_day))
        .collect();

    merge_spans(spans)
        .into_iter()
        .map(|(start, end)| {
            let (start_date, end_date) = map_work_range_to_dates(result.input.start_date, start, end);
            OutageWindow {
                riser_id: riser_id.cloned(),
                start_work_day: start,
                end_work_day: end,
                start_date,
                end_date,
            }
        })
        .collect()
}

/// Outage windows: shared works first, then each riser in build order
pub fn outage_windows(result: &ScheduleResult) -> Vec<OutageWindow> {
    let mut windows = windows_for(
        result,
        None,
        result.scheduled.iter().filter(|t| t.task.riser_id.is_none()),
    );

    for riser in result.riser_ids() {
        windows.extend(windows_for(
            result,
            Some(&riser),
            result
                .scheduled
                .iter()
                .filter(|t| t.task.riser_id.as_ref() == Some(&riser)),
        ));
    }

    windows
}

/// Total working days without water for one riser, shared works included
pub fn riser_outage_days(windows: &[OutageWindow], riser_id: &str) -> i64 {
    windows
        .iter()
        .filter(|w| w.riser_id.as_deref().map_or(true, |r| r == riser_id))
        .map(OutageWindow::work_days)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate_schedule;
    use pretty_assertions::assert_eq;
    use riserplan_core::ScheduleInput;

    #[test]
    fn spans_merge_when_touching() {
        assert_eq!(
            merge_spans(vec![(8, 12), (1, 3), (3, 4), (24, 25), (12, 13)]),
            vec![(1, 4), (8, 13), (24, 25)]
        );
        assert!(merge_spans(Vec::new()).is_empty());
    }

    #[test]
    fn default_building_outages() {
        let result = generate_schedule(&ScheduleInput::default(), None);
        let windows = outage_windows(&result);

        // basement 1..3 and heat node 3..4 merge into one building-wide cut
        assert_eq!(windows[0].riser_id, None);
        assert_eq!((windows[0].start_work_day, windows[0].end_work_day), (1, 4));

        // K1-P1: install 8..12, test 24..25
        let k1p1: Vec<(i64, i64)> = windows
            .iter()
            .filter(|w| w.riser_id.as_deref() == Some("K1-P1"))
            .map(|w| (w.start_work_day, w.end_work_day))
            .collect();
        assert_eq!(k1p1, vec![(8, 12), (24, 25)]);
        assert_eq!(riser_outage_days(&windows, "K1-P1"), 3 + 4 + 1);
    }

    #[test]
    fn no_outages_without_outage_tasks() {
        let mut input = ScheduleInput::default();
        input.shared_works.basement = false;
        input.shared_works.heat_node = false;
        let result = generate_schedule(&input, None);
        let windows = outage_windows(&result);
        assert!(windows.iter().all(|w| w.riser_id.is_some()));
    }
}
