//! Plain-text results summary
//!
//! ## Example Output
//!
//! ```text
//! Riser replacement schedule
//! ==========================
//! Start date:       2025-01-06
//! Risers:           4 (2 entrances x 2)
//! Duration:         33 working days / 45 calendar days
//! Range:            35-49 working days (49-67 calendar days)
//! Organisational:   8 working days (21% of work)
//!
//! Critical stages
//!   1. Preparation and organisation (notices, shut-off windows)
//!      Tenant access is blocking: ...
//! ```

use riserplan_core::{RenderError, Renderer, ScheduleResult};
use riserplan_solver::{outage_windows, pool_utilization};
use std::fmt::Write;

/// Text summary of a schedule
#[derive(Clone, Debug)]
pub struct SummaryRenderer {
    /// Include the critical stages list
    pub show_critical: bool,
    /// Include bottleneck messages
    pub show_bottlenecks: bool,
    /// Include per-pool crew utilisation
    pub show_utilization: bool,
    /// Include water-outage totals per riser
    pub show_outages: bool,
}

impl Default for SummaryRenderer {
    fn default() -> Self {
        Self {
            show_critical: true,
            show_bottlenecks: true,
            show_utilization: true,
            show_outages: true,
        }
    }
}

impl SummaryRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the headline figures
    pub fn compact(mut self) -> Self {
        self.show_critical = false;
        self.show_bottlenecks = false;
        self.show_utilization = false;
        self.show_outages = false;
        self
    }

    pub fn no_utilization(mut self) -> Self {
        self.show_utilization = false;
        self
    }

    pub fn no_outages(mut self) -> Self {
        self.show_outages = false;
        self
    }

    fn write_headline(out: &mut String, result: &ScheduleResult) -> std::fmt::Result {
        let stats = &result.stats;
        let building = &result.input.building;

        writeln!(out, "Riser replacement schedule")?;
        writeln!(out, "==========================")?;
        writeln!(out, "Start date:       {}", result.input.start_date)?;
        writeln!(
            out,
            "Risers:           {} ({} entrances x {})",
            building.riser_count(),
            building.entrances,
            building.risers_per_entrance
        )?;
        writeln!(
            out,
            "Duration:         {} working days / {} calendar days",
            stats.total_work_days, stats.total_calendar_days
        )?;
        writeln!(
            out,
            "Range:            {}-{} working days ({}-{} calendar days)",
            stats.total_work_days_min,
            stats.total_work_days_max,
            stats.total_calendar_days_min,
            stats.total_calendar_days_max
        )?;
        writeln!(
            out,
            "Organisational:   {} working days ({}% of work)",
            stats.organizational_work_days, stats.organizational_loss_pct
        )
    }

    fn write_critical(out: &mut String, result: &ScheduleResult) -> std::fmt::Result {
        writeln!(out)?;
        writeln!(out, "Critical stages")?;
        if result.critical_stages.is_empty() {
            return writeln!(out, "  (none)");
        }
        for (i, stage) in result.critical_stages.iter().enumerate() {
            writeln!(out, "  {}. {}", i + 1, stage.title)?;
            writeln!(out, "     {}", stage.reason)?;
        }
        let hidden = result
            .critical_task_ids
            .len()
            .saturating_sub(result.critical_stages.len());
        if hidden > 0 {
            writeln!(out, "  ... and {hidden} more critical tasks")?;
        }
        Ok(())
    }

    fn write_bottlenecks(out: &mut String, result: &ScheduleResult) -> std::fmt::Result {
        writeln!(out)?;
        writeln!(out, "Bottlenecks")?;
        if result.bottlenecks.is_empty() {
            return writeln!(out, "  (none)");
        }
        for message in &result.bottlenecks {
            writeln!(out, "  - {message}")?;
        }
        Ok(())
    }

    fn write_utilization(out: &mut String, result: &ScheduleResult) -> std::fmt::Result {
        writeln!(out)?;
        writeln!(out, "Crew utilisation")?;
        for pool in pool_utilization(result) {
            writeln!(
                out,
                "  {:<8} {} crew(s), {} crew-days booked, peak {}, {:.0}%",
                pool.pool.to_string(),
                pool.capacity,
                pool.booked_crew_days,
                pool.peak_usage,
                pool.utilization_percent
            )?;
        }
        Ok(())
    }

    fn write_outages(out: &mut String, result: &ScheduleResult) -> std::fmt::Result {
        let windows = outage_windows(result);
        writeln!(out)?;
        writeln!(out, "Water outages (working days)")?;

        let shared: i64 = windows
            .iter()
            .filter(|w| w.riser_id.is_none())
            .map(|w| w.work_days())
            .sum();
        if shared > 0 {
            writeln!(out, "  whole building: {shared}")?;
        }
        for riser in result.riser_ids() {
            let days: i64 = windows
                .iter()
                .filter(|w| w.riser_id.as_ref() == Some(&riser))
                .map(|w| w.work_days())
                .sum();
            writeln!(out, "  {riser}: {days}")?;
        }
        Ok(())
    }
}

impl Renderer for SummaryRenderer {
    type Output = String;

    fn render(&self, result: &ScheduleResult) -> Result<String, RenderError> {
        let mut out = String::new();

        Self::write_headline(&mut out, result)?;
        if self.show_critical {
            Self::write_critical(&mut out, result)?;
        }
        if self.show_bottlenecks {
            Self::write_bottlenecks(&mut out, result)?;
        }
        if self.show_utilization {
            Self::write_utilization(&mut out, result)?;
        }
        if self.show_outages {
            Self::write_outages(&mut out, result)?;
        }

        Ok(out)
    }
}
