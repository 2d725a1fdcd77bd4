//! Plain-text rendering of the derived views.
//!
//! Each panel is a `Display` wrapper over a store snapshot, so binaries print them directly and
//! tests compare strings.

use crate::status::ActionAffordance;
use crate::store::Store;
use crate::views::{appointment_rows, scale_day_bars, summary_cards};
use std::fmt;

/// Pixels per character cell when drawing day bars.
const PIXELS_PER_CELL: u32 = 2;

/// Banner for the store's error slot. Renders nothing when the slot is empty.
pub struct ErrorBanner<'a>(pub &'a Store);

impl fmt::Display for ErrorBanner<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.error() {
            Some(message) => writeln!(f, "Error: {message}"),
            None => Ok(()),
        }
    }
}

pub struct PatientsPanel<'a>(pub &'a Store);

impl fmt::Display for PatientsPanel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Patients")?;
        if self.0.patients().is_empty() {
            return writeln!(f, "  No patients yet.");
        }
        for p in self.0.patients() {
            writeln!(f, "  #{} — {}", p.id, p.name)?;
        }
        Ok(())
    }
}

pub struct AppointmentsPanel<'a>(pub &'a Store);

fn action_cell(affordance: &ActionAffordance) -> String {
    if affordance.enabled {
        format!("[{}]", affordance.action.label())
    } else {
        format!("({})", affordance.action.label())
    }
}

impl fmt::Display for AppointmentsPanel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Appointments")?;
        let rows = appointment_rows(self.0);
        if rows.is_empty() {
            return writeln!(f, "  No appointments yet.");
        }

        writeln!(
            f,
            "  {:<6} {:<24} {:<17} {:<12} Actions",
            "ID", "Patient", "Scheduled", "Status"
        )?;
        for row in rows {
            let actions: Vec<String> = row.actions.iter().map(action_cell).collect();
            let patient = format!("#{} — {}", row.patient_id, row.patient_name);
            write!(
                f,
                "  {:<6} {:<24} {:<17} {:<12} {}",
                format!("#{}", row.id),
                patient,
                row.scheduled,
                row.badge.label,
                actions.join(" ")
            )?;
            if let Some(badge) = row.prediction {
                write!(f, "  {}", badge.label)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

pub struct DashboardPanel<'a>(pub &'a Store);

impl fmt::Display for DashboardPanel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = self.0;
        writeln!(f, "Dashboard (last {} days)", store.window().days())?;

        for card in summary_cards(store.summary()) {
            write!(f, "  {:<20} {:>5}", card.title, card.value)?;
            if let Some(sub) = card.sub {
                write!(f, "  {sub}")?;
            }
            writeln!(f)?;
        }

        writeln!(f, "Appointments by day")?;
        if store.by_day().is_empty() {
            return writeln!(f, "  No data yet.");
        }

        for bar in scale_day_bars(store.by_day()) {
            let cells = (bar.height / PIXELS_PER_CELL).max(1) as usize;
            writeln!(f, "  {} {} {}", bar.label, "█".repeat(cells), bar.total)?;
        }

        writeln!(
            f,
            "  {:<10} {:>5} {:>9} {:>10} {:>9} {:>9}",
            "Day", "Total", "Scheduled", "Checked-in", "Completed", "Cancelled"
        )?;
        for b in store.by_day() {
            writeln!(
                f,
                "  {:<10} {:>5} {:>9} {:>10} {:>9} {:>9}",
                b.day, b.total, b.scheduled, b.checked_in, b.completed, b.cancelled
            )?;
        }
        Ok(())
    }
}

/// Every panel, error banner first.
pub struct Board<'a>(pub &'a Store);

impl fmt::Display for Board<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", ErrorBanner(self.0))?;
        writeln!(f, "{}", AppointmentsPanel(self.0))?;
        writeln!(f, "{}", PatientsPanel(self.0))?;
        write!(f, "{}", DashboardPanel(self.0))
    }
}
