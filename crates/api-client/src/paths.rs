//! Gateway route layout.
//!
//! Collection routes keep their trailing slash; the gateway redirects without it.

use clinic_types::AnalyticsWindow;

pub const PATIENTS: &str = "/patients/";

pub const APPOINTMENTS: &str = "/appointments/";

pub const ANALYTICS_SUMMARY: &str = "/analytics/summary";

pub fn appointment_status(id: u64) -> String {
    format!("/appointments/{id}/status")
}

pub fn analytics_by_day(window: AnalyticsWindow) -> String {
    format!("/analytics/by-day?days={}", window.days())
}

pub fn no_show_prediction(appointment_id: u64) -> String {
    format!("/predict/no-show/{appointment_id}")
}
