//! Constants used throughout the clinic core crate.
//!
//! Configuration keys, defaults and the fixed presentation numbers live here so that the
//! binaries, the views and the tests agree on them.

/// Environment variable holding the gateway origin.
pub const BASE_URL_ENV: &str = "CLINIC_API_BASE_URL";

/// Gateway origin used when no explicit base URL is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Environment variable holding the default analytics window, in days.
pub const ANALYTICS_DAYS_ENV: &str = "CLINIC_ANALYTICS_DAYS";

/// Label shown for an appointment whose patient is not in the loaded collection.
pub const UNKNOWN_PATIENT_LABEL: &str = "Unknown";

/// Height, in pixels, of the bar for the busiest day in the window.
pub const MAX_BAR_HEIGHT: u32 = 60;

/// Smallest bar height, in pixels, so empty days remain visible.
pub const MIN_BAR_HEIGHT: u32 = 2;

/// No-show probability (percent) at which the medium risk tier starts.
pub const MEDIUM_RISK_THRESHOLD: f64 = 40.0;

/// No-show probability (percent) at which the high risk tier starts.
pub const HIGH_RISK_THRESHOLD: f64 = 60.0;
