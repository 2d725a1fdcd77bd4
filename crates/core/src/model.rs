//! Records exchanged with the gateway.
//!
//! Field names match the gateway's JSON. Counts that the gateway may omit default to zero so a
//! sparse payload still loads.

use crate::status::AppointmentStatus;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: u64,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: u64,
    pub patient_id: u64,
    /// Local date-time as sent by the gateway, e.g. `2026-02-18T15:00:00`.
    pub scheduled_at: String,
    pub status: AppointmentStatus,
}

/// Aggregate counts over all appointments.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub by_status: BTreeMap<String, u64>,
    #[serde(default)]
    pub cancel_rate: f64,
    #[serde(default)]
    pub completion_rate: f64,
}

impl AnalyticsSummary {
    /// Count for one status; absent keys count as zero.
    pub fn count(&self, status: &AppointmentStatus) -> u64 {
        self.by_status.get(status.as_str()).copied().unwrap_or(0)
    }
}

/// Appointment counts for one calendar day.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBucket {
    /// `YYYY-MM-DD`
    pub day: String,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub scheduled: u64,
    #[serde(default)]
    pub checked_in: u64,
    #[serde(default)]
    pub completed: u64,
    #[serde(default)]
    pub cancelled: u64,
}

/// No-show estimate for a single appointment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(default)]
    pub appointment_id: Option<u64>,
    /// Percentage in `[0, 100]`; may carry one decimal.
    pub no_show_probability: f64,
    #[serde(default)]
    pub model: Option<String>,
    /// Reason codes behind the estimate. Null entries sent by the gateway are dropped.
    #[serde(default, deserialize_with = "deserialize_reasons")]
    pub explanation: Vec<String>,
}

fn deserialize_reasons<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Option<String>>>::deserialize(deserializer)?;
    Ok(raw.unwrap_or_default().into_iter().flatten().collect())
}
