//! Appointment status and its transition rules.
//!
//! ```text
//! scheduled ──► checked_in ──► completed
//!     │              │
//!     └──────┬───────┘
//!            ▼
//!        cancelled
//! ```
//!
//! `completed` and `cancelled` are terminal. Statuses the client does not recognise are kept
//! verbatim and allow no transition.
//!
//! These rules drive which actions are offered; the gateway remains the authority and may
//! still reject a call made from a stale listing.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Lifecycle state of an appointment.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AppointmentStatus {
    Scheduled,
    CheckedIn,
    Completed,
    Cancelled,
    /// A value the gateway sent that this client does not know.
    Other(String),
}

impl AppointmentStatus {
    /// Known statuses in lifecycle order.
    pub const KNOWN: [AppointmentStatus; 4] = [
        Self::Scheduled,
        Self::CheckedIn,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Reads a wire value. Never fails: unknown values become [`AppointmentStatus::Other`].
    pub fn parse(raw: &str) -> Self {
        match raw {
            "scheduled" => Self::Scheduled,
            "checked_in" => Self::CheckedIn,
            "completed" => Self::Completed,
            "cancelled" => Self::Cancelled,
            other => Self::Other(other.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Scheduled => "scheduled",
            Self::CheckedIn => "checked_in",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Other(raw) => raw,
        }
    }

    /// Whether moving from `self` to `target` is in the transition table.
    pub fn can_transition_to(&self, target: &AppointmentStatus) -> bool {
        matches!(
            (self, target),
            (Self::Scheduled, Self::CheckedIn)
                | (Self::Scheduled, Self::Cancelled)
                | (Self::CheckedIn, Self::Completed)
                | (Self::CheckedIn, Self::Cancelled)
        )
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for AppointmentStatus {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl Serialize for AppointmentStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AppointmentStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// A user-facing status change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatusAction {
    CheckIn,
    Complete,
    Cancel,
}

impl StatusAction {
    /// Actions in the order they are presented.
    pub const ALL: [StatusAction; 3] = [Self::CheckIn, Self::Complete, Self::Cancel];

    /// Status the appointment moves to when this action succeeds.
    pub fn target(self) -> AppointmentStatus {
        match self {
            Self::CheckIn => AppointmentStatus::CheckedIn,
            Self::Complete => AppointmentStatus::Completed,
            Self::Cancel => AppointmentStatus::Cancelled,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::CheckIn => "Check-in",
            Self::Complete => "Complete",
            Self::Cancel => "Cancel",
        }
    }
}

/// An action together with whether it may be triggered right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionAffordance {
    pub action: StatusAction,
    pub enabled: bool,
}

/// Offered actions for an appointment in `status`.
///
/// While another action is in flight (`busy`) every action is disabled.
pub fn affordances(status: &AppointmentStatus, busy: bool) -> [ActionAffordance; 3] {
    StatusAction::ALL.map(|action| ActionAffordance {
        action,
        enabled: !busy && status.can_transition_to(&action.target()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled(status: &AppointmentStatus) -> Vec<StatusAction> {
        affordances(status, false)
            .into_iter()
            .filter(|a| a.enabled)
            .map(|a| a.action)
            .collect()
    }

    #[test]
    fn transition_table_matches_lifecycle() {
        use AppointmentStatus::*;
        let expected = [
            (Scheduled, [true, false, true]),
            (CheckedIn, [false, true, true]),
            (Completed, [false, false, false]),
            (Cancelled, [false, false, false]),
        ];

        for (from, row) in expected {
            let targets = [CheckedIn, Completed, Cancelled];
            for (target, allowed) in targets.iter().zip(row) {
                assert_eq!(
                    from.can_transition_to(target),
                    allowed,
                    "{from} -> {target}"
                );
            }
        }
    }

    #[test]
    fn offered_actions_follow_table() {
        assert_eq!(
            enabled(&AppointmentStatus::Scheduled),
            vec![StatusAction::CheckIn, StatusAction::Cancel]
        );
        assert_eq!(
            enabled(&AppointmentStatus::CheckedIn),
            vec![StatusAction::Complete, StatusAction::Cancel]
        );
        assert!(enabled(&AppointmentStatus::Completed).is_empty());
        assert!(enabled(&AppointmentStatus::Cancelled).is_empty());
    }

    #[test]
    fn unknown_status_is_kept_and_offers_nothing() {
        let status = AppointmentStatus::parse("no_show");
        assert_eq!(status, AppointmentStatus::Other("no_show".into()));
        assert_eq!(status.as_str(), "no_show");
        assert!(enabled(&status).is_empty());
    }

    #[test]
    fn busy_disables_everything() {
        assert!(affordances(&AppointmentStatus::Scheduled, true)
            .iter()
            .all(|a| !a.enabled));
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&AppointmentStatus::CheckedIn).unwrap();
        assert_eq!(json, "\"checked_in\"");

        let parsed: AppointmentStatus = serde_json::from_str("\"rescheduled\"").unwrap();
        assert_eq!(parsed, AppointmentStatus::Other("rescheduled".into()));

        for status in AppointmentStatus::KNOWN {
            let round: AppointmentStatus =
                serde_json::from_str(&serde_json::to_string(&status).unwrap()).unwrap();
            assert_eq!(round, status);
        }
    }
}
