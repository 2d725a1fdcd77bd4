//! Display-ready data derived from the store.
//!
//! Everything here is a pure function of its inputs. Renderers (terminal or otherwise) consume
//! these values and make no decisions of their own.

use crate::constants::{
    HIGH_RISK_THRESHOLD, MAX_BAR_HEIGHT, MEDIUM_RISK_THRESHOLD, MIN_BAR_HEIGHT,
    UNKNOWN_PATIENT_LABEL,
};
use crate::model::{AnalyticsSummary, DayBucket, Patient};
use crate::status::{affordances, ActionAffordance, AppointmentStatus};
use crate::store::Store;
use std::collections::HashMap;

// ============================================================================
// Patient lookup
// ============================================================================

/// Id → patient map for resolving appointment rows.
#[derive(Debug, Default)]
pub struct PatientIndex<'a> {
    by_id: HashMap<u64, &'a Patient>,
}

impl<'a> PatientIndex<'a> {
    pub fn build(patients: &'a [Patient]) -> Self {
        Self {
            by_id: patients.iter().map(|p| (p.id, p)).collect(),
        }
    }

    pub fn get(&self, id: u64) -> Option<&'a Patient> {
        self.by_id.get(&id).copied()
    }

    /// Patient name, or [`UNKNOWN_PATIENT_LABEL`] when the id is not loaded.
    pub fn name_for(&self, id: u64) -> &'a str {
        self.get(id)
            .map(|p| p.name.as_str())
            .unwrap_or(UNKNOWN_PATIENT_LABEL)
    }
}

// ============================================================================
// Badges
// ============================================================================

/// A coloured label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Badge {
    pub label: String,
    pub background: &'static str,
    pub foreground: &'static str,
}

impl Badge {
    fn new(label: impl Into<String>, background: &'static str, foreground: &'static str) -> Self {
        Self {
            label: label.into(),
            background,
            foreground,
        }
    }
}

pub fn status_badge(status: &AppointmentStatus) -> Badge {
    match status {
        AppointmentStatus::Scheduled => Badge::new("Scheduled", "#fff3cd", "#856404"),
        AppointmentStatus::CheckedIn => Badge::new("Checked-in", "#cce5ff", "#004085"),
        AppointmentStatus::Completed => Badge::new("Completed", "#d4edda", "#155724"),
        AppointmentStatus::Cancelled => Badge::new("Cancelled", "#f8d7da", "#721c24"),
        AppointmentStatus::Other(raw) => Badge::new(raw.as_str(), "#eee", "#333"),
    }
}

/// No-show risk tier. The lower bound of each tier is inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

pub fn classify_risk(probability: f64) -> RiskTier {
    if probability >= HIGH_RISK_THRESHOLD {
        RiskTier::High
    } else if probability >= MEDIUM_RISK_THRESHOLD {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}

pub fn risk_badge(probability: f64) -> Badge {
    let label = format!("No-show {probability}%");
    match classify_risk(probability) {
        RiskTier::Low => Badge::new(label, "#d4edda", "#155724"),
        RiskTier::Medium => Badge::new(label, "#fff3cd", "#856404"),
        RiskTier::High => Badge::new(label, "#f8d7da", "#721c24"),
    }
}

// ============================================================================
// Appointment rows
// ============================================================================

/// Gateway timestamps shown as `YYYY-MM-DD HH:MM`.
pub fn format_local(raw: &str) -> String {
    raw.replacen('T', " ", 1).chars().take(16).collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppointmentRow {
    pub id: u64,
    pub patient_id: u64,
    pub patient_name: String,
    pub scheduled: String,
    pub status: AppointmentStatus,
    pub badge: Badge,
    pub actions: [ActionAffordance; 3],
    pub prediction: Option<Badge>,
}

/// One row per appointment, in the order the gateway listed them.
pub fn appointment_rows(store: &Store) -> Vec<AppointmentRow> {
    let index = PatientIndex::build(store.patients());
    store
        .appointments()
        .iter()
        .map(|a| AppointmentRow {
            id: a.id,
            patient_id: a.patient_id,
            patient_name: index.name_for(a.patient_id).to_owned(),
            scheduled: format_local(&a.scheduled_at),
            status: a.status.clone(),
            badge: status_badge(&a.status),
            actions: affordances(&a.status, store.is_loading()),
            prediction: store
                .prediction(a.id)
                .map(|p| risk_badge(p.no_show_probability)),
        })
        .collect()
}

// ============================================================================
// Dashboard
// ============================================================================

/// Fraction in `[0, 1]` as a whole percent.
pub fn rate_percent(rate: f64) -> i64 {
    (rate * 100.0).round() as i64
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryCard {
    pub title: &'static str,
    pub value: u64,
    pub sub: Option<String>,
}

/// The four headline cards. Every figure is zero before the first summary loads.
pub fn summary_cards(summary: Option<&AnalyticsSummary>) -> Vec<SummaryCard> {
    let empty = AnalyticsSummary::default();
    let s = summary.unwrap_or(&empty);
    let (cancel_rate, completion_rate) = match summary {
        Some(s) => (rate_percent(s.cancel_rate), rate_percent(s.completion_rate)),
        None => (0, 0),
    };

    vec![
        SummaryCard {
            title: "Total appointments",
            value: s.total,
            sub: None,
        },
        SummaryCard {
            title: "Scheduled",
            value: s.count(&AppointmentStatus::Scheduled),
            sub: None,
        },
        SummaryCard {
            title: "Cancelled",
            value: s.count(&AppointmentStatus::Cancelled),
            sub: Some(format!("{cancel_rate}% cancel rate")),
        },
        SummaryCard {
            title: "Completed",
            value: s.count(&AppointmentStatus::Completed),
            sub: Some(format!("{completion_rate}% completion rate")),
        },
    ]
}

/// One bar of the per-day chart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayBar {
    pub day: String,
    /// `MM-DD`
    pub label: String,
    pub total: u64,
    /// Pixels, within `MIN_BAR_HEIGHT..=MAX_BAR_HEIGHT`.
    pub height: u32,
    pub tooltip: String,
}

/// Scales each bucket against the busiest day of the window, keeping the given order.
pub fn scale_day_bars(buckets: &[DayBucket]) -> Vec<DayBar> {
    let max = buckets.iter().map(|b| b.total).max().unwrap_or(0).max(1);

    buckets
        .iter()
        .map(|b| {
            let scaled = (b.total as f64 / max as f64 * MAX_BAR_HEIGHT as f64).round() as u32;
            DayBar {
                day: b.day.clone(),
                label: b.day.get(5..).unwrap_or(&b.day).to_owned(),
                total: b.total,
                height: scaled.max(MIN_BAR_HEIGHT),
                tooltip: format!("{} • total: {}", b.day, b.total),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Appointment, PredictionResult};

    fn bucket(day: &str, total: u64) -> DayBucket {
        DayBucket {
            day: day.into(),
            total,
            ..DayBucket::default()
        }
    }

    #[test]
    fn unknown_patient_renders_fallback() {
        let patients = vec![Patient {
            id: 1,
            name: "Ana".into(),
        }];
        let index = PatientIndex::build(&patients);
        assert_eq!(index.name_for(1), "Ana");
        assert_eq!(index.name_for(42), "Unknown");
        assert!(index.get(42).is_none());
    }

    #[test]
    fn risk_tier_boundaries() {
        assert_eq!(classify_risk(39.0), RiskTier::Low);
        assert_eq!(classify_risk(40.0), RiskTier::Medium);
        assert_eq!(classify_risk(59.0), RiskTier::Medium);
        assert_eq!(classify_risk(60.0), RiskTier::High);
        assert_eq!(classify_risk(0.0), RiskTier::Low);
        assert_eq!(classify_risk(100.0), RiskTier::High);
    }

    #[test]
    fn risk_badge_label_and_colours() {
        let badge = risk_badge(45.0);
        assert_eq!(badge.label, "No-show 45%");
        assert_eq!(badge.background, "#fff3cd");

        assert_eq!(risk_badge(42.5).label, "No-show 42.5%");
        assert_eq!(risk_badge(75.0).foreground, "#721c24");
    }

    #[test]
    fn unknown_status_badge_shows_raw_value() {
        let badge = status_badge(&AppointmentStatus::Other("no_show".into()));
        assert_eq!(badge.label, "no_show");
        assert_eq!((badge.background, badge.foreground), ("#eee", "#333"));
        assert_eq!(status_badge(&AppointmentStatus::CheckedIn).label, "Checked-in");
    }

    #[test]
    fn busiest_day_gets_full_height_and_floor_applies() {
        let bars = scale_day_bars(&[
            bucket("2026-02-16", 0),
            bucket("2026-02-17", 4),
            bucket("2026-02-18", 1),
            bucket("2026-02-19", 2),
        ]);

        let heights: Vec<u32> = bars.iter().map(|b| b.height).collect();
        assert_eq!(heights, vec![MIN_BAR_HEIGHT, MAX_BAR_HEIGHT, 15, 30]);
        assert!(bars.iter().all(|b| b.height >= MIN_BAR_HEIGHT));
        assert_eq!(bars[1].label, "02-17");
        assert_eq!(bars[1].tooltip, "2026-02-17 • total: 4");
    }

    #[test]
    fn empty_window_keeps_every_bar_visible() {
        let bars = scale_day_bars(&[bucket("2026-02-18", 0), bucket("2026-02-19", 0)]);
        assert!(bars.iter().all(|b| b.height == MIN_BAR_HEIGHT));
        assert!(scale_day_bars(&[]).is_empty());
    }

    #[test]
    fn bars_keep_gateway_order() {
        let bars = scale_day_bars(&[bucket("2026-02-19", 1), bucket("2026-02-18", 1)]);
        let days: Vec<&str> = bars.iter().map(|b| b.day.as_str()).collect();
        assert_eq!(days, vec!["2026-02-19", "2026-02-18"]);
    }

    #[test]
    fn rates_round_to_whole_percent() {
        assert_eq!(rate_percent(0.0), 0);
        assert_eq!(rate_percent(0.333), 33);
        assert_eq!(rate_percent(0.125), 13);
        assert_eq!(rate_percent(1.0), 100);
    }

    #[test]
    fn summary_cards_default_to_zero() {
        let cards = summary_cards(None);
        assert_eq!(cards.len(), 4);
        assert!(cards.iter().all(|c| c.value == 0));
        assert_eq!(cards[2].sub.as_deref(), Some("0% cancel rate"));
    }

    #[test]
    fn summary_cards_read_counts_and_rates() {
        let summary = AnalyticsSummary {
            total: 8,
            by_status: [("scheduled".to_string(), 3), ("completed".to_string(), 4)]
                .into_iter()
                .collect(),
            cancel_rate: 0.125,
            completion_rate: 0.5,
        };
        let cards = summary_cards(Some(&summary));
        let values: Vec<u64> = cards.iter().map(|c| c.value).collect();
        assert_eq!(values, vec![8, 3, 0, 4]);
        assert_eq!(cards[2].sub.as_deref(), Some("13% cancel rate"));
        assert_eq!(cards[3].sub.as_deref(), Some("50% completion rate"));
    }

    #[test]
    fn format_local_truncates_to_minutes() {
        assert_eq!(format_local("2026-02-18T15:00:00"), "2026-02-18 15:00");
        assert_eq!(format_local("2026-02-18T15:00:00.123456"), "2026-02-18 15:00");
        assert_eq!(format_local("soon"), "soon");
    }

    #[test]
    fn rows_resolve_names_and_predictions() {
        let mut store = Store::default();
        store.replace_patients(vec![Patient {
            id: 1,
            name: "Ana".into(),
        }]);
        store.replace_appointments(vec![
            Appointment {
                id: 10,
                patient_id: 1,
                scheduled_at: "2026-02-18T08:30:00".into(),
                status: AppointmentStatus::Scheduled,
            },
            Appointment {
                id: 11,
                patient_id: 99,
                scheduled_at: "2026-02-18T09:00:00".into(),
                status: AppointmentStatus::Completed,
            },
        ]);
        store.record_prediction(
            10,
            PredictionResult {
                appointment_id: Some(10),
                no_show_probability: 60.0,
                model: None,
                explanation: Vec::new(),
            },
        );

        let rows = appointment_rows(&store);
        assert_eq!(rows[0].patient_name, "Ana");
        assert_eq!(rows[0].scheduled, "2026-02-18 08:30");
        assert_eq!(
            rows[0].prediction.as_ref().map(|b| b.label.as_str()),
            Some("No-show 60%")
        );
        assert_eq!(rows[1].patient_name, "Unknown");
        assert!(rows[1].actions.iter().all(|a| !a.enabled));
        assert!(rows[1].prediction.is_none());
    }
}
