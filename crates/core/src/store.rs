//! In-memory state mirrored from the gateway.
//!
//! Collections are only ever replaced wholesale from a single gateway response. Refreshes carry
//! a [`RefreshTicket`]; a response is applied only when its ticket is the newest one issued for
//! that kind of refresh, so a slow earlier response can never overwrite a newer one.
//!
//! Predictions are remembered together with the appointment status seen at fetch time and are
//! dropped as soon as a newer listing shows that status changed.

use crate::model::{AnalyticsSummary, Appointment, DayBucket, Patient, PredictionResult};
use crate::status::AppointmentStatus;
use crate::{ClinicError, ClinicResult};
use clinic_types::AnalyticsWindow;
use std::collections::HashMap;

/// The two independent refreshes the client performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RefreshKind {
    /// Patients and appointments.
    Collections,
    /// Summary and per-day buckets.
    Analytics,
}

/// Identity of one refresh, issued by [`Store::begin_refresh`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefreshTicket {
    kind: RefreshKind,
    seq: u64,
}

#[derive(Clone, Debug, PartialEq)]
struct CachedPrediction {
    status_at_fetch: Option<AppointmentStatus>,
    result: PredictionResult,
}

/// Latest known client state.
#[derive(Clone, Debug, Default)]
pub struct Store {
    patients: Vec<Patient>,
    appointments: Vec<Appointment>,
    summary: Option<AnalyticsSummary>,
    by_day: Vec<DayBucket>,
    window: AnalyticsWindow,
    loading: bool,
    error: Option<String>,
    predictions: HashMap<u64, CachedPrediction>,
    collections_issued: u64,
    analytics_issued: u64,
}

impl Store {
    pub fn new(window: AnalyticsWindow) -> Self {
        Self {
            window,
            ..Self::default()
        }
    }

    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn appointment(&self, id: u64) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.id == id)
    }

    /// `None` until the first analytics refresh lands.
    pub fn summary(&self) -> Option<&AnalyticsSummary> {
        self.summary.as_ref()
    }

    pub fn by_day(&self) -> &[DayBucket] {
        &self.by_day
    }

    pub fn window(&self) -> AnalyticsWindow {
        self.window
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn prediction(&self, appointment_id: u64) -> Option<&PredictionResult> {
        self.predictions.get(&appointment_id).map(|c| &c.result)
    }

    pub fn replace_patients(&mut self, patients: Vec<Patient>) {
        self.patients = patients;
    }

    /// Replaces the appointment collection and drops predictions that no longer describe it.
    pub fn replace_appointments(&mut self, appointments: Vec<Appointment>) {
        self.appointments = appointments;

        let current: HashMap<u64, &AppointmentStatus> = self
            .appointments
            .iter()
            .map(|a| (a.id, &a.status))
            .collect();
        let before = self.predictions.len();
        self.predictions.retain(|id, cached| {
            matches!(
                (current.get(id), cached.status_at_fetch.as_ref()),
                (Some(now), Some(then)) if *now == then
            )
        });

        let dropped = before - self.predictions.len();
        if dropped > 0 {
            tracing::debug!("dropped {} stale prediction(s)", dropped);
        }
    }

    pub fn replace_summary(&mut self, summary: AnalyticsSummary) {
        self.summary = Some(summary);
    }

    pub fn replace_by_day(&mut self, by_day: Vec<DayBucket>) {
        self.by_day = by_day;
    }

    pub fn set_window(&mut self, window: AnalyticsWindow) {
        self.window = window;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_error(&mut self, message: Option<String>) {
        self.error = message;
    }

    /// Issues the next ticket for `kind`, superseding every earlier one.
    pub fn begin_refresh(&mut self, kind: RefreshKind) -> RefreshTicket {
        let counter = match kind {
            RefreshKind::Collections => &mut self.collections_issued,
            RefreshKind::Analytics => &mut self.analytics_issued,
        };
        *counter += 1;
        RefreshTicket { kind, seq: *counter }
    }

    /// Whether `ticket` is the newest one issued for its kind.
    pub fn is_current(&self, ticket: RefreshTicket) -> bool {
        let latest = match ticket.kind {
            RefreshKind::Collections => self.collections_issued,
            RefreshKind::Analytics => self.analytics_issued,
        };
        ticket.seq == latest
    }

    /// Applies a collections response. Returns `false` and leaves state untouched for a
    /// superseded ticket.
    pub fn apply_collections(
        &mut self,
        ticket: RefreshTicket,
        patients: Vec<Patient>,
        appointments: Vec<Appointment>,
    ) -> bool {
        if ticket.kind != RefreshKind::Collections || !self.is_current(ticket) {
            tracing::debug!("discarding superseded collections refresh #{}", ticket.seq);
            return false;
        }
        self.replace_patients(patients);
        self.replace_appointments(appointments);
        true
    }

    /// Applies an analytics response. Returns `false` and leaves state untouched for a
    /// superseded ticket.
    pub fn apply_analytics(
        &mut self,
        ticket: RefreshTicket,
        summary: AnalyticsSummary,
        by_day: Vec<DayBucket>,
    ) -> bool {
        if ticket.kind != RefreshKind::Analytics || !self.is_current(ticket) {
            tracing::debug!("discarding superseded analytics refresh #{}", ticket.seq);
            return false;
        }
        self.replace_summary(summary);
        self.replace_by_day(by_day);
        true
    }

    /// Settles a failed refresh. A superseded failure is dropped so it never reaches the error
    /// slot; only the newest refresh of a kind reports its error.
    pub fn settle_failure(&self, ticket: RefreshTicket, err: ClinicError) -> ClinicResult<()> {
        if self.is_current(ticket) {
            return Err(err);
        }
        tracing::debug!(
            "discarding superseded {:?} refresh #{} failure: {}",
            ticket.kind,
            ticket.seq,
            err
        );
        Ok(())
    }

    /// Remembers a prediction against the appointment's currently known status.
    pub fn record_prediction(&mut self, appointment_id: u64, result: PredictionResult) {
        let status_at_fetch = self.appointment(appointment_id).map(|a| a.status.clone());
        self.predictions.insert(
            appointment_id,
            CachedPrediction {
                status_at_fetch,
                result,
            },
        );
    }
}
