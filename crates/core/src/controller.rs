//! User actions turned into gateway round trips and store updates.
//!
//! Every action follows the same shape: clear the error slot, raise the loading flag, perform
//! the round trip, and on success refetch patients, appointments and analytics in full. Any
//! failure replaces the error slot and leaves previously loaded data in place.
//!
//! The store sits behind a mutex that is only held between awaits, so two actions issued
//! concurrently interleave at round-trip granularity. Refresh tickets keep the newest response.

use crate::gateway::Gateway;
use crate::model::{Appointment, Patient, PredictionResult};
use crate::status::{affordances, AppointmentStatus, StatusAction};
use crate::store::{RefreshKind, Store};
use crate::{ClinicError, ClinicResult};
use clinic_types::{AnalyticsWindow, NonEmptyText, ScheduledAt};
use std::sync::{Mutex, MutexGuard};

pub struct Controller<G> {
    gateway: G,
    store: Mutex<Store>,
}

impl<G: Gateway> Controller<G> {
    pub fn new(gateway: G, window: AnalyticsWindow) -> Self {
        Self {
            gateway,
            store: Mutex::new(Store::new(window)),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Copy of the current state for rendering.
    pub fn snapshot(&self) -> Store {
        self.store().clone()
    }

    fn store(&self) -> MutexGuard<'_, Store> {
        // Every mutation under the lock is a plain assignment, so a poisoned store is consistent.
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn begin_action(&self) {
        let mut store = self.store();
        store.set_error(None);
        store.set_loading(true);
    }

    fn finish_action<T>(&self, result: ClinicResult<T>) -> ClinicResult<T> {
        let mut store = self.store();
        store.set_loading(false);
        if let Err(err) = &result {
            tracing::warn!("action failed: {}", err);
            store.set_error(Some(err.to_string()));
        }
        result
    }

    /// Rejects an action before any round trip, recording the reason.
    fn reject<T>(&self, err: ClinicError) -> ClinicResult<T> {
        self.store().set_error(Some(err.to_string()));
        Err(err)
    }

    /// First load: both refreshes, fired together.
    pub async fn initial_load(&self) -> ClinicResult<()> {
        self.refresh_everything().await
    }

    /// Refetches patients and appointments.
    pub async fn refresh_collections(&self) -> ClinicResult<()> {
        self.begin_action();
        let result = self.load_collections().await;
        self.finish_action(result)
    }

    /// Refetches the summary and the per-day buckets for the current window.
    pub async fn refresh_analytics(&self) -> ClinicResult<()> {
        self.begin_action();
        let result = self.load_analytics().await;
        self.finish_action(result)
    }

    /// Both refreshes, fired together and awaited independently.
    pub async fn refresh_everything(&self) -> ClinicResult<()> {
        self.begin_action();
        let result = self.load_everything().await;
        self.finish_action(result)
    }

    /// Switches the analytics window and reloads the analytics for it.
    pub async fn change_window(&self, window: AnalyticsWindow) -> ClinicResult<()> {
        self.store().set_window(window);
        tracing::info!("analytics window set to {} days", window.days());
        self.refresh_analytics().await
    }

    pub async fn create_patient(&self, name: &str) -> ClinicResult<Patient> {
        let name = match NonEmptyText::new(name) {
            Ok(name) => name,
            Err(_) => {
                return self.reject(ClinicError::Validation("patient name is required".into()))
            }
        };

        self.begin_action();
        let result = self.gateway.create_patient(&name).await;
        if let Ok(patient) = &result {
            tracing::info!("created patient #{}", patient.id);
        }
        self.after_mutation(result).await
    }

    /// Books `patient_id` at `when` (`YYYY-MM-DDTHH:MM`).
    ///
    /// Nothing is added locally: a booking appears only once the refetch lists it.
    pub async fn create_appointment(
        &self,
        patient_id: u64,
        when: &str,
    ) -> ClinicResult<Appointment> {
        if patient_id == 0 {
            return self.reject(ClinicError::Validation("a patient must be selected".into()));
        }
        let scheduled_at = match ScheduledAt::parse(when) {
            Ok(slot) => slot,
            Err(err) => return self.reject(err.into()),
        };

        self.begin_action();
        let result = self
            .gateway
            .create_appointment(patient_id, scheduled_at)
            .await;
        if let Ok(appt) = &result {
            tracing::info!(
                "booked appointment #{} for patient #{} at {}",
                appt.id,
                patient_id,
                scheduled_at
            );
        }
        self.after_mutation(result).await
    }

    /// Asks the gateway to move `id` to `status` without checking the local listing first.
    pub async fn change_status(
        &self,
        id: u64,
        status: AppointmentStatus,
    ) -> ClinicResult<Appointment> {
        self.begin_action();
        let result = self.gateway.update_appointment_status(id, &status).await;
        if result.is_ok() {
            tracing::info!("appointment #{} moved to {}", id, status);
        }
        self.after_mutation(result).await
    }

    /// Triggers `action` on `id` only if the current listing offers it.
    ///
    /// A disabled action is refused with [`ClinicError::Validation`] and never reaches the
    /// gateway.
    pub async fn apply_action(&self, id: u64, action: StatusAction) -> ClinicResult<Appointment> {
        let offered = {
            let store = self.store();
            let offered = store.appointment(id).map(|appt| {
                affordances(&appt.status, store.is_loading())
                    .into_iter()
                    .any(|a| a.action == action && a.enabled)
            });
            offered
        };

        match offered {
            None => self.reject(ClinicError::Validation(format!(
                "appointment #{id} is not loaded"
            ))),
            Some(false) => self.reject(ClinicError::Validation(format!(
                "{} is not available for appointment #{id}",
                action.label()
            ))),
            Some(true) => self.change_status(id, action.target()).await,
        }
    }

    /// Fetches and remembers the no-show estimate for one appointment.
    pub async fn request_prediction(
        &self,
        appointment_id: u64,
    ) -> ClinicResult<PredictionResult> {
        self.store().set_error(None);
        let result = self.gateway.get_no_show_prediction(appointment_id).await;

        let mut store = self.store();
        match &result {
            Ok(prediction) => store.record_prediction(appointment_id, prediction.clone()),
            Err(err) => {
                tracing::warn!("prediction for #{} failed: {}", appointment_id, err);
                store.set_error(Some(err.to_string()));
            }
        }
        result
    }

    /// Finishes a mutation: on success refetches everything once, then lowers the flag.
    ///
    /// A failed refetch after a successful mutation is recorded in the error slot but the
    /// mutation's own result is still returned, since the gateway already accepted it.
    async fn after_mutation<T>(&self, result: ClinicResult<T>) -> ClinicResult<T> {
        if result.is_ok() {
            if let Err(err) = self.load_everything().await {
                tracing::warn!("refresh after mutation failed: {}", err);
                self.store().set_error(Some(err.to_string()));
            }
        }
        self.finish_action(result)
    }

    async fn load_everything(&self) -> ClinicResult<()> {
        let (collections, analytics) = tokio::join!(self.load_collections(), self.load_analytics());
        collections.and(analytics)
    }

    async fn load_collections(&self) -> ClinicResult<()> {
        let ticket = self.store().begin_refresh(RefreshKind::Collections);
        let (patients, appointments) = tokio::join!(
            self.gateway.list_patients(),
            self.gateway.list_appointments()
        );
        let fetched = patients.and_then(|p| appointments.map(|a| (p, a)));

        let mut store = self.store();
        match fetched {
            Ok((patients, appointments)) => {
                store.apply_collections(ticket, patients, appointments);
                Ok(())
            }
            Err(err) => store.settle_failure(ticket, err),
        }
    }

    async fn load_analytics(&self) -> ClinicResult<()> {
        let (ticket, window) = {
            let mut store = self.store();
            (store.begin_refresh(RefreshKind::Analytics), store.window())
        };
        let (summary, by_day) = tokio::join!(
            self.gateway.get_analytics_summary(),
            self.gateway.get_analytics_by_day(window)
        );
        let fetched = summary.and_then(|s| by_day.map(|b| (s, b)));

        let mut store = self.store();
        match fetched {
            Ok((summary, by_day)) => {
                store.apply_analytics(ticket, summary, by_day);
                Ok(())
            }
            Err(err) => store.settle_failure(ticket, err),
        }
    }
}
