//! Contract between the controller and the remote gateway.
//!
//! Each method is exactly one round trip. Implementations return a fully parsed value or a
//! [`ClinicError`](crate::ClinicError); they never retry and never touch the store.

use crate::model::{AnalyticsSummary, Appointment, DayBucket, Patient, PredictionResult};
use crate::status::AppointmentStatus;
use crate::ClinicResult;
use clinic_types::{AnalyticsWindow, NonEmptyText, ScheduledAt};
use std::future::Future;

pub trait Gateway {
    fn list_patients(&self) -> impl Future<Output = ClinicResult<Vec<Patient>>> + Send;

    fn create_patient(
        &self,
        name: &NonEmptyText,
    ) -> impl Future<Output = ClinicResult<Patient>> + Send;

    fn list_appointments(&self) -> impl Future<Output = ClinicResult<Vec<Appointment>>> + Send;

    /// Fails with [`ClinicError::Conflict`] when the patient already holds this slot.
    ///
    /// [`ClinicError::Conflict`]: crate::ClinicError::Conflict
    fn create_appointment(
        &self,
        patient_id: u64,
        scheduled_at: ScheduledAt,
    ) -> impl Future<Output = ClinicResult<Appointment>> + Send;

    fn update_appointment_status(
        &self,
        id: u64,
        status: &AppointmentStatus,
    ) -> impl Future<Output = ClinicResult<Appointment>> + Send;

    fn get_analytics_summary(&self) -> impl Future<Output = ClinicResult<AnalyticsSummary>> + Send;

    fn get_analytics_by_day(
        &self,
        window: AnalyticsWindow,
    ) -> impl Future<Output = ClinicResult<Vec<DayBucket>>> + Send;

    fn get_no_show_prediction(
        &self,
        appointment_id: u64,
    ) -> impl Future<Output = ClinicResult<PredictionResult>> + Send;
}
