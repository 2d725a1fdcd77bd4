//! # API Client
//!
//! HTTP implementation of the clinic [`Gateway`] contract.
//!
//! Handles:
//! - one `reqwest` round trip per operation, JSON in and out
//! - normalising every failure into a [`ClinicError`] with the gateway's status and detail
//!
//! No retries and no timeouts: the caller decides what a failure means.

#![warn(rust_2018_idioms)]

pub mod paths;

use clinic_core::{
    AnalyticsSummary, Appointment, AppointmentStatus, ClientConfig, ClinicError, ClinicResult,
    DayBucket, Gateway, Patient, PredictionResult,
};
use clinic_types::{AnalyticsWindow, NonEmptyText, ScheduledAt};
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Detail used when the gateway gives no status line either.
const FALLBACK_DETAIL: &str = "Request failed";

#[derive(Serialize)]
struct CreatePatientReq<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct CreateAppointmentReq {
    patient_id: u64,
    scheduled_at: ScheduledAt,
}

#[derive(Serialize)]
struct StatusUpdateReq<'a> {
    status: &'a AppointmentStatus,
}

/// Gateway reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpGateway {
    /// Builds the HTTP client for the configured gateway origin.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicError::Config`] if the underlying client cannot be constructed.
    pub fn new(cfg: &ClientConfig) -> ClinicResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("clinic-queue/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClinicError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            config: cfg.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.config.endpoint(path))
            .header(ACCEPT, HeaderValue::from_static("application/json"))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClinicResult<T> {
        let (_, body) = self
            .execute(self.request(Method::GET, path), &Method::GET, path)
            .await?;
        decode(path, &body)
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, payload: &B) -> ClinicResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(method.clone(), path).json(payload);
        let (_, body) = self.execute(request, &method, path).await?;
        decode(path, &body)
    }

    /// Performs the round trip and turns any non-success response into an error.
    async fn execute(
        &self,
        request: RequestBuilder,
        method: &Method,
        path: &str,
    ) -> ClinicResult<(StatusCode, Vec<u8>)> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!("{} {} failed before a response: {}", method, path, e);
            ClinicError::Transport(e.to_string())
        })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ClinicError::Transport(e.to_string()))?;
        tracing::debug!("{} {} -> {}", method, path, status.as_u16());

        if !status.is_success() {
            let err = ClinicError::remote(status.as_u16(), error_detail(status, &body));
            tracing::warn!("{} {} rejected: {}", method, path, err);
            return Err(err);
        }

        Ok((status, body.to_vec()))
    }
}

fn decode<T: DeserializeOwned>(path: &str, body: &[u8]) -> ClinicResult<T> {
    serde_json::from_slice(body).map_err(|e| ClinicError::Decode(format!("{path}: {e}")))
}

/// Human-readable detail for a failed response.
///
/// Uses the body's `detail` field: verbatim when it is a string, compact JSON otherwise. A body
/// that is not JSON, or has no usable `detail`, falls back to the status line.
pub fn error_detail(status: StatusCode, body: &[u8]) -> String {
    let status_line = || {
        status
            .canonical_reason()
            .unwrap_or(FALLBACK_DETAIL)
            .to_owned()
    };

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => match map.get("detail") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
            Some(Value::String(_)) | Some(Value::Null) | None => status_line(),
            Some(other) => other.to_string(),
        },
        _ => status_line(),
    }
}

/// Reads a prediction body.
///
/// The gateway answers an unknown appointment with a success status and a bare `detail`; that
/// reply becomes a remote error carrying the received status.
fn decode_prediction(status: StatusCode, path: &str, body: &[u8]) -> ClinicResult<PredictionResult> {
    let value: Value = decode(path, body)?;
    if value.get("no_show_probability").is_none() {
        if let Some(detail) = value.get("detail") {
            let detail = match detail {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            return Err(ClinicError::remote(status.as_u16(), detail));
        }
    }
    serde_json::from_value(value).map_err(|e| ClinicError::Decode(format!("{path}: {e}")))
}

impl Gateway for HttpGateway {
    async fn list_patients(&self) -> ClinicResult<Vec<Patient>> {
        self.get(paths::PATIENTS).await
    }

    async fn create_patient(&self, name: &NonEmptyText) -> ClinicResult<Patient> {
        let payload = CreatePatientReq {
            name: name.as_str(),
        };
        self.send_json(Method::POST, paths::PATIENTS, &payload).await
    }

    async fn list_appointments(&self) -> ClinicResult<Vec<Appointment>> {
        self.get(paths::APPOINTMENTS).await
    }

    async fn create_appointment(
        &self,
        patient_id: u64,
        scheduled_at: ScheduledAt,
    ) -> ClinicResult<Appointment> {
        let payload = CreateAppointmentReq {
            patient_id,
            scheduled_at,
        };
        self.send_json(Method::POST, paths::APPOINTMENTS, &payload)
            .await
    }

    async fn update_appointment_status(
        &self,
        id: u64,
        status: &AppointmentStatus,
    ) -> ClinicResult<Appointment> {
        let payload = StatusUpdateReq { status };
        self.send_json(Method::PATCH, &paths::appointment_status(id), &payload)
            .await
    }

    async fn get_analytics_summary(&self) -> ClinicResult<AnalyticsSummary> {
        self.get(paths::ANALYTICS_SUMMARY).await
    }

    async fn get_analytics_by_day(&self, window: AnalyticsWindow) -> ClinicResult<Vec<DayBucket>> {
        self.get(&paths::analytics_by_day(window)).await
    }

    async fn get_no_show_prediction(&self, appointment_id: u64) -> ClinicResult<PredictionResult> {
        let path = paths::no_show_prediction(appointment_id);
        let (status, body) = self
            .execute(self.request(Method::GET, &path), &Method::GET, &path)
            .await?;
        decode_prediction(status, &path, &body)
    }
}
