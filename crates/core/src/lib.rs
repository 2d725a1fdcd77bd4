//! # Clinic Core
//!
//! Client-side state model for the clinic queue.
//!
//! This crate contains everything between a user intent and the gateway:
//! - Records mirrored from the gateway (`model`) and the appointment status rules (`status`)
//! - The in-memory store with wholesale replacement and refresh sequencing (`store`)
//! - Pure derived views for rendering (`views`, `render`)
//! - The controller that turns actions into round trips and refreshes (`controller`)
//!
//! **No transport concerns**: HTTP lives in `api-client`, behind the [`Gateway`] trait.

pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod gateway;
pub mod model;
pub mod render;
pub mod status;
pub mod store;
pub mod views;

pub use config::ClientConfig;
pub use controller::Controller;
pub use error::{ClinicError, ClinicResult};
pub use gateway::Gateway;
pub use model::{AnalyticsSummary, Appointment, DayBucket, Patient, PredictionResult};
pub use status::{ActionAffordance, AppointmentStatus, StatusAction};
pub use store::Store;

pub use clinic_types::{AnalyticsWindow, NonEmptyText, ScheduledAt, TypeError};
