use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use doctor_cell::models::SlotsBooked;
use shared_models::error::AppError;

pub const APPOINTMENTS_TABLE: &str = "appointments";
pub const CANCELLED_STATUS: &str = "cancelled";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub doc_id: Uuid,
    pub slot_date: String,
    pub slot_time: String,
    /// Snapshot of the patient at booking time.
    #[serde(default)]
    pub user_data: Value,
    /// Snapshot of the doctor at booking time.
    #[serde(default)]
    pub doc_data: Value,
    pub amount: f64,
    /// Creation time in epoch milliseconds.
    pub date: i64,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default)]
    pub payment: bool,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CancelAppointmentRequest {
    #[serde(rename = "appointmentId", alias = "appointment_id")]
    pub appointment_id: Option<String>,
}

/// The slice of a doctor row the cancellation workflow touches.
#[derive(Debug, Clone, Deserialize)]
pub struct DoctorSlots {
    pub id: Uuid,
    #[serde(default)]
    pub slots_booked: SlotsBooked,
}

#[derive(Error, Debug)]
pub enum AppointmentError {
    #[error("Appointment ID is required")]
    MissingInput,

    #[error("Appointment not found")]
    NotFound,

    #[error("Appointment already cancelled")]
    AlreadyCancelled,

    #[error("Failed to release doctor slot: {0}")]
    SlotReleaseFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<AppointmentError> for AppError {
    fn from(error: AppointmentError) -> Self {
        match error {
            AppointmentError::MissingInput => AppError::MissingInput(error.to_string()),
            AppointmentError::NotFound => AppError::NotFound(error.to_string()),
            AppointmentError::AlreadyCancelled => AppError::AlreadyCancelled,
            AppointmentError::SlotReleaseFailed(_) => AppError::Internal(error.to_string()),
            AppointmentError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cancel_request_accepts_both_spellings() {
        let camel: CancelAppointmentRequest =
            serde_json::from_value(json!({ "appointmentId": "abc" })).unwrap();
        let snake: CancelAppointmentRequest =
            serde_json::from_value(json!({ "appointment_id": "abc" })).unwrap();
        let empty: CancelAppointmentRequest = serde_json::from_value(json!({})).unwrap();

        assert_eq!(camel.appointment_id.as_deref(), Some("abc"));
        assert_eq!(snake.appointment_id.as_deref(), Some("abc"));
        assert!(empty.appointment_id.is_none());
    }

    #[test]
    fn errors_map_to_envelope_kinds() {
        assert!(matches!(AppError::from(AppointmentError::NotFound), AppError::NotFound(_)));
        assert!(matches!(
            AppError::from(AppointmentError::AlreadyCancelled),
            AppError::AlreadyCancelled
        ));
        assert!(matches!(
            AppError::from(AppointmentError::SlotReleaseFailed("x".into())),
            AppError::Internal(_)
        ));
    }
}
