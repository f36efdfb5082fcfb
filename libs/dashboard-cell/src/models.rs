use serde::Serialize;
use thiserror::Error;

use appointment_cell::models::Appointment;
use shared_models::error::AppError;

pub const USERS_TABLE: &str = "users";
pub const LATEST_APPOINTMENTS_LIMIT: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardData {
    pub patients: u64,
    pub doctors: u64,
    pub appointments: u64,
    #[serde(rename = "latestAppointments")]
    pub latest_appointments: Vec<Appointment>,
}

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Failed to load {table}: {message}")]
    DatabaseError { table: &'static str, message: String },
}

impl From<DashboardError> for AppError {
    fn from(error: DashboardError) -> Self {
        AppError::Database(error.to_string())
    }
}
