use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_models::error::AppError;

/// Columns returned when listing doctors; the password hash is never selected.
pub const DOCTOR_PUBLIC_COLUMNS: &str =
    "id,name,email,image,speciality,degree,experience,about,available,fees,address,date,slots_booked";

pub const DOCTORS_TABLE: &str = "doctors";

/// Booked time labels per calendar date label.
pub type SlotsBooked = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub line1: String,
    #[serde(default)]
    pub line2: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image: String,
    pub speciality: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    #[serde(default = "default_available")]
    pub available: bool,
    pub fees: f64,
    pub address: Address,
    /// Creation time in epoch milliseconds.
    pub date: i64,
    #[serde(default)]
    pub slots_booked: SlotsBooked,
}

fn default_available() -> bool {
    true
}

/// Row written when a doctor is registered.
#[derive(Debug, Clone, Serialize)]
pub struct NewDoctor {
    pub name: String,
    pub email: String,
    pub image: String,
    pub password: String,
    pub speciality: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    pub available: bool,
    pub fees: f64,
    pub address: Address,
    pub date: i64,
    pub slots_booked: SlotsBooked,
}

#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Raw multipart fields as received; every field is optional until validated.
#[derive(Debug, Clone, Default)]
pub struct AddDoctorForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub speciality: Option<String>,
    pub degree: Option<String>,
    pub experience: Option<String>,
    pub about: Option<String>,
    pub fees: Option<String>,
    pub address: Option<String>,
    pub image: Option<ImageUpload>,
}

/// A doctor registration that passed every input check.
#[derive(Debug, Clone)]
pub struct AddDoctorRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub speciality: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    pub fees: f64,
    pub address: Address,
    pub image: ImageUpload,
}

#[derive(Debug, Deserialize)]
pub struct IdRow {
    pub id: Uuid,
}

#[derive(Error, Debug)]
pub enum DoctorError {
    #[error("Please fill all the fields (missing: {0})")]
    MissingInput(String),

    #[error("Please enter a valid email")]
    InvalidEmail,

    #[error("Password must be at least 8 characters long")]
    WeakPassword,

    #[error("{0}")]
    InvalidAddress(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("A doctor with email {0} already exists")]
    DuplicateEmail(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Image upload failed: {0}")]
    ImageUpload(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<DoctorError> for AppError {
    fn from(error: DoctorError) -> Self {
        match error {
            DoctorError::MissingInput(_) => AppError::MissingInput(error.to_string()),
            DoctorError::InvalidEmail => AppError::InvalidEmail,
            DoctorError::WeakPassword => AppError::WeakPassword,
            DoctorError::InvalidAddress(msg) => AppError::InvalidAddress(msg),
            DoctorError::InvalidInput(msg) => AppError::InvalidInput(msg),
            DoctorError::DuplicateEmail(email) => AppError::DuplicateEmail(email),
            DoctorError::PasswordHash(msg) => AppError::Internal(msg),
            DoctorError::ImageUpload(msg) => AppError::ExternalService(msg),
            DoctorError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}
