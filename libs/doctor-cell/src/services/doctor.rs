use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{
    AddDoctorRequest, Doctor, DoctorError, IdRow, NewDoctor, SlotsBooked,
    DOCTORS_TABLE, DOCTOR_PUBLIC_COLUMNS,
};
use crate::services::media::MediaService;
use crate::services::password::hash_password;

pub struct DoctorService {
    supabase: SupabaseClient,
    media: MediaService,
}

impl DoctorService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            media: MediaService::new(config),
        }
    }

    /// Register a validated doctor: hash the password, upload the portrait,
    /// then persist the profile with no booked slots.
    pub async fn add_doctor(&self, request: AddDoctorRequest) -> Result<Uuid, DoctorError> {
        debug!("Registering doctor: {}", request.email);

        if self.email_taken(&request.email).await? {
            return Err(DoctorError::DuplicateEmail(request.email));
        }

        let plaintext = request.password;
        let password = tokio::task::spawn_blocking(move || hash_password(&plaintext))
            .await
            .map_err(|e| DoctorError::PasswordHash(e.to_string()))?
            .map_err(|e| DoctorError::PasswordHash(e.to_string()))?;

        let image = self.media.upload_image(&request.image).await
            .map_err(|e| DoctorError::ImageUpload(e.to_string()))?;

        let new_doctor = NewDoctor {
            name: request.name,
            email: request.email,
            image,
            password,
            speciality: request.speciality,
            degree: request.degree,
            experience: request.experience,
            about: request.about,
            available: true,
            fees: request.fees,
            address: request.address,
            date: Utc::now().timestamp_millis(),
            slots_booked: SlotsBooked::new(),
        };

        let row = serde_json::to_value(&new_doctor)
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        let created: IdRow = self.supabase.insert(DOCTORS_TABLE, row, "id").await
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        info!("Doctor {} registered with ID: {}", new_doctor.email, created.id);
        Ok(created.id)
    }

    /// Every doctor in registration order, password hash excluded.
    pub async fn list_doctors(&self) -> Result<Vec<Doctor>, DoctorError> {
        debug!("Listing all doctors");

        let query = format!("select={}&order=date.asc,id.asc", DOCTOR_PUBLIC_COLUMNS);
        self.supabase.select_all(DOCTORS_TABLE, &query).await
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))
    }

    async fn email_taken(&self, email: &str) -> Result<bool, DoctorError> {
        let query = format!("email=eq.{}&select=id", urlencoding::encode(email));
        let existing: Vec<Value> = self.supabase.select(DOCTORS_TABLE, &query).await
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        Ok(!existing.is_empty())
    }
}
