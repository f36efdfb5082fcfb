use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{AddDoctorForm, ImageUpload};
use crate::services::doctor::DoctorService;
use crate::services::validation::validate_add_doctor;

/// Multipart part carrying the doctor's portrait.
pub const IMAGE_FIELD: &str = "image";

async fn read_form(mut multipart: Multipart) -> Result<AddDoctorForm, AppError> {
    let mut form = AddDoctorForm::default();

    while let Some(field) = multipart.next_field().await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart data: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == IMAGE_FIELD {
            let file_name = field.file_name().unwrap_or("upload").to_string();
            let content_type = field.content_type().unwrap_or_default().to_string();
            let bytes = field.bytes().await
                .map_err(|e| AppError::InvalidInput(format!("Failed to read image bytes: {}", e)))?;

            form.image = Some(ImageUpload {
                file_name,
                content_type,
                bytes: bytes.to_vec(),
            });
            continue;
        }

        let value = field.text().await
            .map_err(|e| AppError::InvalidInput(format!("Failed to read field {}: {}", name, e)))?;

        let slot = match name.as_str() {
            "name" => &mut form.name,
            "email" => &mut form.email,
            "password" => &mut form.password,
            "speciality" => &mut form.speciality,
            "degree" => &mut form.degree,
            "experience" => &mut form.experience,
            "about" => &mut form.about,
            "fees" => &mut form.fees,
            "address" => &mut form.address,
            other => {
                debug!("Ignoring unexpected form field: {}", other);
                continue;
            }
        };
        *slot = Some(value);
    }

    Ok(form)
}

#[axum::debug_handler]
pub async fn add_doctor(
    State(state): State<Arc<AppConfig>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, AppError> {
    // A request that is not multipart carries none of the fields.
    let form = match multipart {
        Ok(multipart) => read_form(multipart).await?,
        Err(rejection) => {
            debug!("Add doctor request without multipart body: {}", rejection.body_text());
            AddDoctorForm::default()
        }
    };
    let request = validate_add_doctor(form)?;

    let doctor_service = DoctorService::new(&state);
    let doctor_id = doctor_service.add_doctor(request).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Doctor added successfully",
        "doctorId": doctor_id
    })))
}

#[axum::debug_handler]
pub async fn all_doctors(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctors = doctor_service.list_doctors().await?;

    Ok(Json(json!({
        "success": true,
        "data": doctors
    })))
}
