use std::sync::Arc;

use axum::{
    extract::State,
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_utils::extractor::JsonBody;

use crate::models::CancelAppointmentRequest;
use crate::services::{AppointmentQueryService, CancellationService};

#[axum::debug_handler]
pub async fn admin_appointments(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let query_service = AppointmentQueryService::new(&state);

    let appointments = query_service.list_appointments().await?;

    Ok(Json(json!({
        "success": true,
        "data": appointments
    })))
}

#[axum::debug_handler]
pub async fn appointment_cancel(
    State(state): State<Arc<AppConfig>>,
    JsonBody(request): JsonBody<CancelAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let cancellation_service = CancellationService::new(&state);

    let appointment = cancellation_service
        .cancel(request.appointment_id.as_deref())
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment cancelled",
        "appointment": appointment
    })))
}
