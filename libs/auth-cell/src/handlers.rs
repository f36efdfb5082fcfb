use std::sync::Arc;

use axum::extract::{Json, State};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::LoginRequest;
use shared_models::error::AppError;
use shared_utils::extractor::JsonBody;

use crate::services::CredentialGate;

#[axum::debug_handler]
pub async fn admin_login(
    State(config): State<Arc<AppConfig>>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let gate = CredentialGate::new(&config);

    let token = gate.login(request.email.as_deref(), request.password.as_deref())?;

    Ok(Json(json!({
        "success": true,
        "token": token,
        "message": "Admin login successful"
    })))
}
