use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::services::DashboardService;

#[axum::debug_handler]
pub async fn admin_dashboard(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let dashboard_service = DashboardService::new(&state);

    let data = dashboard_service.dashboard().await?;

    Ok(Json(json!({
        "success": true,
        "message": "Admin dashboard data",
        "data": data
    })))
}
