use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use appointment_cell::router::appointment_routes;
use auth_cell::router::auth_routes;
use dashboard_cell::router::dashboard_routes;
use doctor_cell::router::doctor_routes;
use shared_config::AppConfig;

pub const ADMIN_PREFIX: &str = "/api/admin";

pub fn admin_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .merge(auth_routes(state.clone()))
        .merge(doctor_routes(state.clone()))
        .merge(appointment_routes(state.clone()))
        .merge(dashboard_routes(state))
}

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic admin API is running!" }))
        .nest(ADMIN_PREFIX, admin_routes(state))
}
