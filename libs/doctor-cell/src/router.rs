use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::post,
    middleware,
};

use shared_config::AppConfig;
use shared_utils::extractor::admin_auth_middleware;

use crate::handlers;

pub fn doctor_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route(
            "/add-doctor",
            post(handlers::add_doctor).layer(DefaultBodyLimit::max(state.max_upload_bytes)),
        )
        .route("/all-doctors", post(handlers::all_doctors).get(handlers::all_doctors))
        .route_layer(middleware::from_fn_with_state(state.clone(), admin_auth_middleware))
        .with_state(state)
}
