// Admin dashboard: headline counts and the latest appointments.

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{DashboardData, DashboardError};
pub use services::DashboardService;
pub use router::dashboard_routes;
