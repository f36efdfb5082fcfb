pub mod dashboard;

pub use dashboard::{latest_appointments, DashboardService};
