use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{Appointment, AppointmentError, APPOINTMENTS_TABLE};

pub struct AppointmentQueryService {
    supabase: SupabaseClient,
}

impl AppointmentQueryService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Every appointment, oldest booking first.
    pub async fn list_appointments(&self) -> Result<Vec<Appointment>, AppointmentError> {
        debug!("Listing all appointments");

        self.supabase.select_all(APPOINTMENTS_TABLE, "select=*&order=date.asc,id.asc").await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))
    }
}
