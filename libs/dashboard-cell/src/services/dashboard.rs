use tracing::debug;

use appointment_cell::models::{Appointment, APPOINTMENTS_TABLE};
use doctor_cell::models::DOCTORS_TABLE;
use shared_config::{AppConfig, LatestOrder};
use shared_database::supabase::SupabaseClient;

use crate::models::{DashboardData, DashboardError, LATEST_APPOINTMENTS_LIMIT, USERS_TABLE};

/// Query for the rows `latest_appointments` picks from.
pub fn latest_query(order: LatestOrder) -> String {
    match order {
        LatestOrder::Storage => format!("select=*&limit={}", LATEST_APPOINTMENTS_LIMIT),
        LatestOrder::CreatedDesc => format!("select=*&order=date.desc&limit={}", LATEST_APPOINTMENTS_LIMIT),
    }
}

/// Pick the dashboard's latest appointments from rows in storage order.
///
/// `Storage` keeps the historical behaviour: the first rows in storage order,
/// reversed. It only means "most recent" when storage order is insertion
/// order. `CreatedDesc` sorts by creation timestamp instead.
pub fn latest_appointments(mut appointments: Vec<Appointment>, order: LatestOrder) -> Vec<Appointment> {
    match order {
        LatestOrder::Storage => {
            appointments.truncate(LATEST_APPOINTMENTS_LIMIT);
            appointments.reverse();
        }
        LatestOrder::CreatedDesc => {
            appointments.sort_by(|a, b| b.date.cmp(&a.date));
            appointments.truncate(LATEST_APPOINTMENTS_LIMIT);
        }
    }

    appointments
}

pub struct DashboardService {
    supabase: SupabaseClient,
    latest_order: LatestOrder,
}

impl DashboardService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            latest_order: config.dashboard_latest_order,
        }
    }

    /// Recomputed from scratch on every call.
    pub async fn dashboard(&self) -> Result<DashboardData, DashboardError> {
        debug!("Computing admin dashboard ({:?} ordering)", self.latest_order);

        let (patients, doctors, appointments, latest) = tokio::try_join!(
            self.count(USERS_TABLE),
            self.count(DOCTORS_TABLE),
            self.count(APPOINTMENTS_TABLE),
            self.latest(),
        )?;

        Ok(DashboardData {
            patients,
            doctors,
            appointments,
            latest_appointments: latest_appointments(latest, self.latest_order),
        })
    }

    async fn count(&self, table: &'static str) -> Result<u64, DashboardError> {
        self.supabase.count(table, "select=id").await
            .map_err(|e| DashboardError::DatabaseError { table, message: e.to_string() })
    }

    async fn latest(&self) -> Result<Vec<Appointment>, DashboardError> {
        self.supabase.select(APPOINTMENTS_TABLE, &latest_query(self.latest_order)).await
            .map_err(|e| DashboardError::DatabaseError {
                table: APPOINTMENTS_TABLE,
                message: e.to_string(),
            })
    }
}
