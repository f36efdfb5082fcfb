use anyhow::anyhow;
use serde_json::json;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use doctor_cell::models::{SlotsBooked, DOCTORS_TABLE};
use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{
    Appointment, AppointmentError, DoctorSlots, APPOINTMENTS_TABLE, CANCELLED_STATUS,
};

pub const SLOT_RELEASE_ATTEMPTS: usize = 3;

/// Remove every occurrence of `time` from the slots booked on `date`.
/// Returns how many entries were removed.
pub fn remove_slot(slots: &mut SlotsBooked, date: &str, time: &str) -> usize {
    match slots.get_mut(date) {
        Some(times) => {
            let before = times.len();
            times.retain(|t| t != time);
            before - times.len()
        }
        None => 0,
    }
}

/// Cancels appointments and hands the booked slot back to the doctor.
///
/// The appointment is flipped with an update guarded on `cancelled=false`,
/// so of two concurrent cancellations only one sees a row come back. If the
/// slot cannot be released afterwards, the appointment is restored to its
/// previous state before the error is returned.
pub struct CancellationService {
    supabase: SupabaseClient,
}

impl CancellationService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn cancel(&self, appointment_id: Option<&str>) -> Result<Appointment, AppointmentError> {
        let raw_id = appointment_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(AppointmentError::MissingInput)?;

        // No row can exist under an id that is not a UUID.
        let appointment_id = Uuid::parse_str(raw_id).map_err(|_| AppointmentError::NotFound)?;
        debug!("Cancelling appointment: {}", appointment_id);

        let appointment = self.get_appointment(appointment_id).await?;

        if appointment.cancelled {
            return Err(AppointmentError::AlreadyCancelled);
        }

        let cancelled = self.mark_cancelled(appointment_id).await?;

        if let Err(release_error) = self
            .release_slot(appointment.doc_id, &appointment.slot_date, &appointment.slot_time)
            .await
        {
            error!(
                "Slot release failed for appointment {}: {}; restoring appointment",
                appointment_id, release_error
            );
            self.restore(&appointment).await;
            return Err(AppointmentError::SlotReleaseFailed(release_error.to_string()));
        }

        info!("Appointment {} cancelled", appointment_id);
        Ok(cancelled)
    }

    pub async fn get_appointment(&self, appointment_id: Uuid) -> Result<Appointment, AppointmentError> {
        let query = format!("id=eq.{}&select=*", appointment_id);
        let mut rows: Vec<Appointment> = self.supabase.select(APPOINTMENTS_TABLE, &query).await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        if rows.is_empty() {
            return Err(AppointmentError::NotFound);
        }

        Ok(rows.swap_remove(0))
    }

    async fn mark_cancelled(&self, appointment_id: Uuid) -> Result<Appointment, AppointmentError> {
        let filter = format!("id=eq.{}&cancelled=eq.false", appointment_id);
        let mut rows: Vec<Appointment> = self.supabase.update(
            APPOINTMENTS_TABLE,
            &filter,
            json!({ "cancelled": true, "status": CANCELLED_STATUS }),
        ).await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        if rows.is_empty() {
            // Another request cancelled it between our read and this write.
            warn!("Appointment {} was cancelled concurrently", appointment_id);
            return Err(AppointmentError::AlreadyCancelled);
        }

        Ok(rows.swap_remove(0))
    }

    /// Remove the slot with a write guarded on the map that was read, so a
    /// booking or release landing in between is never overwritten. A lost
    /// guard rereads and tries again, up to `SLOT_RELEASE_ATTEMPTS` times.
    async fn release_slot(&self, doctor_id: Uuid, slot_date: &str, slot_time: &str) -> anyhow::Result<()> {
        let query = format!("id=eq.{}&select=id,slots_booked", doctor_id);

        for attempt in 1..=SLOT_RELEASE_ATTEMPTS {
            let rows: Vec<DoctorSlots> = self.supabase.select(DOCTORS_TABLE, &query).await?;

            let Some(mut doctor) = rows.into_iter().next() else {
                warn!("Doctor {} not found; no slot to release", doctor_id);
                return Ok(());
            };

            let previous = serde_json::to_string(&doctor.slots_booked)?;
            if remove_slot(&mut doctor.slots_booked, slot_date, slot_time) == 0 {
                debug!("Slot {} {} was not booked for doctor {}", slot_date, slot_time, doctor_id);
                return Ok(());
            }

            let filter = format!(
                "id=eq.{}&slots_booked=eq.{}",
                doctor.id,
                urlencoding::encode(&previous)
            );
            let updated: Vec<DoctorSlots> = self.supabase.update(
                DOCTORS_TABLE,
                &filter,
                json!({ "slots_booked": doctor.slots_booked }),
            ).await?;

            if !updated.is_empty() {
                debug!("Released slot {} {} for doctor {}", slot_date, slot_time, doctor_id);
                return Ok(());
            }

            warn!(
                "Slots for doctor {} changed during release (attempt {}/{})",
                doctor_id, attempt, SLOT_RELEASE_ATTEMPTS
            );
        }

        Err(anyhow!(
            "slots for doctor {} kept changing; gave up after {} attempts",
            doctor_id, SLOT_RELEASE_ATTEMPTS
        ))
    }

    /// Compensating write for a failed slot release.
    async fn restore(&self, previous: &Appointment) {
        let filter = format!("id=eq.{}", previous.id);
        let result: anyhow::Result<Vec<Appointment>> = self.supabase.update(
            APPOINTMENTS_TABLE,
            &filter,
            json!({ "cancelled": previous.cancelled, "status": previous.status }),
        ).await;

        match result {
            Ok(_) => info!("Appointment {} restored after failed slot release", previous.id),
            Err(e) => error!(
                "Failed to restore appointment {} after failed slot release: {}",
                previous.id, e
            ),
        }
    }
}
