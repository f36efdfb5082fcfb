pub mod appointments;
pub mod cancellation;

pub use appointments::AppointmentQueryService;
pub use cancellation::{remove_slot, CancellationService};
