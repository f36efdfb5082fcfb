pub mod doctor;
pub mod media;
pub mod password;
pub mod validation;

pub use doctor::DoctorService;
pub use media::MediaService;
