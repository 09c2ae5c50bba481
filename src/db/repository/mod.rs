pub mod appointment;
pub mod patient;
pub mod preference;
pub mod session;
