// Client registration: the survey creates a client before submitting measurements.

pub mod handlers;
pub mod store;
