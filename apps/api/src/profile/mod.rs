// Survey wizard: measurements + photo in, body shape out.
// The stored body shape is always the classifier output for the stored measurements.

pub mod handlers;
pub mod store;
