// Back-office: garment catalog maintenance, tag and body-type reference data,
// client activity and daily stats. Everything but login requires the admin key.

pub mod auth;
pub mod handlers;
pub mod payload;
pub mod store;
