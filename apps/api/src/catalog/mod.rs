// Garment catalog: tag-based filtering over the stored garments.

pub mod filter;
pub mod handlers;
pub mod store;
