pub mod body_type;
pub mod client;
pub mod garment;
pub mod profile;
pub mod tryon;
