//! Image payload handling: data URLs in and out of the API, and object
//! storage for client photos and try-on results.

pub mod data_url;
pub mod store;

use thiserror::Error;

pub use data_url::InlineImage;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("{0}")]
    InvalidImage(String),

    #[error("{0}")]
    Storage(String),
}
