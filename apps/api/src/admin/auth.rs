use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::warn;

use crate::errors::AppError;
use crate::state::AppState;

pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Extractor that admits only requests carrying the configured admin key.
///
/// ```rust,ignore
/// async fn handler(_admin: AdminKey, State(state): State<AppState>) { ... }
/// ```
pub struct AdminKey;

#[async_trait]
impl FromRequestParts<AppState> for AdminKey {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let provided = parts
            .headers
            .get(ADMIN_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        if key_matches(provided, &state.config.admin_key) {
            Ok(AdminKey)
        } else {
            warn!("Rejected admin request to {}", parts.uri.path());
            Err(AppError::Unauthorized)
        }
    }
}

pub fn key_matches(provided: &str, expected: &str) -> bool {
    !provided.is_empty() && constant_time_eq(provided.as_bytes(), expected.as_bytes())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_matches() {
        assert!(key_matches("s3cret", "s3cret"));
        assert!(!key_matches("s3creT", "s3cret"));
        assert!(!key_matches("s3cret-and-more", "s3cret"));
        assert!(!key_matches("", "s3cret"));
    }

    #[test]
    fn test_empty_key_never_matches() {
        // An unset admin key must not open the back-office to empty headers
        assert!(!key_matches("", ""));
    }
}
