//! Request field normalization shared by the JSON handlers.

use std::str::FromStr;

use serde::Deserialize;

use crate::errors::AppError;
use crate::styling::body_shape::UnknownCode;

/// Trims an optional string; blank becomes `None`.
pub fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trims a required string, rejecting blanks.
pub fn require_text(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Parses an optional vocabulary code. Blank is treated as absent,
/// anything else must be a known code (case-insensitive).
pub fn parse_optional_code<T>(value: Option<String>) -> Result<Option<T>, AppError>
where
    T: FromStr<Err = UnknownCode>,
{
    clean_optional(value)
        .map(|v| v.to_lowercase().parse::<T>().map_err(AppError::from))
        .transpose()
}

/// Unwraps a field the request body must carry.
pub fn require_field<T>(field: &str, value: Option<T>) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::Validation(format!("{field} is required")))
}

/// Positive database id from a request.
pub fn require_id(field: &str, value: i64) -> Result<i64, AppError> {
    if value <= 0 {
        return Err(AppError::Validation(format!("{field} must be a positive id")));
    }
    Ok(value)
}

/// `?client_id=` on GET endpoints.
#[derive(Debug, Deserialize)]
pub struct ClientIdQuery {
    pub client_id: Option<i64>,
}

impl ClientIdQuery {
    pub fn require(&self) -> Result<i64, AppError> {
        let id = self
            .client_id
            .ok_or_else(|| AppError::Validation("client_id is required".to_string()))?;
        require_id("client_id", id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styling::body_shape::{Occasion, SkinTone};

    #[test]
    fn test_clean_optional() {
        assert_eq!(clean_optional(Some("  ana@example.com ".into())), Some("ana@example.com".into()));
        assert_eq!(clean_optional(Some("   ".into())), None);
        assert_eq!(clean_optional(None), None);
    }

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("first_name", " Ana ").unwrap(), "Ana");
        assert!(matches!(require_text("first_name", "  "), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_parse_optional_code() {
        assert_eq!(
            parse_optional_code::<SkinTone>(Some(" Oscuro ".into())).unwrap(),
            Some(SkinTone::Oscuro)
        );
        assert_eq!(parse_optional_code::<Occasion>(Some("".into())).unwrap(), None);
        assert_eq!(parse_optional_code::<Occasion>(None).unwrap(), None);
        assert!(matches!(
            parse_optional_code::<Occasion>(Some("boda".into())),
            Err(AppError::Validation(msg)) if msg.contains("boda")
        ));
    }

    #[test]
    fn test_require_id() {
        assert_eq!(require_id("client_id", 3).unwrap(), 3);
        assert!(require_id("client_id", 0).is_err());
        assert!(require_id("client_id", -4).is_err());
    }

    #[test]
    fn test_require_field() {
        assert_eq!(require_field("hip_cm", Some(98.5)).unwrap(), 98.5);
        assert!(matches!(
            require_field::<f64>("hip_cm", None),
            Err(AppError::Validation(msg)) if msg == "hip_cm is required"
        ));
    }

    #[test]
    fn test_client_id_query() {
        assert_eq!(ClientIdQuery { client_id: Some(9) }.require().unwrap(), 9);
        assert!(ClientIdQuery { client_id: None }.require().is_err());
        assert!(ClientIdQuery { client_id: Some(0) }.require().is_err());
    }
}
