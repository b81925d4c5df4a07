use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::clients::store::{create_client, get_client, NewClient};
use crate::errors::AppError;
use crate::input::{clean_optional, require_text};
use crate::models::client::ClientRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateClientRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub age_range: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateClientResponse {
    pub client_id: i64,
}

impl CreateClientRequest {
    fn into_new_client(self) -> Result<NewClient, AppError> {
        Ok(NewClient {
            first_name: require_text("first_name", &self.first_name)?,
            last_name: require_text("last_name", &self.last_name)?,
            email: clean_optional(self.email),
            phone: clean_optional(self.phone),
            age_range: clean_optional(self.age_range),
        })
    }
}

/// POST /api/v1/clients
pub async fn handle_create_client(
    State(state): State<AppState>,
    Json(req): Json<CreateClientRequest>,
) -> Result<Json<CreateClientResponse>, AppError> {
    let new_client = req.into_new_client()?;
    let client = create_client(&state.db, &new_client).await?;
    info!("Created client {}", client.id);
    Ok(Json(CreateClientResponse {
        client_id: client.id,
    }))
}

/// GET /api/v1/clients/:id
pub async fn handle_get_client(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ClientRow>, AppError> {
    let client = get_client(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Client {id} not found")))?;
    Ok(Json(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(first: &str, last: &str) -> CreateClientRequest {
        CreateClientRequest {
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: Some("  ".to_string()),
            phone: Some(" 555-0101 ".to_string()),
            age_range: None,
        }
    }

    #[test]
    fn test_names_are_required() {
        assert!(request("", "Pérez").into_new_client().is_err());
        assert!(request("Ana", "   ").into_new_client().is_err());
    }

    #[test]
    fn test_missing_name_is_a_validation_error() {
        let req: CreateClientRequest = serde_json::from_str(r#"{"last_name": "Pérez"}"#).unwrap();
        assert!(matches!(
            req.into_new_client(),
            Err(AppError::Validation(msg)) if msg.contains("first_name")
        ));
    }

    #[test]
    fn test_optional_fields_are_cleaned() {
        let client = request(" Ana ", "Pérez").into_new_client().unwrap();
        assert_eq!(client.first_name, "Ana");
        assert_eq!(client.email, None);
        assert_eq!(client.phone.as_deref(), Some("555-0101"));
    }
}
