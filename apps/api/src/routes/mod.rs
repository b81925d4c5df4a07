pub mod health;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::admin::handlers as admin;
use crate::catalog::handlers as catalog;
use crate::clients::handlers as clients;
use crate::profile::handlers as profile;
use crate::state::AppState;
use crate::styling::handlers as styling;
use crate::tryon::handlers as tryon;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Survey
        .route("/api/v1/clients", post(clients::handle_create_client))
        .route("/api/v1/clients/:id", get(clients::handle_get_client))
        .route("/api/v1/profile/wizard", post(profile::handle_wizard))
        .route("/api/v1/profile/:client_id", get(profile::handle_get_profile))
        // Styling
        .route(
            "/api/v1/recommendations",
            get(styling::handle_query_recommendations),
        )
        .route(
            "/api/v1/recommendations/:client_id",
            get(styling::handle_get_recommendations),
        )
        .route("/api/v1/catalog", get(catalog::handle_get_catalog))
        .route("/api/v1/catalog/all", get(catalog::handle_get_catalog_all))
        // Try-on
        .route("/api/v1/tryon/context", get(tryon::handle_tryon_context))
        .route("/api/v1/tryon/save", post(tryon::handle_save_tryon))
        .route("/api/v1/tryon/ai", post(tryon::handle_ai_tryon))
        // Admin
        .nest("/api/v1/admin", admin_router())
        .with_state(state)
}

fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(admin::handle_login))
        .route(
            "/garments",
            get(admin::handle_list_garments).post(admin::handle_create_garment),
        )
        .route(
            "/garments/:id",
            get(admin::handle_get_garment)
                .put(admin::handle_update_garment)
                .delete(admin::handle_delete_garment),
        )
        .route("/garments/:id/toggle", patch(admin::handle_toggle_garment))
        .route(
            "/garments/:id/images/:image_id",
            delete(admin::handle_delete_garment_image),
        )
        .route(
            "/tags",
            get(admin::handle_list_tags).post(admin::handle_upsert_tag),
        )
        .route("/tags/:id", delete(admin::handle_delete_tag))
        .route(
            "/body-types",
            get(admin::handle_list_body_types).post(admin::handle_upsert_body_type),
        )
        .route("/clients", get(admin::handle_list_clients))
        .route("/stats/today", get(admin::handle_today_stats))
}
