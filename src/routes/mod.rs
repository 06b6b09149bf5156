use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::event::{
    create_event, delete_event, get_event_by_id, list_events, update_event,
};
use crate::handlers::health_check;
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    let event_routes = Router::new()
        .route("/workspace/:workspace_id/create", post(create_event))
        .route("/workspace/:workspace_id/all", get(list_events))
        .route("/:id/workspace/:workspace_id", get(get_event_by_id))
        .route("/:id/workspace/:workspace_id/update", put(update_event))
        .route("/:id/workspace/:workspace_id/delete", delete(delete_event));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/event", event_routes)
        .layer(create_security_headers_layer())
        .layer(create_cors_layer())
        .with_state(state)
}
