mod handlers;

use std::sync::{Arc, Mutex};

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::store::DocumentStore;

/// The single store, shared by all handlers. Each handler holds the lock for
/// the whole operation, so every operation is atomic to callers.
pub type SharedStore = Arc<Mutex<DocumentStore>>;

pub fn create_router(store: DocumentStore) -> Router {
    create_router_shared(Arc::new(Mutex::new(store)))
}

pub fn create_router_shared(store: SharedStore) -> Router {
    let api = Router::new()
        // Document
        .route(
            "/document",
            get(handlers::get_document).delete(handlers::clear_document),
        )
        .route("/completion", get(handlers::get_completion))
        // Sections (whole-section replace)
        .route(
            "/sections/{key}",
            get(handlers::get_section).put(handlers::put_section),
        )
        .route("/schema", get(handlers::get_schema))
        // Export / import
        .route("/export/{format}", get(handlers::export))
        .route("/import", post(handlers::import))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(store)
}
