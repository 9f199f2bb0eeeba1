mod admin;
pub mod auth;
mod books;
pub mod error;
mod purchase;
mod validation;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    // Protected routes; the AuthUser extractor in each handler enforces
    // the bearer token and role checks happen in the handlers
    let api_routes = Router::new()
        // Catalog
        .route("/books", get(books::list_books))
        .route("/books", post(books::create_book))
        .route("/books/:id", put(books::update_book))
        .route("/books/:id", delete(books::delete_book))
        // Purchases
        .route("/purchase/:book_id", post(purchase::purchase_book))
        // Admin
        .route("/admin/ban/:user_id", post(admin::ban_user))
        .route("/admin/stats", get(admin::stats));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", auth_routes.merge(api_routes))
        .nest_service(
            "/uploads",
            ServeDir::new(&state.config.storage.upload_dir),
        )
        // Multipart bodies carry the photo plus a little form overhead
        .layer(DefaultBodyLimit::max(
            state.config.storage.max_upload_bytes + 1024 * 1024,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
