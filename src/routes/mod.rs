// src/routes/mod.rs
pub mod chat;
pub mod cors;
pub mod welcome;

use crate::{config::AllowedOrigins, state::SharedState};
use axum::{
    Router,
    routing::{get, post},
};
use chat::chat_handler;
use tower_http::trace::TraceLayer;
use welcome::{hello_name, index};

pub fn create_router(origins: &AllowedOrigins) -> Router<SharedState> {
    // Cross-origin policy covers `/` and `/chat` only.
    let cors_routes = Router::new()
        .route("/", get(index))
        .route("/chat", post(chat_handler))
        .layer(cors::cors_layer(origins));

    Router::new()
        .route("/hello/{name}", get(hello_name))
        .merge(cors_routes)
        .layer(TraceLayer::new_for_http())
}
