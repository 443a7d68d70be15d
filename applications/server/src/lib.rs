//! Remix Server Library
//!
//! HTTP surface, configuration, and background jobs for the shared playlist
//! engine.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod jobs;
pub mod middleware;
pub mod state;

// Re-export commonly used types for convenience
pub use config::RemixConfig;
pub use error::{Result, ServerError};
pub use jobs::RefreshScheduler;
pub use state::AppState;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the application router
pub fn create_router(app_state: AppState) -> Router {
    let routes = Router::new()
        .route("/health", get(api::health::health))
        .route("/auth/refresh", post(api::auth::refresh))
        .route(
            "/playlists",
            get(api::playlists::list_playlists)
                .post(api::playlists::create_playlist)
                .delete(api::playlists::remove_playlists),
        )
        .route("/playlists/:id/refresh", post(api::playlists::refresh_playlist))
        .route("/playlists/:id/subscribe", post(api::playlists::subscribe))
        .route("/playlists/:id/history", get(api::playlists::get_history));

    Router::new()
        .nest("/api", routes)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
