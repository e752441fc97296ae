use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use super::{handlers, videos};
use crate::state::AppState;

/// Max combined size of one upload request (uploads are buffered in memory
/// before being forwarded to the media service).
const MAX_UPLOAD_BYTES: usize = 250 * 1024 * 1024;

pub fn create_router(state: Arc<AppState>) -> Router {
    let static_dir = state.static_dir().to_string();

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route(
            "/videos",
            get(videos::list_videos)
                .post(videos::create_video)
                .delete(videos::delete_video)
                .fallback(videos::method_not_allowed),
        )
        .with_state(state);

    // Serve the upload UI with index fallback
    let index_path = format!("{}/index.html", static_dir);
    let serve_dir = ServeDir::new(&static_dir).fallback(ServeFile::new(&index_path));

    Router::new()
        .nest("/api", api_routes)
        .fallback_service(serve_dir)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
