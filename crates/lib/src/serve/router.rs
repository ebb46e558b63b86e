//! Axum router serving the publish tree as static files.

use std::path::Path;

use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Build a router that maps every request path onto a file under `root`.
///
/// Directories answer with their `index.html`. Paths with no matching file
/// get `404 Not Found`.
pub fn build_router(root: &Path) -> Router {
  Router::new()
    .fallback_service(ServeDir::new(root).append_index_html_on_directories(true))
    .layer(TraceLayer::new_for_http())
}
