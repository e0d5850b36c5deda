use std::path::Path;

use axum::{
    handler::HandlerWithoutStateExt,
    routing::{get, post},
    Router,
};
use tower_http::services::{ServeDir, ServeFile};

pub mod demo_requests;
pub mod system;

/// Demo request endpoints, shared by both router flavours.
fn api_routes() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/api/demo-request", post(demo_requests::submit_demo_request))
        .route("/api/demo-requests", get(demo_requests::list_demo_requests))
}

/// JSON-only service: `/` describes the API and unknown paths get a JSON 404.
pub fn api_only_router() -> Router {
    api_routes()
        .route("/", get(system::info))
        .fallback(system::not_found)
}

/// Website + API: pages and assets come from `static_dir`, unknown paths still get a JSON 404.
pub fn site_router(static_dir: &Path) -> Router {
    let assets = ServeDir::new(static_dir).not_found_service(system::not_found.into_service());

    api_routes()
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .route_service("/admin", ServeFile::new(static_dir.join("admin.html")))
        .fallback_service(assets)
}
