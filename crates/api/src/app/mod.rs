//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store construction and the shared `DemoRequestService`
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: response envelopes and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use teethtracks_infra::AppConfig;

use crate::middleware;
use services::{AppServices, DynStore};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the black-box tests).
///
/// The store is passed in already constructed so tests can substitute their own.
pub fn build_app(config: &AppConfig, store: DynStore) -> Router {
    let services: Arc<AppServices> = Arc::new(AppServices::new(store));

    let router = match &config.static_dir {
        Some(dir) => routes::site_router(dir),
        None => routes::api_only_router(),
    };

    router.layer(Extension(services)).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(middleware::cors_layer(&config.cors_allowed_origins)),
    )
}
