use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::app::{dto, errors, services::AppServices};

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn info(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    let database = services.store_status().await;
    Json(serde_json::json!({
        "success": true,
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "status": "ok",
        "database": database.as_str(),
        "endpoints": dto::ENDPOINTS,
    }))
}

pub async fn not_found() -> axum::response::Response {
    errors::json_error(StatusCode::NOT_FOUND, "not_found", "Route not found")
}
