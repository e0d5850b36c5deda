use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    Json,
};

use teethtracks_core::Submission;

use crate::app::{dto, errors, services::AppServices};

pub async fn submit_demo_request(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<Submission>, JsonRejection>,
) -> axum::response::Response {
    let Json(submission) = match body {
        Ok(b) => b,
        Err(rejection) => {
            tracing::info!(reason = %rejection.body_text(), "demo request body rejected");
            return errors::json_rejection_to_response(rejection);
        }
    };

    match services.submit(submission).await {
        Ok(record) => dto::submitted(record),
        Err(e) => errors::submit_error_to_response(e, "Failed to submit demo request"),
    }
}

pub async fn list_demo_requests(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.list().await {
        Ok(records) => dto::listed(records),
        Err(e) => errors::submit_error_to_response(e, "Failed to fetch demo requests"),
    }
}
