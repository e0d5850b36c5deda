use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use teethtracks_infra::SubmitError;

/// Standard error envelope: `{ success: false, message, error }`.
pub fn json_error(
    status: StatusCode,
    error: impl Into<String>,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "success": false,
            "message": message.into(),
            "error": error.into(),
        })),
    )
        .into_response()
}

/// Map a service error to a response.
///
/// `failure_message` is what the client sees for store failures; the store's own
/// diagnostic goes in `error`.
pub fn submit_error_to_response(err: SubmitError, failure_message: &str) -> axum::response::Response {
    match err {
        SubmitError::Validation(v) => (
            StatusCode::BAD_REQUEST,
            axum::Json(json!({
                "success": false,
                "message": v.to_string(),
                "error": "validation_error",
                "details": v.issues(),
            })),
        )
            .into_response(),
        SubmitError::DuplicateEmail(_) => json_error(
            StatusCode::CONFLICT,
            "duplicate_email",
            "a demo request with this email has already been submitted",
        ),
        SubmitError::StoreUnavailable(diagnostic) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, diagnostic, failure_message)
        }
    }
}

pub fn json_rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_body", rejection.body_text())
}
