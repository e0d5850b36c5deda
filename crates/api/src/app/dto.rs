use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use teethtracks_core::DemoRequest;

// -------------------------
// Response envelopes
// -------------------------

#[derive(Debug, Serialize)]
pub struct SubmittedResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: DemoRequest,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<DemoRequest>,
}

#[derive(Debug, Serialize)]
pub struct Endpoint {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

pub const ENDPOINTS: [Endpoint; 4] = [
    Endpoint {
        method: "GET",
        path: "/",
        description: "service info",
    },
    Endpoint {
        method: "GET",
        path: "/health",
        description: "liveness check",
    },
    Endpoint {
        method: "POST",
        path: "/api/demo-request",
        description: "submit a demo request",
    },
    Endpoint {
        method: "GET",
        path: "/api/demo-requests",
        description: "list demo requests, most recent first",
    },
];

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn submitted(record: DemoRequest) -> axum::response::Response {
    (
        StatusCode::CREATED,
        axum::Json(SubmittedResponse {
            success: true,
            message: "Demo request submitted successfully",
            data: record,
        }),
    )
        .into_response()
}

pub fn listed(records: Vec<DemoRequest>) -> axum::response::Response {
    (
        StatusCode::OK,
        axum::Json(ListResponse {
            success: true,
            count: records.len(),
            data: records,
        }),
    )
        .into_response()
}
