//! JSON envelopes for every HTTP reply.
//!
//! Success: `{"success": true, "message": ..., "data": ...}`
//! Failure: `{"success": false, "error": ...}`

use crate::common::Error;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

pub fn success<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    success_with(data, "Success")
}

pub fn success_with<T: Serialize>(data: T, message: &str) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        message: message.to_string(),
        data,
    })
}

impl Error {
    /// Message safe to show a client; store and internal failures are
    /// logged, not echoed.
    pub fn public_message(&self) -> String {
        match self {
            Error::Store(_) | Error::Internal(_) | Error::Io(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.to_http_status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "Request failed");
        }
        (
            status,
            Json(json!({ "success": false, "error": self.public_message() })),
        )
            .into_response()
    }
}
