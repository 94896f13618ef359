use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use tracing::{error, warn};

/// JSON error body: `{"error": <title>, "detail": <message>}`.
#[derive(Debug)]
pub struct JsonApiError {
    status: StatusCode,
    error: String,
    detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: impl Into<String>, detail: Option<String>) -> Self {
        Self { status, error: error.into(), detail }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, error = %self.error, detail = ?self.detail, "request failed");
        } else {
            warn!(status = %self.status, error = %self.error, detail = ?self.detail, "request rejected");
        }
        let body = match self.detail {
            Some(detail) => serde_json::json!({ "error": self.error, "detail": detail }),
            None => serde_json::json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(rejection: JsonRejection) -> Self {
        JsonApiError::new(rejection.status(), "Invalid request body", Some(rejection.body_text()))
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        let detail = Some(e.to_string());
        match e {
            ServiceError::Validation(_) => JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", detail),
            ServiceError::NotFound(_) => JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", detail),
            ServiceError::Persist(_) => JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save data", detail),
            ServiceError::Storage(_) => JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Storage Error", detail),
        }
    }
}
