//! Response envelopes and error mapping.
//!
//! Every failure leaves a handler as an [`ApiError`], which wraps the tagged
//! [`DomainError`] and renders the envelope for its kind:
//!
//! | kind         | status | body                          |
//! |--------------|--------|-------------------------------|
//! | `validation` | 400    | `{"status": 400, "message"}`  |
//! | `not_found`  | 404    | `{"message"}`                 |
//! | `storage`    | 500    | `{"error"}`                   |

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use catalog_core::{DomainError, ErrorKind};
use catalog_infra::StoreError;
use catalog_products::{ValidationMode, ValidationReport};

pub const CREATE_REJECTED: &str = "All fields are required";
pub const UPDATE_REJECTED: &str = "Invalid data";
pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// Handler error: a domain error on its way to becoming an envelope.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        domain_error_to_response(self.0)
    }
}

pub fn domain_error_to_response(err: DomainError) -> Response {
    match err.kind() {
        ErrorKind::Validation => validation_error(err.to_string()),
        ErrorKind::NotFound => message(StatusCode::NOT_FOUND, err.to_string()),
        ErrorKind::Storage => {
            tracing::error!(error = %err, "product store operation failed");
            storage_error(err.to_string())
        }
    }
}

/// Turn a failed payload check into the coarse error of its mode.
///
/// The full report is logged; clients only see the fixed message.
pub fn rejected_payload(mode: ValidationMode, report: &ValidationReport) -> DomainError {
    tracing::debug!(
        ?mode,
        violations = ?report.messages(),
        "request payload rejected"
    );
    let message = match mode {
        ValidationMode::Create => CREATE_REJECTED,
        ValidationMode::Update => UPDATE_REJECTED,
    };
    DomainError::validation(message)
}

pub fn validation_error(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "status": StatusCode::BAD_REQUEST.as_u16(),
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn storage_error(detail: impl Into<String>) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": detail.into() })),
    )
        .into_response()
}

/// Bare `{"message"}` envelope with an arbitrary status.
pub fn message(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "message": message.into() }))).into_response()
}

/// Last-resort response for failures outside any handler's contract.
pub fn internal_server_error() -> Response {
    message(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    async fn body_json(res: Response) -> Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_errors_render_status_envelope() {
        let res = ApiError(DomainError::invalid_id("Product Id = x is invalid !")).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(res).await,
            json!({ "status": 400, "message": "Product Id = x is invalid !" })
        );
    }

    #[tokio::test]
    async fn not_found_renders_message_envelope() {
        let res = ApiError(DomainError::not_found()).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(res).await, json!({ "message": "Product not found" }));
    }

    #[tokio::test]
    async fn storage_errors_pass_detail_through() {
        let res = ApiError::from(StoreError::backend("Internal server error")).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(res).await, json!({ "error": "Internal server error" }));
    }

    #[test]
    fn rejected_payload_uses_the_mode_message() {
        let report = ValidationReport::default();
        assert_eq!(
            rejected_payload(ValidationMode::Create, &report),
            DomainError::validation(CREATE_REJECTED)
        );
        assert_eq!(
            rejected_payload(ValidationMode::Update, &report),
            DomainError::validation(UPDATE_REJECTED)
        );
    }
}
