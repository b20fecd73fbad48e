//! Consistent JSON error responses.
//!
//! Every failure leaves the API as
//! `{"success": false, "error": <code>, "message": <text>, "details"?: <text>}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use vendorhub_auth::AuthzError;
use vendorhub_core::DomainError;
use vendorhub_infra::ServiceError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    details: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "unauthorized", message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, "forbidden", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "validation_error", message)
    }

    pub fn invalid_id(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_id", message)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "server_error", message)
    }

    /// For client errors, replace the message with an operation summary and
    /// keep the underlying text under `details`.
    pub fn context(mut self, summary: &str) -> Self {
        if self.status == StatusCode::BAD_REQUEST {
            self.details = Some(std::mem::replace(&mut self.message, summary.to_string()));
        }
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "success": false,
            "error": self.code,
            "message": self.message,
        });
        if let Some(details) = self.details {
            body["details"] = json!(details);
        }
        (self.status, axum::Json(body)).into_response()
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unauthorized(msg) => Self::unauthorized(msg),
            ServiceError::Forbidden(msg) => Self::forbidden(msg),
            ServiceError::NotFound(what) => Self::not_found(format!("{} not found", capitalize(what))),
            ServiceError::Validation(msg) => Self::validation(msg),
            ServiceError::InvalidId(msg) => Self::invalid_id(msg),
            ServiceError::Internal(msg) => {
                // Internals stay in the log, not in the response.
                error!(error = %msg, "request failed");
                Self::server("Server error")
            }
        }
    }
}

impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::NotVendor | AuthzError::NoSession => Self::unauthorized(err.to_string()),
            AuthzError::NotAdmin => Self::forbidden(err.to_string()),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ServiceError::from(err).into()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn body_of(err: ApiError) -> (StatusCode, serde_json::Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn renders_stable_shape() {
        let (status, body) = body_of(ApiError::not_found("Product not found")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "not_found");
        assert_eq!(body["message"], "Product not found");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn context_moves_message_to_details() {
        let err = ApiError::validation("name is required").context("Failed to create product");
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Failed to create product");
        assert_eq!(body["details"], "name is required");
    }

    #[test]
    fn context_leaves_other_statuses_alone() {
        let err = ApiError::not_found("Product not found").context("Failed to update product");
        assert_eq!(err.message(), "Product not found");
    }

    #[test]
    fn service_errors_map_to_statuses() {
        let cases = [
            (ServiceError::unauthorized("x"), StatusCode::UNAUTHORIZED),
            (ServiceError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (ServiceError::NotFound("product"), StatusCode::NOT_FOUND),
            (ServiceError::validation("x"), StatusCode::BAD_REQUEST),
            (ServiceError::InvalidId("x".into()), StatusCode::BAD_REQUEST),
            (ServiceError::Internal("db down".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn internal_details_are_not_exposed() {
        let err = ApiError::from(ServiceError::Internal("connection refused".into()));
        assert_eq!(err.message(), "Server error");
        assert_eq!(err.code(), "server_error");
    }

    #[test]
    fn not_found_message_names_the_resource() {
        let err = ApiError::from(ServiceError::NotFound("vendor"));
        assert_eq!(err.message(), "Vendor not found");
    }

    #[test]
    fn admin_denial_is_forbidden() {
        assert_eq!(ApiError::from(AuthzError::NotAdmin).status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::from(AuthzError::NotVendor).status(), StatusCode::UNAUTHORIZED);
    }
}
