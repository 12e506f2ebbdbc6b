//! REST API module.
//!
//! Handlers for the storefront and the admin console. Every JSON response
//! uses the `{success, data}` / `{success, error}` envelope.

mod auth;
mod categories;
mod contact;
mod orders;
mod products;
mod reports;
mod settings;
mod shipping;

pub use auth::*;
pub use categories::*;
pub use contact::*;
pub use orders::*;
pub use products::*;
pub use reports::*;
pub use settings::*;
pub use shipping::*;

use axum::{
    extract::{FromRequest, FromRequestParts},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    #[serde(skip)]
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            status: StatusCode::OK,
        }
    }

    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            ..Self::new(data)
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::new(data))
}

/// Create a 201 response for a newly stored record.
pub fn created<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::created(data))
}

/// Body of action endpoints that return no record.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub fn message(text: &str) -> ApiResult<MessageResponse> {
    success(MessageResponse {
        message: text.to_string(),
    })
}

/// JSON body extractor whose rejections use the error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Query string extractor whose rejections use the error envelope.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// Require a non-blank string field.
fn require(value: &str, message: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(())
}

/// Reject strings longer than `max` characters.
fn max_len(value: &str, max: usize, field: &str) -> Result<(), AppError> {
    if value.trim().chars().count() > max {
        return Err(AppError::Validation(format!(
            "{} cannot be more than {} characters",
            field, max
        )));
    }
    Ok(())
}

/// Reject negative or non-finite amounts.
fn non_negative(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::Validation(format!("{} cannot be negative", field)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_envelope_status() {
        let response = ApiResponse::created(serde_json::json!({"id": "1"})).into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        let response = ApiResponse::new(()).into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_validation_helpers() {
        assert!(require("  ", "Name is required").is_err());
        assert!(require("x", "Name is required").is_ok());
        assert!(max_len(&"a".repeat(61), 60, "Name").is_err());
        assert!(max_len(&"a".repeat(60), 60, "Name").is_ok());
        assert!(non_negative(-0.01, "Price").is_err());
        assert!(non_negative(f64::NAN, "Price").is_err());
        assert!(non_negative(0.0, "Price").is_ok());
    }
}
