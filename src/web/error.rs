use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::CatalogError;

/// Everything a handler can fail with, mapped onto the response envelope.
#[derive(Debug)]
pub enum ApiError {
    NotFound {
        message: &'static str,
        error_code: &'static str,
    },
    Validation(FieldErrors),
    Internal,
}

impl ApiError {
    pub fn organization_not_found() -> Self {
        ApiError::NotFound {
            message: "Organization not found",
            error_code: "ORGANIZATION_NOT_FOUND",
        }
    }

    pub fn building_not_found() -> Self {
        ApiError::NotFound {
            message: "Building not found",
            error_code: "BUILDING_NOT_FOUND",
        }
    }

    pub fn activity_not_found() -> Self {
        ApiError::NotFound {
            message: "Activity not found",
            error_code: "ACTIVITY_NOT_FOUND",
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::OrganizationNotFound => ApiError::organization_not_found(),
            CatalogError::BuildingNotFound => ApiError::building_not_found(),
            CatalogError::ActivityNotFound => ApiError::activity_not_found(),
            CatalogError::Db(e) => {
                tracing::error!(error = %e, "storage query failed");
                ApiError::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound { message, error_code } => (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "success": false,
                    "message": message,
                    "error_code": error_code,
                })),
            )
                .into_response(),
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "success": false,
                    "message": "Validation failed",
                    "error_code": "VALIDATION_FAILED",
                    "errors": errors.to_map(),
                })),
            )
                .into_response(),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "message": "Internal server error",
                })),
            )
                .into_response(),
        }
    }
}

/// Accumulates per-field validation messages so one response can list every
/// violated field at once.
#[derive(Debug, Default)]
pub struct FieldErrors(Vec<(&'static str, String)>);

impl FieldErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push((field, message.into()));
    }

    pub fn into_result(self) -> Result<(), ApiError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self))
        }
    }

    fn to_map(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut map = serde_json::Map::new();
        for (field, message) in &self.0 {
            map.entry(field.to_string())
                .or_insert_with(|| json!(message));
        }
        map
    }
}
