// ABOUTME: API error type and its HTTP mapping
// ABOUTME: Converts storage, provisioning and auth failures into coded JSON error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

use tally_storage::StorageError;
use tally_warehouse::{ProvisionError, ProvisionStep};

/// Error type returned by every handler
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resource not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Authentication required: {message}")]
    Unauthorized { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Provisioning failed at {step}: {message}")]
    Provisioning { step: ProvisionStep, message: String },

    #[error("Storage error: {0}")]
    Storage(StorageError),
}

impl ApiError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    fn to_status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Unauthorized { .. } => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::Forbidden { .. } => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ApiError::Provisioning { .. } => (StatusCode::BAD_GATEWAY, "PROVISIONING_FAILED"),
            ApiError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
        }
    }

    /// User-facing message; internal details stay in the logs
    fn to_user_message(&self) -> String {
        match self {
            ApiError::Validation(msg) => format!("Validation failed: {}", msg),
            ApiError::NotFound => "The requested resource was not found".to_string(),
            ApiError::Conflict(msg) => msg.clone(),
            ApiError::Unauthorized { message } | ApiError::Forbidden { message } => message.clone(),
            ApiError::Provisioning { step, .. } => {
                format!("The sync service failed to {}", step)
            }
            ApiError::Storage(_) => "Data storage error".to_string(),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound => ApiError::NotFound,
            StorageError::Duplicate(_) => {
                ApiError::Conflict("A record with these values already exists".to_string())
            }
            StorageError::Validation(msg) => ApiError::Validation(msg),
            other => ApiError::Storage(other),
        }
    }
}

impl From<ProvisionError> for ApiError {
    fn from(err: ProvisionError) -> Self {
        match err {
            ProvisionError::Validation(msg) => ApiError::Validation(msg),
            ProvisionError::Provider { step, source } => ApiError::Provisioning {
                step,
                message: source.to_string(),
            },
            ProvisionError::Storage(e) => e.into(),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: ErrorDetail,
    request_id: String,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let request_id = Uuid::new_v4().to_string();
        let (status_code, error_code) = self.to_status_and_code();

        match &self {
            ApiError::Storage(err) => {
                error!(request_id = %request_id, storage_error = %err, "Storage system error");
            }
            ApiError::Provisioning { step, message } => {
                error!(
                    request_id = %request_id,
                    step = %step,
                    provider_error = %message,
                    "Source provisioning failed"
                );
            }
            ApiError::Unauthorized { .. } | ApiError::Forbidden { .. } => {
                warn!(request_id = %request_id, audit = true, "{}", self);
            }
            _ => {}
        }

        let body = ErrorResponse {
            success: false,
            error: ErrorDetail {
                code: error_code.to_string(),
                message: self.to_user_message(),
            },
            request_id,
        };

        (status_code, Json(body)).into_response()
    }
}
