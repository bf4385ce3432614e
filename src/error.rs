//! Error types
//!
//! `StoreError` is raised by the data access layer and travels unchanged
//! through the aggregation layer. `AppError` is the boundary's view of a
//! failure and renders as the `{status, text}` payload.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Entity kinds that can be reported missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Advertisement,
    User,
    Review,
    Photo,
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Entity::Advertisement => write!(f, "advertisement"),
            Entity::User => write!(f, "user"),
            Entity::Review => write!(f, "review"),
            Entity::Photo => write!(f, "photo"),
        }
    }
}

/// User columns guarded by a uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Id,
    Phone,
    Username,
}

impl std::fmt::Display for UniqueField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UniqueField::Id => write!(f, "id"),
            UniqueField::Phone => write!(f, "number_phone"),
            UniqueField::Username => write!(f, "username"),
        }
    }
}

/// Data access errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(Entity),

    #[error("{0} is already in use")]
    ConstraintViolation(UniqueField),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Wire status for read failures: the request could not be parsed.
pub const STATUS_INVALID_PARAMS: u8 = 0;
/// Wire status for read failures: the data could not be assembled.
pub const STATUS_GET_INFO: u8 = 1;

pub const TEXT_INVALID_PARAMS: &str = "invalid params";
pub const TEXT_GET_INFO: &str = "can not get info";

/// Boundary errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("invalid params")]
    InvalidParams,

    #[error("can not get info: {0}")]
    GetInfo(#[from] StoreError),
}

/// Error payload returned by every read endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: u8,
    pub text: String,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidParams => StatusCode::BAD_REQUEST,
            AppError::GetInfo(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::GetInfo(StoreError::ConstraintViolation(_)) => StatusCode::CONFLICT,
            AppError::GetInfo(StoreError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            AppError::InvalidParams => ErrorBody {
                status: STATUS_INVALID_PARAMS,
                text: TEXT_INVALID_PARAMS.to_string(),
            },
            AppError::GetInfo(_) => ErrorBody {
                status: STATUS_GET_INFO,
                text: TEXT_GET_INFO.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::GetInfo(err) = &self {
            if err.is_not_found() {
                tracing::info!(error = %err, "request rejected");
            } else {
                tracing::error!(error = %err, "request failed");
            }
        }
        (self.status_code(), Json(self.body())).into_response()
    }
}
