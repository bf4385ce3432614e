/**
 * User Routes
 * Registration
 */
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::entities::{NewUser, User};
use crate::error::AppError;
use crate::usecase::CreateUserResult;

/// Body returned for a created user
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedUserResponse {
    pub id: u64,
    pub path_ava: String,
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    pub number_phone: String,
}

impl From<User> for CreatedUserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            path_ava: user.path_ava,
            username: user.username,
            firstname: user.firstname,
            lastname: user.lastname,
            number_phone: user.number_phone,
        }
    }
}

/// Body returned when registration is refused
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUserFailure {
    pub status: u8,
    pub message: String,
}

impl IntoResponse for CreateUserResult {
    fn into_response(self) -> Response {
        let code = match &self {
            CreateUserResult::Success(_) => StatusCode::CREATED,
            CreateUserResult::StorageFailure => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::CONFLICT,
        };

        match self {
            CreateUserResult::Success(user) => {
                (code, Json(CreatedUserResponse::from(user))).into_response()
            }
            refused => {
                let body = CreateUserFailure {
                    status: refused.status(),
                    message: refused.message().to_string(),
                };
                (code, Json(body)).into_response()
            }
        }
    }
}

/// POST /user/create
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<CreateUserResult, AppError> {
    let Json(candidate) = payload.map_err(|e| {
        tracing::debug!(error = %e, "create user: unreadable body");
        AppError::InvalidParams
    })?;

    if candidate.id.is_some_and(|id| id > i64::MAX as u64) {
        return Err(AppError::InvalidParams);
    }

    Ok(state.usecase.create_user(candidate).await)
}
