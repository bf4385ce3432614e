/**
 * Profile Routes
 * User info and the denormalized profile pages
 */
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use super::{parse_id, AppState};
use crate::entities::{MyAdvertisement, ProfileReview, ProfileStatistic, User};
use crate::error::AppError;

/// Query parameters shared by every /get/profile/* endpoint
#[derive(Debug, Deserialize)]
pub struct ProfileQuery {
    pub user_id: Option<String>,
}

impl ProfileQuery {
    fn user_id(&self) -> Result<u64, AppError> {
        parse_id(self.user_id.as_deref())
    }
}

/// GET /get/profile/all_info?user_id=...
pub async fn get_profile_all_info(
    State(state): State<AppState>,
    Query(query): Query<ProfileQuery>,
) -> Result<Json<User>, AppError> {
    let user = state.usecase.get_profile_info(query.user_id()?).await?;
    Ok(Json(user))
}

/// GET /get/profile/statistics?user_id=...
pub async fn get_profile_statistics(
    State(state): State<AppState>,
    Query(query): Query<ProfileQuery>,
) -> Result<Json<Vec<ProfileStatistic>>, AppError> {
    let statistics = state
        .usecase
        .get_profile_statistics(query.user_id()?)
        .await?;
    Ok(Json(statistics))
}

/// GET /get/profile/my_advertisements?user_id=...
pub async fn get_profile_my_advertisements(
    State(state): State<AppState>,
    Query(query): Query<ProfileQuery>,
) -> Result<Json<Vec<MyAdvertisement>>, AppError> {
    let advertisements = state
        .usecase
        .get_profile_my_advertisements(query.user_id()?)
        .await?;
    Ok(Json(advertisements))
}

/// GET /get/profile/reviews?user_id=...
pub async fn get_profile_reviews(
    State(state): State<AppState>,
    Query(query): Query<ProfileQuery>,
) -> Result<Json<Vec<ProfileReview>>, AppError> {
    let reviews = state.usecase.get_profile_reviews(query.user_id()?).await?;
    Ok(Json(reviews))
}
