/**
 * Advertisement Routes
 */
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use super::{parse_id, AppState};
use crate::entities::Advertisement;
use crate::error::AppError;

/// Query parameters for GET /get/advertisement/all_info
#[derive(Debug, Deserialize)]
pub struct AdvertisementQuery {
    pub ad_id: Option<String>,
}

/// GET /get/advertisement/all_info?ad_id=...
/// Advertisement with seller, reviews and photos
pub async fn get_advertisement_all_info(
    State(state): State<AppState>,
    Query(query): Query<AdvertisementQuery>,
) -> Result<Json<Advertisement>, AppError> {
    let ad_id = parse_id(query.ad_id.as_deref())?;
    let advertisement = state.usecase.get_advertisement_detail(ad_id).await?;
    Ok(Json(advertisement))
}
