//! Database Models - storage representation of each query's projection.
//! Nullable columns are `Option`; integers carry their column width.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// `users` joined with `user_roles`
#[derive(Debug, Clone, Default, PartialEq, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub path_ava: Option<String>,
    pub username: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub number_phone: Option<String>,
    pub rating: f32,
    pub verification_status: String,
    pub role_id: i32,
    pub role_name: String,
}

/// Row to insert into `users`. `id: None` lets the sequence assign one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewUserRow {
    pub id: Option<i64>,
    pub path_ava: Option<String>,
    pub username: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub number_phone: Option<String>,
}

/// `advertisements` joined with `types_promotion` and `categories`.
/// Only the owner id is projected; the seller is a separate round trip.
#[derive(Debug, Clone, Default, PartialEq, FromRow)]
pub struct AdvertisementRow {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub date_placement: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub views_count: i32,
    pub date_expire_promotion: Option<DateTime<Utc>>,
    pub type_id: i64,
    pub type_name: String,
    pub type_price: f32,
    pub type_time_live_hours: i32,
    pub category_id: i64,
    pub category_name: String,
}

/// `reviews` joined with the reviewer and their role
#[derive(Debug, Clone, Default, PartialEq, FromRow)]
pub struct ReviewRow {
    pub id: i64,
    pub deal_id: i64,
    pub text: String,
    pub mark: i16,
    pub reviewer_id: i64,
    pub reviewer_path_ava: Option<String>,
    pub reviewer_username: Option<String>,
    pub reviewer_firstname: Option<String>,
    pub reviewer_lastname: Option<String>,
    pub reviewer_number_phone: Option<String>,
    pub reviewer_rating: f32,
    pub reviewer_verification_status: String,
    pub reviewer_role_id: i32,
    pub reviewer_role_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, FromRow)]
pub struct AdPhotoRow {
    pub id: i64,
    pub path: String,
    pub advertisement_id: i64,
}

/// A deal bought by the user, joined with the advertisement's name and price
#[derive(Debug, Clone, Default, PartialEq, FromRow)]
pub struct BuyerDealRow {
    pub deal_id: i64,
    pub advertisement_id: i64,
    pub advertisement_name: String,
    pub advertisement_price: f64,
    pub deal_date: DateTime<Utc>,
}

/// Review id and mark attached to a deal
#[derive(Debug, Clone, Default, PartialEq, FromRow)]
pub struct DealReviewRow {
    pub id: i64,
    pub mark: i16,
}

/// An advertisement owned by the user
#[derive(Debug, Clone, Default, PartialEq, FromRow)]
pub struct OwnedAdvertisementRow {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub date_placement: Option<DateTime<Utc>>,
    pub views_count: i32,
    pub date_expire_promotion: Option<DateTime<Utc>>,
    pub type_name: String,
    pub category_name: String,
}

/// A review left on a deal for one of the user's advertisements
#[derive(Debug, Clone, Default, PartialEq, FromRow)]
pub struct ReceivedReviewRow {
    pub id: i64,
    pub text: String,
    pub mark: i16,
    pub deal_id: i64,
    pub deal_date: DateTime<Utc>,
    pub advertisement_id: i64,
    pub advertisement_name: String,
    pub reviewer_id: i64,
    pub reviewer_username: Option<String>,
    pub reviewer_path_ava: Option<String>,
}
