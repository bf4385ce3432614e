//! Read-only projections for the profile pages. Never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::nullable::{count_from_db, from_nullable, id_from_db, mark_from_db};
use crate::db::models::{BuyerDealRow, OwnedAdvertisementRow, ReceivedReviewRow};

/// One deal the user bought. `review_id`, `mark` and `photo_path` are filled
/// in best-effort and stay zero when unavailable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileStatistic {
    pub deal_id: u64,
    pub advertisement_id: u64,
    pub review_id: u64,
    pub advertisement_name: String,
    pub advertisement_price: f64,
    pub deal_date: Option<DateTime<Utc>>,
    pub mark: u8,
    pub photo_path: String,
}

impl From<BuyerDealRow> for ProfileStatistic {
    fn from(row: BuyerDealRow) -> Self {
        Self {
            deal_id: id_from_db(row.deal_id),
            advertisement_id: id_from_db(row.advertisement_id),
            advertisement_name: row.advertisement_name,
            advertisement_price: row.advertisement_price,
            deal_date: Some(row.deal_date),
            ..Self::default()
        }
    }
}

/// One advertisement the user owns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MyAdvertisement {
    pub id: u64,
    pub name: String,
    pub price: f64,
    pub date_placement: Option<DateTime<Utc>>,
    pub views_count: u32,
    pub date_expire_promotion: Option<DateTime<Utc>>,
    pub type_promotion: String,
    pub category: String,
    pub photo_path: String,
}

impl From<OwnedAdvertisementRow> for MyAdvertisement {
    fn from(row: OwnedAdvertisementRow) -> Self {
        Self {
            id: id_from_db(row.id),
            name: row.name,
            price: row.price,
            date_placement: row.date_placement,
            views_count: count_from_db(row.views_count),
            date_expire_promotion: row.date_expire_promotion,
            type_promotion: row.type_name,
            category: row.category_name,
            photo_path: String::new(),
        }
    }
}

/// A review the user received on one of their advertisements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileReview {
    pub id: u64,
    pub text: String,
    pub mark: u8,
    pub deal_id: u64,
    pub deal_date: Option<DateTime<Utc>>,
    pub advertisement_id: u64,
    pub advertisement_name: String,
    pub reviewer_id: u64,
    pub reviewer_username: String,
    pub reviewer_path_ava: String,
}

impl From<ReceivedReviewRow> for ProfileReview {
    fn from(row: ReceivedReviewRow) -> Self {
        Self {
            id: id_from_db(row.id),
            text: row.text,
            mark: mark_from_db(row.mark),
            deal_id: id_from_db(row.deal_id),
            deal_date: Some(row.deal_date),
            advertisement_id: id_from_db(row.advertisement_id),
            advertisement_name: row.advertisement_name,
            reviewer_id: id_from_db(row.reviewer_id),
            reviewer_username: from_nullable(row.reviewer_username),
            reviewer_path_ava: from_nullable(row.reviewer_path_ava),
        }
    }
}
