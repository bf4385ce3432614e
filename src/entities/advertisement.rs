use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::nullable::{count_from_db, from_nullable, id_from_db, id_to_db, mark_from_db, to_nullable};
use super::user::{User, UserRole};
use crate::db::models::{AdPhotoRow, AdvertisementRow, ReviewRow};

/// Paid placement tier attached to an advertisement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromotionType {
    pub id: u64,
    pub name: String,
    pub price: f32,
    pub time_live_hours: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdPhoto {
    pub id: u64,
    pub path: String,
    pub advertisement_id: u64,
}

/// Review left by a buyer on the deal that bought the advertisement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: u64,
    pub deal_id: u64,
    pub text: String,
    pub mark: u8,
    pub reviewer: User,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Advertisement {
    pub id: u64,
    pub user: User,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub date_placement: Option<DateTime<Utc>>,
    pub location: String,
    pub type_promotion: PromotionType,
    pub views_count: u32,
    pub date_expire_promotion: Option<DateTime<Utc>>,
    pub category: Category,
    pub reviews: Vec<Review>,
    pub photos: Vec<AdPhoto>,
}

/// Only the owner id is known after the core fetch; the seller profile,
/// reviews and photos are filled in by the aggregation step.
impl From<AdvertisementRow> for Advertisement {
    fn from(row: AdvertisementRow) -> Self {
        Self {
            id: id_from_db(row.id),
            user: User {
                id: id_from_db(row.user_id),
                ..User::default()
            },
            name: row.name,
            description: from_nullable(row.description),
            price: row.price,
            date_placement: row.date_placement,
            location: from_nullable(row.location),
            type_promotion: PromotionType {
                id: id_from_db(row.type_id),
                name: row.type_name,
                price: row.type_price,
                time_live_hours: count_from_db(row.type_time_live_hours),
            },
            views_count: count_from_db(row.views_count),
            date_expire_promotion: row.date_expire_promotion,
            category: Category {
                id: id_from_db(row.category_id),
                name: row.category_name,
            },
            reviews: Vec::new(),
            photos: Vec::new(),
        }
    }
}

impl From<&Advertisement> for AdvertisementRow {
    fn from(ad: &Advertisement) -> Self {
        Self {
            id: id_to_db(ad.id),
            user_id: id_to_db(ad.user.id),
            name: ad.name.clone(),
            description: to_nullable(&ad.description),
            price: ad.price,
            date_placement: ad.date_placement,
            location: to_nullable(&ad.location),
            views_count: i32::try_from(ad.views_count).unwrap_or(i32::MAX),
            date_expire_promotion: ad.date_expire_promotion,
            type_id: id_to_db(ad.type_promotion.id),
            type_name: ad.type_promotion.name.clone(),
            type_price: ad.type_promotion.price,
            type_time_live_hours: i32::try_from(ad.type_promotion.time_live_hours)
                .unwrap_or(i32::MAX),
            category_id: id_to_db(ad.category.id),
            category_name: ad.category.name.clone(),
        }
    }
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: id_from_db(row.id),
            deal_id: id_from_db(row.deal_id),
            text: row.text,
            mark: mark_from_db(row.mark),
            reviewer: User {
                id: id_from_db(row.reviewer_id),
                path_ava: from_nullable(row.reviewer_path_ava),
                username: from_nullable(row.reviewer_username),
                firstname: from_nullable(row.reviewer_firstname),
                lastname: from_nullable(row.reviewer_lastname),
                number_phone: from_nullable(row.reviewer_number_phone),
                rating: row.reviewer_rating,
                verification_status: row.reviewer_verification_status,
                role: UserRole {
                    id: u32::try_from(row.reviewer_role_id).unwrap_or_default(),
                    name: row.reviewer_role_name,
                },
            },
        }
    }
}

impl From<AdPhotoRow> for AdPhoto {
    fn from(row: AdPhotoRow) -> Self {
        Self {
            id: id_from_db(row.id),
            path: row.path,
            advertisement_id: id_from_db(row.advertisement_id),
        }
    }
}
