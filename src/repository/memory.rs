//! In-memory repository used by the unit tests. Records every call and can be
//! told to fail specific operations with a storage error.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use super::MarketplaceRepository;
use crate::db::models::{
    AdPhotoRow, AdvertisementRow, BuyerDealRow, DealReviewRow, NewUserRow, OwnedAdvertisementRow,
    ReceivedReviewRow, ReviewRow, UserRow,
};
use crate::entities::{id_from_db, id_to_db};
use crate::error::{Entity, StoreError, StoreResult, UniqueField};

#[derive(Debug, Clone)]
struct DealRecord {
    id: i64,
    advertisement_id: i64,
    buyer_id: i64,
    deal_date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct ReviewRecord {
    id: i64,
    deal_id: i64,
    reviewer_id: i64,
    text: String,
    mark: i16,
}

#[derive(Default)]
struct Tables {
    users: Vec<UserRow>,
    advertisements: Vec<AdvertisementRow>,
    deals: Vec<DealRecord>,
    reviews: Vec<ReviewRecord>,
    photos: Vec<AdPhotoRow>,
    /// Last value handed out by the `users` id sequence.
    user_sequence: i64,
}

#[derive(Default)]
pub(crate) struct MemoryRepository {
    tables: Mutex<Tables>,
    calls: Mutex<Vec<&'static str>>,
    failing: Mutex<HashSet<&'static str>>,
    stale_checks: bool,
}

impl MemoryRepository {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_user(self, id: u64, username: &str, number_phone: &str) -> Self {
        let row = UserRow {
            id: id_to_db(id),
            username: (!username.is_empty()).then(|| username.to_string()),
            number_phone: (!number_phone.is_empty()).then(|| number_phone.to_string()),
            rating: 4.5,
            verification_status: "verified".to_string(),
            role_id: 1,
            role_name: "user".to_string(),
            ..UserRow::default()
        };
        let mut tables = self.tables.lock().unwrap();
        tables.user_sequence = tables.user_sequence.max(row.id);
        tables.users.push(row);
        drop(tables);
        self
    }

    pub(crate) fn with_advertisement(self, id: u64, owner_id: u64, name: &str) -> Self {
        let row = AdvertisementRow {
            id: id_to_db(id),
            user_id: id_to_db(owner_id),
            name: name.to_string(),
            price: 100.0,
            date_placement: Some(Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap()),
            views_count: 3,
            type_id: 1,
            type_name: "basic".to_string(),
            type_price: 0.0,
            type_time_live_hours: 24,
            category_id: 2,
            category_name: "electronics".to_string(),
            ..AdvertisementRow::default()
        };
        self.tables.lock().unwrap().advertisements.push(row);
        self
    }

    pub(crate) fn with_deal(self, id: u64, advertisement_id: u64, buyer_id: u64) -> Self {
        let record = DealRecord {
            id: id_to_db(id),
            advertisement_id: id_to_db(advertisement_id),
            buyer_id: id_to_db(buyer_id),
            deal_date: Utc.with_ymd_and_hms(2024, 2, 1, 9, 30, 0).unwrap(),
        };
        self.tables.lock().unwrap().deals.push(record);
        self
    }

    pub(crate) fn with_review(self, id: u64, deal_id: u64, reviewer_id: u64, mark: i16) -> Self {
        let record = ReviewRecord {
            id: id_to_db(id),
            deal_id: id_to_db(deal_id),
            reviewer_id: id_to_db(reviewer_id),
            text: format!("review {id}"),
            mark,
        };
        self.tables.lock().unwrap().reviews.push(record);
        self
    }

    pub(crate) fn with_photo(self, id: u64, advertisement_id: u64, path: &str) -> Self {
        let row = AdPhotoRow {
            id: id_to_db(id),
            path: path.to_string(),
            advertisement_id: id_to_db(advertisement_id),
        };
        self.tables.lock().unwrap().photos.push(row);
        self
    }

    /// Make `operation` fail with a storage error from now on.
    pub(crate) fn fail_on(self, operation: &'static str) -> Self {
        self.failing.lock().unwrap().insert(operation);
        self
    }

    /// Existence and uniqueness checks report "free" even when a row exists,
    /// as if a concurrent registration landed between check and insert.
    pub(crate) fn with_stale_checks(mut self) -> Self {
        self.stale_checks = true;
        self
    }

    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self, operation: &str) -> usize {
        self.calls().iter().filter(|c| **c == operation).count()
    }

    fn record(&self, operation: &'static str) -> StoreResult<()> {
        self.calls.lock().unwrap().push(operation);
        if self.failing.lock().unwrap().contains(operation) {
            return Err(StoreError::Storage(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl MarketplaceRepository for MemoryRepository {
    async fn advertisement_exists(&self, ad_id: u64) -> StoreResult<bool> {
        self.record("advertisement_exists")?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.advertisements.iter().any(|a| a.id == id_to_db(ad_id)))
    }

    async fn fetch_advertisement(&self, ad_id: u64) -> StoreResult<AdvertisementRow> {
        self.record("fetch_advertisement")?;
        let tables = self.tables.lock().unwrap();
        tables
            .advertisements
            .iter()
            .find(|a| a.id == id_to_db(ad_id))
            .cloned()
            .ok_or(StoreError::NotFound(Entity::Advertisement))
    }

    async fn fetch_advertisement_reviews(&self, ad_id: u64) -> StoreResult<Vec<ReviewRow>> {
        self.record("fetch_advertisement_reviews")?;
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<ReviewRow> = tables
            .reviews
            .iter()
            .filter(|r| {
                tables
                    .deals
                    .iter()
                    .any(|d| d.id == r.deal_id && d.advertisement_id == id_to_db(ad_id))
            })
            .filter_map(|r| {
                let reviewer = tables.users.iter().find(|u| u.id == r.reviewer_id)?;
                Some(ReviewRow {
                    id: r.id,
                    deal_id: r.deal_id,
                    text: r.text.clone(),
                    mark: r.mark,
                    reviewer_id: reviewer.id,
                    reviewer_path_ava: reviewer.path_ava.clone(),
                    reviewer_username: reviewer.username.clone(),
                    reviewer_firstname: reviewer.firstname.clone(),
                    reviewer_lastname: reviewer.lastname.clone(),
                    reviewer_number_phone: reviewer.number_phone.clone(),
                    reviewer_rating: reviewer.rating,
                    reviewer_verification_status: reviewer.verification_status.clone(),
                    reviewer_role_id: reviewer.role_id,
                    reviewer_role_name: reviewer.role_name.clone(),
                })
            })
            .collect();
        rows.sort_by_key(|r| r.id);
        Ok(rows)
    }

    async fn fetch_advertisement_photos(&self, ad_id: u64) -> StoreResult<Vec<AdPhotoRow>> {
        self.record("fetch_advertisement_photos")?;
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<AdPhotoRow> = tables
            .photos
            .iter()
            .filter(|p| p.advertisement_id == id_to_db(ad_id))
            .cloned()
            .collect();
        rows.sort_by_key(|p| p.id);
        Ok(rows)
    }

    async fn fetch_main_photo(&self, ad_id: u64) -> StoreResult<String> {
        self.record("fetch_main_photo")?;
        let tables = self.tables.lock().unwrap();
        tables
            .photos
            .iter()
            .filter(|p| p.advertisement_id == id_to_db(ad_id))
            .min_by_key(|p| p.id)
            .map(|p| p.path.clone())
            .ok_or(StoreError::NotFound(Entity::Photo))
    }

    async fn user_exists(&self, user_id: u64) -> StoreResult<bool> {
        self.record("user_exists")?;
        let tables = self.tables.lock().unwrap();
        Ok(!self.stale_checks && tables.users.iter().any(|u| u.id == id_to_db(user_id)))
    }

    async fn fetch_user(&self, user_id: u64) -> StoreResult<UserRow> {
        self.record("fetch_user")?;
        let tables = self.tables.lock().unwrap();
        tables
            .users
            .iter()
            .find(|u| u.id == id_to_db(user_id))
            .cloned()
            .ok_or(StoreError::NotFound(Entity::User))
    }

    async fn phone_in_use(&self, number_phone: &str) -> StoreResult<bool> {
        self.record("phone_in_use")?;
        let tables = self.tables.lock().unwrap();
        Ok(!self.stale_checks
            && tables
                .users
                .iter()
                .any(|u| u.number_phone.as_deref() == Some(number_phone)))
    }

    async fn username_in_use(&self, username: &str) -> StoreResult<bool> {
        self.record("username_in_use")?;
        let tables = self.tables.lock().unwrap();
        Ok(!self.stale_checks
            && tables
                .users
                .iter()
                .any(|u| u.username.as_deref() == Some(username)))
    }

    /// Enforces the same unique constraints as the `users` table. Generated
    /// ids come from a sequence that explicit ids push forward.
    async fn insert_user(&self, user: &NewUserRow) -> StoreResult<u64> {
        self.record("insert_user")?;
        let mut tables = self.tables.lock().unwrap();

        let id = match user.id {
            Some(id) => id,
            None => {
                tables.user_sequence += 1;
                tables.user_sequence
            }
        };
        if tables.users.iter().any(|u| u.id == id) {
            if user.id.is_none() {
                return Err(StoreError::Storage(sqlx::Error::RowNotFound));
            }
            return Err(StoreError::ConstraintViolation(UniqueField::Id));
        }
        if user.number_phone.is_some()
            && tables.users.iter().any(|u| u.number_phone == user.number_phone)
        {
            return Err(StoreError::ConstraintViolation(UniqueField::Phone));
        }
        if user.username.is_some() && tables.users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::ConstraintViolation(UniqueField::Username));
        }

        tables.users.push(UserRow {
            id,
            path_ava: user.path_ava.clone(),
            username: user.username.clone(),
            firstname: user.firstname.clone(),
            lastname: user.lastname.clone(),
            number_phone: user.number_phone.clone(),
            rating: 0.0,
            verification_status: "unverified".to_string(),
            role_id: 1,
            role_name: "user".to_string(),
        });
        tables.user_sequence = tables.user_sequence.max(id);
        Ok(id_from_db(id))
    }

    async fn fetch_buyer_deals(&self, user_id: u64) -> StoreResult<Vec<BuyerDealRow>> {
        self.record("fetch_buyer_deals")?;
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<BuyerDealRow> = tables
            .deals
            .iter()
            .filter(|d| d.buyer_id == id_to_db(user_id))
            .filter_map(|d| {
                let ad = tables
                    .advertisements
                    .iter()
                    .find(|a| a.id == d.advertisement_id)?;
                Some(BuyerDealRow {
                    deal_id: d.id,
                    advertisement_id: ad.id,
                    advertisement_name: ad.name.clone(),
                    advertisement_price: ad.price,
                    deal_date: d.deal_date,
                })
            })
            .collect();
        rows.sort_by_key(|r| r.deal_id);
        Ok(rows)
    }

    async fn review_exists_for_deal(&self, deal_id: u64) -> StoreResult<bool> {
        self.record("review_exists_for_deal")?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.reviews.iter().any(|r| r.deal_id == id_to_db(deal_id)))
    }

    async fn fetch_deal_review(&self, deal_id: u64) -> StoreResult<DealReviewRow> {
        self.record("fetch_deal_review")?;
        let tables = self.tables.lock().unwrap();
        tables
            .reviews
            .iter()
            .find(|r| r.deal_id == id_to_db(deal_id))
            .map(|r| DealReviewRow {
                id: r.id,
                mark: r.mark,
            })
            .ok_or(StoreError::NotFound(Entity::Review))
    }

    async fn fetch_owned_advertisements(
        &self,
        user_id: u64,
    ) -> StoreResult<Vec<OwnedAdvertisementRow>> {
        self.record("fetch_owned_advertisements")?;
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<OwnedAdvertisementRow> = tables
            .advertisements
            .iter()
            .filter(|a| a.user_id == id_to_db(user_id))
            .map(|a| OwnedAdvertisementRow {
                id: a.id,
                name: a.name.clone(),
                price: a.price,
                date_placement: a.date_placement,
                views_count: a.views_count,
                date_expire_promotion: a.date_expire_promotion,
                type_name: a.type_name.clone(),
                category_name: a.category_name.clone(),
            })
            .collect();
        rows.sort_by_key(|r| r.id);
        Ok(rows)
    }

    async fn fetch_received_reviews(&self, user_id: u64) -> StoreResult<Vec<ReceivedReviewRow>> {
        self.record("fetch_received_reviews")?;
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<ReceivedReviewRow> = tables
            .reviews
            .iter()
            .filter_map(|r| {
                let deal = tables.deals.iter().find(|d| d.id == r.deal_id)?;
                let ad = tables
                    .advertisements
                    .iter()
                    .find(|a| a.id == deal.advertisement_id && a.user_id == id_to_db(user_id))?;
                let reviewer = tables.users.iter().find(|u| u.id == r.reviewer_id)?;
                Some(ReceivedReviewRow {
                    id: r.id,
                    text: r.text.clone(),
                    mark: r.mark,
                    deal_id: deal.id,
                    deal_date: deal.deal_date,
                    advertisement_id: ad.id,
                    advertisement_name: ad.name.clone(),
                    reviewer_id: reviewer.id,
                    reviewer_username: reviewer.username.clone(),
                    reviewer_path_ava: reviewer.path_ava.clone(),
                })
            })
            .collect();
        rows.sort_by_key(|r| r.id);
        Ok(rows)
    }

    async fn ping(&self) -> StoreResult<Duration> {
        self.record("ping")?;
        Ok(Duration::from_millis(1))
    }
}
