//! Data access layer
//!
//! One method per SQL statement. Methods return storage rows; mapping into
//! domain values happens in the use-case layer.

mod postgres;

#[cfg(test)]
pub(crate) mod memory;

pub use postgres::PgRepository;

use async_trait::async_trait;
use std::time::Duration;

use crate::db::models::{
    AdPhotoRow, AdvertisementRow, BuyerDealRow, DealReviewRow, NewUserRow, OwnedAdvertisementRow,
    ReceivedReviewRow, ReviewRow, UserRow,
};
use crate::error::StoreResult;

#[async_trait]
pub trait MarketplaceRepository: Send + Sync {
    // =========================================================================
    // Advertisements
    // =========================================================================

    async fn advertisement_exists(&self, ad_id: u64) -> StoreResult<bool>;

    /// Core fields joined with promotion type and category, plus the owner id.
    async fn fetch_advertisement(&self, ad_id: u64) -> StoreResult<AdvertisementRow>;

    /// Reviews left on deals for this advertisement, ordered by review id.
    async fn fetch_advertisement_reviews(&self, ad_id: u64) -> StoreResult<Vec<ReviewRow>>;

    async fn fetch_advertisement_photos(&self, ad_id: u64) -> StoreResult<Vec<AdPhotoRow>>;

    /// Path of the lowest-id photo; `NotFound(Photo)` when there is none.
    async fn fetch_main_photo(&self, ad_id: u64) -> StoreResult<String>;

    // =========================================================================
    // Users
    // =========================================================================

    async fn user_exists(&self, user_id: u64) -> StoreResult<bool>;

    async fn fetch_user(&self, user_id: u64) -> StoreResult<UserRow>;

    async fn phone_in_use(&self, number_phone: &str) -> StoreResult<bool>;

    async fn username_in_use(&self, username: &str) -> StoreResult<bool>;

    /// Insert a user and return its id. Unique violations surface as
    /// `ConstraintViolation`.
    async fn insert_user(&self, user: &NewUserRow) -> StoreResult<u64>;

    // =========================================================================
    // Profile projections
    // =========================================================================

    /// Deals where the user is the buyer, ordered by deal id.
    async fn fetch_buyer_deals(&self, user_id: u64) -> StoreResult<Vec<BuyerDealRow>>;

    async fn review_exists_for_deal(&self, deal_id: u64) -> StoreResult<bool>;

    async fn fetch_deal_review(&self, deal_id: u64) -> StoreResult<DealReviewRow>;

    async fn fetch_owned_advertisements(
        &self,
        user_id: u64,
    ) -> StoreResult<Vec<OwnedAdvertisementRow>>;

    async fn fetch_received_reviews(&self, user_id: u64) -> StoreResult<Vec<ReceivedReviewRow>>;

    // =========================================================================
    // Health
    // =========================================================================

    /// Round-trip latency of a trivial query.
    async fn ping(&self) -> StoreResult<Duration>;
}
