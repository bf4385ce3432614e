use async_trait::async_trait;
use sqlx::PgPool;
use std::fmt::Display;
use std::time::Duration;

use super::MarketplaceRepository;
use crate::db::models::{
    AdPhotoRow, AdvertisementRow, BuyerDealRow, DealReviewRow, NewUserRow, OwnedAdvertisementRow,
    ReceivedReviewRow, ReviewRow, UserRow,
};
use crate::entities::{id_from_db, id_to_db};
use crate::error::{Entity, StoreError, StoreResult, UniqueField};

// ============================================================================
// Queries
// ============================================================================

const Q_ADVERTISEMENT_EXISTS: &str = "SELECT EXISTS (SELECT 1 FROM advertisements WHERE id = $1)";

const Q_ADVERTISEMENT: &str = r#"
    SELECT
        a.id,
        a.user_id,
        a.name,
        a.description,
        a.price,
        a.date_placement,
        a.location,
        a.views_count,
        a.date_expire_promotion,
        a.type_id,
        tp.name AS type_name,
        tp.price AS type_price,
        tp.time_live_hours AS type_time_live_hours,
        a.category_id,
        c.name AS category_name
    FROM advertisements a
    JOIN types_promotion tp ON a.type_id = tp.id
    JOIN categories c ON a.category_id = c.id
    WHERE a.id = $1
"#;

const Q_ADVERTISEMENT_REVIEWS: &str = r#"
    SELECT
        r.id,
        r.deal_id,
        r.text,
        r.mark,
        r.reviewer_id,
        u.path_ava AS reviewer_path_ava,
        u.username AS reviewer_username,
        u.firstname AS reviewer_firstname,
        u.lastname AS reviewer_lastname,
        u.number_phone AS reviewer_number_phone,
        u.rating AS reviewer_rating,
        u.verification_status AS reviewer_verification_status,
        ro.id AS reviewer_role_id,
        ro.name AS reviewer_role_name
    FROM reviews r
    JOIN deals d ON r.deal_id = d.id
    JOIN users u ON r.reviewer_id = u.id
    JOIN user_roles ro ON u.role_id = ro.id
    WHERE d.advertisement_id = $1
    ORDER BY r.id
"#;

const Q_ADVERTISEMENT_PHOTOS: &str = r#"
    SELECT id, path, advertisement_id
    FROM ad_photos
    WHERE advertisement_id = $1
    ORDER BY id
"#;

const Q_MAIN_PHOTO: &str = r#"
    SELECT path
    FROM ad_photos
    WHERE advertisement_id = $1
    ORDER BY id
    LIMIT 1
"#;

const Q_USER_EXISTS: &str = "SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)";

const Q_USER: &str = r#"
    SELECT
        u.id,
        u.path_ava,
        u.username,
        u.firstname,
        u.lastname,
        u.number_phone,
        u.rating,
        u.verification_status,
        u.role_id,
        r.name AS role_name
    FROM users u
    JOIN user_roles r ON u.role_id = r.id
    WHERE u.id = $1
"#;

const Q_PHONE_IN_USE: &str = "SELECT EXISTS (SELECT 1 FROM users WHERE number_phone = $1)";

const Q_USERNAME_IN_USE: &str = "SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)";

const Q_INSERT_USER: &str = r#"
    INSERT INTO users (id, path_ava, username, firstname, lastname, number_phone)
    VALUES (COALESCE($1, nextval(pg_get_serial_sequence('users', 'id'))), $2, $3, $4, $5, $6)
    RETURNING id
"#;

/// Move the id sequence past an explicitly inserted id so generated ids
/// never land on it.
const Q_SYNC_USER_SEQUENCE: &str = r#"
    SELECT setval(
        pg_get_serial_sequence('users', 'id')::regclass,
        GREATEST(
            $1,
            COALESCE(pg_sequence_last_value(pg_get_serial_sequence('users', 'id')::regclass), 0),
            1
        )
    )
"#;

const Q_BUYER_DEALS: &str = r#"
    SELECT
        d.id AS deal_id,
        d.advertisement_id,
        a.name AS advertisement_name,
        a.price AS advertisement_price,
        d.deal_date
    FROM deals d
    JOIN advertisements a ON d.advertisement_id = a.id
    WHERE d.buyer_id = $1
    ORDER BY d.id
"#;

const Q_REVIEW_EXISTS_FOR_DEAL: &str = "SELECT EXISTS (SELECT 1 FROM reviews WHERE deal_id = $1)";

const Q_DEAL_REVIEW: &str = "SELECT id, mark FROM reviews WHERE deal_id = $1";

const Q_OWNED_ADVERTISEMENTS: &str = r#"
    SELECT
        a.id,
        a.name,
        a.price,
        a.date_placement,
        a.views_count,
        a.date_expire_promotion,
        tp.name AS type_name,
        c.name AS category_name
    FROM advertisements a
    JOIN types_promotion tp ON a.type_id = tp.id
    JOIN categories c ON a.category_id = c.id
    WHERE a.user_id = $1
    ORDER BY a.id
"#;

const Q_RECEIVED_REVIEWS: &str = r#"
    SELECT
        r.id,
        r.text,
        r.mark,
        d.id AS deal_id,
        d.deal_date,
        a.id AS advertisement_id,
        a.name AS advertisement_name,
        r.reviewer_id,
        u.username AS reviewer_username,
        u.path_ava AS reviewer_path_ava
    FROM reviews r
    JOIN deals d ON r.deal_id = d.id
    JOIN advertisements a ON d.advertisement_id = a.id
    JOIN users u ON r.reviewer_id = u.id
    WHERE a.user_id = $1
    ORDER BY r.id
"#;

// ============================================================================
// Error mapping
// ============================================================================

fn query_failed(operation: &'static str, key: impl Display, err: sqlx::Error) -> StoreError {
    tracing::error!(operation, key = %key, error = %err, "query failed");
    StoreError::Storage(err)
}

/// Unique constraints on `users`, as named in the migrations.
fn constraint_field(constraint: &str) -> Option<UniqueField> {
    match constraint {
        "users_pkey" => Some(UniqueField::Id),
        "users_number_phone_key" => Some(UniqueField::Phone),
        "users_username_key" => Some(UniqueField::Username),
        _ => None,
    }
}

/// Unique violation reported back to the caller. A primary key clash on a
/// generated id is not the candidate's fault and stays a storage error.
fn violated_field(constraint: &str, explicit_id: bool) -> Option<UniqueField> {
    constraint_field(constraint).filter(|field| explicit_id || *field != UniqueField::Id)
}

fn insert_failed(err: sqlx::Error, explicit_id: bool) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            if let Some(field) = db_err
                .constraint()
                .and_then(|constraint| violated_field(constraint, explicit_id))
            {
                tracing::warn!(field = %field, "insert rejected by unique constraint");
                return StoreError::ConstraintViolation(field);
            }
        }
    }
    query_failed("insert_user", "users", err)
}

// ============================================================================
// Repository
// ============================================================================

#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn exists(&self, operation: &'static str, query: &str, key: i64) -> StoreResult<bool> {
        sqlx::query_scalar::<_, bool>(query)
            .bind(key)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| query_failed(operation, key, e))
    }
}

#[async_trait]
impl MarketplaceRepository for PgRepository {
    async fn advertisement_exists(&self, ad_id: u64) -> StoreResult<bool> {
        self.exists("advertisement_exists", Q_ADVERTISEMENT_EXISTS, id_to_db(ad_id))
            .await
    }

    async fn fetch_advertisement(&self, ad_id: u64) -> StoreResult<AdvertisementRow> {
        sqlx::query_as::<_, AdvertisementRow>(Q_ADVERTISEMENT)
            .bind(id_to_db(ad_id))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_failed("fetch_advertisement", ad_id, e))?
            .ok_or(StoreError::NotFound(Entity::Advertisement))
    }

    async fn fetch_advertisement_reviews(&self, ad_id: u64) -> StoreResult<Vec<ReviewRow>> {
        sqlx::query_as::<_, ReviewRow>(Q_ADVERTISEMENT_REVIEWS)
            .bind(id_to_db(ad_id))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_failed("fetch_advertisement_reviews", ad_id, e))
    }

    async fn fetch_advertisement_photos(&self, ad_id: u64) -> StoreResult<Vec<AdPhotoRow>> {
        sqlx::query_as::<_, AdPhotoRow>(Q_ADVERTISEMENT_PHOTOS)
            .bind(id_to_db(ad_id))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_failed("fetch_advertisement_photos", ad_id, e))
    }

    async fn fetch_main_photo(&self, ad_id: u64) -> StoreResult<String> {
        sqlx::query_scalar::<_, String>(Q_MAIN_PHOTO)
            .bind(id_to_db(ad_id))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_failed("fetch_main_photo", ad_id, e))?
            .ok_or(StoreError::NotFound(Entity::Photo))
    }

    async fn user_exists(&self, user_id: u64) -> StoreResult<bool> {
        self.exists("user_exists", Q_USER_EXISTS, id_to_db(user_id))
            .await
    }

    async fn fetch_user(&self, user_id: u64) -> StoreResult<UserRow> {
        sqlx::query_as::<_, UserRow>(Q_USER)
            .bind(id_to_db(user_id))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_failed("fetch_user", user_id, e))?
            .ok_or(StoreError::NotFound(Entity::User))
    }

    async fn phone_in_use(&self, number_phone: &str) -> StoreResult<bool> {
        sqlx::query_scalar::<_, bool>(Q_PHONE_IN_USE)
            .bind(number_phone)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| query_failed("phone_in_use", number_phone, e))
    }

    async fn username_in_use(&self, username: &str) -> StoreResult<bool> {
        sqlx::query_scalar::<_, bool>(Q_USERNAME_IN_USE)
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| query_failed("username_in_use", username, e))
    }

    async fn insert_user(&self, user: &NewUserRow) -> StoreResult<u64> {
        let id: i64 = sqlx::query_scalar(Q_INSERT_USER)
            .bind(user.id)
            .bind(&user.path_ava)
            .bind(&user.username)
            .bind(&user.firstname)
            .bind(&user.lastname)
            .bind(&user.number_phone)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| insert_failed(e, user.id.is_some()))?;

        if user.id.is_some() {
            // The user exists either way; a stale sequence only risks later inserts.
            if let Err(e) = sqlx::query(Q_SYNC_USER_SEQUENCE)
                .bind(id)
                .execute(&self.pool)
                .await
            {
                tracing::warn!(user_id = id, error = %e, "failed to advance users id sequence");
            }
        }

        Ok(id_from_db(id))
    }

    async fn fetch_buyer_deals(&self, user_id: u64) -> StoreResult<Vec<BuyerDealRow>> {
        sqlx::query_as::<_, BuyerDealRow>(Q_BUYER_DEALS)
            .bind(id_to_db(user_id))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_failed("fetch_buyer_deals", user_id, e))
    }

    async fn review_exists_for_deal(&self, deal_id: u64) -> StoreResult<bool> {
        self.exists("review_exists_for_deal", Q_REVIEW_EXISTS_FOR_DEAL, id_to_db(deal_id))
            .await
    }

    async fn fetch_deal_review(&self, deal_id: u64) -> StoreResult<DealReviewRow> {
        sqlx::query_as::<_, DealReviewRow>(Q_DEAL_REVIEW)
            .bind(id_to_db(deal_id))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_failed("fetch_deal_review", deal_id, e))?
            .ok_or(StoreError::NotFound(Entity::Review))
    }

    async fn fetch_owned_advertisements(
        &self,
        user_id: u64,
    ) -> StoreResult<Vec<OwnedAdvertisementRow>> {
        sqlx::query_as::<_, OwnedAdvertisementRow>(Q_OWNED_ADVERTISEMENTS)
            .bind(id_to_db(user_id))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_failed("fetch_owned_advertisements", user_id, e))
    }

    async fn fetch_received_reviews(&self, user_id: u64) -> StoreResult<Vec<ReceivedReviewRow>> {
        sqlx::query_as::<_, ReceivedReviewRow>(Q_RECEIVED_REVIEWS)
            .bind(id_to_db(user_id))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_failed("fetch_received_reviews", user_id, e))
    }

    async fn ping(&self) -> StoreResult<Duration> {
        crate::db::health_check(&self.pool)
            .await
            .map_err(|e| query_failed("ping", "SELECT 1", e))
    }
}
