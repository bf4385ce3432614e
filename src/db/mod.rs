pub mod models;

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

use crate::config::{env_or, env_parse};

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

const DEFAULT_DATABASE_URL: &str = "postgresql://localhost/marketplace";

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 10,
            min_connections: 2,
            connect_timeout_secs: 10,
            idle_timeout_secs: 300,
        }
    }
}

impl DbConfig {
    /// Read `DATABASE_URL` and the `DB_*` pool settings; unset or unparseable
    /// values keep the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: env_or("DATABASE_URL", &defaults.url),
            max_connections: env_parse("DB_POOL_MAX", defaults.max_connections),
            min_connections: env_parse("DB_POOL_MIN", defaults.min_connections),
            connect_timeout_secs: env_parse("DB_CONNECT_TIMEOUT", defaults.connect_timeout_secs),
            idle_timeout_secs: env_parse("DB_IDLE_TIMEOUT", defaults.idle_timeout_secs),
        }
    }

    /// Connection URL with credentials masked, for logs.
    pub fn redacted_url(&self) -> String {
        match (self.url.find("://"), self.url.rfind('@')) {
            (Some(scheme_end), Some(at)) if at > scheme_end => {
                format!("{}://***{}", &self.url[..scheme_end], &self.url[at..])
            }
            _ => self.url.clone(),
        }
    }
}

pub async fn init_pool(config: &DbConfig) -> Result<PgPool, sqlx::Error> {
    tracing::info!("Initializing database connection pool...");
    tracing::debug!("Database URL: {}", config.redacted_url());

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(1800))
        .test_before_acquire(true)
        .connect(&config.url)
        .await?;

    sqlx::query("SELECT 1").fetch_one(&pool).await?;

    tracing::info!("Database connection pool initialized successfully");

    Ok(pool)
}

pub async fn health_check(pool: &PgPool) -> Result<Duration, sqlx::Error> {
    let start = std::time::Instant::now();
    sqlx::query("SELECT 1").fetch_one(pool).await?;

    Ok(start.elapsed())
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running database migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_roles (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        )
    "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("INSERT INTO user_roles (id, name) VALUES (1, 'user') ON CONFLICT DO NOTHING")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            path_ava TEXT,
            username TEXT,
            firstname TEXT,
            lastname TEXT,
            number_phone TEXT,
            rating REAL NOT NULL DEFAULT 0,
            verification_status TEXT NOT NULL DEFAULT 'unverified',
            role_id INTEGER NOT NULL DEFAULT 1 REFERENCES user_roles(id),
            CONSTRAINT users_username_key UNIQUE (username),
            CONSTRAINT users_number_phone_key UNIQUE (number_phone)
        )
    "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS types_promotion (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            price REAL NOT NULL DEFAULT 0,
            time_live_hours INTEGER NOT NULL DEFAULT 0
        )
    "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        )
    "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS advertisements (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL REFERENCES users(id),
            name TEXT NOT NULL,
            description TEXT,
            price DOUBLE PRECISION NOT NULL,
            date_placement TIMESTAMPTZ DEFAULT now(),
            location TEXT,
            type_id BIGINT NOT NULL REFERENCES types_promotion(id),
            views_count INTEGER NOT NULL DEFAULT 0 CHECK (views_count >= 0),
            date_expire_promotion TIMESTAMPTZ,
            category_id BIGINT NOT NULL REFERENCES categories(id)
        )
    "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS deals (
            id BIGSERIAL PRIMARY KEY,
            advertisement_id BIGINT NOT NULL REFERENCES advertisements(id) ON DELETE CASCADE,
            buyer_id BIGINT NOT NULL REFERENCES users(id),
            deal_date TIMESTAMPTZ NOT NULL DEFAULT now()
        )
    "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reviews (
            id BIGSERIAL PRIMARY KEY,
            deal_id BIGINT NOT NULL UNIQUE REFERENCES deals(id) ON DELETE CASCADE,
            reviewer_id BIGINT NOT NULL REFERENCES users(id),
            text TEXT NOT NULL DEFAULT '',
            mark SMALLINT NOT NULL CHECK (mark BETWEEN 0 AND 5)
        )
    "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS ad_photos (
            id BIGSERIAL PRIMARY KEY,
            advertisement_id BIGINT NOT NULL REFERENCES advertisements(id) ON DELETE CASCADE,
            path TEXT NOT NULL
        )
    "#,
    )
    .execute(pool)
    .await?;

    // Several statements in one string need the simple query protocol.
    sqlx::raw_sql(
        r#"
        CREATE INDEX IF NOT EXISTS idx_advertisements_user_id ON advertisements(user_id);
        CREATE INDEX IF NOT EXISTS idx_deals_buyer_id ON deals(buyer_id);
        CREATE INDEX IF NOT EXISTS idx_deals_advertisement_id ON deals(advertisement_id);
        CREATE INDEX IF NOT EXISTS idx_ad_photos_advertisement_id ON ad_photos(advertisement_id)
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database migrations completed successfully");

    Ok(())
}
