//! Aggregation layer
//!
//! Each operation sequences repository calls into one read model. Existence
//! checks run first and fail fast; single-entity views treat every later
//! failure as fatal, list views enrich their rows best-effort.

mod advertisement;
mod profile;
mod user;

pub use user::CreateUserResult;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Entity, StoreError, StoreResult};
use crate::repository::MarketplaceRepository;

#[derive(Clone)]
pub struct Usecase {
    repo: Arc<dyn MarketplaceRepository>,
}

impl Usecase {
    pub fn new(repo: Arc<dyn MarketplaceRepository>) -> Self {
        Self { repo }
    }

    pub async fn ping(&self) -> StoreResult<Duration> {
        self.repo.ping().await
    }

    /// Existence precondition: a failed check counts as absent.
    async fn ensure_exists<F>(&self, entity: Entity, id: u64, check: F) -> StoreResult<()>
    where
        F: Future<Output = StoreResult<bool>>,
    {
        match check.await {
            Ok(true) => Ok(()),
            Ok(false) => {
                tracing::debug!(entity = %entity, id, "existence check: absent");
                Err(StoreError::NotFound(entity))
            }
            Err(e) => {
                tracing::error!(entity = %entity, id, error = %e, "existence check failed");
                Err(StoreError::NotFound(entity))
            }
        }
    }

    async fn ensure_user_exists(&self, user_id: u64) -> StoreResult<()> {
        self.ensure_exists(Entity::User, user_id, self.repo.user_exists(user_id))
            .await
    }
}

/// Run an enrichment fetch; on failure log it and fall back to the zero value.
pub(crate) async fn best_effort<T, F>(what: &'static str, key: u64, fetch: F) -> T
where
    T: Default,
    F: Future<Output = StoreResult<T>>,
{
    match fetch.await {
        Ok(value) => value,
        Err(e) if e.is_not_found() => {
            tracing::debug!(what, key, "enrichment skipped: {}", e);
            T::default()
        }
        Err(e) => {
            tracing::warn!(what, key, error = %e, "enrichment failed");
            T::default()
        }
    }
}
