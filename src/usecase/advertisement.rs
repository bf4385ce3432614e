use super::Usecase;
use crate::entities::{AdPhoto, Advertisement, Review, User};
use crate::error::{Entity, StoreResult};

impl Usecase {
    /// Advertisement with its seller, reviews and photos. Any failure after
    /// the existence check aborts the whole assembly.
    #[tracing::instrument(skip(self))]
    pub async fn get_advertisement_detail(&self, ad_id: u64) -> StoreResult<Advertisement> {
        self.ensure_exists(
            Entity::Advertisement,
            ad_id,
            self.repo.advertisement_exists(ad_id),
        )
        .await?;

        let mut advertisement = Advertisement::from(self.repo.fetch_advertisement(ad_id).await?);

        let seller_id = advertisement.user.id;
        self.ensure_exists(Entity::User, seller_id, self.repo.user_exists(seller_id))
            .await?;
        advertisement.user = User::from(self.repo.fetch_user(seller_id).await?);

        advertisement.reviews = self
            .repo
            .fetch_advertisement_reviews(ad_id)
            .await?
            .into_iter()
            .map(Review::from)
            .collect();

        advertisement.photos = self
            .repo
            .fetch_advertisement_photos(ad_id)
            .await?
            .into_iter()
            .map(AdPhoto::from)
            .collect();

        tracing::debug!(
            seller_id,
            reviews = advertisement.reviews.len(),
            photos = advertisement.photos.len(),
            "advertisement assembled"
        );

        Ok(advertisement)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::error::{Entity, StoreError};
    use crate::repository::memory::MemoryRepository;
    use crate::usecase::Usecase;

    fn marketplace() -> MemoryRepository {
        MemoryRepository::new()
            .with_user(7, "seller", "+7000")
            .with_user(8, "buyer", "+8000")
            .with_advertisement(42, 7, "Bicycle")
    }

    fn usecase(repo: &Arc<MemoryRepository>) -> Usecase {
        Usecase::new(repo.clone())
    }

    #[tokio::test]
    async fn test_detail_for_existing_ad_with_existing_seller() {
        let repo = Arc::new(marketplace());

        let ad = usecase(&repo).get_advertisement_detail(42).await.unwrap();

        assert_eq!(ad.id, 42);
        assert_eq!(ad.user.id, 7);
        assert_eq!(ad.user.username, "seller");
        assert_eq!(ad.name, "Bicycle");
        assert_eq!(ad.price, 100.0);
        assert_eq!(ad.category.name, "electronics");
        assert!(ad.reviews.is_empty());
        assert!(ad.photos.is_empty());
    }

    #[tokio::test]
    async fn test_missing_ad_stops_after_existence_check() {
        let repo = Arc::new(marketplace());

        let err = usecase(&repo).get_advertisement_detail(99).await.unwrap_err();

        assert!(matches!(err, StoreError::NotFound(Entity::Advertisement)));
        assert_eq!(repo.calls(), vec!["advertisement_exists"]);
    }

    #[tokio::test]
    async fn test_failed_existence_check_reads_as_not_found() {
        let repo = Arc::new(marketplace().fail_on("advertisement_exists"));

        let err = usecase(&repo).get_advertisement_detail(42).await.unwrap_err();

        assert!(matches!(err, StoreError::NotFound(Entity::Advertisement)));
        assert_eq!(repo.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_seller_is_not_found_user() {
        let repo = Arc::new(
            MemoryRepository::new()
                .with_advertisement(42, 7, "Orphan"),
        );

        let err = usecase(&repo).get_advertisement_detail(42).await.unwrap_err();

        assert!(matches!(err, StoreError::NotFound(Entity::User)));
        assert_eq!(repo.call_count("fetch_user"), 0);
        assert_eq!(repo.call_count("fetch_advertisement_reviews"), 0);
    }

    #[tokio::test]
    async fn test_reviews_and_photos_keep_query_order() {
        let repo = Arc::new(
            marketplace()
                .with_user(9, "second", "")
                .with_deal(1, 42, 8)
                .with_deal(2, 42, 9)
                .with_review(20, 2, 9, 3)
                .with_review(10, 1, 8, 5)
                .with_photo(2, 42, "/photos/b.png")
                .with_photo(1, 42, "/photos/a.png"),
        );

        let ad = usecase(&repo).get_advertisement_detail(42).await.unwrap();

        let review_ids: Vec<u64> = ad.reviews.iter().map(|r| r.id).collect();
        assert_eq!(review_ids, vec![10, 20]);
        assert_eq!(ad.reviews[0].reviewer.username, "buyer");
        assert_eq!(ad.reviews[0].mark, 5);
        assert_eq!(ad.reviews[1].deal_id, 2);

        let paths: Vec<&str> = ad.photos.iter().map(|p| p.path.as_str()).collect();
        assert_eq!(paths, vec!["/photos/a.png", "/photos/b.png"]);
    }

    #[tokio::test]
    async fn test_photo_failure_is_fatal() {
        let repo = Arc::new(marketplace().fail_on("fetch_advertisement_photos"));

        let err = usecase(&repo).get_advertisement_detail(42).await.unwrap_err();

        assert!(matches!(err, StoreError::Storage(_)));
    }

    #[tokio::test]
    async fn test_steps_run_in_order() {
        let repo = Arc::new(marketplace());

        usecase(&repo).get_advertisement_detail(42).await.unwrap();

        assert_eq!(
            repo.calls(),
            vec![
                "advertisement_exists",
                "fetch_advertisement",
                "user_exists",
                "fetch_user",
                "fetch_advertisement_reviews",
                "fetch_advertisement_photos",
            ]
        );
    }
}
