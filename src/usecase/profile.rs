use super::{best_effort, Usecase};
use crate::entities::{id_from_db, mark_from_db, MyAdvertisement, ProfileReview, ProfileStatistic, User};
use crate::error::StoreResult;

impl Usecase {
    #[tracing::instrument(skip(self))]
    pub async fn get_profile_info(&self, user_id: u64) -> StoreResult<User> {
        self.ensure_user_exists(user_id).await?;
        Ok(User::from(self.repo.fetch_user(user_id).await?))
    }

    /// One row per deal the user bought. Photo and review lookups are
    /// best-effort: a row missing either keeps zero values.
    #[tracing::instrument(skip(self))]
    pub async fn get_profile_statistics(&self, user_id: u64) -> StoreResult<Vec<ProfileStatistic>> {
        self.ensure_user_exists(user_id).await?;

        let deals = self.repo.fetch_buyer_deals(user_id).await?;
        let mut statistics = Vec::with_capacity(deals.len());

        for deal in deals {
            let mut stat = ProfileStatistic::from(deal);

            stat.photo_path = best_effort(
                "main_photo",
                stat.advertisement_id,
                self.repo.fetch_main_photo(stat.advertisement_id),
            )
            .await;

            let reviewed = best_effort(
                "review_exists",
                stat.deal_id,
                self.repo.review_exists_for_deal(stat.deal_id),
            )
            .await;

            if reviewed {
                let review = best_effort(
                    "deal_review",
                    stat.deal_id,
                    self.repo.fetch_deal_review(stat.deal_id),
                )
                .await;
                stat.review_id = id_from_db(review.id);
                stat.mark = mark_from_db(review.mark);
            }

            statistics.push(stat);
        }

        Ok(statistics)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_profile_my_advertisements(
        &self,
        user_id: u64,
    ) -> StoreResult<Vec<MyAdvertisement>> {
        self.ensure_user_exists(user_id).await?;

        let rows = self.repo.fetch_owned_advertisements(user_id).await?;
        let mut advertisements = Vec::with_capacity(rows.len());

        for row in rows {
            let mut advertisement = MyAdvertisement::from(row);
            advertisement.photo_path = best_effort(
                "main_photo",
                advertisement.id,
                self.repo.fetch_main_photo(advertisement.id),
            )
            .await;
            advertisements.push(advertisement);
        }

        Ok(advertisements)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_profile_reviews(&self, user_id: u64) -> StoreResult<Vec<ProfileReview>> {
        self.ensure_user_exists(user_id).await?;

        Ok(self
            .repo
            .fetch_received_reviews(user_id)
            .await?
            .into_iter()
            .map(ProfileReview::from)
            .collect())
    }
}
