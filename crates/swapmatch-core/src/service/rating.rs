//! Post-swap ratings.
//!
//! A rating may only be left by a participant of an accepted swap, about the
//! other participant, once per swap. Uniqueness per (swap, rater) is enforced
//! by the store, so two concurrent attempts cannot both succeed.

use chrono::Utc;
use swapmatch_types::error::{RepositoryError, RatingError};
use swapmatch_types::rating::{
    RatingId, Score, SwapRating, UserRatingStats, normalize_comment,
};
use swapmatch_types::swap::{SwapId, SwapRequest, SwapStatus};
use swapmatch_types::user::UserId;
use tracing::info;

use crate::repository::rating::{RatingFilter, RatingRepository};
use crate::repository::swap_request::SwapRequestRepository;

/// Gatekeeper for swap ratings.
pub struct RatingService<R: SwapRequestRepository, T: RatingRepository> {
    swaps: R,
    ratings: T,
}

impl<R: SwapRequestRepository, T: RatingRepository> RatingService<R, T> {
    pub fn new(swaps: R, ratings: T) -> Self {
        Self { swaps, ratings }
    }

    /// Whether `user_id` may rate `swap_id` right now.
    ///
    /// A missing swap is simply `false`; storage failures still propagate.
    pub async fn can_rate(&self, swap_id: &SwapId, user_id: &UserId) -> Result<bool, RatingError> {
        let Some(swap) = self.swaps.get_by_id(swap_id).await? else {
            return Ok(false);
        };
        if swap.status != SwapStatus::Accepted || !swap.is_participant(user_id) {
            return Ok(false);
        }
        Ok(!self.ratings.has_rated(swap_id, user_id).await?)
    }

    async fn rateable_swap(
        &self,
        swap_id: &SwapId,
        rater_id: &UserId,
    ) -> Result<(SwapRequest, UserId), RatingError> {
        let swap = self
            .swaps
            .get_by_id(swap_id)
            .await?
            .ok_or(RatingError::SwapNotFound)?;
        if swap.status != SwapStatus::Accepted {
            return Err(RatingError::SwapNotAccepted(swap.status));
        }
        let ratee_id = swap
            .counterpart_of(rater_id)
            .ok_or(RatingError::NotParticipant)?;
        Ok((swap, ratee_id))
    }

    /// Record `rater_id`'s rating of the other participant.
    pub async fn create_rating(
        &self,
        swap_id: &SwapId,
        rater_id: &UserId,
        score: i64,
        comment: Option<String>,
    ) -> Result<SwapRating, RatingError> {
        let score = Score::new(score)?;
        let comment = normalize_comment(comment)?;
        let (swap, ratee_id) = self.rateable_swap(swap_id, rater_id).await?;

        let rating = SwapRating {
            id: RatingId::new(),
            swap_id: swap.id,
            rater_id: *rater_id,
            ratee_id,
            score,
            comment,
            created_at: Utc::now(),
        };

        let created = self.ratings.insert(&rating).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => RatingError::DuplicateRating,
            other => RatingError::Storage(other),
        })?;

        info!(
            rating_id = %created.id,
            swap_id = %swap_id,
            rater = %rater_id,
            score = created.score.value(),
            "rating created"
        );
        Ok(created)
    }

    pub async fn get_rating(&self, id: &RatingId) -> Result<SwapRating, RatingError> {
        self.ratings.get_by_id(id).await?.ok_or(RatingError::NotFound)
    }

    async fn owned_rating(&self, id: &RatingId, acting_user: &UserId) -> Result<SwapRating, RatingError> {
        let rating = self.get_rating(id).await?;
        if rating.rater_id != *acting_user {
            return Err(RatingError::NotRater);
        }
        Ok(rating)
    }

    /// Change score and comment. Rater only.
    pub async fn update_rating(
        &self,
        id: &RatingId,
        acting_user: &UserId,
        score: i64,
        comment: Option<String>,
    ) -> Result<SwapRating, RatingError> {
        let score = Score::new(score)?;
        let comment = normalize_comment(comment)?;
        let existing = self.owned_rating(id, acting_user).await?;

        let rating = SwapRating {
            score,
            comment,
            ..existing
        };
        let updated = self.ratings.update(&rating).await.map_err(|e| match e {
            RepositoryError::NotFound => RatingError::NotFound,
            other => RatingError::Storage(other),
        })?;
        info!(rating_id = %id, "rating updated");
        Ok(updated)
    }

    /// Remove a rating. Rater only.
    pub async fn delete_rating(&self, id: &RatingId, acting_user: &UserId) -> Result<(), RatingError> {
        self.owned_rating(id, acting_user).await?;
        if !self.ratings.delete(id).await? {
            return Err(RatingError::NotFound);
        }
        info!(rating_id = %id, "rating deleted");
        Ok(())
    }

    /// Ratings for one swap, newest first.
    pub async fn swap_ratings(&self, swap_id: &SwapId) -> Result<Vec<SwapRating>, RatingError> {
        Ok(self.ratings.list_for_swap(swap_id).await?)
    }

    pub async fn user_ratings(
        &self,
        user_id: &UserId,
        filter: &RatingFilter,
    ) -> Result<Vec<SwapRating>, RatingError> {
        Ok(self.ratings.list_for_user(user_id, filter).await?)
    }

    /// Summary of ratings received.
    pub async fn user_rating_stats(&self, user_id: &UserId) -> Result<UserRatingStats, RatingError> {
        let scores = self.ratings.scores_received(user_id).await?;
        Ok(UserRatingStats::from_scores(*user_id, scores))
    }
}
