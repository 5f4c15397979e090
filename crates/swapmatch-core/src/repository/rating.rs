//! Swap rating repository trait definition.

use swapmatch_types::error::RepositoryError;
use swapmatch_types::rating::{RatingId, Score, SwapRating};
use swapmatch_types::swap::SwapId;
use swapmatch_types::user::UserId;

/// Filter criteria for listing a user's ratings.
#[derive(Debug, Clone, Default)]
pub struct RatingFilter {
    /// Include ratings the user gave.
    pub as_rater: bool,
    /// Include ratings the user received.
    pub as_ratee: bool,
    pub min_score: Option<Score>,
    pub max_score: Option<Score>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// Repository trait for rating persistence.
pub trait RatingRepository: Send + Sync {
    /// Insert a rating.
    ///
    /// Returns `RepositoryError::Conflict` when the rater already rated the
    /// swap. Uniqueness of (swap, rater) is enforced by the store.
    fn insert(
        &self,
        rating: &SwapRating,
    ) -> impl std::future::Future<Output = Result<SwapRating, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: &RatingId,
    ) -> impl std::future::Future<Output = Result<Option<SwapRating>, RepositoryError>> + Send;

    fn has_rated(
        &self,
        swap_id: &SwapId,
        rater_id: &UserId,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Ratings for one swap, newest first.
    fn list_for_swap(
        &self,
        swap_id: &SwapId,
    ) -> impl std::future::Future<Output = Result<Vec<SwapRating>, RepositoryError>> + Send;

    /// Ratings involving `user_id`, newest first.
    ///
    /// With neither `as_rater` nor `as_ratee` set, returns ratings received.
    fn list_for_user(
        &self,
        user_id: &UserId,
        filter: &RatingFilter,
    ) -> impl std::future::Future<Output = Result<Vec<SwapRating>, RepositoryError>> + Send;

    /// Scores of every rating `user_id` received.
    fn scores_received(
        &self,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<Vec<Score>, RepositoryError>> + Send;

    /// Overwrite score and comment.
    fn update(
        &self,
        rating: &SwapRating,
    ) -> impl std::future::Future<Output = Result<SwapRating, RepositoryError>> + Send;

    /// Returns `false` when nothing was deleted.
    fn delete(
        &self,
        id: &RatingId,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;
}
