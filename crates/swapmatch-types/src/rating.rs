use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::RatingError;
use crate::id::uuid_id;
use crate::swap::SwapId;
use crate::user::UserId;

uuid_id!(
    /// Identifier of a post-swap rating.
    RatingId
);

/// Maximum comment length in characters.
pub const MAX_COMMENT_LEN: usize = 1000;

/// A 1-5 star score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Score(u8);

impl Score {
    pub const MIN: i64 = 1;
    pub const MAX: i64 = 5;

    pub fn new(raw: i64) -> Result<Self, RatingError> {
        if (Self::MIN..=Self::MAX).contains(&raw) {
            Ok(Self(raw as u8))
        } else {
            Err(RatingError::InvalidScore(raw))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Score {
    type Error = RatingError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<Score> for i64 {
    fn from(score: Score) -> Self {
        i64::from(score.0)
    }
}

/// Normalize an optional comment: trimmed, empty becomes `None`.
pub fn normalize_comment(comment: Option<String>) -> Result<Option<String>, RatingError> {
    let Some(comment) = comment else {
        return Ok(None);
    };
    let trimmed = comment.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > MAX_COMMENT_LEN {
        return Err(RatingError::CommentTooLong(MAX_COMMENT_LEN));
    }
    Ok(Some(trimmed.to_string()))
}

/// A participant's rating of the other participant after an accepted swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRating {
    pub id: RatingId,
    pub swap_id: SwapId,
    pub rater_id: UserId,
    pub ratee_id: UserId,
    pub score: Score,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Aggregate of the ratings a user has received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRatingStats {
    pub user_id: UserId,
    pub total_ratings: u64,
    pub average_rating: f64,
    /// Count per score; index 0 holds one-star ratings.
    pub score_counts: [u64; 5],
}

impl UserRatingStats {
    /// Summarize a set of received ratings.
    pub fn from_scores(user_id: UserId, scores: impl IntoIterator<Item = Score>) -> Self {
        let mut score_counts = [0u64; 5];
        let mut total = 0u64;
        let mut sum = 0u64;
        for score in scores {
            score_counts[usize::from(score.value() - 1)] += 1;
            total += 1;
            sum += u64::from(score.value());
        }
        let average_rating = if total == 0 {
            0.0
        } else {
            sum as f64 / total as f64
        };
        Self {
            user_id,
            total_ratings: total,
            average_rating,
            score_counts,
        }
    }

    pub fn count_for(&self, score: Score) -> u64 {
        self.score_counts[usize::from(score.value() - 1)]
    }
}
