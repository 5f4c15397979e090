use thiserror::Error;

use crate::swap::SwapStatus;

/// Coarse error classification shared by every domain error.
///
/// Callers (e.g. an HTTP layer) switch on the kind, never on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input.
    Validation,
    /// A business rule forbids the operation.
    PolicyViolation,
    /// The acting user lacks the required role.
    Authorization,
    /// The referenced entity does not exist or is not visible.
    NotFound,
    /// The underlying store failed. Not retried.
    Infrastructure,
}

impl ErrorKind {
    /// Conventional HTTP status for this kind.
    pub fn suggested_status(&self) -> u16 {
        match self {
            ErrorKind::Validation => 400,
            ErrorKind::PolicyViolation => 409,
            ErrorKind::Authorization => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Infrastructure => 503,
        }
    }
}

/// Errors from repository operations (used by trait definitions in swapmatch-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("database operation timed out")]
    Timeout,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    /// A uniqueness constraint rejected the write.
    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors from the swap request lifecycle.
#[derive(Debug, Error)]
pub enum SwapError {
    #[error("cannot create swap request with yourself")]
    SelfTrade,

    #[error("requester does not offer the specified skill")]
    NotOffered,

    #[error("responder does not want the offered skill")]
    SkillNotWantedByResponder,

    #[error("responder does not offer the requested skill")]
    SkillNotOfferedByResponder,

    #[error("a pending swap request for these users and skills already exists")]
    DuplicatePending,

    #[error("can only modify pending requests (current status: {0})")]
    NotPending(SwapStatus),

    #[error("user may not move this swap to '{0}'")]
    UnauthorizedTransition(SwapStatus),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("swap request not found")]
    NotFound,

    #[error("invalid request: {0}")]
    Invalid(String),

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

impl SwapError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SwapError::Invalid(_) => ErrorKind::Validation,
            SwapError::SelfTrade
            | SwapError::NotOffered
            | SwapError::SkillNotWantedByResponder
            | SwapError::SkillNotOfferedByResponder
            | SwapError::DuplicatePending
            | SwapError::NotPending(_) => ErrorKind::PolicyViolation,
            SwapError::UnauthorizedTransition(_) | SwapError::Unauthorized(_) => {
                ErrorKind::Authorization
            }
            SwapError::NotFound => ErrorKind::NotFound,
            SwapError::Storage(_) => ErrorKind::Infrastructure,
        }
    }
}

/// Errors from partner matching.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

impl MatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MatchError::Storage(_) => ErrorKind::Infrastructure,
        }
    }
}

/// Errors from availability slot management and overlap queries.
#[derive(Debug, Error)]
pub enum AvailabilityError {
    #[error("invalid {field} '{value}', use HH:MM")]
    InvalidTimeFormat { field: &'static str, value: String },

    #[error("end_time must be after start_time")]
    InvalidTimeRange,

    #[error("day_bitmask must be between 1 and 127, got {0}")]
    InvalidDayBitmask(i64),

    #[error("weekday must be between 1 (Monday) and 7 (Sunday), got {0}")]
    InvalidWeekday(i64),

    #[error("unknown weekday '{0}'")]
    InvalidWeekdayName(String),

    #[error("invalid label: {0}")]
    InvalidLabel(String),

    #[error("availability slot not found")]
    NotFound,

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

impl AvailabilityError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AvailabilityError::NotFound => ErrorKind::NotFound,
            AvailabilityError::Storage(_) => ErrorKind::Infrastructure,
            _ => ErrorKind::Validation,
        }
    }
}

/// Errors from post-swap ratings.
#[derive(Debug, Error)]
pub enum RatingError {
    #[error("score must be between 1 and 5, got {0}")]
    InvalidScore(i64),

    #[error("comment cannot exceed {0} characters")]
    CommentTooLong(usize),

    #[error("swap request not found")]
    SwapNotFound,

    #[error("rating not found")]
    NotFound,

    #[error("can only rate accepted swaps (current status: {0})")]
    SwapNotAccepted(SwapStatus),

    #[error("only participants can rate a swap")]
    NotParticipant,

    #[error("you have already rated this swap")]
    DuplicateRating,

    #[error("only the rater can modify this rating")]
    NotRater,

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

impl RatingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RatingError::InvalidScore(_) | RatingError::CommentTooLong(_) => {
                ErrorKind::Validation
            }
            RatingError::SwapNotAccepted(_) | RatingError::DuplicateRating => {
                ErrorKind::PolicyViolation
            }
            RatingError::NotParticipant | RatingError::NotRater => ErrorKind::Authorization,
            RatingError::SwapNotFound | RatingError::NotFound => ErrorKind::NotFound,
            RatingError::Storage(_) => ErrorKind::Infrastructure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_error_kinds() {
        assert_eq!(SwapError::SelfTrade.kind(), ErrorKind::PolicyViolation);
        assert_eq!(SwapError::DuplicatePending.kind(), ErrorKind::PolicyViolation);
        assert_eq!(
            SwapError::NotPending(SwapStatus::Accepted).kind(),
            ErrorKind::PolicyViolation
        );
        assert_eq!(
            SwapError::UnauthorizedTransition(SwapStatus::Accepted).kind(),
            ErrorKind::Authorization
        );
        assert_eq!(SwapError::NotFound.kind(), ErrorKind::NotFound);
        assert_eq!(
            SwapError::Storage(RepositoryError::Timeout).kind(),
            ErrorKind::Infrastructure
        );
    }

    #[test]
    fn test_rating_error_kinds() {
        assert_eq!(RatingError::InvalidScore(9).kind(), ErrorKind::Validation);
        assert_eq!(
            RatingError::SwapNotAccepted(SwapStatus::Pending).kind(),
            ErrorKind::PolicyViolation
        );
        assert_eq!(RatingError::DuplicateRating.kind(), ErrorKind::PolicyViolation);
        assert_eq!(RatingError::NotParticipant.kind(), ErrorKind::Authorization);
    }

    #[test]
    fn test_availability_error_display() {
        let err = AvailabilityError::InvalidTimeFormat {
            field: "start_time",
            value: "9am".to_string(),
        };
        assert_eq!(err.to_string(), "invalid start_time '9am', use HH:MM");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_suggested_status() {
        assert_eq!(ErrorKind::Validation.suggested_status(), 400);
        assert_eq!(ErrorKind::NotFound.suggested_status(), 404);
    }
}
