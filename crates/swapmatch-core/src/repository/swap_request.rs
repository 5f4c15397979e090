//! Swap request repository trait definition.

use chrono::{DateTime, Utc};
use swapmatch_types::error::RepositoryError;
use swapmatch_types::swap::{SwapId, SwapRequest, SwapStatus};
use swapmatch_types::user::UserId;

use std::fmt;
use std::str::FromStr;

use super::SortOrder;

/// Columns a swap listing may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapSortField {
    CreatedAt,
    UpdatedAt,
}

impl Default for SwapSortField {
    fn default() -> Self {
        SwapSortField::CreatedAt
    }
}

impl SwapSortField {
    pub fn column(&self) -> &'static str {
        match self {
            SwapSortField::CreatedAt => "created_at",
            SwapSortField::UpdatedAt => "updated_at",
        }
    }
}

impl fmt::Display for SwapSortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for SwapSortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created_at" => Ok(SwapSortField::CreatedAt),
            "updated_at" => Ok(SwapSortField::UpdatedAt),
            other => Err(format!("invalid sort field: '{other}'")),
        }
    }
}

/// Filter criteria for listing swap requests.
///
/// All populated criteria are combined with AND.
#[derive(Debug, Clone, Default)]
pub struct SwapRequestFilter {
    /// Match any of these statuses. Empty matches every status.
    pub statuses: Vec<SwapStatus>,
    /// Only requests sent by this user.
    pub requester_id: Option<UserId>,
    /// Only requests received by this user.
    pub responder_id: Option<UserId>,
    /// Requests where this user is either requester or responder.
    pub participant_id: Option<UserId>,
    pub sort_by: SwapSortField,
    pub sort_order: SortOrder,
    /// Maximum number of results.
    pub limit: Option<u32>,
    /// Number of results to skip (offset pagination).
    pub offset: Option<u32>,
}

/// Repository trait for swap request persistence.
///
/// Implementations must make every write below atomic per record: two
/// concurrent callers can never both succeed at the same guarded write.
pub trait SwapRequestRepository: Send + Sync {
    /// Insert a new pending request.
    ///
    /// Returns `RepositoryError::Conflict` when a pending request with the same
    /// (requester, responder, offered skill, wanted skill) already exists.
    /// The existence check and the insert are one atomic unit.
    fn insert_pending(
        &self,
        request: &SwapRequest,
    ) -> impl std::future::Future<Output = Result<SwapRequest, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: &SwapId,
    ) -> impl std::future::Future<Output = Result<Option<SwapRequest>, RepositoryError>> + Send;

    fn list(
        &self,
        filter: &SwapRequestFilter,
    ) -> impl std::future::Future<Output = Result<Vec<SwapRequest>, RepositoryError>> + Send;

    /// Move a request out of `pending` (compare-and-set).
    ///
    /// Returns the updated request, or `None` when the request does not
    /// exist or is no longer pending.
    fn transition_from_pending(
        &self,
        id: &SwapId,
        to: SwapStatus,
        at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<Option<SwapRequest>, RepositoryError>> + Send;

    /// Delete a request only if it is still pending.
    ///
    /// Returns `false` when nothing was deleted.
    fn delete_pending(
        &self,
        id: &SwapId,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;
}
