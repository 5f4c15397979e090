//! Hydrated swap request views.

use swapmatch_types::error::{RepositoryError, SwapError};
use swapmatch_types::swap::{SwapRequest, SwapRequestDetail};

use crate::repository::directory::DirectoryRepository;

/// Attach participant summaries and skill records to a swap request.
///
/// A reference that no longer resolves is reported as a storage error
/// naming the missing entity.
pub async fn load_swap_detail<D: DirectoryRepository>(
    directory: &D,
    request: SwapRequest,
) -> Result<SwapRequestDetail, SwapError> {
    let dangling = |what: &str, id: String| {
        SwapError::Storage(RepositoryError::Query(format!(
            "swap {} references missing {what} {id}",
            request.id
        )))
    };

    let requester = directory
        .user_summary(&request.requester_id)
        .await?
        .ok_or_else(|| dangling("user", request.requester_id.to_string()))?;
    let responder = directory
        .user_summary(&request.responder_id)
        .await?
        .ok_or_else(|| dangling("user", request.responder_id.to_string()))?;
    let offered_skill = directory
        .skill(&request.offered_skill_id)
        .await?
        .ok_or_else(|| dangling("skill", request.offered_skill_id.to_string()))?;
    let wanted_skill = directory
        .skill(&request.wanted_skill_id)
        .await?
        .ok_or_else(|| dangling("skill", request.wanted_skill_id.to_string()))?;

    Ok(SwapRequestDetail {
        request,
        requester,
        responder,
        offered_skill,
        wanted_skill,
    })
}
