//! Swap request lifecycle service.
//!
//! Owns the swap request state machine: proposal with four-way skill
//! validation, role-checked status transitions, deletion of pending
//! requests, and the read-only listing views. This service is the only
//! writer of a request's status.

use chrono::Utc;
use swapmatch_types::config::ListingConfig;
use swapmatch_types::error::{RepositoryError, SwapError};
use swapmatch_types::swap::{CreateSwapRequest, SwapId, SwapRequest, SwapStatus, UserSwaps};
use swapmatch_types::user::UserId;
use tracing::{debug, info};

use crate::repository::SortOrder;
use crate::repository::skill_relation::SkillRelationRepository;
use crate::repository::swap_request::{SwapRequestFilter, SwapRequestRepository, SwapSortField};

/// Caller-facing listing options for one user's swap requests.
///
/// `sent` and `received` select the user's role; setting neither or both
/// means either role.
#[derive(Debug, Clone, Default)]
pub struct SwapListQuery {
    pub sent: bool,
    pub received: bool,
    pub status: Option<SwapStatus>,
    pub sort_by: Option<SwapSortField>,
    pub sort_order: Option<SortOrder>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// Check a requested transition against the state machine.
///
/// | from      | to        | who                     |
/// |-----------|-----------|-------------------------|
/// | pending   | accepted  | responder               |
/// | pending   | rejected  | responder               |
/// | pending   | cancelled | requester or responder  |
///
/// Anything out of a terminal state fails with `NotPending`. Users outside
/// the swap are rejected before its state is revealed.
pub fn check_transition(
    swap: &SwapRequest,
    acting_user: &UserId,
    to: SwapStatus,
) -> Result<(), SwapError> {
    if to == SwapStatus::Pending {
        return Err(SwapError::Invalid(
            "status must be one of accepted, rejected, cancelled".to_string(),
        ));
    }
    if !swap.is_participant(acting_user) {
        return Err(SwapError::UnauthorizedTransition(to));
    }
    if swap.status.is_terminal() {
        return Err(SwapError::NotPending(swap.status));
    }
    let allowed = match to {
        SwapStatus::Accepted | SwapStatus::Rejected => swap.responder_id == *acting_user,
        SwapStatus::Cancelled => true,
        SwapStatus::Pending => false,
    };
    if allowed {
        Ok(())
    } else {
        Err(SwapError::UnauthorizedTransition(to))
    }
}

/// Service orchestrating the swap request lifecycle.
///
/// Generic over repository traits to maintain clean architecture --
/// swapmatch-core never depends on swapmatch-infra.
pub struct SwapService<K: SkillRelationRepository, R: SwapRequestRepository> {
    skills: K,
    swaps: R,
    listing: ListingConfig,
}

impl<K: SkillRelationRepository, R: SwapRequestRepository> SwapService<K, R> {
    pub fn new(skills: K, swaps: R, listing: ListingConfig) -> Self {
        Self {
            skills,
            swaps,
            listing,
        }
    }

    /// Propose a swap.
    ///
    /// Checks, in order, failing fast:
    /// 1. requester and responder differ
    /// 2. requester offers the offered skill
    /// 3. responder wants the offered skill
    /// 4. responder offers the wanted skill
    /// 5. no identical pending request exists
    ///
    /// Step 5 is enforced by the store together with the insert, so two
    /// concurrent identical proposals cannot both succeed.
    pub async fn create_swap_request(
        &self,
        request: CreateSwapRequest,
    ) -> Result<SwapRequest, SwapError> {
        if request.requester_id == request.responder_id {
            return Err(SwapError::SelfTrade);
        }

        if !self
            .skills
            .is_offering(&request.requester_id, &request.offered_skill_id)
            .await?
        {
            return Err(SwapError::NotOffered);
        }

        if !self
            .skills
            .is_wanting(&request.responder_id, &request.offered_skill_id)
            .await?
        {
            return Err(SwapError::SkillNotWantedByResponder);
        }

        if !self
            .skills
            .is_offering(&request.responder_id, &request.wanted_skill_id)
            .await?
        {
            return Err(SwapError::SkillNotOfferedByResponder);
        }

        let now = Utc::now();
        let swap = SwapRequest {
            id: SwapId::new(),
            requester_id: request.requester_id,
            responder_id: request.responder_id,
            offered_skill_id: request.offered_skill_id,
            wanted_skill_id: request.wanted_skill_id,
            status: SwapStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        let created = self.swaps.insert_pending(&swap).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => SwapError::DuplicatePending,
            other => SwapError::Storage(other),
        })?;

        info!(
            swap_id = %created.id,
            requester = %created.requester_id,
            responder = %created.responder_id,
            "swap request created"
        );
        Ok(created)
    }

    /// Get a swap request by ID.
    pub async fn get_swap(&self, id: &SwapId) -> Result<SwapRequest, SwapError> {
        self.swaps.get_by_id(id).await?.ok_or(SwapError::NotFound)
    }

    /// Move a pending swap to `new_status` on behalf of `acting_user`.
    ///
    /// The write is a compare-and-set on `pending`; when a concurrent
    /// transition wins, this call reports `NotPending` with the winner's
    /// status.
    pub async fn update_status(
        &self,
        swap_id: &SwapId,
        acting_user: &UserId,
        new_status: SwapStatus,
    ) -> Result<SwapRequest, SwapError> {
        let swap = self.get_swap(swap_id).await?;
        check_transition(&swap, acting_user, new_status)?;

        match self
            .swaps
            .transition_from_pending(swap_id, new_status, Utc::now())
            .await?
        {
            Some(updated) => {
                info!(
                    swap_id = %swap_id,
                    acting_user = %acting_user,
                    status = %updated.status,
                    "swap status updated"
                );
                Ok(updated)
            }
            None => {
                let current = self.get_swap(swap_id).await?;
                debug!(swap_id = %swap_id, status = %current.status, "lost transition race");
                Err(SwapError::NotPending(current.status))
            }
        }
    }

    /// Delete a pending swap. Only the requester may delete.
    pub async fn delete_swap_request(
        &self,
        swap_id: &SwapId,
        acting_user: &UserId,
    ) -> Result<(), SwapError> {
        let swap = self.get_swap(swap_id).await?;

        if swap.requester_id != *acting_user {
            return Err(SwapError::Unauthorized(
                "only the requester can delete a swap request".to_string(),
            ));
        }
        if swap.status != SwapStatus::Pending {
            return Err(SwapError::NotPending(swap.status));
        }

        if !self.swaps.delete_pending(swap_id).await? {
            let current = self.get_swap(swap_id).await?;
            return Err(SwapError::NotPending(current.status));
        }

        info!(swap_id = %swap_id, "swap request deleted");
        Ok(())
    }

    /// List a user's swap requests.
    pub async fn list_swap_requests(
        &self,
        user_id: &UserId,
        query: SwapListQuery,
    ) -> Result<Vec<SwapRequest>, SwapError> {
        let filter = self.build_filter(user_id, query)?;
        Ok(self.swaps.list(&filter).await?)
    }

    /// Convert a caller query into a validated repository filter.
    fn build_filter(
        &self,
        user_id: &UserId,
        query: SwapListQuery,
    ) -> Result<SwapRequestFilter, SwapError> {
        if let Some(limit) = query.limit {
            if limit == 0 || limit > self.listing.max_page_size {
                return Err(SwapError::Invalid(format!(
                    "limit must be between 1 and {}",
                    self.listing.max_page_size
                )));
            }
        }

        let (requester_id, responder_id, participant_id) = match (query.sent, query.received) {
            (true, false) => (Some(*user_id), None, None),
            (false, true) => (None, Some(*user_id), None),
            _ => (None, None, Some(*user_id)),
        };

        Ok(SwapRequestFilter {
            statuses: query.status.into_iter().collect(),
            requester_id,
            responder_id,
            participant_id,
            sort_by: query.sort_by.unwrap_or_default(),
            sort_order: query.sort_order.unwrap_or_default(),
            limit: Some(query.limit.unwrap_or(self.listing.max_page_size)),
            offset: query.offset,
        })
    }

    /// Sent and received requests, newest first.
    pub async fn swaps_for_user(&self, user_id: &UserId) -> Result<UserSwaps, SwapError> {
        let limit = self.listing.overview_limit;
        let sent = self
            .swaps
            .list(&SwapRequestFilter {
                requester_id: Some(*user_id),
                limit: Some(limit),
                ..Default::default()
            })
            .await?;
        let received = self
            .swaps
            .list(&SwapRequestFilter {
                responder_id: Some(*user_id),
                limit: Some(limit),
                ..Default::default()
            })
            .await?;
        Ok(UserSwaps { sent, received })
    }

    /// Pending requests in either role, newest first.
    pub async fn pending_swap_requests(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<SwapRequest>, SwapError> {
        Ok(self
            .swaps
            .list(&SwapRequestFilter {
                statuses: vec![SwapStatus::Pending],
                participant_id: Some(*user_id),
                limit: Some(self.listing.pending_limit),
                ..Default::default()
            })
            .await?)
    }

    /// Accepted, rejected, and cancelled requests, most recently resolved first.
    pub async fn swap_history(&self, user_id: &UserId) -> Result<Vec<SwapRequest>, SwapError> {
        Ok(self
            .swaps
            .list(&SwapRequestFilter {
                statuses: SwapStatus::RESOLVED.to_vec(),
                participant_id: Some(*user_id),
                sort_by: SwapSortField::UpdatedAt,
                sort_order: SortOrder::Desc,
                limit: Some(self.listing.history_limit),
                ..Default::default()
            })
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeDirectory, FakeSwapStore};
    use swapmatch_types::error::ErrorKind;
    use swapmatch_types::skill::SkillId;

    struct Fixture {
        service: SwapService<FakeDirectory, FakeSwapStore>,
        store: FakeSwapStore,
        u1: UserId,
        u2: UserId,
        python: SkillId,
        spanish: SkillId,
    }

    /// U1 offers Python and wants Spanish; U2 offers Spanish and wants Python.
    fn fixture() -> Fixture {
        let directory = FakeDirectory::default();
        let u1 = directory.add_user("U1");
        let u2 = directory.add_user("U2");
        let python = directory.add_skill("Python");
        let spanish = directory.add_skill("Spanish");
        directory.offer(u1, python);
        directory.want(u1, spanish);
        directory.offer(u2, spanish);
        directory.want(u2, python);

        let store = FakeSwapStore::default();
        let service = SwapService::new(directory, store.clone(), ListingConfig::default());
        Fixture {
            service,
            store,
            u1,
            u2,
            python,
            spanish,
        }
    }

    fn propose(f: &Fixture) -> CreateSwapRequest {
        CreateSwapRequest {
            requester_id: f.u1,
            responder_id: f.u2,
            offered_skill_id: f.python,
            wanted_skill_id: f.spanish,
        }
    }

    fn swap_in(status: SwapStatus, requester: UserId, responder: UserId) -> SwapRequest {
        let now = Utc::now();
        SwapRequest {
            id: SwapId::new(),
            requester_id: requester,
            responder_id: responder,
            offered_skill_id: SkillId::new(),
            wanted_skill_id: SkillId::new(),
            status,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_succeeds_pending() {
        let f = fixture();
        let swap = f.service.create_swap_request(propose(&f)).await.unwrap();
        assert_eq!(swap.status, SwapStatus::Pending);
        assert_eq!(swap.requester_id, f.u1);
        assert_eq!(swap.created_at, swap.updated_at);
    }

    #[tokio::test]
    async fn test_repeat_proposal_is_duplicate() {
        let f = fixture();
        f.service.create_swap_request(propose(&f)).await.unwrap();
        let err = f.service.create_swap_request(propose(&f)).await.unwrap_err();
        assert!(matches!(err, SwapError::DuplicatePending));
        assert_eq!(err.kind(), ErrorKind::PolicyViolation);
        assert_eq!(f.store.count(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_identical_proposals_one_wins() {
        let f = fixture();
        let (a, b) = tokio::join!(
            f.service.create_swap_request(propose(&f)),
            f.service.create_swap_request(propose(&f)),
        );
        let results = [a, b];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(
            results
                .iter()
                .any(|r| matches!(r, Err(SwapError::DuplicatePending)))
        );
        assert_eq!(f.store.count(), 1);
    }

    #[tokio::test]
    async fn test_new_proposal_allowed_after_resolution() {
        let f = fixture();
        let swap = f.service.create_swap_request(propose(&f)).await.unwrap();
        f.service
            .update_status(&swap.id, &f.u2, SwapStatus::Rejected)
            .await
            .unwrap();
        assert!(f.service.create_swap_request(propose(&f)).await.is_ok());
    }

    #[tokio::test]
    async fn test_each_precondition_has_its_own_error() {
        let f = fixture();

        let mut self_trade = propose(&f);
        self_trade.responder_id = f.u1;
        assert!(matches!(
            f.service.create_swap_request(self_trade).await,
            Err(SwapError::SelfTrade)
        ));

        // U1 does not offer Spanish
        let mut not_offered = propose(&f);
        not_offered.offered_skill_id = f.spanish;
        assert!(matches!(
            f.service.create_swap_request(not_offered).await,
            Err(SwapError::NotOffered)
        ));

        // U2 proposing to U1: U2 offers Spanish, U1 wants Spanish, but asking
        // for Spanish back fails because U1 does not offer it.
        let reversed_wrong = CreateSwapRequest {
            requester_id: f.u2,
            responder_id: f.u1,
            offered_skill_id: f.spanish,
            wanted_skill_id: f.spanish,
        };
        assert!(matches!(
            f.service.create_swap_request(reversed_wrong).await,
            Err(SwapError::SkillNotOfferedByResponder)
        ));

        // B wants nothing, so nothing A offers is wanted.
        let directory = FakeDirectory::default();
        let a = directory.add_user("A");
        let b = directory.add_user("B");
        let go = directory.add_skill("Go");
        let chess = directory.add_skill("Chess");
        directory.offer(a, go);
        directory.offer(b, chess);
        let service = SwapService::new(directory, FakeSwapStore::default(), ListingConfig::default());
        let unwanted = CreateSwapRequest {
            requester_id: a,
            responder_id: b,
            offered_skill_id: go,
            wanted_skill_id: chess,
        };
        assert!(matches!(
            service.create_swap_request(unwanted).await,
            Err(SwapError::SkillNotWantedByResponder)
        ));
        assert_eq!(f.store.count(), 0);
    }

    #[tokio::test]
    async fn test_reject_then_accept_is_not_pending() {
        let f = fixture();
        let swap = f.service.create_swap_request(propose(&f)).await.unwrap();

        let rejected = f
            .service
            .update_status(&swap.id, &f.u2, SwapStatus::Rejected)
            .await
            .unwrap();
        assert_eq!(rejected.status, SwapStatus::Rejected);

        let err = f
            .service
            .update_status(&swap.id, &f.u2, SwapStatus::Accepted)
            .await
            .unwrap_err();
        assert!(matches!(err, SwapError::NotPending(SwapStatus::Rejected)));
    }

    #[tokio::test]
    async fn test_requester_cannot_accept() {
        let f = fixture();
        let swap = f.service.create_swap_request(propose(&f)).await.unwrap();
        let err = f
            .service
            .update_status(&swap.id, &f.u1, SwapStatus::Accepted)
            .await
            .unwrap_err();
        assert!(matches!(err, SwapError::UnauthorizedTransition(SwapStatus::Accepted)));
        assert_eq!(
            f.service.get_swap(&swap.id).await.unwrap().status,
            SwapStatus::Pending
        );
    }

    #[tokio::test]
    async fn test_either_participant_can_cancel() {
        let f = fixture();
        let swap = f.service.create_swap_request(propose(&f)).await.unwrap();
        let cancelled = f
            .service
            .update_status(&swap.id, &f.u1, SwapStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(cancelled.status, SwapStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_update_unknown_swap_is_not_found() {
        let f = fixture();
        let err = f
            .service
            .update_status(&SwapId::new(), &f.u2, SwapStatus::Accepted)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_transition_table_is_exhaustive() {
        let requester = UserId::new();
        let responder = UserId::new();
        let outsider = UserId::new();
        let all = [
            SwapStatus::Pending,
            SwapStatus::Accepted,
            SwapStatus::Rejected,
            SwapStatus::Cancelled,
        ];

        let mut successes = Vec::new();
        for from in all {
            for to in all {
                for actor in [requester, responder, outsider] {
                    let swap = swap_in(from, requester, responder);
                    let result = check_transition(&swap, &actor, to);
                    if result.is_ok() {
                        successes.push((from, to, actor));
                        continue;
                    }
                    let err = result.unwrap_err();
                    if to == SwapStatus::Pending {
                        assert_eq!(err.kind(), ErrorKind::Validation);
                    } else if actor == outsider {
                        assert!(matches!(err, SwapError::UnauthorizedTransition(_)));
                    } else if from.is_terminal() {
                        assert!(matches!(err, SwapError::NotPending(s) if s == from));
                    } else {
                        assert!(matches!(err, SwapError::UnauthorizedTransition(_)));
                    }
                }
            }
        }

        let p = SwapStatus::Pending;
        assert_eq!(
            successes,
            vec![
                (p, SwapStatus::Accepted, responder),
                (p, SwapStatus::Rejected, responder),
                (p, SwapStatus::Cancelled, requester),
                (p, SwapStatus::Cancelled, responder),
            ]
        );
    }

    #[tokio::test]
    async fn test_concurrent_accept_and_cancel_one_wins() {
        let f = fixture();
        let swap = f.service.create_swap_request(propose(&f)).await.unwrap();
        let (accept, cancel) = tokio::join!(
            f.service.update_status(&swap.id, &f.u2, SwapStatus::Accepted),
            f.service.update_status(&swap.id, &f.u1, SwapStatus::Cancelled),
        );
        let wins = [accept.is_ok(), cancel.is_ok()];
        assert_eq!(wins.iter().filter(|w| **w).count(), 1);
        let loser = if accept.is_ok() { cancel } else { accept };
        assert!(matches!(loser, Err(SwapError::NotPending(_))));
    }

    #[tokio::test]
    async fn test_delete_rules() {
        let f = fixture();
        let swap = f.service.create_swap_request(propose(&f)).await.unwrap();

        let err = f
            .service
            .delete_swap_request(&swap.id, &f.u2)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);

        f.service.delete_swap_request(&swap.id, &f.u1).await.unwrap();
        assert!(matches!(
            f.service.get_swap(&swap.id).await,
            Err(SwapError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_delete_resolved_is_not_pending() {
        let f = fixture();
        let swap = f.service.create_swap_request(propose(&f)).await.unwrap();
        f.service
            .update_status(&swap.id, &f.u2, SwapStatus::Accepted)
            .await
            .unwrap();
        let err = f
            .service
            .delete_swap_request(&swap.id, &f.u1)
            .await
            .unwrap_err();
        assert!(matches!(err, SwapError::NotPending(SwapStatus::Accepted)));
    }

    #[tokio::test]
    async fn test_listing_views() {
        let f = fixture();
        let first = f.service.create_swap_request(propose(&f)).await.unwrap();
        f.service
            .update_status(&first.id, &f.u2, SwapStatus::Accepted)
            .await
            .unwrap();
        let other = swap_in(SwapStatus::Pending, f.u2, f.u1);
        f.store.put(other.clone());

        let overview = f.service.swaps_for_user(&f.u1).await.unwrap();
        assert_eq!(overview.sent.len(), 1);
        assert_eq!(overview.received.len(), 1);
        assert_eq!(overview.received[0].id, other.id);

        let pending = f.service.pending_swap_requests(&f.u1).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, other.id);

        let history = f.service.swap_history(&f.u1).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, first.id);

        let sent_accepted = f
            .service
            .list_swap_requests(
                &f.u1,
                SwapListQuery {
                    sent: true,
                    status: Some(SwapStatus::Accepted),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(sent_accepted.len(), 1);

        let both = f
            .service
            .list_swap_requests(&f.u1, SwapListQuery::default())
            .await
            .unwrap();
        assert_eq!(both.len(), 2);
    }

    #[tokio::test]
    async fn test_list_rejects_bad_limit() {
        let f = fixture();
        for limit in [0, 101] {
            let err = f
                .service
                .list_swap_requests(
                    &f.u1,
                    SwapListQuery {
                        limit: Some(limit),
                        ..Default::default()
                    },
                )
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
    }

    #[tokio::test]
    async fn test_store_outage_surfaces_as_infrastructure() {
        let f = fixture();
        f.store.set_unavailable(true);
        let err = f.service.create_swap_request(propose(&f)).await.unwrap_err();
        assert!(matches!(err, SwapError::Storage(RepositoryError::Connection)));
        assert_eq!(err.kind(), ErrorKind::Infrastructure);
    }
}
