//! In-memory fakes of every repository port, for service tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use swapmatch_types::availability::{AvailabilitySlot, SlotId};
use swapmatch_types::error::RepositoryError;
use swapmatch_types::rating::{RatingId, Score, SwapRating};
use swapmatch_types::skill::{Skill, SkillId};
use swapmatch_types::swap::{SwapId, SwapRequest, SwapStatus, TradeCandidate};
use swapmatch_types::user::{UserId, UserSummary};

use crate::repository::SortOrder;
use crate::repository::availability::AvailabilityRepository;
use crate::repository::directory::DirectoryRepository;
use crate::repository::rating::{RatingFilter, RatingRepository};
use crate::repository::skill_relation::SkillRelationRepository;
use crate::repository::swap_request::{SwapRequestFilter, SwapRequestRepository, SwapSortField};

struct FakeUser {
    summary: UserSummary,
    public: bool,
    deleted: bool,
}

#[derive(Default)]
struct DirectoryState {
    users: Vec<FakeUser>,
    skills: Vec<Skill>,
    offered: Vec<(UserId, SkillId)>,
    wanted: Vec<(UserId, SkillId)>,
}

/// Users, skills and offered/wanted links. Matching follows the literal
/// nested-loop definition so tests can compare against it.
#[derive(Clone, Default)]
pub struct FakeDirectory {
    state: Arc<Mutex<DirectoryState>>,
}

impl FakeDirectory {
    pub fn add_user(&self, name: &str) -> UserId {
        self.insert_user(name, true, false)
    }

    pub fn add_private_user(&self, name: &str) -> UserId {
        self.insert_user(name, false, false)
    }

    pub fn add_deleted_user(&self, name: &str) -> UserId {
        self.insert_user(name, true, true)
    }

    fn insert_user(&self, name: &str, public: bool, deleted: bool) -> UserId {
        let id = UserId::new();
        self.state.lock().unwrap().users.push(FakeUser {
            summary: UserSummary {
                id,
                name: name.to_string(),
                location: None,
                photo_url: None,
            },
            public,
            deleted,
        });
        id
    }

    pub fn add_skill(&self, name: &str) -> SkillId {
        let id = SkillId::new();
        self.state.lock().unwrap().skills.push(Skill {
            id,
            name: name.to_string(),
            created_at: Utc::now(),
        });
        id
    }

    pub fn offer(&self, user: UserId, skill: SkillId) {
        self.state.lock().unwrap().offered.push((user, skill));
    }

    pub fn want(&self, user: UserId, skill: SkillId) {
        self.state.lock().unwrap().wanted.push((user, skill));
    }
}

impl DirectoryState {
    fn skill(&self, id: &SkillId) -> Option<Skill> {
        self.skills.iter().find(|s| s.id == *id).cloned()
    }
}

impl SkillRelationRepository for FakeDirectory {
    async fn is_offering(&self, user_id: &UserId, skill_id: &SkillId) -> Result<bool, RepositoryError> {
        let state = self.state.lock().unwrap();
        Ok(state.offered.contains(&(*user_id, *skill_id)))
    }

    async fn is_wanting(&self, user_id: &UserId, skill_id: &SkillId) -> Result<bool, RepositoryError> {
        let state = self.state.lock().unwrap();
        Ok(state.wanted.contains(&(*user_id, *skill_id)))
    }

    async fn offered_skills(&self, user_id: &UserId) -> Result<HashSet<SkillId>, RepositoryError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .offered
            .iter()
            .filter(|(u, _)| u == user_id)
            .map(|(_, s)| *s)
            .collect())
    }

    async fn wanted_skills(&self, user_id: &UserId) -> Result<HashSet<SkillId>, RepositoryError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .wanted
            .iter()
            .filter(|(u, _)| u == user_id)
            .map(|(_, s)| *s)
            .collect())
    }

    async fn find_trade_partners(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<TradeCandidate>, RepositoryError> {
        let state = self.state.lock().unwrap();
        let mine = |links: &[(UserId, SkillId)]| -> Vec<SkillId> {
            links
                .iter()
                .filter(|(u, _)| u == user_id)
                .map(|(_, s)| *s)
                .collect()
        };
        let offered = mine(&state.offered);
        let wanted = mine(&state.wanted);

        let mut found = Vec::new();
        for o in &offered {
            for w in &wanted {
                for user in &state.users {
                    let id = user.summary.id;
                    if id == *user_id || !user.public || user.deleted {
                        continue;
                    }
                    if state.wanted.contains(&(id, *o)) && state.offered.contains(&(id, *w)) {
                        if found.len() as u32 >= limit {
                            return Ok(found);
                        }
                        found.push(TradeCandidate {
                            user: user.summary.clone(),
                            offered_skill: state.skill(o).ok_or(RepositoryError::NotFound)?,
                            wanted_skill: state.skill(w).ok_or(RepositoryError::NotFound)?,
                        });
                    }
                }
            }
        }
        Ok(found)
    }
}

impl DirectoryRepository for FakeDirectory {
    async fn user_summary(&self, id: &UserId) -> Result<Option<UserSummary>, RepositoryError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .users
            .iter()
            .find(|u| u.summary.id == *id)
            .map(|u| u.summary.clone()))
    }

    async fn skill(&self, id: &SkillId) -> Result<Option<Skill>, RepositoryError> {
        Ok(self.state.lock().unwrap().skill(id))
    }
}

/// Swap request store with a switch to simulate an unavailable database.
#[derive(Clone, Default)]
pub struct FakeSwapStore {
    swaps: Arc<Mutex<Vec<SwapRequest>>>,
    unavailable: Arc<AtomicBool>,
}

impl FakeSwapStore {
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), RepositoryError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(RepositoryError::Connection)
        } else {
            Ok(())
        }
    }

    /// Insert a record as-is, bypassing the pending-only guard.
    pub fn put(&self, swap: SwapRequest) {
        self.swaps.lock().unwrap().push(swap);
    }

    pub fn count(&self) -> usize {
        self.swaps.lock().unwrap().len()
    }
}

fn matches_filter(swap: &SwapRequest, filter: &SwapRequestFilter) -> bool {
    (filter.statuses.is_empty() || filter.statuses.contains(&swap.status))
        && filter.requester_id.is_none_or(|id| swap.requester_id == id)
        && filter.responder_id.is_none_or(|id| swap.responder_id == id)
        && filter.participant_id.is_none_or(|id| swap.is_participant(&id))
}

fn page<T>(items: Vec<T>, limit: Option<u32>, offset: Option<u32>) -> Vec<T> {
    items
        .into_iter()
        .skip(offset.unwrap_or(0) as usize)
        .take(limit.map_or(usize::MAX, |l| l as usize))
        .collect()
}

impl SwapRequestRepository for FakeSwapStore {
    async fn insert_pending(&self, request: &SwapRequest) -> Result<SwapRequest, RepositoryError> {
        self.check()?;
        let mut swaps = self.swaps.lock().unwrap();
        let duplicate = swaps.iter().any(|s| {
            s.status == SwapStatus::Pending
                && s.requester_id == request.requester_id
                && s.responder_id == request.responder_id
                && s.offered_skill_id == request.offered_skill_id
                && s.wanted_skill_id == request.wanted_skill_id
        });
        if duplicate {
            return Err(RepositoryError::Conflict("duplicate pending swap".to_string()));
        }
        swaps.push(request.clone());
        Ok(request.clone())
    }

    async fn get_by_id(&self, id: &SwapId) -> Result<Option<SwapRequest>, RepositoryError> {
        self.check()?;
        Ok(self.swaps.lock().unwrap().iter().find(|s| s.id == *id).cloned())
    }

    async fn list(&self, filter: &SwapRequestFilter) -> Result<Vec<SwapRequest>, RepositoryError> {
        self.check()?;
        let mut found: Vec<SwapRequest> = self
            .swaps
            .lock()
            .unwrap()
            .iter()
            .filter(|s| matches_filter(s, filter))
            .cloned()
            .collect();
        let key = |s: &SwapRequest| -> DateTime<Utc> {
            match filter.sort_by {
                SwapSortField::CreatedAt => s.created_at,
                SwapSortField::UpdatedAt => s.updated_at,
            }
        };
        found.sort_by_key(key);
        if filter.sort_order == SortOrder::Desc {
            found.reverse();
        }
        Ok(page(found, filter.limit, filter.offset))
    }

    async fn transition_from_pending(
        &self,
        id: &SwapId,
        to: SwapStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<SwapRequest>, RepositoryError> {
        self.check()?;
        let mut swaps = self.swaps.lock().unwrap();
        match swaps
            .iter_mut()
            .find(|s| s.id == *id && s.status == SwapStatus::Pending)
        {
            Some(swap) => {
                swap.status = to;
                swap.updated_at = at;
                Ok(Some(swap.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_pending(&self, id: &SwapId) -> Result<bool, RepositoryError> {
        self.check()?;
        let mut swaps = self.swaps.lock().unwrap();
        let before = swaps.len();
        swaps.retain(|s| !(s.id == *id && s.status == SwapStatus::Pending));
        Ok(swaps.len() != before)
    }
}

#[derive(Clone, Default)]
pub struct FakeSlotStore {
    slots: Arc<Mutex<Vec<AvailabilitySlot>>>,
}

impl AvailabilityRepository for FakeSlotStore {
    async fn create(&self, slot: &AvailabilitySlot) -> Result<AvailabilitySlot, RepositoryError> {
        self.slots.lock().unwrap().push(slot.clone());
        Ok(slot.clone())
    }

    async fn get(&self, id: &SlotId, owner: &UserId) -> Result<Option<AvailabilitySlot>, RepositoryError> {
        Ok(self
            .slots
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == *id && s.user_id == *owner)
            .cloned())
    }

    async fn list_for_user(&self, owner: &UserId) -> Result<Vec<AvailabilitySlot>, RepositoryError> {
        let mut slots: Vec<AvailabilitySlot> = self
            .slots
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.user_id == *owner)
            .cloned()
            .collect();
        slots.sort_by_key(|s| (s.day_bitmask, s.start_time));
        Ok(slots)
    }

    async fn update(&self, slot: &AvailabilitySlot) -> Result<AvailabilitySlot, RepositoryError> {
        let mut slots = self.slots.lock().unwrap();
        let existing = slots
            .iter_mut()
            .find(|s| s.id == slot.id && s.user_id == slot.user_id)
            .ok_or(RepositoryError::NotFound)?;
        *existing = slot.clone();
        Ok(slot.clone())
    }

    async fn delete(&self, id: &SlotId, owner: &UserId) -> Result<bool, RepositoryError> {
        let mut slots = self.slots.lock().unwrap();
        let before = slots.len();
        slots.retain(|s| !(s.id == *id && s.user_id == *owner));
        Ok(slots.len() != before)
    }
}

#[derive(Clone, Default)]
pub struct FakeRatingStore {
    ratings: Arc<Mutex<Vec<SwapRating>>>,
}

impl RatingRepository for FakeRatingStore {
    async fn insert(&self, rating: &SwapRating) -> Result<SwapRating, RepositoryError> {
        let mut ratings = self.ratings.lock().unwrap();
        if ratings
            .iter()
            .any(|r| r.swap_id == rating.swap_id && r.rater_id == rating.rater_id)
        {
            return Err(RepositoryError::Conflict("duplicate rating".to_string()));
        }
        ratings.push(rating.clone());
        Ok(rating.clone())
    }

    async fn get_by_id(&self, id: &RatingId) -> Result<Option<SwapRating>, RepositoryError> {
        Ok(self.ratings.lock().unwrap().iter().find(|r| r.id == *id).cloned())
    }

    async fn has_rated(&self, swap_id: &SwapId, rater_id: &UserId) -> Result<bool, RepositoryError> {
        Ok(self
            .ratings
            .lock()
            .unwrap()
            .iter()
            .any(|r| r.swap_id == *swap_id && r.rater_id == *rater_id))
    }

    async fn list_for_swap(&self, swap_id: &SwapId) -> Result<Vec<SwapRating>, RepositoryError> {
        let mut found: Vec<SwapRating> = self
            .ratings
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.swap_id == *swap_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        filter: &RatingFilter,
    ) -> Result<Vec<SwapRating>, RepositoryError> {
        let as_rater = filter.as_rater;
        let as_ratee = filter.as_ratee || !filter.as_rater;
        let mut found: Vec<SwapRating> = self
            .ratings
            .lock()
            .unwrap()
            .iter()
            .filter(|r| (as_rater && r.rater_id == *user_id) || (as_ratee && r.ratee_id == *user_id))
            .filter(|r| filter.min_score.is_none_or(|min| r.score >= min))
            .filter(|r| filter.max_score.is_none_or(|max| r.score <= max))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page(found, filter.limit, filter.offset))
    }

    async fn scores_received(&self, user_id: &UserId) -> Result<Vec<Score>, RepositoryError> {
        Ok(self
            .ratings
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.ratee_id == *user_id)
            .map(|r| r.score)
            .collect())
    }

    async fn update(&self, rating: &SwapRating) -> Result<SwapRating, RepositoryError> {
        let mut ratings = self.ratings.lock().unwrap();
        let existing = ratings
            .iter_mut()
            .find(|r| r.id == rating.id)
            .ok_or(RepositoryError::NotFound)?;
        *existing = rating.clone();
        Ok(rating.clone())
    }

    async fn delete(&self, id: &RatingId) -> Result<bool, RepositoryError> {
        let mut ratings = self.ratings.lock().unwrap();
        let before = ratings.len();
        ratings.retain(|r| r.id != *id);
        Ok(ratings.len() != before)
    }
}
