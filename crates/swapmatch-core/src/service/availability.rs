//! Availability slot management and overlap queries.

use chrono::Utc;
use swapmatch_types::availability::{
    AvailabilitySlot, CommonAvailability, SlotId, SlotInput, SlotSpec, Weekday,
    parse_time_of_day,
};
use swapmatch_types::error::{AvailabilityError, RepositoryError};
use swapmatch_types::user::UserId;
use tracing::{debug, info};

use crate::overlap;
use crate::repository::availability::AvailabilityRepository;

/// Owner-scoped slot CRUD plus the two read-only overlap queries.
pub struct AvailabilityService<A: AvailabilityRepository> {
    slots: A,
}

impl<A: AvailabilityRepository> AvailabilityService<A> {
    pub fn new(slots: A) -> Self {
        Self { slots }
    }

    pub async fn create_slot(
        &self,
        owner: &UserId,
        input: &SlotInput,
    ) -> Result<AvailabilitySlot, AvailabilityError> {
        let spec = SlotSpec::parse(input)?;
        let slot = AvailabilitySlot {
            id: SlotId::new(),
            user_id: *owner,
            label: spec.label,
            day_bitmask: spec.day_bitmask,
            start_time: spec.start_time,
            end_time: spec.end_time,
            created_at: Utc::now(),
        };
        let created = self.slots.create(&slot).await.map_err(|e| match e {
            RepositoryError::NotFound => AvailabilityError::NotFound,
            other => AvailabilityError::Storage(other),
        })?;
        info!(slot_id = %created.id, user_id = %owner, days = %created.day_bitmask, "availability slot created");
        Ok(created)
    }

    /// Slots ordered by day bitmask, then start time.
    pub async fn list_slots(&self, owner: &UserId) -> Result<Vec<AvailabilitySlot>, AvailabilityError> {
        Ok(self.slots.list_for_user(owner).await?)
    }

    pub async fn get_slot(
        &self,
        id: &SlotId,
        owner: &UserId,
    ) -> Result<AvailabilitySlot, AvailabilityError> {
        self.slots
            .get(id, owner)
            .await?
            .ok_or(AvailabilityError::NotFound)
    }

    /// Replace label, days and times of an existing slot.
    pub async fn update_slot(
        &self,
        id: &SlotId,
        owner: &UserId,
        input: &SlotInput,
    ) -> Result<AvailabilitySlot, AvailabilityError> {
        let spec = SlotSpec::parse(input)?;
        let existing = self.get_slot(id, owner).await?;
        let slot = AvailabilitySlot {
            label: spec.label,
            day_bitmask: spec.day_bitmask,
            start_time: spec.start_time,
            end_time: spec.end_time,
            ..existing
        };
        let updated = self.slots.update(&slot).await.map_err(|e| match e {
            RepositoryError::NotFound => AvailabilityError::NotFound,
            other => AvailabilityError::Storage(other),
        })?;
        info!(slot_id = %id, "availability slot updated");
        Ok(updated)
    }

    pub async fn delete_slot(&self, id: &SlotId, owner: &UserId) -> Result<(), AvailabilityError> {
        if !self.slots.delete(id, owner).await? {
            return Err(AvailabilityError::NotFound);
        }
        info!(slot_id = %id, "availability slot deleted");
        Ok(())
    }

    /// Weekday/time intersections between two users' slots.
    pub async fn find_common_availability(
        &self,
        user_a: &UserId,
        user_b: &UserId,
    ) -> Result<Vec<CommonAvailability>, AvailabilityError> {
        let slots_a = self.slots.list_for_user(user_a).await?;
        let slots_b = self.slots.list_for_user(user_b).await?;
        let common = overlap::common_availability(&slots_a, &slots_b);
        debug!(
            user_a = %user_a,
            user_b = %user_b,
            entries = common.len(),
            "common availability computed"
        );
        Ok(common)
    }

    /// Slots on `weekday` (1 = Monday .. 7 = Sunday) that fully contain
    /// `[start_time, end_time)`. Times are `HH:MM`.
    pub async fn availability_by_day_and_time(
        &self,
        owner: &UserId,
        weekday: i64,
        start_time: &str,
        end_time: &str,
    ) -> Result<Vec<AvailabilitySlot>, AvailabilityError> {
        let day = Weekday::from_number(weekday)?;
        let start = parse_time_of_day("start_time", start_time)?;
        let end = parse_time_of_day("end_time", end_time)?;
        if end <= start {
            return Err(AvailabilityError::InvalidTimeRange);
        }
        let slots = self.slots.list_for_user(owner).await?;
        Ok(overlap::slots_covering(slots, day, start, end))
    }
}
