//! Availability slot repository trait definition.

use swapmatch_types::availability::{AvailabilitySlot, SlotId};
use swapmatch_types::error::RepositoryError;
use swapmatch_types::user::UserId;

/// Repository trait for availability slot persistence.
///
/// Every lookup and mutation is scoped to the owning user: a slot owned by
/// someone else behaves as if it does not exist.
pub trait AvailabilityRepository: Send + Sync {
    fn create(
        &self,
        slot: &AvailabilitySlot,
    ) -> impl std::future::Future<Output = Result<AvailabilitySlot, RepositoryError>> + Send;

    fn get(
        &self,
        id: &SlotId,
        owner: &UserId,
    ) -> impl std::future::Future<Output = Result<Option<AvailabilitySlot>, RepositoryError>> + Send;

    /// All slots for a user, ordered by day bitmask then start time.
    fn list_for_user(
        &self,
        owner: &UserId,
    ) -> impl std::future::Future<Output = Result<Vec<AvailabilitySlot>, RepositoryError>> + Send;

    /// Overwrite label, days and times. `RepositoryError::NotFound` if the
    /// slot does not exist for `slot.user_id`.
    fn update(
        &self,
        slot: &AvailabilitySlot,
    ) -> impl std::future::Future<Output = Result<AvailabilitySlot, RepositoryError>> + Send;

    /// Returns `false` when nothing was deleted.
    fn delete(
        &self,
        id: &SlotId,
        owner: &UserId,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;
}
