//! Skill relation repository trait definition.

use std::collections::HashSet;

use swapmatch_types::error::RepositoryError;
use swapmatch_types::skill::SkillId;
use swapmatch_types::swap::TradeCandidate;
use swapmatch_types::user::UserId;

/// Read access to which users offer and want which skills.
///
/// Offered/wanted links are written by the identity subsystem; the engine
/// only reads them.
pub trait SkillRelationRepository: Send + Sync {
    /// Whether `user_id` currently offers `skill_id`.
    fn is_offering(
        &self,
        user_id: &UserId,
        skill_id: &SkillId,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Whether `user_id` currently wants `skill_id`.
    fn is_wanting(
        &self,
        user_id: &UserId,
        skill_id: &SkillId,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// All skills `user_id` offers.
    fn offered_skills(
        &self,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<HashSet<SkillId>, RepositoryError>> + Send;

    /// All skills `user_id` wants.
    fn wanted_skills(
        &self,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<HashSet<SkillId>, RepositoryError>> + Send;

    /// Find reciprocal trade partners for `user_id`.
    ///
    /// Must return exactly what the nested loop would: for every skill `o`
    /// the user offers and every skill `w` the user wants, one entry per
    /// other public, non-deleted user who wants `o` and offers `w`. A
    /// candidate appears once per linking pair; no deduplication across
    /// pairs. At most `limit` entries are returned.
    fn find_trade_partners(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<TradeCandidate>, RepositoryError>> + Send;
}
