//! Directory lookups for users and skills.

use swapmatch_types::error::RepositoryError;
use swapmatch_types::skill::{Skill, SkillId};
use swapmatch_types::user::{UserId, UserSummary};

/// Read-only view of user profiles and the skill catalog, used to hydrate
/// detail views after the bare records are fetched.
pub trait DirectoryRepository: Send + Sync {
    fn user_summary(
        &self,
        id: &UserId,
    ) -> impl std::future::Future<Output = Result<Option<UserSummary>, RepositoryError>> + Send;

    fn skill(
        &self,
        id: &SkillId,
    ) -> impl std::future::Future<Output = Result<Option<Skill>, RepositoryError>> + Send;
}
