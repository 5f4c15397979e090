use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::id::uuid_id;

uuid_id!(
    /// Identifier of a tradeable skill.
    SkillId
);

/// A skill users can offer or want.
///
/// Immutable once referenced by an offered/wanted link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
