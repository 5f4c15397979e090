use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::id::uuid_id;

uuid_id!(
    /// Identifier of a platform user.
    UserId
);

/// Public-facing projection of a user.
///
/// Users are owned by the identity subsystem; the engine only reads this
/// summary when hydrating matches and swap detail views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub location: Option<String>,
    pub photo_url: Option<String>,
}
