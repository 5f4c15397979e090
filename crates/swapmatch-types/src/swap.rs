use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::id::uuid_id;
use crate::skill::{Skill, SkillId};
use crate::user::{UserId, UserSummary};

uuid_id!(
    /// Identifier of a swap request.
    SwapId
);

/// A proposed bilateral trade of one skill for another.
///
/// `offered_skill_id` is what the requester teaches; `wanted_skill_id` is
/// what the requester wants from the responder (so the responder must be
/// offering it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRequest {
    pub id: SwapId,
    pub requester_id: UserId,
    pub responder_id: UserId,
    pub offered_skill_id: SkillId,
    pub wanted_skill_id: SkillId,
    pub status: SwapStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SwapRequest {
    /// Whether `user_id` is the requester or the responder.
    pub fn is_participant(&self, user_id: &UserId) -> bool {
        self.requester_id == *user_id || self.responder_id == *user_id
    }

    /// The participant on the other side of the trade from `user_id`.
    ///
    /// Returns `None` when `user_id` is not a participant.
    pub fn counterpart_of(&self, user_id: &UserId) -> Option<UserId> {
        if self.requester_id == *user_id {
            Some(self.responder_id)
        } else if self.responder_id == *user_id {
            Some(self.requester_id)
        } else {
            None
        }
    }
}

/// Swap request lifecycle states.
///
/// `Pending` is the only non-terminal state:
///
/// - Pending -> Accepted (responder)
/// - Pending -> Rejected (responder)
/// - Pending -> Cancelled (requester or responder)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
}

impl SwapStatus {
    /// The three resolved states shown in swap history.
    pub const RESOLVED: [SwapStatus; 3] = [
        SwapStatus::Accepted,
        SwapStatus::Rejected,
        SwapStatus::Cancelled,
    ];

    /// Terminal states have no outgoing transitions.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SwapStatus::Pending)
    }

    /// Lowercase persistence token.
    pub fn as_str(&self) -> &'static str {
        match self {
            SwapStatus::Pending => "pending",
            SwapStatus::Accepted => "accepted",
            SwapStatus::Rejected => "rejected",
            SwapStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for SwapStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SwapStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SwapStatus::Pending),
            "accepted" => Ok(SwapStatus::Accepted),
            "rejected" => Ok(SwapStatus::Rejected),
            "cancelled" => Ok(SwapStatus::Cancelled),
            other => Err(format!("invalid swap status: '{other}'")),
        }
    }
}

/// Input for proposing a swap. The requester is the acting user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSwapRequest {
    pub requester_id: UserId,
    pub responder_id: UserId,
    pub offered_skill_id: SkillId,
    pub wanted_skill_id: SkillId,
}

/// Sent and received requests for one user, newest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserSwaps {
    pub sent: Vec<SwapRequest>,
    pub received: Vec<SwapRequest>,
}

/// A swap request hydrated with its participants and skills.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapRequestDetail {
    #[serde(flatten)]
    pub request: SwapRequest,
    pub requester: UserSummary,
    pub responder: UserSummary,
    pub offered_skill: Skill,
    pub wanted_skill: Skill,
}

/// A user who wants one of our offered skills and offers one of our wanted
/// skills, together with the skill pair that links us.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeCandidate {
    pub user: UserSummary,
    pub offered_skill: Skill,
    pub wanted_skill: Skill,
}

/// A scored potential swap partner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapMatch {
    pub user: UserSummary,
    pub offered_skill: Skill,
    pub wanted_skill: Skill,
    pub match_score: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_swap(requester: UserId, responder: UserId) -> SwapRequest {
        let now = Utc::now();
        SwapRequest {
            id: SwapId::new(),
            requester_id: requester,
            responder_id: responder,
            offered_skill_id: SkillId::new(),
            wanted_skill_id: SkillId::new(),
            status: SwapStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_status_tokens_are_lowercase() {
        for (status, token) in [
            (SwapStatus::Pending, "pending"),
            (SwapStatus::Accepted, "accepted"),
            (SwapStatus::Rejected, "rejected"),
            (SwapStatus::Cancelled, "cancelled"),
        ] {
            assert_eq!(status.to_string(), token);
            assert_eq!(token.parse::<SwapStatus>().unwrap(), status);
            assert_eq!(
                serde_json::to_string(&status).unwrap(),
                format!("\"{token}\"")
            );
        }
    }

    #[test]
    fn test_status_parse_is_strict() {
        assert!("Pending".parse::<SwapStatus>().is_err());
        assert!("canceled".parse::<SwapStatus>().is_err());
    }

    #[test]
    fn test_only_pending_is_non_terminal() {
        assert!(!SwapStatus::Pending.is_terminal());
        for status in SwapStatus::RESOLVED {
            assert!(status.is_terminal());
        }
    }

    #[test]
    fn test_counterpart_of() {
        let a = UserId::new();
        let b = UserId::new();
        let swap = make_swap(a, b);
        assert_eq!(swap.counterpart_of(&a), Some(b));
        assert_eq!(swap.counterpart_of(&b), Some(a));
        assert_eq!(swap.counterpart_of(&UserId::new()), None);
        assert!(swap.is_participant(&a));
        assert!(!swap.is_participant(&UserId::new()));
    }
}
