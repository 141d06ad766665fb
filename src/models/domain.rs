use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Developer profile as served by the external profile store.
///
/// The engine treats profiles as read-only input: the profile subsystem
/// owns the records, we only score and rank them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[serde(alias = "display_name", rename = "displayName")]
    pub display_name: String,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(rename = "activityLevel", default)]
    pub activity_level: ActivityLevel,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Coarse engagement tier used as a scoring signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl ActivityLevel {
    /// Position on the ordered low..high scale.
    pub fn rank(self) -> u8 {
        match self {
            ActivityLevel::Low => 0,
            ActivityLevel::Medium => 1,
            ActivityLevel::High => 2,
        }
    }
}

/// One-directional swipe decision.
///
/// Unique per (actor, target); a second decision for the same pair is a
/// conflict, never an overwrite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwipeRecord {
    #[serde(rename = "actorId")]
    pub actor_id: String,
    #[serde(rename = "targetId")]
    pub target_id: String,
    pub liked: bool,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Confirmed mutual like between two users.
///
/// The pair is stored in canonical order (`user_a < user_b`) so the store
/// can enforce at most one match per unordered pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub id: Uuid,
    #[serde(rename = "userA")]
    pub user_a: String,
    #[serde(rename = "userB")]
    pub user_b: String,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Match {
    pub fn is_member(&self, user_id: &str) -> bool {
        self.user_a == user_id || self.user_b == user_id
    }

    /// The other party of the match, or None if `user_id` is not a member.
    pub fn other_member(&self, user_id: &str) -> Option<&str> {
        if self.user_a == user_id {
            Some(&self.user_b)
        } else if self.user_b == user_id {
            Some(&self.user_a)
        } else {
            None
        }
    }
}

/// Canonical ordering for an unordered user pair.
pub fn canonical_pair(u: &str, v: &str) -> (String, String) {
    if u <= v {
        (u.to_string(), v.to_string())
    } else {
        (v.to_string(), u.to_string())
    }
}

/// Message inside a match conversation. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    #[serde(rename = "matchId")]
    pub match_id: Uuid,
    #[serde(rename = "senderId")]
    pub sender_id: String,
    #[serde(rename = "receiverId")]
    pub receiver_id: String,
    pub content: String,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Candidate profile with its compatibility score, ready for the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredCandidate {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub languages: Vec<String>,
    pub interests: Vec<String>,
    #[serde(rename = "activityLevel")]
    pub activity_level: ActivityLevel,
    pub location: String,
    pub score: u8,
    #[serde(rename = "sharedLanguages")]
    pub shared_languages: Vec<String>,
    #[serde(rename = "sharedInterests")]
    pub shared_interests: Vec<String>,
}
