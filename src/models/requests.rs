use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request to find swipe candidates
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindCandidatesRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[serde(default = "default_limit")]
    pub limit: u16,
    #[serde(default)]
    #[serde(alias = "exclude_user_ids", rename = "excludeUserIds")]
    pub exclude_user_ids: Vec<String>,
}

fn default_limit() -> u16 {
    20
}

/// Request to record a swipe decision
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordSwipeRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[serde(alias = "target_user_id", rename = "targetUserId")]
    pub target_user_id: String,
    pub liked: bool,
}

/// Request to post a message into a match conversation
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PostMessageRequest {
    #[serde(alias = "match_id", rename = "matchId")]
    pub match_id: Uuid,
    #[validate(length(min = 1))]
    #[serde(alias = "sender_id", rename = "senderId")]
    pub sender_id: String,
    pub content: String,
}

/// Query parameters for listing a user's matches
#[derive(Debug, Clone, Deserialize)]
pub struct ListMatchesQuery {
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
}

/// Query parameters for listing messages in a match
#[derive(Debug, Clone, Deserialize)]
pub struct ListMessagesQuery {
    #[serde(alias = "match_id", rename = "matchId")]
    pub match_id: Uuid,
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
}
