use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::{ActivityLevel, Message, Profile, ScoredCandidate};

/// Response for the find candidates endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindCandidatesResponse {
    pub candidates: Vec<ScoredCandidate>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
}

/// Response for the record swipe endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSwipeResponse {
    pub success: bool,
    #[serde(rename = "matchCreated")]
    pub match_created: bool,
    #[serde(rename = "matchId")]
    pub match_id: Option<Uuid>,
}

/// One entry in a user's match list, enriched with the other member's
/// profile when the profile store has it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchEntry {
    #[serde(rename = "matchId")]
    pub match_id: Uuid,
    #[serde(rename = "matchedAt")]
    pub matched_at: chrono::DateTime<chrono::Utc>,
    pub user: Option<MatchedUser>,
}

/// Profile summary of the other match member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedUser {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub languages: Vec<String>,
    #[serde(rename = "activityLevel")]
    pub activity_level: ActivityLevel,
    pub location: String,
}

impl From<Profile> for MatchedUser {
    fn from(profile: Profile) -> Self {
        Self {
            user_id: profile.user_id,
            display_name: profile.display_name,
            languages: profile.languages,
            activity_level: profile.activity_level,
            location: profile.location,
        }
    }
}

/// Response for the list matches endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListMatchesResponse {
    pub matches: Vec<MatchEntry>,
}

/// Response for the post message endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostMessageResponse {
    pub message: Message,
}

/// Response for the list messages endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListMessagesResponse {
    pub messages: Vec<Message>,
}

/// Response for the profile sync endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncProfileResponse {
    pub profile: Profile,
    pub created: bool,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
