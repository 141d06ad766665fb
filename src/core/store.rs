use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::EngineError;
use crate::models::{Match, Message, SwipeRecord};

/// Result of an idempotent match creation.
#[derive(Debug, Clone)]
pub struct MatchCreation {
    pub record: Match,
    /// False when the unordered pair already had a match and the existing
    /// record was returned instead.
    pub created: bool,
}

/// Persistence port for swipes, matches and messages.
///
/// Implementations enforce the two uniqueness constraints the engine
/// depends on: one swipe per (actor, target) and one match per unordered
/// pair. The constraints, not application locks, are the source of truth
/// under concurrent mutual likes.
#[async_trait]
pub trait EngineStore: Send + Sync {
    /// Append a swipe decision. Returns false when the (actor, target)
    /// pair already has a recorded decision; the record is left untouched.
    async fn insert_swipe(&self, swipe: &SwipeRecord) -> Result<bool, EngineError>;

    async fn find_swipe(
        &self,
        actor_id: &str,
        target_id: &str,
    ) -> Result<Option<SwipeRecord>, EngineError>;

    /// All target ids the actor has already swiped on.
    async fn swiped_target_ids(&self, actor_id: &str) -> Result<Vec<String>, EngineError>;

    /// Create the match for an unordered pair, or return the existing one.
    async fn create_match(&self, u: &str, v: &str) -> Result<MatchCreation, EngineError>;

    async fn get_match(&self, match_id: Uuid) -> Result<Option<Match>, EngineError>;

    async fn find_match_for_pair(&self, u: &str, v: &str) -> Result<Option<Match>, EngineError>;

    /// Matches the user is a member of, newest first.
    async fn list_matches(&self, user_id: &str) -> Result<Vec<Match>, EngineError>;

    async fn append_message(&self, message: &Message) -> Result<(), EngineError>;

    /// Messages for a match, creation time ascending, insertion order on ties.
    async fn list_messages(&self, match_id: Uuid) -> Result<Vec<Message>, EngineError>;
}
