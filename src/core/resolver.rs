use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::EngineError;
use crate::core::store::EngineStore;
use crate::models::{Match, SwipeRecord};

/// Outcome of recording a swipe.
#[derive(Debug, Clone)]
pub struct SwipeOutcome {
    /// True when a match now exists for the pair, whether this call created
    /// it or a concurrent mutual like got there first.
    pub match_created: bool,
    pub match_id: Option<Uuid>,
}

/// Interaction state of an unordered user pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairState {
    NoInteraction,
    OneSidedLike { liker: String },
    OneSidedPass { passer: String },
    Matched { match_id: Uuid },
}

/// Swipe → match state machine
///
/// Records swipe decisions and resolves reciprocity. Holds an explicit
/// store handle so tests can substitute an in-memory double.
#[derive(Clone)]
pub struct MatchResolver {
    store: Arc<dyn EngineStore>,
}

impl MatchResolver {
    pub fn new(store: Arc<dyn EngineStore>) -> Self {
        Self { store }
    }

    /// Record a swipe decision and resolve reciprocity.
    ///
    /// A duplicate decision for the same (actor, target) is a `Conflict` —
    /// a user cannot flip a prior decision through this path. A pass never
    /// creates a match and skips the reciprocity check entirely. On a
    /// mutual like the match is created idempotently: the store's
    /// unordered-pair constraint decides the race and a lost creation
    /// surfaces the existing match as success.
    pub async fn record_swipe(
        &self,
        actor_id: &str,
        target_id: &str,
        liked: bool,
    ) -> Result<SwipeOutcome, EngineError> {
        if target_id.is_empty() {
            return Err(EngineError::InvalidInput("target id is required".to_string()));
        }
        if actor_id == target_id {
            return Err(EngineError::InvalidInput(
                "cannot swipe on yourself".to_string(),
            ));
        }

        let swipe = SwipeRecord {
            actor_id: actor_id.to_string(),
            target_id: target_id.to_string(),
            liked,
            created_at: chrono::Utc::now(),
        };

        if !self.store.insert_swipe(&swipe).await? {
            return Err(EngineError::Conflict(format!(
                "swipe already recorded for {} -> {}",
                actor_id, target_id
            )));
        }

        if !liked {
            tracing::debug!("Recorded pass: {} -> {}", actor_id, target_id);
            return Ok(SwipeOutcome {
                match_created: false,
                match_id: None,
            });
        }

        let reciprocal = self.store.find_swipe(target_id, actor_id).await?;
        match reciprocal {
            Some(prior) if prior.liked => {
                let creation = self.store.create_match(actor_id, target_id).await?;
                if creation.created {
                    tracing::info!(
                        "Match created: {} <-> {} ({})",
                        actor_id,
                        target_id,
                        creation.record.id
                    );
                } else {
                    tracing::debug!(
                        "Match already existed for {} <-> {}, returning {}",
                        actor_id,
                        target_id,
                        creation.record.id
                    );
                }
                Ok(SwipeOutcome {
                    match_created: true,
                    match_id: Some(creation.record.id),
                })
            }
            _ => {
                tracing::debug!("Recorded one-sided like: {} -> {}", actor_id, target_id);
                Ok(SwipeOutcome {
                    match_created: false,
                    match_id: None,
                })
            }
        }
    }

    /// Current state of the (u, v) pair.
    ///
    /// A like from either side outranks a pass: passes never transition,
    /// while a like still awaits reciprocity.
    pub async fn pair_state(&self, u: &str, v: &str) -> Result<PairState, EngineError> {
        if let Some(record) = self.store.find_match_for_pair(u, v).await? {
            return Ok(PairState::Matched {
                match_id: record.id,
            });
        }

        let forward = self.store.find_swipe(u, v).await?;
        let backward = self.store.find_swipe(v, u).await?;

        if let Some(swipe) = [&forward, &backward].into_iter().flatten().find(|s| s.liked) {
            return Ok(PairState::OneSidedLike {
                liker: swipe.actor_id.clone(),
            });
        }
        if let Some(swipe) = forward.as_ref().or(backward.as_ref()) {
            return Ok(PairState::OneSidedPass {
                passer: swipe.actor_id.clone(),
            });
        }

        Ok(PairState::NoInteraction)
    }

    /// Matches the user is a member of, newest first.
    pub async fn list_matches(&self, user_id: &str) -> Result<Vec<Match>, EngineError> {
        self.store.list_matches(user_id).await
    }

    /// Target ids the actor has already swiped on, for candidate exclusion.
    pub async fn swiped_target_ids(&self, actor_id: &str) -> Result<Vec<String>, EngineError> {
        self.store.swiped_target_ids(actor_id).await
    }
}
