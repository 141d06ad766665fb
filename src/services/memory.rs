use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::core::error::EngineError;
use crate::core::store::{EngineStore, MatchCreation};
use crate::models::{canonical_pair, Match, Message, SwipeRecord};

/// In-memory store for tests and local development
///
/// Enforces the same uniqueness constraints as the PostgreSQL schema, so
/// the resolver behaves identically under either adapter. Operations
/// serialize behind one async mutex; each call is atomic the way a single
/// SQL statement is.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    swipes: HashMap<(String, String), SwipeRecord>,
    matches: HashMap<(String, String), Match>,
    messages: Vec<Message>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EngineStore for MemoryStore {
    async fn insert_swipe(&self, swipe: &SwipeRecord) -> Result<bool, EngineError> {
        let mut inner = self.inner.lock().await;
        let key = (swipe.actor_id.clone(), swipe.target_id.clone());
        if inner.swipes.contains_key(&key) {
            return Ok(false);
        }
        inner.swipes.insert(key, swipe.clone());
        Ok(true)
    }

    async fn find_swipe(
        &self,
        actor_id: &str,
        target_id: &str,
    ) -> Result<Option<SwipeRecord>, EngineError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .swipes
            .get(&(actor_id.to_string(), target_id.to_string()))
            .cloned())
    }

    async fn swiped_target_ids(&self, actor_id: &str) -> Result<Vec<String>, EngineError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .swipes
            .keys()
            .filter(|(actor, _)| actor == actor_id)
            .map(|(_, target)| target.clone())
            .collect())
    }

    async fn create_match(&self, u: &str, v: &str) -> Result<MatchCreation, EngineError> {
        let mut inner = self.inner.lock().await;
        let pair = canonical_pair(u, v);

        if let Some(existing) = inner.matches.get(&pair) {
            return Ok(MatchCreation {
                record: existing.clone(),
                created: false,
            });
        }

        let record = Match {
            id: Uuid::new_v4(),
            user_a: pair.0.clone(),
            user_b: pair.1.clone(),
            created_at: chrono::Utc::now(),
        };
        inner.matches.insert(pair, record.clone());

        Ok(MatchCreation {
            record,
            created: true,
        })
    }

    async fn get_match(&self, match_id: Uuid) -> Result<Option<Match>, EngineError> {
        let inner = self.inner.lock().await;
        Ok(inner.matches.values().find(|m| m.id == match_id).cloned())
    }

    async fn find_match_for_pair(&self, u: &str, v: &str) -> Result<Option<Match>, EngineError> {
        let inner = self.inner.lock().await;
        Ok(inner.matches.get(&canonical_pair(u, v)).cloned())
    }

    async fn list_matches(&self, user_id: &str) -> Result<Vec<Match>, EngineError> {
        let inner = self.inner.lock().await;
        let mut matches: Vec<Match> = inner
            .matches
            .values()
            .filter(|m| m.is_member(user_id))
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matches)
    }

    async fn append_message(&self, message: &Message) -> Result<(), EngineError> {
        let mut inner = self.inner.lock().await;
        inner.messages.push(message.clone());
        Ok(())
    }

    async fn list_messages(&self, match_id: Uuid) -> Result<Vec<Message>, EngineError> {
        let inner = self.inner.lock().await;
        let mut messages: Vec<Message> = inner
            .messages
            .iter()
            .filter(|m| m.match_id == match_id)
            .cloned()
            .collect();
        // stable sort keeps insertion order on equal timestamps
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swipe(actor: &str, target: &str, liked: bool) -> SwipeRecord {
        SwipeRecord {
            actor_id: actor.to_string(),
            target_id: target.to_string(),
            liked,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_swipe_uniqueness() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();

            assert!(store.insert_swipe(&swipe("a", "b", true)).await.unwrap());
            // Same pair again, even with a different decision, is rejected.
            assert!(!store.insert_swipe(&swipe("a", "b", false)).await.unwrap());
            // The stored record is the original.
            let stored = store.find_swipe("a", "b").await.unwrap().unwrap();
            assert!(stored.liked);
        });
    }

    #[test]
    fn test_match_pair_uniqueness() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();

            let first = store.create_match("bob", "alice").await.unwrap();
            assert!(first.created);

            // Reversed order resolves to the same canonical pair.
            let second = store.create_match("alice", "bob").await.unwrap();
            assert!(!second.created);
            assert_eq!(first.record.id, second.record.id);
        });
    }

    #[test]
    fn test_messages_keep_insertion_order_on_ties() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            let creation = store.create_match("a", "b").await.unwrap();
            let match_id = creation.record.id;
            let now = chrono::Utc::now();

            for content in ["first", "second", "third"] {
                store
                    .append_message(&Message {
                        id: Uuid::new_v4(),
                        match_id,
                        sender_id: "a".to_string(),
                        receiver_id: "b".to_string(),
                        content: content.to_string(),
                        created_at: now,
                    })
                    .await
                    .unwrap();
            }

            let messages = store.list_messages(match_id).await.unwrap();
            let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
            assert_eq!(contents, vec!["first", "second", "third"]);
        });
    }
}
