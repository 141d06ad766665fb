use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::EngineError;
use crate::core::store::EngineStore;
use crate::models::{Match, Message};

/// Match-scoped conversation log
///
/// Append-only message sequence owned by its match. Both members may read
/// and write; nobody else may do either. Delivery is client-side polling,
/// so reads return the full ordered sequence.
#[derive(Clone)]
pub struct ConversationChannel {
    store: Arc<dyn EngineStore>,
}

impl ConversationChannel {
    pub fn new(store: Arc<dyn EngineStore>) -> Self {
        Self { store }
    }

    /// Append a message to the match conversation.
    ///
    /// The receiver is computed as the other member of the match.
    pub async fn post_message(
        &self,
        match_id: Uuid,
        sender_id: &str,
        content: &str,
    ) -> Result<Message, EngineError> {
        if content.is_empty() {
            return Err(EngineError::InvalidInput(
                "message content is required".to_string(),
            ));
        }

        let record = self.require_match(match_id).await?;
        let receiver_id = record.other_member(sender_id).ok_or_else(|| {
            EngineError::Unauthorized(format!(
                "{} is not a member of match {}",
                sender_id, match_id
            ))
        })?;

        let message = Message {
            id: Uuid::new_v4(),
            match_id,
            sender_id: sender_id.to_string(),
            receiver_id: receiver_id.to_string(),
            content: content.to_string(),
            created_at: chrono::Utc::now(),
        };

        self.store.append_message(&message).await?;

        tracing::debug!(
            "Message {} posted to match {} by {}",
            message.id,
            match_id,
            sender_id
        );

        Ok(message)
    }

    /// All messages of the match, creation time ascending.
    pub async fn list_messages(
        &self,
        match_id: Uuid,
        requester_id: &str,
    ) -> Result<Vec<Message>, EngineError> {
        let record = self.require_match(match_id).await?;
        if !record.is_member(requester_id) {
            return Err(EngineError::Unauthorized(format!(
                "{} is not a member of match {}",
                requester_id, match_id
            )));
        }

        self.store.list_messages(match_id).await
    }

    async fn require_match(&self, match_id: Uuid) -> Result<Match, EngineError> {
        self.store
            .get_match(match_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("match {}", match_id)))
    }
}
