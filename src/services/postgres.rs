use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::core::error::EngineError;
use crate::core::store::{EngineStore, MatchCreation};
use crate::models::{canonical_pair, Match, Message, SwipeRecord};

/// PostgreSQL store for swipes, matches and messages
///
/// The schema carries the engine's two uniqueness constraints: the
/// `(actor_id, target_id)` primary key on swipes and the canonical-pair
/// unique constraint on matches. Conflict handling rides on
/// `ON CONFLICT DO NOTHING` so concurrent writers never error each other.
pub struct PostgresClient {
    pool: PgPool,
}

fn db_err(err: sqlx::Error) -> EngineError {
    EngineError::Backend(err.to_string())
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, EngineError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await
            .map_err(db_err)?;

        // Run migrations on startup
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| EngineError::Backend(e.to_string()))?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, EngineError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
        )
        .await
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, EngineError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(db_err)
    }
}

fn swipe_from_row(row: &sqlx::postgres::PgRow) -> SwipeRecord {
    SwipeRecord {
        actor_id: row.get("actor_id"),
        target_id: row.get("target_id"),
        liked: row.get("liked"),
        created_at: row.get("created_at"),
    }
}

fn match_from_row(row: &sqlx::postgres::PgRow) -> Match {
    Match {
        id: row.get("id"),
        user_a: row.get("user_a"),
        user_b: row.get("user_b"),
        created_at: row.get("created_at"),
    }
}

fn message_from_row(row: &sqlx::postgres::PgRow) -> Message {
    Message {
        id: row.get("id"),
        match_id: row.get("match_id"),
        sender_id: row.get("sender_id"),
        receiver_id: row.get("receiver_id"),
        content: row.get("content"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl EngineStore for PostgresClient {
    async fn insert_swipe(&self, swipe: &SwipeRecord) -> Result<bool, EngineError> {
        let query = r#"
            INSERT INTO swipes (actor_id, target_id, liked, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (actor_id, target_id) DO NOTHING
        "#;

        let result = sqlx::query(query)
            .bind(&swipe.actor_id)
            .bind(&swipe.target_id)
            .bind(swipe.liked)
            .bind(swipe.created_at)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_swipe(
        &self,
        actor_id: &str,
        target_id: &str,
    ) -> Result<Option<SwipeRecord>, EngineError> {
        let query = r#"
            SELECT actor_id, target_id, liked, created_at
            FROM swipes
            WHERE actor_id = $1 AND target_id = $2
        "#;

        let row = sqlx::query(query)
            .bind(actor_id)
            .bind(target_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(row.as_ref().map(swipe_from_row))
    }

    async fn swiped_target_ids(&self, actor_id: &str) -> Result<Vec<String>, EngineError> {
        let query = r#"
            SELECT target_id
            FROM swipes
            WHERE actor_id = $1
        "#;

        let rows = sqlx::query(query)
            .bind(actor_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        let target_ids: Vec<String> = rows.iter().map(|row| row.get("target_id")).collect();

        tracing::debug!("User {} has swiped on {} profiles", actor_id, target_ids.len());

        Ok(target_ids)
    }

    async fn create_match(&self, u: &str, v: &str) -> Result<MatchCreation, EngineError> {
        let (user_a, user_b) = canonical_pair(u, v);
        let id = Uuid::new_v4();
        let created_at = chrono::Utc::now();

        let insert = r#"
            INSERT INTO matches (id, user_a, user_b, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_a, user_b) DO NOTHING
        "#;

        let result = sqlx::query(insert)
            .bind(id)
            .bind(&user_a)
            .bind(&user_b)
            .bind(created_at)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() > 0 {
            return Ok(MatchCreation {
                record: Match {
                    id,
                    user_a,
                    user_b,
                    created_at,
                },
                created: true,
            });
        }

        // Lost the race or the pair was already matched; the surviving row
        // is the answer.
        let select = r#"
            SELECT id, user_a, user_b, created_at
            FROM matches
            WHERE user_a = $1 AND user_b = $2
        "#;

        let row = sqlx::query(select)
            .bind(&user_a)
            .bind(&user_b)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(MatchCreation {
            record: match_from_row(&row),
            created: false,
        })
    }

    async fn get_match(&self, match_id: Uuid) -> Result<Option<Match>, EngineError> {
        let query = r#"
            SELECT id, user_a, user_b, created_at
            FROM matches
            WHERE id = $1
        "#;

        let row = sqlx::query(query)
            .bind(match_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(row.as_ref().map(match_from_row))
    }

    async fn find_match_for_pair(&self, u: &str, v: &str) -> Result<Option<Match>, EngineError> {
        let (user_a, user_b) = canonical_pair(u, v);

        let query = r#"
            SELECT id, user_a, user_b, created_at
            FROM matches
            WHERE user_a = $1 AND user_b = $2
        "#;

        let row = sqlx::query(query)
            .bind(&user_a)
            .bind(&user_b)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(row.as_ref().map(match_from_row))
    }

    async fn list_matches(&self, user_id: &str) -> Result<Vec<Match>, EngineError> {
        let query = r#"
            SELECT id, user_a, user_b, created_at
            FROM matches
            WHERE user_a = $1 OR user_b = $1
            ORDER BY created_at DESC
        "#;

        let rows = sqlx::query(query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(rows.iter().map(match_from_row).collect())
    }

    async fn append_message(&self, message: &Message) -> Result<(), EngineError> {
        let query = r#"
            INSERT INTO messages (id, match_id, sender_id, receiver_id, content, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
        "#;

        sqlx::query(query)
            .bind(message.id)
            .bind(message.match_id)
            .bind(&message.sender_id)
            .bind(&message.receiver_id)
            .bind(&message.content)
            .bind(message.created_at)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(())
    }

    async fn list_messages(&self, match_id: Uuid) -> Result<Vec<Message>, EngineError> {
        // seq breaks creation-time ties in insertion order
        let query = r#"
            SELECT id, match_id, sender_id, receiver_id, content, created_at
            FROM messages
            WHERE match_id = $1
            ORDER BY created_at ASC, seq ASC
        "#;

        let rows = sqlx::query(query)
            .bind(match_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(rows.iter().map(message_from_row).collect())
    }
}
