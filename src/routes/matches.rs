use std::collections::HashSet;
use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::core::{CandidateSelector, ConversationChannel, EngineError, MatchResolver, OVERFETCH_FACTOR};
use crate::models::{
    ErrorResponse, FindCandidatesRequest, FindCandidatesResponse, HealthResponse,
    ListMatchesQuery, ListMatchesResponse, ListMessagesQuery, ListMessagesResponse, MatchEntry,
    MatchedUser, PostMessageRequest, PostMessageResponse, Profile, RecordSwipeRequest,
    RecordSwipeResponse, SyncProfileResponse,
};
use crate::services::{CacheKey, CacheManager, PostgresClient, ProfileStoreClient, ProfileStoreError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub profiles: Arc<ProfileStoreClient>,
    pub cache: Arc<CacheManager>,
    pub postgres: Arc<PostgresClient>,
    pub selector: CandidateSelector,
    pub resolver: MatchResolver,
    pub channel: ConversationChannel,
}

/// Configure all engine routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/candidates/find", web::post().to(find_candidates))
        .route("/swipes", web::post().to(record_swipe))
        .route("/matches", web::get().to(list_matches))
        .route("/messages", web::post().to(post_message))
        .route("/messages", web::get().to(list_messages))
        .route("/profiles/sync", web::post().to(sync_profile))
        .route("/debug/echo", web::post().to(debug_echo));
}

/// Translate an engine error into the JSON error envelope
fn engine_error_response(err: &EngineError) -> HttpResponse {
    let status = actix_web::http::StatusCode::from_u16(err.status_code())
        .unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status).json(ErrorResponse {
        error: err.kind().to_string(),
        message: err.to_string(),
        status_code: err.status_code(),
    })
}

fn profile_error_response(err: &ProfileStoreError) -> HttpResponse {
    match err {
        ProfileStoreError::NotFound(_) => HttpResponse::NotFound().json(ErrorResponse {
            error: "not_found".to_string(),
            message: err.to_string(),
            status_code: 404,
        }),
        _ => HttpResponse::InternalServerError().json(ErrorResponse {
            error: "profile_store_error".to_string(),
            message: err.to_string(),
            status_code: 500,
        }),
    }
}

fn validation_error_response(errors: &validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "validation_failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

/// Profile lookup with cache-aside
async fn get_profile_cached(
    state: &AppState,
    user_id: &str,
) -> Result<Profile, ProfileStoreError> {
    let cache_key = CacheKey::profile(user_id);
    if let Ok(profile) = state.cache.get::<Profile>(&cache_key).await {
        return Ok(profile);
    }

    let profile = state.profiles.get_profile(user_id).await?;
    if let Err(e) = state.cache.set(&cache_key, &profile).await {
        tracing::warn!("Failed to cache profile {}: {}", user_id, e);
    }

    Ok(profile)
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Debug endpoint to echo raw JSON for debugging
async fn debug_echo(body: web::Bytes, req: actix_web::HttpRequest) -> impl Responder {
    let body_str = String::from_utf8_lossy(&body);
    tracing::info!(
        "DEBUG echo - path: {}, method: {}, body: {}",
        req.path(),
        req.method(),
        body_str
    );
    HttpResponse::Ok().json(serde_json::json!({
        "path": req.path(),
        "method": req.method().to_string(),
        "body": body_str,
    }))
}

/// Find candidates endpoint
///
/// POST /api/v1/candidates/find
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "limit": 20,
///   "excludeUserIds": ["string"]
/// }
/// ```
async fn find_candidates(
    state: web::Data<AppState>,
    req: web::Json<FindCandidatesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for find_candidates request: {:?}", errors);
        return validation_error_response(&errors);
    }

    let user_id = &req.user_id;
    // Cap limit at 100 to prevent excessive queries
    let limit = req.limit.min(100) as usize;

    tracing::info!("Finding candidates for user: {}, limit: {}", user_id, limit);

    // Already-swiped targets must never come back
    let mut exclude_ids = match state.resolver.swiped_target_ids(user_id).await {
        Ok(ids) => ids,
        Err(e) => {
            tracing::warn!(
                "Failed to fetch swiped targets for {}, proceeding without filtering: {}",
                user_id,
                e
            );
            vec![]
        }
    };
    exclude_ids.extend(req.exclude_user_ids.iter().cloned());

    tracing::debug!("Excluding {} profiles for user {}", exclude_ids.len(), user_id);

    let actor = match get_profile_cached(&state, user_id).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::error!("Failed to fetch profile for {}: {}", user_id, e);
            return profile_error_response(&e);
        }
    };

    // Over-fetch so the ranking stage has headroom after filtering
    let mut store_exclude = exclude_ids.clone();
    store_exclude.push(user_id.clone());
    let pool = match state
        .profiles
        .list_profiles(&store_exclude, limit * OVERFETCH_FACTOR)
        .await
    {
        Ok(profiles) => profiles,
        Err(e) => {
            tracing::error!("Failed to list candidates for {}: {}", user_id, e);
            return profile_error_response(&e);
        }
    };

    tracing::debug!("Fetched {} candidate profiles for {}", pool.len(), user_id);

    let exclude_set: HashSet<String> = exclude_ids.into_iter().collect();
    let result = state.selector.select(&actor, pool, &exclude_set, limit);

    tracing::info!(
        "Returning {} candidates for user {} (from {} scored)",
        result.candidates.len(),
        user_id,
        result.total_candidates
    );

    HttpResponse::Ok().json(FindCandidatesResponse {
        candidates: result.candidates,
        total_candidates: result.total_candidates,
    })
}

/// Record swipe endpoint
///
/// POST /api/v1/swipes
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "targetUserId": "string",
///   "liked": true
/// }
/// ```
async fn record_swipe(
    state: web::Data<AppState>,
    req: web::Json<RecordSwipeRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error_response(&errors);
    }

    match state
        .resolver
        .record_swipe(&req.user_id, &req.target_user_id, req.liked)
        .await
    {
        Ok(outcome) => {
            if outcome.match_created {
                // Both members see a new match; drop their cached lists
                for member in [&req.user_id, &req.target_user_id] {
                    if let Err(e) = state.cache.delete(&CacheKey::matches(member)).await {
                        tracing::warn!("Failed to invalidate match cache for {}: {}", member, e);
                    }
                }
            }

            HttpResponse::Ok().json(RecordSwipeResponse {
                success: true,
                match_created: outcome.match_created,
                match_id: outcome.match_id,
            })
        }
        Err(e) => {
            tracing::info!(
                "Swipe rejected for {} -> {}: {}",
                req.user_id,
                req.target_user_id,
                e
            );
            engine_error_response(&e)
        }
    }
}

/// List matches endpoint
///
/// GET /api/v1/matches?userId={userId}
///
/// Returns the user's matches newest first, each enriched best-effort with
/// the other member's profile.
async fn list_matches(
    state: web::Data<AppState>,
    query: web::Query<ListMatchesQuery>,
) -> impl Responder {
    let user_id = &query.user_id;

    let cache_key = CacheKey::matches(user_id);
    if let Ok(entries) = state.cache.get::<Vec<MatchEntry>>(&cache_key).await {
        return HttpResponse::Ok().json(ListMatchesResponse { matches: entries });
    }

    let matches = match state.resolver.list_matches(user_id).await {
        Ok(matches) => matches,
        Err(e) => {
            tracing::error!("Failed to list matches for {}: {}", user_id, e);
            return engine_error_response(&e);
        }
    };

    let mut entries = Vec::with_capacity(matches.len());
    for record in matches {
        let other_id = record.other_member(user_id).unwrap_or_default().to_string();
        let user = match get_profile_cached(&state, &other_id).await {
            Ok(profile) => Some(MatchedUser::from(profile)),
            Err(e) => {
                tracing::warn!("Failed to enrich match {} with profile {}: {}", record.id, other_id, e);
                None
            }
        };
        entries.push(MatchEntry {
            match_id: record.id,
            matched_at: record.created_at,
            user,
        });
    }

    if let Err(e) = state.cache.set(&cache_key, &entries).await {
        tracing::warn!("Failed to cache match list for {}: {}", user_id, e);
    }

    HttpResponse::Ok().json(ListMatchesResponse { matches: entries })
}

/// Post message endpoint
///
/// POST /api/v1/messages
///
/// Request body:
/// ```json
/// {
///   "matchId": "uuid",
///   "senderId": "string",
///   "content": "string"
/// }
/// ```
async fn post_message(
    state: web::Data<AppState>,
    req: web::Json<PostMessageRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error_response(&errors);
    }

    match state
        .channel
        .post_message(req.match_id, &req.sender_id, &req.content)
        .await
    {
        Ok(message) => HttpResponse::Ok().json(PostMessageResponse { message }),
        Err(e) => {
            tracing::info!(
                "Message rejected for match {} from {}: {}",
                req.match_id,
                req.sender_id,
                e
            );
            engine_error_response(&e)
        }
    }
}

/// List messages endpoint
///
/// GET /api/v1/messages?matchId={matchId}&userId={userId}
///
/// Clients poll this while the conversation view is open; messages come
/// back in creation order, oldest first.
async fn list_messages(
    state: web::Data<AppState>,
    query: web::Query<ListMessagesQuery>,
) -> impl Responder {
    match state
        .channel
        .list_messages(query.match_id, &query.user_id)
        .await
    {
        Ok(messages) => HttpResponse::Ok().json(ListMessagesResponse { messages }),
        Err(e) => engine_error_response(&e),
    }
}

/// Profile sync endpoint
///
/// POST /api/v1/profiles/sync
///
/// Pushes a refreshed profile into the profile store: created when the id
/// is new, updated in place otherwise.
async fn sync_profile(state: web::Data<AppState>, req: web::Json<Profile>) -> impl Responder {
    if req.user_id.is_empty() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "invalid_input".to_string(),
            message: "userId is required".to_string(),
            status_code: 400,
        });
    }

    match state.profiles.sync_profile(&req).await {
        Ok(outcome) => {
            if let Err(e) = state.cache.delete(&CacheKey::profile(&req.user_id)).await {
                tracing::warn!("Failed to invalidate profile cache for {}: {}", req.user_id, e);
            }

            HttpResponse::Ok().json(SyncProfileResponse {
                profile: outcome.profile,
                created: outcome.created,
            })
        }
        Err(e) => {
            tracing::error!("Failed to sync profile {}: {}", req.user_id, e);
            profile_error_response(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_check_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
        };

        assert_eq!(response.status, "healthy");
    }

    #[test]
    fn test_engine_error_envelope_status() {
        let err = EngineError::Conflict("duplicate swipe".to_string());
        let response = engine_error_response(&err);
        assert_eq!(response.status().as_u16(), 409);
    }
}
