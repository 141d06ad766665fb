use std::collections::HashSet;

use crate::core::scoring::compatibility_score;
use crate::models::{Profile, ScoredCandidate};

/// How many extra candidates the route layer requests from the profile
/// store per returned result, giving the ranking stage headroom.
pub const OVERFETCH_FACTOR: usize = 3;

/// Result of the selection process
#[derive(Debug)]
pub struct SelectionResult {
    pub candidates: Vec<ScoredCandidate>,
    pub total_candidates: usize,
}

/// Candidate selection pipeline
///
/// # Pipeline stages
/// 1. Drop the actor and anything in the exclusion set
/// 2. Score every remaining profile against the actor
/// 3. Rank by score, stable on fetch order
/// 4. Truncate to the requested batch size
#[derive(Debug, Clone, Copy, Default)]
pub struct CandidateSelector;

impl CandidateSelector {
    pub fn new() -> Self {
        Self
    }

    /// Produce a ranked candidate batch for the actor.
    ///
    /// The store query already excludes the actor and swiped targets; the
    /// selector re-checks both so its contract holds regardless of what the
    /// fetch returned. Ties keep fetch order (stable sort), so identical
    /// inputs produce identical batches. An empty batch is a valid result.
    pub fn select(
        &self,
        actor: &Profile,
        candidates: Vec<Profile>,
        exclude_ids: &HashSet<String>,
        limit: usize,
    ) -> SelectionResult {
        let mut scored: Vec<ScoredCandidate> = candidates
            .into_iter()
            .filter(|profile| {
                profile.user_id != actor.user_id && !exclude_ids.contains(&profile.user_id)
            })
            .map(|profile| {
                let breakdown = compatibility_score(actor, &profile);
                ScoredCandidate {
                    user_id: profile.user_id,
                    display_name: profile.display_name,
                    languages: profile.languages,
                    interests: profile.interests,
                    activity_level: profile.activity_level,
                    location: profile.location,
                    score: breakdown.score,
                    shared_languages: breakdown.shared_languages,
                    shared_interests: breakdown.shared_interests,
                }
            })
            .collect();

        let total_candidates = scored.len();

        // sort_by is stable: equal scores keep fetch order
        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored.truncate(limit);

        SelectionResult {
            candidates: scored,
            total_candidates,
        }
    }
}
