use crate::models::{ActivityLevel, Profile};

/// Per-language contribution and cap
const LANGUAGE_POINTS: usize = 10;
const LANGUAGE_CAP: usize = 40;

/// Per-interest contribution and cap
const INTEREST_POINTS: usize = 5;
const INTEREST_CAP: usize = 20;

const ACTIVITY_EQUAL: u8 = 20;
const ACTIVITY_ADJACENT: u8 = 10;

const LOCATION_MATCH: u8 = 20;
const LOCATION_SAME_REGION: u8 = 10;

/// Compatibility score plus the shared attributes that produced it.
#[derive(Debug, Clone)]
pub struct ScoreBreakdown {
    pub score: u8,
    pub shared_languages: Vec<String>,
    pub shared_interests: Vec<String>,
}

/// Calculate a compatibility score (0-100) between two profiles
///
/// Scoring formula:
/// ```text
/// score = languages  (+10 per shared language, max 40)
///       + activity   (+20 equal, +10 adjacent tier)
///       + interests  (+5 per shared interest, max 20)
///       + location   (+20 same place or both remote, +10 same region)
/// ```
///
/// Deterministic and side-effect free. Absent fields contribute nothing;
/// the shared-attribute lists follow `a`'s ordering.
pub fn compatibility_score(a: &Profile, b: &Profile) -> ScoreBreakdown {
    let shared_languages: Vec<String> = a
        .languages
        .iter()
        .filter(|lang| b.languages.contains(lang))
        .cloned()
        .collect();
    let language_score = (shared_languages.len() * LANGUAGE_POINTS).min(LANGUAGE_CAP) as u8;

    let shared_interests: Vec<String> = a
        .interests
        .iter()
        .filter(|interest| b.interests.contains(interest))
        .cloned()
        .collect();
    let interest_score = (shared_interests.len() * INTEREST_POINTS).min(INTEREST_CAP) as u8;

    let score = language_score
        + activity_score(a.activity_level, b.activity_level)
        + interest_score
        + location_score(&a.location, &b.location);

    ScoreBreakdown {
        score,
        shared_languages,
        shared_interests,
    }
}

/// Activity tier contribution: full credit for the same tier, partial for
/// an adjacent one, nothing across the low/high gap.
#[inline]
fn activity_score(a: ActivityLevel, b: ActivityLevel) -> u8 {
    match a.rank().abs_diff(b.rank()) {
        0 => ACTIVITY_EQUAL,
        1 => ACTIVITY_ADJACENT,
        _ => 0,
    }
}

/// Location contribution.
///
/// Full credit when the strings match case-insensitively or both mention
/// "remote". Otherwise partial credit when the "City, Region" segment after
/// the first comma agrees. Two differing comma-less locations both yield an
/// absent region and still compare equal.
#[inline]
fn location_score(a: &str, b: &str) -> u8 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let a_lower = a.to_lowercase();
    let b_lower = b.to_lowercase();

    if a_lower == b_lower || (a_lower.contains("remote") && b_lower.contains("remote")) {
        return LOCATION_MATCH;
    }

    if region_of(a) == region_of(b) {
        return LOCATION_SAME_REGION;
    }

    0
}

/// The comma-delimited region segment, trimmed and lowercased.
#[inline]
fn region_of(location: &str) -> Option<String> {
    location.split(',').nth(1).map(|region| region.trim().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(
        id: &str,
        languages: &[&str],
        activity: ActivityLevel,
        interests: &[&str],
        location: &str,
    ) -> Profile {
        Profile {
            user_id: id.to_string(),
            display_name: format!("User {}", id),
            languages: languages.iter().map(|s| s.to_string()).collect(),
            interests: interests.iter().map(|s| s.to_string()).collect(),
            activity_level: activity,
            location: location.to_string(),
            created_at: None,
        }
    }

    #[test]
    fn test_remote_developers_scenario() {
        let u = profile("u", &["Go", "Rust"], ActivityLevel::High, &["cli"], "Remote");
        let v = profile(
            "v",
            &["Go", "Python"],
            ActivityLevel::Medium,
            &["cli", "wasm"],
            "Remote, Earth",
        );

        let breakdown = compatibility_score(&u, &v);

        // 10 (Go) + 10 (adjacent activity) + 5 (cli) + 20 (both remote)
        assert_eq!(breakdown.score, 45);
        assert_eq!(breakdown.shared_languages, vec!["Go"]);
        assert_eq!(breakdown.shared_interests, vec!["cli"]);
    }

    #[test]
    fn test_identical_clone_scores_seventy() {
        let a = profile(
            "a",
            &["Rust", "Go"],
            ActivityLevel::Medium,
            &["cli", "wasm"],
            "Berlin, Germany",
        );

        let breakdown = compatibility_score(&a, &a.clone());

        // 20 languages + 20 activity + 10 interests + 20 location
        assert_eq!(breakdown.score, 70);
    }

    #[test]
    fn test_language_cap() {
        let a = profile(
            "a",
            &["Rust", "Go", "C", "Zig", "Python", "Ruby"],
            ActivityLevel::Low,
            &[],
            "",
        );
        let b = profile(
            "b",
            &["Rust", "Go", "C", "Zig", "Python", "Ruby"],
            ActivityLevel::High,
            &[],
            "",
        );

        let breakdown = compatibility_score(&a, &b);

        // Six shared languages cap at 40; low vs high activity adds nothing.
        assert_eq!(breakdown.score, 40);
        assert_eq!(breakdown.shared_languages.len(), 6);
    }

    #[test]
    fn test_interest_cap() {
        let interests = ["cli", "wasm", "embedded", "gamedev", "devops"];
        let a = profile("a", &[], ActivityLevel::Low, &interests, "");
        let b = profile("b", &[], ActivityLevel::Low, &interests, "");

        let breakdown = compatibility_score(&a, &b);

        // Five shared interests cap at 20, plus 20 for equal activity.
        assert_eq!(breakdown.score, 40);
    }

    #[test]
    fn test_activity_adjacency() {
        let low = profile("a", &[], ActivityLevel::Low, &[], "");
        let medium = profile("b", &[], ActivityLevel::Medium, &[], "");
        let high = profile("c", &[], ActivityLevel::High, &[], "");

        assert_eq!(compatibility_score(&low, &medium).score, 10);
        assert_eq!(compatibility_score(&medium, &high).score, 10);
        assert_eq!(compatibility_score(&low, &high).score, 0);
        assert_eq!(compatibility_score(&high, &high).score, 20);
    }

    #[test]
    fn test_location_case_insensitive_match() {
        let a = profile("a", &[], ActivityLevel::Low, &[], "Berlin, Germany");
        let b = profile("b", &[], ActivityLevel::High, &[], "berlin, germany");

        assert_eq!(compatibility_score(&a, &b).score, 20);
    }

    #[test]
    fn test_location_same_region_partial_credit() {
        let a = profile("a", &[], ActivityLevel::Low, &[], "Munich, Germany");
        let b = profile("b", &[], ActivityLevel::High, &[], "Berlin,  germany ");

        assert_eq!(compatibility_score(&a, &b).score, 10);
    }

    #[test]
    fn test_location_different_regions() {
        let a = profile("a", &[], ActivityLevel::Low, &[], "Munich, Germany");
        let b = profile("b", &[], ActivityLevel::High, &[], "Lyon, France");

        assert_eq!(compatibility_score(&a, &b).score, 0);
    }

    #[test]
    fn test_location_comma_less_strings_share_region_credit() {
        // Reference heuristic: neither side has a region qualifier, the two
        // absent regions compare equal.
        let a = profile("a", &[], ActivityLevel::Low, &[], "Berlin");
        let b = profile("b", &[], ActivityLevel::High, &[], "Paris");

        assert_eq!(compatibility_score(&a, &b).score, 10);
    }

    #[test]
    fn test_empty_locations_score_nothing() {
        let a = profile("a", &[], ActivityLevel::Low, &[], "");
        let b = profile("b", &[], ActivityLevel::High, &[], "");

        assert_eq!(compatibility_score(&a, &b).score, 0);
    }

    #[test]
    fn test_score_bounded() {
        let a = profile(
            "a",
            &["Rust", "Go", "C", "Zig", "Python"],
            ActivityLevel::High,
            &["cli", "wasm", "embedded", "gamedev", "devops"],
            "Remote",
        );
        let b = profile(
            "b",
            &["Rust", "Go", "C", "Zig", "Python"],
            ActivityLevel::High,
            &["cli", "wasm", "embedded", "gamedev", "devops"],
            "Remote, Earth",
        );

        let breakdown = compatibility_score(&a, &b);

        assert_eq!(breakdown.score, 100);
        assert!(breakdown.score <= 100);
    }

    #[test]
    fn test_score_symmetric() {
        let a = profile(
            "a",
            &["Rust", "Go"],
            ActivityLevel::High,
            &["cli"],
            "Berlin, Germany",
        );
        let b = profile(
            "b",
            &["Go", "Python"],
            ActivityLevel::Medium,
            &["cli", "wasm"],
            "Munich, Germany",
        );

        assert_eq!(
            compatibility_score(&a, &b).score,
            compatibility_score(&b, &a).score
        );
    }
}
