// Unit tests for DevMatch Algo

use std::collections::HashSet;

use devmatch_algo::core::{scoring::compatibility_score, selector::CandidateSelector};
use devmatch_algo::models::{ActivityLevel, Profile};

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
fn test_score_always_within_bounds() {
    let profiles = vec![
        profile("a", &[], ActivityLevel::Low, &[], ""),
        profile("b", &["Rust"], ActivityLevel::Medium, &["cli"], "Berlin"),
        profile(
            "c",
            &["Rust", "Go", "C", "Zig", "Python", "Ruby", "Java"],
            ActivityLevel::High,
            &["cli", "wasm", "embedded", "gamedev", "devops", "audio"],
            "Remote",
        ),
        profile("d", &["Go"], ActivityLevel::High, &["wasm"], "Remote, Earth"),
    ];

    for a in &profiles {
        for b in &profiles {
            let breakdown = compatibility_score(a, b);
            assert!(breakdown.score <= 100, "score {} out of range", breakdown.score);
        }
    }
}

#[test]
fn test_remote_go_developers_score_45() {
    let u = profile("u", &["Go", "Rust"], ActivityLevel::High, &["cli"], "Remote");
    let v = profile(
        "v",
        &["Go", "Python"],
        ActivityLevel::Medium,
        &["cli", "wasm"],
        "Remote, Earth",
    );

    assert_eq!(compatibility_score(&u, &v).score, 45);
}

#[test]
fn test_clone_with_two_overlaps_scores_seventy() {
    let a = profile(
        "a",
        &["Rust", "Go"],
        ActivityLevel::Medium,
        &["cli", "wasm"],
        "Berlin, Germany",
    );

    assert_eq!(compatibility_score(&a, &a.clone()).score, 70);
}

#[test]
fn test_scoring_is_deterministic() {
    let a = profile("a", &["Rust", "Go"], ActivityLevel::High, &["cli"], "Remote");
    let b = profile("b", &["Go"], ActivityLevel::Medium, &["cli"], "Munich, Germany");

    let first = compatibility_score(&a, &b);
    let second = compatibility_score(&a, &b);

    assert_eq!(first.score, second.score);
    assert_eq!(first.shared_languages, second.shared_languages);
    assert_eq!(first.shared_interests, second.shared_interests);
}

#[test]
fn test_selector_contract() {
    let selector = CandidateSelector::new();
    let actor = profile("actor", &["Rust", "Go"], ActivityLevel::High, &["cli"], "Remote");
    let exclude: HashSet<String> = ["excluded".to_string()].into_iter().collect();

    let candidates = vec![
        profile("actor", &["Rust"], ActivityLevel::High, &["cli"], "Remote"),
        profile("excluded", &["Rust"], ActivityLevel::High, &["cli"], "Remote"),
        profile("p1", &["Rust", "Go"], ActivityLevel::High, &["cli"], "Remote"),
        profile("p2", &["Go"], ActivityLevel::Medium, &[], "Lyon, France"),
        profile("p3", &["Rust"], ActivityLevel::High, &["cli"], "Remote"),
        profile("p4", &[], ActivityLevel::Low, &[], ""),
    ];

    let result = selector.select(&actor, candidates, &exclude, 3);

    assert!(result.candidates.len() <= 3);
    for candidate in &result.candidates {
        assert_ne!(candidate.user_id, "actor");
        assert_ne!(candidate.user_id, "excluded");
    }
    for pair in result.candidates.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn test_selector_deterministic_given_identical_inputs() {
    let selector = CandidateSelector::new();
    let actor = profile("actor", &["Rust"], ActivityLevel::High, &["cli"], "Remote");

    let pool = || {
        vec![
            profile("p1", &["Rust"], ActivityLevel::High, &["cli"], "Remote"),
            profile("p2", &["Rust"], ActivityLevel::High, &["cli"], "Remote"),
            profile("p3", &["Rust"], ActivityLevel::High, &["cli"], "Remote"),
        ]
    };

    let first = selector.select(&actor, pool(), &HashSet::new(), 2);
    let second = selector.select(&actor, pool(), &HashSet::new(), 2);

    let ids = |r: &devmatch_algo::core::SelectionResult| {
        r.candidates.iter().map(|c| c.user_id.clone()).collect::<Vec<_>>()
    };
    assert_eq!(ids(&first), ids(&second));
}
