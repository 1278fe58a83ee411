// Scorer property tests for Match Scorer

use match_scorer::core::{
    distance::{distance_between, haversine_distance},
    scoring::{calculate_match_score, ScoringRules},
    Matcher,
};
use match_scorer::models::{GeoPoint, Profile};

fn profile(id: &str, age: Option<u8>, location: Option<(f64, f64)>) -> Profile {
    let mut p = Profile::new(id);
    p.age = age;
    p.location = location.map(|(lat, lon)| GeoPoint::new(lat, lon).unwrap());
    p
}

/// Deterministic spread of profiles: some without age, some without location
fn candidate_grid() -> Vec<Profile> {
    (0..60u32)
        .map(|i| {
            let age = if i % 7 == 0 { None } else { Some(18 + (i * 3 % 50) as u8) };
            let location = if i % 5 == 0 {
                None
            } else {
                Some((39.9 + (i as f64 * 0.37) % 3.0, 116.4 - (i as f64 * 0.21) % 2.0))
            };
            let mut p = profile(&format!("c{}", i), age, location);
            if i % 4 == 0 {
                p.interests.insert("music".to_string());
            }
            if i % 6 == 0 {
                p.city = Some("Beijing".to_string());
            }
            p
        })
        .collect()
}

#[test]
fn test_reference_example() {
    let requester = profile("a", Some(25), Some((39.9042, 116.4074)));
    let candidate = profile("b", Some(27), Some((39.9163, 116.3972)));

    let result = calculate_match_score(&requester, &candidate, &ScoringRules::v1());

    assert_eq!(result.score, 70);
    let d = result.distance_km.unwrap();
    assert!((d - 1.3).abs() < 0.3, "Expected ~1.3km, got {}", d);
}

#[test]
fn test_scores_always_in_range() {
    let mut requester = profile("me", Some(30), Some((40.5, 116.0)));
    requester.interests.insert("music".to_string());
    requester.city = Some("Beijing".to_string());

    for rules in [ScoringRules::v1(), ScoringRules::v2()] {
        for candidate in candidate_grid() {
            let score = calculate_match_score(&requester, &candidate, &rules).score;
            assert!(score <= 100, "Score {} out of range", score);
        }
    }
}

#[test]
fn test_same_age_close_by_scores_at_least_70() {
    for (lat, lon) in [(39.9042, 116.4074), (0.0, 0.0), (-33.8688, 151.2093)] {
        let requester = profile("a", Some(31), Some((lat, lon)));
        let candidate = profile("b", Some(31), Some((lat + 0.05, lon)));

        let score = calculate_match_score(&requester, &candidate, &ScoringRules::v1()).score;
        assert!(score >= 70, "Expected >= 70 at ({}, {}), got {}", lat, lon, score);
    }
}

#[test]
fn test_no_data_gives_version_floor() {
    let requester = profile("a", None, None);
    let candidate = profile("b", None, None);

    assert_eq!(calculate_match_score(&requester, &candidate, &ScoringRules::v1()).score, 20);
    assert_eq!(calculate_match_score(&requester, &candidate, &ScoringRules::v2()).score, 0);
}

#[test]
fn test_distance_symmetric_and_zero_on_self() {
    let points = [
        (39.9042, 116.4074),
        (0.0, 0.0),
        (-33.8688, 151.2093),
        (51.5074, -0.1278),
        (89.9, -179.9),
    ];

    for &(lat1, lon1) in &points {
        assert!(haversine_distance(lat1, lon1, lat1, lon1).abs() < 1e-9);
        for &(lat2, lon2) in &points {
            let ab = haversine_distance(lat1, lon1, lat2, lon2);
            let ba = haversine_distance(lat2, lon2, lat1, lon1);
            assert!((ab - ba).abs() < 1e-6, "asymmetric: {} vs {}", ab, ba);
        }
    }
}

#[test]
fn test_missing_location_is_unknown_not_far() {
    let beijing = GeoPoint::new(39.9042, 116.4074).unwrap();
    assert_eq!(distance_between(Some(beijing), None), None);

    let matcher = Matcher::with_default_rules();
    let requester = profile("me", Some(30), Some((39.9042, 116.4074)));
    let candidates = vec![
        profile("far", Some(30), Some((-33.8688, 151.2093))),
        profile("unknown", Some(30), None),
    ];

    let result = matcher.score_candidates(&requester, &candidates, 10);

    // Both only earn the age signal; unknown distance is not penalised
    assert_eq!(result[0].score, result[1].score);
    assert_eq!(result[0].profile.user_id, "far");
    assert!(result[1].distance_km.is_none());
}

#[test]
fn test_sorted_and_capped() {
    let requester = profile("me", Some(28), Some((40.0, 116.0)));

    for rules in [ScoringRules::v1(), ScoringRules::v2()] {
        let matcher = Matcher::new(rules);
        for cap in [0usize, 1, 7, 60, 100] {
            let result = matcher.score_candidates(&requester, &candidate_grid(), cap);

            assert!(result.len() <= cap);
            assert_eq!(result.len(), cap.min(60));
            for pair in result.windows(2) {
                assert!(pair[0].score >= pair[1].score, "Matches not sorted by score");
            }
        }
    }
}

#[test]
fn test_private_fields_never_leak_into_results() {
    let matcher = Matcher::with_default_rules();
    let requester = profile("me", Some(28), Some((40.0, 116.0)));

    let mut secret = profile("secret", Some(28), Some((40.0, 116.0)));
    secret.visibility.location = false;
    secret.contact.phone = Some("555-0100".to_string());

    let result = matcher.score_candidates(&requester, &[secret], 10);

    assert!(result[0].profile.location.is_none());
    assert!(result[0].profile.contact.is_none());
    assert!(result[0].distance_km.is_none());
}
