use crate::core::{
    distance::{calculate_bounding_box, is_within_bounding_box, round_km},
    filters::within_radius,
    scoring::{calculate_match_score, ScoringRules, ScoringVersion},
};
use crate::models::{NearbyCandidate, Profile, ScoredCandidate};

/// Radius used by the nearby search when the caller does not pick one
pub const DEFAULT_NEARBY_RADIUS_KM: f64 = 50.0;

/// Main matching orchestrator
///
/// Candidates arrive already filtered by the caller (self, interacted users
/// and hidden profiles removed). The matcher only scores, orders and caps.
#[derive(Debug, Clone)]
pub struct Matcher {
    rules: ScoringRules,
}

impl Matcher {
    pub fn new(rules: ScoringRules) -> Self {
        Self { rules }
    }

    pub fn with_version(version: ScoringVersion) -> Self {
        Self::new(ScoringRules::for_version(version))
    }

    pub fn with_default_rules() -> Self {
        Self::new(ScoringRules::default())
    }

    pub fn version(&self) -> ScoringVersion {
        self.rules.version
    }

    /// Score every candidate against the requester and return the best ones
    ///
    /// # Arguments
    /// * `requester` - The profile matches are being found for
    /// * `candidates` - Pre-filtered candidate profiles
    /// * `max_results` - Maximum number of matches to return
    ///
    /// # Returns
    /// Up to `max_results` candidates by descending score. Equal scores keep
    /// their input order.
    pub fn score_candidates(
        &self,
        requester: &Profile,
        candidates: &[Profile],
        max_results: usize,
    ) -> Vec<ScoredCandidate> {
        let mut scored: Vec<ScoredCandidate> = candidates
            .iter()
            .map(|candidate| {
                let breakdown = calculate_match_score(requester, candidate, &self.rules);

                ScoredCandidate {
                    profile: candidate.public_view(),
                    score: breakdown.score,
                    distance_km: breakdown.distance_km.map(round_km),
                    shared_interests: breakdown.shared_interests,
                }
            })
            .collect();

        // `sort_by` is stable, so ties stay in input order
        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored.truncate(max_results);

        tracing::trace!(
            "Scored {} candidates for {} with {}, returning {}",
            candidates.len(),
            requester.user_id,
            self.rules.version,
            scored.len()
        );

        scored
    }

    /// Find candidates within `radius_km` of the requester, nearest first
    ///
    /// The requester's own location is used regardless of their visibility
    /// flag; candidates only count when their location is exposed. Returns an
    /// empty list when the requester has no location.
    pub fn find_nearby(&self, requester: &Profile, candidates: &[Profile], radius_km: f64) -> Vec<NearbyCandidate> {
        let Some(origin) = requester.location else {
            return Vec::new();
        };

        let bbox = calculate_bounding_box(&origin, radius_km);

        let mut nearby: Vec<(f64, &Profile)> = candidates
            .iter()
            .filter(|p| p.user_id != requester.user_id)
            // Cheap pre-filter before the trigonometry
            .filter(|p| {
                p.exposed_location()
                    .map(|loc| is_within_bounding_box(&loc, &bbox))
                    .unwrap_or(false)
            })
            .filter_map(|p| within_radius(&origin, p, radius_km).map(|d| (d, p)))
            .collect();

        nearby.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        nearby
            .into_iter()
            .map(|(distance, profile)| NearbyCandidate {
                profile: profile.public_view(),
                distance_km: round_km(distance),
            })
            .collect()
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeoPoint;

    fn create_candidate(id: &str, age: Option<u8>, lat: f64, lon: f64) -> Profile {
        let mut profile = Profile::new(id);
        profile.age = age;
        profile.location = Some(GeoPoint::new(lat, lon).unwrap());
        profile
    }

    fn create_requester() -> Profile {
        create_candidate("current_user", Some(25), 39.9042, 116.4074) // Beijing
    }

    #[test]
    fn test_score_candidates_basic() {
        let matcher = Matcher::with_default_rules();
        let requester = create_requester();

        let candidates = vec![
            create_candidate("far_old", Some(60), 31.2304, 121.4737), // Shanghai, big age gap
            create_candidate("close", Some(27), 39.9163, 116.3972),
            create_candidate("mid", Some(33), 39.95, 116.6),
        ];

        let result = matcher.score_candidates(&requester, &candidates, 10);

        assert_eq!(result.len(), 3);
        assert_eq!(result[0].profile.user_id, "close");
        assert_eq!(result[0].score, 70);
        assert_eq!(result[2].profile.user_id, "far_old");
        assert_eq!(result[2].score, 20);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let matcher = Matcher::with_default_rules();
        let requester = Profile::new("current_user");

        let candidates: Vec<Profile> = ["a", "b", "c", "d"].iter().map(|id| Profile::new(*id)).collect();

        let result = matcher.score_candidates(&requester, &candidates, 10);

        let ids: Vec<&str> = result.iter().map(|m| m.profile.user_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
        assert!(result.iter().all(|m| m.score == 20));
    }

    #[test]
    fn test_respects_limit() {
        let matcher = Matcher::with_default_rules();
        let requester = create_requester();

        let candidates: Vec<Profile> = (0..20)
            .map(|i| create_candidate(&i.to_string(), Some(20 + i as u8), 39.9 + i as f64 * 0.05, 116.4))
            .collect();

        let result = matcher.score_candidates(&requester, &candidates, 5);

        assert_eq!(result.len(), 5);
        assert!(matcher.score_candidates(&requester, &candidates, 0).is_empty());
    }

    #[test]
    fn test_distance_rounded_for_output() {
        let matcher = Matcher::with_default_rules();
        let requester = create_requester();
        let candidates = vec![create_candidate("close", None, 39.9163, 116.3972)];

        let result = matcher.score_candidates(&requester, &candidates, 10);
        let d = result[0].distance_km.unwrap();

        assert_eq!(d, (d * 100.0).round() / 100.0);
    }

    #[test]
    fn test_empty_candidates() {
        let matcher = Matcher::with_default_rules();
        assert!(matcher.score_candidates(&create_requester(), &[], 10).is_empty());
    }

    #[test]
    fn test_find_nearby_sorted_and_bounded() {
        let matcher = Matcher::with_default_rules();
        let requester = create_requester();

        let mut hidden = create_candidate("hidden", None, 39.905, 116.41);
        hidden.visibility.location = false;

        let candidates = vec![
            create_candidate("twenty_km", None, 40.08, 116.41),
            create_candidate("one_km", None, 39.9163, 116.3972),
            create_candidate("shanghai", None, 31.2304, 121.4737),
            hidden,
            Profile::new("no_location"),
        ];

        let result = matcher.find_nearby(&requester, &candidates, DEFAULT_NEARBY_RADIUS_KM);

        let ids: Vec<&str> = result.iter().map(|n| n.profile.user_id.as_str()).collect();
        assert_eq!(ids, vec!["one_km", "twenty_km"]);
        assert!(result[0].distance_km <= result[1].distance_km);
    }

    #[test]
    fn test_find_nearby_without_requester_location() {
        let matcher = Matcher::with_default_rules();
        let candidates = vec![create_candidate("a", None, 39.9163, 116.3972)];
        assert!(matcher.find_nearby(&Profile::new("me"), &candidates, 50.0).is_empty());
    }

    #[test]
    fn test_find_nearby_uses_private_requester_location() {
        let matcher = Matcher::with_default_rules();
        let mut requester = create_requester();
        requester.visibility.location = false;
        let candidates = vec![create_candidate("a", None, 39.9163, 116.3972)];

        assert_eq!(matcher.find_nearby(&requester, &candidates, 50.0).len(), 1);
    }
}
