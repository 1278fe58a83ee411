use crate::core::distance::{distance_km, is_within_bounding_box};
use crate::models::{CandidateQuery, GeoPoint, Profile};

/// Check if a profile may be shown to other users at all
#[inline]
pub fn is_discoverable(profile: &Profile) -> bool {
    profile.visibility.profile
}

/// Check if a profile satisfies a candidate query
///
/// Stores that cannot push these conditions down into their query language
/// apply this predicate to every row.
#[inline]
pub fn matches_query_constraints(profile: &Profile, query: &CandidateQuery) -> bool {
    if profile.user_id == query.requester_id {
        return false;
    }

    if !is_discoverable(profile) {
        return false;
    }

    if query.exclude_user_ids.iter().any(|id| id == &profile.user_id) {
        return false;
    }

    if query.require_location_visible || query.bounding_box.is_some() {
        let Some(location) = profile.exposed_location() else {
            return false;
        };
        if let Some(bbox) = &query.bounding_box {
            if !is_within_bounding_box(&location, bbox) {
                return false;
            }
        }
    }

    true
}

/// Distance from `origin` to the candidate, if it is exposed and within `radius_km`
#[inline]
pub fn within_radius(origin: &GeoPoint, candidate: &Profile, radius_km: f64) -> Option<f64> {
    let location = candidate.exposed_location()?;
    let distance = distance_km(origin, &location);
    (distance <= radius_km).then_some(distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::distance::calculate_bounding_box;

    fn create_test_profile(id: &str, lat: f64, lon: f64) -> Profile {
        let mut profile = Profile::new(id);
        profile.location = Some(GeoPoint::new(lat, lon).unwrap());
        profile
    }

    #[test]
    fn test_requester_excluded() {
        let query = CandidateQuery::new("me", 10);
        assert!(!matches_query_constraints(&create_test_profile("me", 1.0, 1.0), &query));
        assert!(matches_query_constraints(&create_test_profile("you", 1.0, 1.0), &query));
    }

    #[test]
    fn test_excluded_ids_filtered() {
        let mut query = CandidateQuery::new("me", 10);
        query.exclude_user_ids = vec!["blocked".to_string()];
        assert!(!matches_query_constraints(&create_test_profile("blocked", 1.0, 1.0), &query));
    }

    #[test]
    fn test_hidden_profile_filtered() {
        let query = CandidateQuery::new("me", 10);
        let mut profile = create_test_profile("you", 1.0, 1.0);
        profile.visibility.profile = false;
        assert!(!matches_query_constraints(&profile, &query));
    }

    #[test]
    fn test_location_requirement() {
        let mut query = CandidateQuery::new("me", 10);
        query.require_location_visible = true;

        let no_location = Profile::new("a");
        let mut hidden_location = create_test_profile("b", 1.0, 1.0);
        hidden_location.visibility.location = false;

        assert!(!matches_query_constraints(&no_location, &query));
        assert!(!matches_query_constraints(&hidden_location, &query));
        assert!(matches_query_constraints(&create_test_profile("c", 1.0, 1.0), &query));
    }

    #[test]
    fn test_bounding_box_constraint() {
        let center = GeoPoint::new(40.7128, -74.0060).unwrap();
        let mut query = CandidateQuery::new("me", 10);
        query.bounding_box = Some(calculate_bounding_box(&center, 10.0));

        assert!(matches_query_constraints(&create_test_profile("near", 40.71, -74.0), &query));
        assert!(!matches_query_constraints(&create_test_profile("far", 50.0, -80.0), &query));
    }

    #[test]
    fn test_within_radius() {
        let origin = GeoPoint::new(39.9042, 116.4074).unwrap();
        let near = create_test_profile("near", 39.9163, 116.3972);
        let far = create_test_profile("far", 31.2304, 121.4737);

        assert!(within_radius(&origin, &near, 50.0).is_some());
        assert!(within_radius(&origin, &far, 50.0).is_none());
        assert!(within_radius(&origin, &Profile::new("none"), 50.0).is_none());
    }
}
